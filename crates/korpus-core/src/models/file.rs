use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A stored document's metadata row.
///
/// `file_path` stays `None` between record creation and the completed upload;
/// a record with a non-null path always has a blob reachable at that path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub file_path: Option<String>,
    pub size: i64,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
}

impl FileRecord {
    /// Extension of the stored name, without the dot. Names are stored
    /// post-normalization, so this is already lowercase.
    pub fn extension(&self) -> Option<&str> {
        self.name.rsplit_once('.').map(|(_, ext)| ext)
    }
}

/// Provisional record supplied by the caller before ingestion.
///
/// The display name is overwritten with its normalized form during
/// ingestion; validation only requires it to be non-empty up front.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewFile {
    pub user_id: Uuid,
    #[validate(length(min = 1, message = "display name must not be empty"))]
    pub name: String,
    pub size: i64,
    #[validate(length(min = 1, message = "mime type must not be empty"))]
    pub mime_type: String,
}

/// Membership of a file in a workspace (many-to-many).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileWorkspace {
    pub user_id: Uuid,
    pub file_id: Uuid,
    pub workspace_id: Uuid,
}

/// Client-facing view of a finalized file.
#[derive(Debug, Serialize, Deserialize)]
pub struct FileResponse {
    pub id: Uuid,
    pub name: String,
    pub file_path: String,
    pub size: i64,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<FileRecord> for FileResponse {
    type Error = crate::AppError;

    fn try_from(file: FileRecord) -> Result<Self, Self::Error> {
        let file_path = file.file_path.ok_or_else(|| {
            crate::AppError::Internal(format!("file {} has no storage path", file.id))
        })?;
        Ok(FileResponse {
            id: file.id,
            name: file.name,
            file_path,
            size: file.size,
            mime_type: file.mime_type,
            created_at: file.created_at,
        })
    }
}
