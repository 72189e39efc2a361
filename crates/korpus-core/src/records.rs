//! Record-store contract.
//!
//! The ingestion pipeline consumes structured records through this narrow
//! CRUD trait rather than a concrete database client, so saga behavior can be
//! exercised against an in-memory fake in tests. `korpus-db` provides the
//! Postgres implementation.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{FileRecord, FileWorkspace, NewFile};

/// CRUD contract over the File and File-Workspace entities.
///
/// Errors carry a human-readable message; a missing record is reported as
/// [`AppError::NotFound`], distinct from other failures. Implementations must
/// provide per-row atomicity for individual operations; no cross-row
/// transaction is required by callers.
///
/// `delete_file` must leave no workspace link behind for the deleted file,
/// whether by an explicit delete or a store-level cascade.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a provisional file record and return it with its assigned id.
    async fn create_file(&self, new: NewFile) -> Result<FileRecord, AppError>;

    /// Fetch a file by id.
    async fn get_file(&self, id: Uuid) -> Result<FileRecord, AppError>;

    /// Set the storage path of an existing file and return the updated row.
    async fn update_file_path(&self, id: Uuid, file_path: &str) -> Result<FileRecord, AppError>;

    /// Delete a file and, transitively, its workspace links.
    async fn delete_file(&self, id: Uuid) -> Result<(), AppError>;

    /// Link a file into a workspace.
    async fn create_file_workspace(
        &self,
        user_id: Uuid,
        file_id: Uuid,
        workspace_id: Uuid,
    ) -> Result<FileWorkspace, AppError>;

    /// Remove a file from a workspace without deleting the file itself.
    async fn delete_file_workspace(
        &self,
        file_id: Uuid,
        workspace_id: Uuid,
    ) -> Result<(), AppError>;

    /// All files linked into the given workspace.
    async fn list_workspace_files(&self, workspace_id: Uuid) -> Result<Vec<FileRecord>, AppError>;

    /// All workspace links for the given file.
    async fn list_file_workspaces(&self, file_id: Uuid) -> Result<Vec<FileWorkspace>, AppError>;

    /// Insert several provisional records and link each into the workspace,
    /// atomically. No upload or processing is performed for batch inserts.
    async fn create_files(
        &self,
        files: Vec<NewFile>,
        workspace_id: Uuid,
    ) -> Result<Vec<FileRecord>, AppError>;
}
