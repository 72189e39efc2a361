//! File and file-workspace repositories.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use korpus_core::{AppError, FileRecord, FileWorkspace, NewFile, RecordStore};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Row shape for the `files` table.
#[derive(sqlx::FromRow)]
struct FileRow {
    id: Uuid,
    user_id: Uuid,
    name: String,
    file_path: Option<String>,
    size: i64,
    mime_type: String,
    created_at: DateTime<Utc>,
}

impl From<FileRow> for FileRecord {
    fn from(row: FileRow) -> Self {
        FileRecord {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            file_path: row.file_path,
            size: row.size,
            mime_type: row.mime_type,
            created_at: row.created_at,
        }
    }
}

const SELECT_FILE: &str =
    "SELECT id, user_id, name, file_path, size, mime_type, created_at FROM files";

/// Postgres implementation of the record-store contract.
///
/// `file_workspaces.file_id` carries `ON DELETE CASCADE`, so deleting a file
/// removes its workspace links in the same statement — no orphaned link can
/// survive a compensation delete.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    #[tracing::instrument(skip(self, new), fields(db.table = "files", db.operation = "insert"))]
    async fn create_file(&self, new: NewFile) -> Result<FileRecord, AppError> {
        new.validate()?;

        let row = sqlx::query_as::<_, FileRow>(
            "INSERT INTO files (id, user_id, name, file_path, size, mime_type, created_at) \
             VALUES ($1, $2, $3, NULL, $4, $5, $6) \
             RETURNING id, user_id, name, file_path, size, mime_type, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(new.user_id)
        .bind(&new.name)
        .bind(new.size)
        .bind(&new.mime_type)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::record_store("files", "insert", e))?;

        Ok(row.into())
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "select", db.record_id = %id))]
    async fn get_file(&self, id: Uuid) -> Result<FileRecord, AppError> {
        let row = sqlx::query_as::<_, FileRow>(&format!("{} WHERE id = $1", SELECT_FILE))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::record_store("files", "select", e))?;

        row.map(FileRecord::from)
            .ok_or_else(|| AppError::NotFound(format!("File {} not found", id)))
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "update", db.record_id = %id))]
    async fn update_file_path(&self, id: Uuid, file_path: &str) -> Result<FileRecord, AppError> {
        let row = sqlx::query_as::<_, FileRow>(
            "UPDATE files SET file_path = $2 WHERE id = $1 \
             RETURNING id, user_id, name, file_path, size, mime_type, created_at",
        )
        .bind(id)
        .bind(file_path)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::record_store("files", "update", e))?;

        row.map(FileRecord::from)
            .ok_or_else(|| AppError::NotFound(format!("File {} not found", id)))
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "delete", db.record_id = %id))]
    async fn delete_file(&self, id: Uuid) -> Result<(), AppError> {
        // Idempotent: deleting an already-absent file is not an error, which
        // keeps best-effort compensation quiet on double deletes.
        sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::record_store("files", "delete", e))?;

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "file_workspaces", db.operation = "insert"))]
    async fn create_file_workspace(
        &self,
        user_id: Uuid,
        file_id: Uuid,
        workspace_id: Uuid,
    ) -> Result<FileWorkspace, AppError> {
        let (user_id, file_id, workspace_id) = sqlx::query_as::<_, (Uuid, Uuid, Uuid)>(
            "INSERT INTO file_workspaces (user_id, file_id, workspace_id, created_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING user_id, file_id, workspace_id",
        )
        .bind(user_id)
        .bind(file_id)
        .bind(workspace_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::record_store("file_workspaces", "insert", e))?;

        Ok(FileWorkspace {
            user_id,
            file_id,
            workspace_id,
        })
    }

    #[tracing::instrument(skip(self), fields(db.table = "file_workspaces", db.operation = "delete"))]
    async fn delete_file_workspace(
        &self,
        file_id: Uuid,
        workspace_id: Uuid,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            "DELETE FROM file_workspaces WHERE file_id = $1 AND workspace_id = $2",
        )
        .bind(file_id)
        .bind(workspace_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::record_store("file_workspaces", "delete", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "File {} is not linked to workspace {}",
                file_id, workspace_id
            )));
        }

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "select"))]
    async fn list_workspace_files(&self, workspace_id: Uuid) -> Result<Vec<FileRecord>, AppError> {
        let rows = sqlx::query_as::<_, FileRow>(
            "SELECT f.id, f.user_id, f.name, f.file_path, f.size, f.mime_type, f.created_at \
             FROM files f \
             JOIN file_workspaces fw ON fw.file_id = f.id \
             WHERE fw.workspace_id = $1 \
             ORDER BY f.created_at",
        )
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::record_store("files", "select", e))?;

        Ok(rows.into_iter().map(FileRecord::from).collect())
    }

    #[tracing::instrument(skip(self), fields(db.table = "file_workspaces", db.operation = "select"))]
    async fn list_file_workspaces(&self, file_id: Uuid) -> Result<Vec<FileWorkspace>, AppError> {
        let rows = sqlx::query_as::<_, (Uuid, Uuid, Uuid)>(
            "SELECT user_id, file_id, workspace_id FROM file_workspaces WHERE file_id = $1",
        )
        .bind(file_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::record_store("file_workspaces", "select", e))?;

        Ok(rows
            .into_iter()
            .map(|(user_id, file_id, workspace_id)| FileWorkspace {
                user_id,
                file_id,
                workspace_id,
            })
            .collect())
    }

    #[tracing::instrument(skip(self, files), fields(db.table = "files", db.operation = "insert", batch_size = files.len()))]
    async fn create_files(
        &self,
        files: Vec<NewFile>,
        workspace_id: Uuid,
    ) -> Result<Vec<FileRecord>, AppError> {
        if files.is_empty() {
            return Err(AppError::Validation(
                "Cannot create an empty batch of files".to_string(),
            ));
        }
        for file in &files {
            file.validate()?;
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::record_store("files", "begin", e))?;

        let mut created = Vec::with_capacity(files.len());
        let created_at = Utc::now();

        for new in files {
            let row = sqlx::query_as::<_, FileRow>(
                "INSERT INTO files (id, user_id, name, file_path, size, mime_type, created_at) \
                 VALUES ($1, $2, $3, NULL, $4, $5, $6) \
                 RETURNING id, user_id, name, file_path, size, mime_type, created_at",
            )
            .bind(Uuid::new_v4())
            .bind(new.user_id)
            .bind(&new.name)
            .bind(new.size)
            .bind(&new.mime_type)
            .bind(created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| AppError::record_store("files", "insert", e))?;

            sqlx::query(
                "INSERT INTO file_workspaces (user_id, file_id, workspace_id, created_at) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(row.user_id)
            .bind(row.id)
            .bind(workspace_id)
            .bind(created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::record_store("file_workspaces", "insert", e))?;

            created.push(row.into());
        }

        tx.commit()
            .await
            .map_err(|e| AppError::record_store("files", "commit", e))?;

        Ok(created)
    }
}
