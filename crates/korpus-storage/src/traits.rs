//! Storage abstraction trait
//!
//! This module defines the Storage trait that all content-store backends must
//! implement.

use async_trait::async_trait;
use korpus_core::StorageBackend;
use thiserror::Error;
use uuid::Uuid;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<StorageError> for korpus_core::AppError {
    fn from(err: StorageError) -> Self {
        korpus_core::AppError::Upload(err.to_string())
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// All content-store backends must implement this trait, which lets the
/// ingestion pipeline work against any backend without coupling to
/// implementation details.
///
/// **Key format:** `{user_id}/{file_id}/{filename}` — see [`crate::keys`].
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload a blob and return its storage path.
    ///
    /// The returned path is the stable reference persisted on the file
    /// record; passing it back to [`download`](Storage::download) yields the
    /// same bytes.
    async fn upload(
        &self,
        user_id: Uuid,
        file_id: Uuid,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<String>;

    /// Download a blob by its storage path.
    async fn download(&self, path: &str) -> StorageResult<Vec<u8>>;

    /// Delete a blob by its storage path.
    async fn delete(&self, path: &str) -> StorageResult<()>;

    /// Check whether a blob exists at the given path.
    async fn exists(&self, path: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
