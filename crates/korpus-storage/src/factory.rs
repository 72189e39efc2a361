//! Storage backend factory.

use std::sync::Arc;

use korpus_core::{Config, StorageBackend};

use crate::local::LocalStorage;
use crate::memory::MemoryStorage;
use crate::traits::{Storage, StorageResult};

const DEFAULT_LOCAL_STORAGE_PATH: &str = "./data/files";

/// Build the content-store backend selected by configuration.
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend {
        StorageBackend::Local => {
            let base_path = config
                .local_storage_path
                .as_deref()
                .unwrap_or(DEFAULT_LOCAL_STORAGE_PATH);
            let storage = LocalStorage::new(base_path).await?;
            tracing::info!(base_path = %base_path, "Using local filesystem storage");
            Ok(Arc::new(storage))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; uploaded content will not survive restarts");
            Ok(Arc::new(MemoryStorage::new()))
        }
    }
}
