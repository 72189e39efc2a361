//! In-memory storage backend.
//!
//! Keeps blobs in a process-local map. Intended for tests and ephemeral dev
//! setups; contents are lost when the process exits.

use crate::keys::object_key;
use crate::traits::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use korpus_core::StorageBackend;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStorage {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blobs currently held.
    pub fn len(&self) -> usize {
        self.blobs.lock().expect("storage map poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn upload(
        &self,
        user_id: Uuid,
        file_id: Uuid,
        filename: &str,
        _content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<String> {
        let key = object_key(user_id, file_id, filename);
        self.blobs
            .lock()
            .expect("storage map poisoned")
            .insert(key.clone(), data);
        Ok(key)
    }

    async fn download(&self, path: &str) -> StorageResult<Vec<u8>> {
        self.blobs
            .lock()
            .expect("storage map poisoned")
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }

    async fn delete(&self, path: &str) -> StorageResult<()> {
        self.blobs
            .lock()
            .expect("storage map poisoned")
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        Ok(self
            .blobs
            .lock()
            .expect("storage map poisoned")
            .contains_key(path))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
