//! Storage backend identifiers shared between configuration and the storage
//! crate.

use serde::{Deserialize, Serialize};

/// Available content-store backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Local filesystem storage
    Local,
    /// In-memory storage (tests and ephemeral dev setups)
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = crate::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(StorageBackend::Local),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(crate::AppError::Validation(format!(
                "Unknown storage backend: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Local => f.write_str("local"),
            StorageBackend::Memory => f.write_str("memory"),
        }
    }
}
