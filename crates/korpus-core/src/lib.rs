//! Korpus Core Library
//!
//! This crate provides core domain models, error types, configuration, and the
//! record-store contract that are shared across all Korpus components.

pub mod config;
pub mod error;
pub mod models;
pub mod records;
pub mod storage_types;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{EmbeddingsProvider, FileRecord, FileWorkspace, NewFile};
pub use records::RecordStore;
pub use storage_types::StorageBackend;
