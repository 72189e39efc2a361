//! Error types module
//!
//! This module provides the core error types used throughout the Korpus
//! application. All errors are unified under the `AppError` enum, which can
//! represent record-store, storage, remote-processing, and validation
//! failures.
//!
//! The record-store backend reports its failures through the `RecordStore`
//! variant together with the table and operation that failed, so callers can
//! render a message naming the logical stage without inspecting backend
//! internals.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
/// This trait allows errors to self-describe their response characteristics
pub trait ErrorMetadata {
    /// HTTP status code an outer transport layer should map this error to
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "RECORD_STORE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Record store error during {operation} on {table}: {message}")]
    RecordStore {
        table: &'static str,
        operation: &'static str,
        message: String,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Processing failed{}: {message}", .status.map(|s| format!(" (status {})", s)).unwrap_or_default())]
    Processing { status: Option<u16>, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Wrap a record-store backend failure with the table and operation that
    /// produced it.
    pub fn record_store(
        table: &'static str,
        operation: &'static str,
        err: impl std::fmt::Display,
    ) -> Self {
        AppError::RecordStore {
            table,
            operation,
            message: err.to_string(),
        }
    }

    /// True when this error is the record store's "not found" sentinel.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }
}

// Error conversion implementations following Rust best practices
impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON parsing error: {}", err))
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::Validation(format!("UUID parsing error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AppError::Validation(_) => (400, "INVALID_INPUT", false, LogLevel::Debug),
        AppError::RecordStore { .. } => (500, "RECORD_STORE_ERROR", true, LogLevel::Error),
        AppError::NotFound(_) => (404, "NOT_FOUND", false, LogLevel::Debug),
        AppError::Upload(_) => (500, "STORAGE_ERROR", true, LogLevel::Error),
        AppError::Processing { .. } => (502, "PROCESSING_ERROR", true, LogLevel::Error),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", true, LogLevel::Error),
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Validation(ref msg) => msg.clone(),
            AppError::RecordStore { .. } => "Failed to access record store".to_string(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::Upload(_) => "Failed to store file content".to_string(),
            AppError::Processing { message, .. } => {
                format!("Failed to process file. Reason: {}", message)
            }
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}
