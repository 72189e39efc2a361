//! Configuration module
//!
//! Environment-backed configuration for the ingestion pipeline and the chat
//! proxy. `.env` files are honored via `dotenvy`.

use std::env;

use crate::error::AppError;
use crate::storage_types::StorageBackend;

// Common constants
const DEFAULT_MAX_FILENAME_LEN: usize = 100;
const DEFAULT_CHAT_CACHE_TTL_SECS: u64 = 600;
const DEFAULT_CHAT_CACHE_CAPACITY: usize = 1024;
const DEFAULT_CHAT_CHUNK_DELAY_MS: u64 = 50;

/// Process-wide configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Postgres connection string for the record store.
    pub database_url: String,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub local_storage_path: Option<String>,
    // Ingestion configuration
    /// Base URL of the remote extraction/embedding service
    /// (e.g. "http://localhost:3000/api").
    pub processing_base_url: String,
    /// Upper bound applied when normalizing display names.
    pub max_filename_len: usize,
    // Chat proxy configuration
    pub chat_upstream_url: Option<String>,
    pub chat_cache_ttl_secs: u64,
    pub chat_cache_capacity: usize,
    pub chat_chunk_delay_ms: u64,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// `DATABASE_URL` and `PROCESSING_BASE_URL` are required; everything else
    /// has a default.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let database_url = require_env("DATABASE_URL")?;
        let processing_base_url = require_env("PROCESSING_BASE_URL")?;

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => StorageBackend::Local,
        };

        Ok(Config {
            database_url,
            storage_backend,
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            processing_base_url,
            max_filename_len: parse_env("MAX_FILENAME_LEN", DEFAULT_MAX_FILENAME_LEN)?,
            chat_upstream_url: env::var("CHAT_UPSTREAM_URL").ok(),
            chat_cache_ttl_secs: parse_env("CHAT_CACHE_TTL_SECS", DEFAULT_CHAT_CACHE_TTL_SECS)?,
            chat_cache_capacity: parse_env("CHAT_CACHE_CAPACITY", DEFAULT_CHAT_CACHE_CAPACITY)?,
            chat_chunk_delay_ms: parse_env("CHAT_CHUNK_DELAY_MS", DEFAULT_CHAT_CHUNK_DELAY_MS)?,
        })
    }
}

fn require_env(name: &'static str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{} must be set", name)))
}

fn parse_env<T>(name: &'static str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|e| AppError::Validation(format!("Invalid {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}
