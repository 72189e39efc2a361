//! Postgres-backed record store for Korpus.
//!
//! Implements the [`korpus_core::RecordStore`] contract over sqlx. Schema
//! migrations live under `migrations/` and are embedded in [`MIGRATOR`].

pub mod db;

pub use db::files::PgRecordStore;

/// Embedded schema migrations for the `files` and `file_workspaces` tables.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();
