//! Content store adapters for Korpus.
//!
//! Binary document content is written through the [`Storage`] trait under a
//! key derived from the owning user, the file id, and the normalized
//! filename (see [`keys::object_key`]). Two backends are provided: the local
//! filesystem for deployments and an in-memory map for tests and ephemeral
//! dev setups.

pub mod factory;
pub mod keys;
pub mod local;
pub mod memory;
pub mod traits;

pub use factory::create_storage;
pub use keys::object_key;
pub use local::LocalStorage;
pub use memory::MemoryStorage;
pub use traits::{Storage, StorageError, StorageResult};
