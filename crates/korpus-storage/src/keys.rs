//! Shared key generation for storage backends.
//!
//! Key format: `{user_id}/{file_id}/{filename}`.

use uuid::Uuid;

/// Generate a storage key for the given user, file id, and filename.
///
/// All backends must use this format so that paths persisted on file records
/// stay valid across backends.
pub fn object_key(user_id: Uuid, file_id: Uuid, filename: &str) -> String {
    format!("{}/{}/{}", user_id, file_id, filename)
}
