//! Process-wide response cache with explicit TTL eviction.
//!
//! Keys are derived by hashing, never by concatenating raw key material:
//! SHA-256 over the API key and each message content, every part
//! length-prefixed so that `["ab", "c"]` and `["a", "bc"]` cannot collide.
//! Entries older than the TTL are evicted on read; capacity pressure evicts
//! least-recently-used entries.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;
use sha2::{Digest, Sha256};

struct CachedReply {
    text: String,
    inserted_at: Instant,
}

/// TTL + LRU cache for upstream reply texts.
pub struct ResponseCache {
    entries: Mutex<LruCache<String, CachedReply>>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("capacity is at least 1");
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// Derive the cache key for one request.
    pub fn key(api_key: &str, message_contents: &[String]) -> String {
        let mut hasher = Sha256::new();
        hasher.update((api_key.len() as u64).to_le_bytes());
        hasher.update(api_key.as_bytes());
        for content in message_contents {
            hasher.update((content.len() as u64).to_le_bytes());
            hasher.update(content.as_bytes());
        }
        hex::encode(hasher.finalize())
    }

    /// Fetch a cached reply, evicting it if its TTL has passed.
    pub fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock().expect("response cache poisoned");
        match entries.get(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => Some(entry.text.clone()),
            Some(_) => {
                entries.pop(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: String, text: String) {
        self.entries.lock().expect("response cache poisoned").put(
            key,
            CachedReply {
                text,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("response cache poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
