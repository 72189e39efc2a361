//! Chat prediction proxy.
//!
//! Forwards chat requests to an upstream prediction service and caches the
//! replies in a process-wide TTL + LRU cache. Replies — cached or fresh —
//! are returned as a simulated stream: fixed-size chunks emitted on a fixed
//! delay, which lets clients consume a single upstream response as if it
//! were streamed. Independent of the ingestion pipeline.

pub mod cache;
pub mod service;
pub mod stream;

// Re-export commonly used types
pub use cache::ResponseCache;
pub use service::{ChatError, ChatMessage, ChatProxy, ChatProxyConfig, ReplyStream};
pub use stream::simulate_stream;
