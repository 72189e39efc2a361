//! Simulated streaming.
//!
//! The upstream prediction service answers with one complete text; clients
//! expect a stream. The reply is replayed in fixed-size chunks with a fixed
//! delay between them, chunked on character boundaries so multi-byte text is
//! never split mid-character.

use std::time::Duration;

use bytes::Bytes;
use futures::stream::{self, Stream};

/// Characters per emitted chunk.
pub const CHUNK_SIZE: usize = 100;
/// Default delay between chunks.
pub const CHUNK_DELAY: Duration = Duration::from_millis(50);

/// Replay `text` as a chunked stream with `chunk_delay` between chunks.
pub fn simulate_stream(text: String, chunk_delay: Duration) -> impl Stream<Item = Bytes> {
    stream::unfold((text, 0usize), move |(text, pos)| async move {
        if pos >= text.len() {
            return None;
        }
        if pos > 0 {
            tokio::time::sleep(chunk_delay).await;
        }
        let end = chunk_end(&text, pos);
        let chunk = Bytes::copy_from_slice(text[pos..end].as_bytes());
        Some((chunk, (text, end)))
    })
}

/// Byte offset of the end of the next chunk: [`CHUNK_SIZE`] characters past
/// `start`, or the end of the text.
fn chunk_end(text: &str, start: usize) -> usize {
    text[start..]
        .char_indices()
        .nth(CHUNK_SIZE)
        .map(|(offset, _)| start + offset)
        .unwrap_or(text.len())
}
