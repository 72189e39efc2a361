//! Upstream prediction proxy service.

use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;
use futures::Stream;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::ResponseCache;
use crate::stream::{simulate_stream, CHUNK_DELAY};

/// Chat proxy errors. Key problems get the user-facing wording the profile
/// settings UI expects.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Chat API key not found. Please set it in your profile settings.")]
    MissingApiKey,

    #[error("Chat API key is incorrect. Please fix it in your profile settings.")]
    InvalidApiKey,

    #[error("Upstream prediction service responded with {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Failed to reach upstream prediction service: {0}")]
    Transport(#[from] reqwest::Error),
}

/// One chat message as received from the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Serialize)]
struct PredictionRequest<'a> {
    question: String,
    #[serde(rename = "overrideConfig")]
    override_config: OverrideConfig<'a>,
}

#[derive(Serialize)]
struct OverrideConfig<'a> {
    #[serde(rename = "sessionId")]
    session_id: &'a str,
    #[serde(rename = "returnSourceDocuments")]
    return_source_documents: bool,
}

#[derive(Deserialize)]
struct PredictionResponse {
    text: String,
}

/// Configuration for [`ChatProxy`].
#[derive(Clone, Debug)]
pub struct ChatProxyConfig {
    /// Full prediction endpoint URL.
    pub upstream_url: String,
    /// Session id forwarded in the upstream override config.
    pub session_id: String,
    pub cache_capacity: usize,
    pub cache_ttl: Duration,
    pub chunk_delay: Duration,
}

impl ChatProxyConfig {
    pub fn new(upstream_url: impl Into<String>) -> Self {
        Self {
            upstream_url: upstream_url.into(),
            session_id: "123".to_string(),
            cache_capacity: 1024,
            cache_ttl: Duration::from_secs(600),
            chunk_delay: CHUNK_DELAY,
        }
    }
}

/// A replayed chat reply.
pub type ReplyStream = Pin<Box<dyn Stream<Item = Bytes> + Send>>;

/// Proxy in front of the upstream prediction service.
pub struct ChatProxy {
    client: reqwest::Client,
    config: ChatProxyConfig,
    cache: ResponseCache,
}

impl ChatProxy {
    pub fn new(config: ChatProxyConfig) -> Self {
        let cache = ResponseCache::new(config.cache_capacity, config.cache_ttl);
        Self {
            client: reqwest::Client::new(),
            config,
            cache,
        }
    }

    /// Answer a chat request, from cache when possible.
    ///
    /// The reply is always delivered as a simulated stream; a cache hit skips
    /// the upstream round trip entirely.
    #[tracing::instrument(skip(self, api_key, messages), fields(message_count = messages.len()))]
    pub async fn complete(
        &self,
        api_key: &str,
        messages: &[ChatMessage],
    ) -> Result<ReplyStream, ChatError> {
        if api_key.is_empty() {
            return Err(ChatError::MissingApiKey);
        }

        let contents: Vec<String> = messages.iter().map(|m| m.content.clone()).collect();
        let cache_key = ResponseCache::key(api_key, &contents);

        if let Some(text) = self.cache.get(&cache_key) {
            tracing::debug!("Response cache hit");
            return Ok(Box::pin(simulate_stream(text, self.config.chunk_delay)));
        }
        tracing::debug!("Response cache miss");

        let response = self
            .client
            .post(&self.config.upstream_url)
            .bearer_auth(api_key)
            .json(&PredictionRequest {
                question: contents.join(" "),
                override_config: OverrideConfig {
                    session_id: &self.config.session_id,
                    return_source_documents: true,
                },
            })
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ChatError::InvalidApiKey);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ChatError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let prediction: PredictionResponse = response.json().await?;
        self.cache
            .insert(cache_key, prediction.text.clone());

        Ok(Box::pin(simulate_stream(
            prediction.text,
            self.config.chunk_delay,
        )))
    }
}
