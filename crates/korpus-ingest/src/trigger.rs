//! Remote processing trigger.
//!
//! The final pipeline step hands the ingested document to the external
//! extraction/embedding service. Pass-through jobs send only the file id and
//! provider (the service fetches the blob through the persisted storage
//! path); rich-text jobs carry the locally extracted text. One attempt per
//! ingestion call; retry policy, if any, belongs to the caller.

use async_trait::async_trait;
use korpus_core::{AppError, EmbeddingsProvider};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A processing request for one ingested file.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessingJob {
    /// The remote service fetches the uploaded blob itself.
    PassThrough {
        file_id: Uuid,
        provider: EmbeddingsProvider,
    },
    /// Pre-extracted text is sent in place of the blob.
    RichText {
        file_id: Uuid,
        provider: EmbeddingsProvider,
        text: String,
        extension: String,
    },
}

impl ProcessingJob {
    pub fn file_id(&self) -> Uuid {
        match self {
            ProcessingJob::PassThrough { file_id, .. } => *file_id,
            ProcessingJob::RichText { file_id, .. } => *file_id,
        }
    }
}

/// Client for the external extraction/embedding service.
#[async_trait]
pub trait ProcessingTrigger: Send + Sync {
    /// Submit one processing job. Any non-success response is an error
    /// carrying the remote service's message.
    async fn trigger(&self, job: ProcessingJob) -> Result<(), AppError>;
}

#[derive(Serialize)]
struct RichTextBody<'a> {
    text: &'a str,
    #[serde(rename = "fileId")]
    file_id: Uuid,
    #[serde(rename = "embeddingsProvider")]
    embeddings_provider: EmbeddingsProvider,
    #[serde(rename = "fileExtension")]
    file_extension: &'a str,
}

#[derive(Deserialize)]
struct FailureBody {
    message: String,
}

/// HTTP implementation of the processing trigger.
pub struct HttpProcessingTrigger {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProcessingTrigger {
    /// Create a trigger client against a service base URL
    /// (e.g. "http://localhost:3000/api").
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ProcessingTrigger for HttpProcessingTrigger {
    #[tracing::instrument(skip(self, job), fields(file_id = %job.file_id()))]
    async fn trigger(&self, job: ProcessingJob) -> Result<(), AppError> {
        let response = match &job {
            ProcessingJob::PassThrough { file_id, provider } => {
                let form = reqwest::multipart::Form::new()
                    .text("file_id", file_id.to_string())
                    .text("embeddingsProvider", provider.as_str());
                self.client
                    .post(format!("{}/retrieval/process", self.base_url))
                    .multipart(form)
                    .send()
                    .await
            }
            ProcessingJob::RichText {
                file_id,
                provider,
                text,
                extension,
            } => {
                self.client
                    .post(format!("{}/retrieval/process/docx", self.base_url))
                    .json(&RichTextBody {
                        text,
                        file_id: *file_id,
                        embeddings_provider: *provider,
                        file_extension: extension,
                    })
                    .send()
                    .await
            }
        }
        .map_err(|e| AppError::Processing {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        })?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(status = status.as_u16(), "Processing trigger accepted");
            return Ok(());
        }

        // Failure bodies carry {"message": ...}; fall back to the raw body,
        // then to the status line.
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<FailureBody>(&body)
            .map(|b| b.message)
            .unwrap_or_else(|_| {
                if body.is_empty() {
                    status.to_string()
                } else {
                    body
                }
            });

        Err(AppError::Processing {
            status: Some(status.as_u16()),
            message,
        })
    }
}
