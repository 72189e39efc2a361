//! Ingestion orchestrator.
//!
//! One `ingest` call runs the full pipeline as a saga over three backends
//! that share no transaction: the record store, the content store, and the
//! remote processor. Progress is tracked in an explicit state machine
//! (`RecordCreated → Linked → Uploaded → PathSet → Processed`); when a step
//! fails, the compensation scope is derived from the recorded state instead
//! of nested error handlers, so rollback behavior stays auditable and
//! testable against fake backends.
//!
//! The attempt doubles as a drop guard: if the caller abandons an in-flight
//! call (timeout, disconnect), dropping the future compensates in a detached
//! task rather than leaving a half-applied pipeline behind.

use std::sync::Arc;

use korpus_core::{AppError, EmbeddingsProvider, FileRecord, NewFile, RecordStore};
use korpus_storage::{object_key, Storage, StorageError};
use uuid::Uuid;
use validator::Validate;

use crate::extract::extract_docx_text;
use crate::normalize::{normalize_filename, MAX_FILENAME_LEN};
use crate::router::IngestStrategy;
use crate::trigger::{ProcessingJob, ProcessingTrigger};

/// Logical pipeline stage reported with a failed ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStage {
    Validation,
    Extraction,
    RecordCreation,
    LinkCreation,
    Upload,
    PathUpdate,
    Processing,
    Finalize,
}

impl std::fmt::Display for IngestStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            IngestStage::Validation => "validation",
            IngestStage::Extraction => "text extraction",
            IngestStage::RecordCreation => "record creation",
            IngestStage::LinkCreation => "link creation",
            IngestStage::Upload => "upload",
            IngestStage::PathUpdate => "path update",
            IngestStage::Processing => "processing",
            IngestStage::Finalize => "finalize",
        };
        f.write_str(name)
    }
}

/// An ingestion failure: the original error, prefixed with the stage that
/// raised it. Compensation failures never replace the original error.
#[derive(Debug, thiserror::Error)]
#[error("{stage} failed: {source}")]
pub struct IngestError {
    pub stage: IngestStage,
    #[source]
    pub source: AppError,
}

impl IngestError {
    fn new(stage: IngestStage, source: AppError) -> Self {
        Self { stage, source }
    }
}

/// Raw uploaded document as received from the caller.
#[derive(Debug, Clone)]
pub struct RawUpload {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Saga progress. Variants are ordered by pipeline position; the derived
/// ordering is what compensation scoping relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SagaState {
    Started,
    RecordCreated,
    Linked,
    Uploaded,
    PathSet,
    Processed,
}

/// What a given attempt has to undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CompensationScope {
    delete_record: bool,
    delete_blob: bool,
}

/// Derive the compensation scope from recorded progress. The blob delete is
/// keyed on whether an upload was started (the key is recorded just before
/// the upload call), not on whether it completed; deleting a key that was
/// never written reports not-found and is ignored.
fn compensation_scope(state: SagaState, upload_started: bool) -> CompensationScope {
    CompensationScope {
        delete_record: state >= SagaState::RecordCreated,
        delete_blob: upload_started,
    }
}

/// Best-effort rollback of everything one attempt created. Failures are
/// logged and swallowed; the caller keeps the original error.
async fn compensate(
    records: &dyn RecordStore,
    storage: &dyn Storage,
    scope: CompensationScope,
    file_id: Option<Uuid>,
    storage_path: Option<&str>,
) {
    if scope.delete_record {
        if let Some(file_id) = file_id {
            // Deleting the record also removes its workspace links; the
            // record store contract guarantees no orphaned link survives.
            if let Err(err) = records.delete_file(file_id).await {
                tracing::warn!(
                    file_id = %file_id,
                    error = %err,
                    "Compensation could not delete file record"
                );
            }
        }
    }

    if scope.delete_blob {
        if let Some(path) = storage_path {
            match storage.delete(path).await {
                Ok(()) => {}
                // The upload never completed; nothing to remove.
                Err(StorageError::NotFound(_)) => {}
                Err(err) => {
                    tracing::warn!(
                        path = %path,
                        error = %err,
                        "Compensation could not delete uploaded blob"
                    );
                }
            }
        }
    }
}

/// Ephemeral per-invocation attempt state. Never persisted and never shared
/// across concurrent ingestions.
///
/// Dropping an unfinished attempt (the caller abandoned the call mid-step)
/// compensates in a detached task.
struct Attempt {
    state: SagaState,
    file_id: Option<Uuid>,
    storage_path: Option<String>,
    records: Arc<dyn RecordStore>,
    storage: Arc<dyn Storage>,
    finished: bool,
}

impl Attempt {
    fn new(records: Arc<dyn RecordStore>, storage: Arc<dyn Storage>) -> Self {
        Self {
            state: SagaState::Started,
            file_id: None,
            storage_path: None,
            records,
            storage,
            finished: false,
        }
    }

    fn advance(&mut self, state: SagaState) {
        debug_assert!(state > self.state, "saga state must move forward");
        self.state = state;
    }

    fn scope(&self) -> CompensationScope {
        compensation_scope(self.state, self.storage_path.is_some())
    }

    /// Mark the pipeline complete; the drop guard stands down.
    fn finish(&mut self) {
        self.finished = true;
    }

    /// Roll back this attempt's side effects and stand the drop guard down.
    async fn compensate(&mut self) {
        self.finished = true;
        tracing::warn!(
            state = ?self.state,
            file_id = ?self.file_id,
            "Ingestion step failed; compensating"
        );
        compensate(
            &*self.records,
            &*self.storage,
            self.scope(),
            self.file_id,
            self.storage_path.as_deref(),
        )
        .await;
    }
}

impl Drop for Attempt {
    fn drop(&mut self) {
        if self.finished || self.state < SagaState::RecordCreated {
            return;
        }
        let scope = self.scope();
        let records = self.records.clone();
        let storage = self.storage.clone();
        let file_id = self.file_id;
        let storage_path = self.storage_path.take();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                tracing::warn!(
                    state = ?self.state,
                    file_id = ?file_id,
                    "Ingestion abandoned mid-flight; compensating in background"
                );
                handle.spawn(async move {
                    compensate(
                        &*records,
                        &*storage,
                        scope,
                        file_id,
                        storage_path.as_deref(),
                    )
                    .await;
                });
            }
            Err(_) => {
                tracing::warn!(
                    state = ?self.state,
                    file_id = ?file_id,
                    "Ingestion abandoned outside a runtime; compensation skipped"
                );
            }
        }
    }
}

/// The saga controller for document ingestion.
#[derive(Clone)]
pub struct Ingestor {
    records: Arc<dyn RecordStore>,
    storage: Arc<dyn Storage>,
    trigger: Arc<dyn ProcessingTrigger>,
    max_filename_len: usize,
}

impl Ingestor {
    pub fn new(
        records: Arc<dyn RecordStore>,
        storage: Arc<dyn Storage>,
        trigger: Arc<dyn ProcessingTrigger>,
    ) -> Self {
        Self {
            records,
            storage,
            trigger,
            max_filename_len: MAX_FILENAME_LEN,
        }
    }

    /// Override the filename length bound (defaults to
    /// [`MAX_FILENAME_LEN`]).
    pub fn with_max_filename_len(mut self, max_filename_len: usize) -> Self {
        self.max_filename_len = max_filename_len;
        self
    }

    /// Run the ingestion pipeline for one document.
    ///
    /// Steps, strictly ordered: normalize the display name, create the file
    /// record, link it into the workspace, upload the blob, persist the
    /// storage path, trigger remote processing, re-read and return the
    /// finalized record. Any failure after record creation compensates by
    /// deleting everything this attempt created (the record, transitively
    /// its link, and the uploaded blob) before the error is surfaced.
    #[tracing::instrument(
        skip(self, upload, record),
        fields(filename = %upload.filename, workspace_id = %workspace_id)
    )]
    pub async fn ingest(
        &self,
        upload: RawUpload,
        mut record: NewFile,
        workspace_id: Uuid,
        provider: EmbeddingsProvider,
    ) -> Result<FileRecord, IngestError> {
        record
            .validate()
            .map_err(|e| IngestError::new(IngestStage::Validation, e.into()))?;
        if upload.data.is_empty() {
            return Err(IngestError::new(
                IngestStage::Validation,
                AppError::Validation("uploaded file is empty".to_string()),
            ));
        }

        let strategy = IngestStrategy::for_filename(&upload.filename);

        // Rich-text extraction runs before any side effect; a failure here
        // is terminal with nothing to compensate.
        let extracted = match strategy {
            IngestStrategy::RichTextExtraction => Some(
                extract_docx_text(&upload.data)
                    .map_err(|e| IngestError::new(IngestStage::Extraction, e))?,
            ),
            IngestStrategy::PassThrough => None,
        };

        record.name = normalize_filename(&record.name, self.max_filename_len);

        let mut attempt = Attempt::new(self.records.clone(), self.storage.clone());

        // Step 2: create the file record. Terminal on failure.
        let file = self
            .records
            .create_file(record)
            .await
            .map_err(|e| IngestError::new(IngestStage::RecordCreation, e))?;
        attempt.file_id = Some(file.id);
        attempt.advance(SagaState::RecordCreated);

        // Step 3: link the file into the workspace.
        if let Err(e) = self
            .records
            .create_file_workspace(file.user_id, file.id, workspace_id)
            .await
        {
            attempt.compensate().await;
            return Err(IngestError::new(IngestStage::LinkCreation, e));
        }
        attempt.advance(SagaState::Linked);

        // Step 4: upload the blob under user id + file id + normalized name.
        // The key is recorded before the call so an abandoned upload is still
        // in compensation scope.
        attempt.storage_path = Some(object_key(file.user_id, file.id, &file.name));
        let path = match self
            .storage
            .upload(
                file.user_id,
                file.id,
                &file.name,
                &upload.content_type,
                upload.data,
            )
            .await
        {
            Ok(path) => path,
            Err(e) => {
                attempt.compensate().await;
                return Err(IngestError::new(IngestStage::Upload, e.into()));
            }
        };
        attempt.storage_path = Some(path.clone());
        attempt.advance(SagaState::Uploaded);

        // Step 5: persist the storage path.
        if let Err(e) = self.records.update_file_path(file.id, &path).await {
            attempt.compensate().await;
            return Err(IngestError::new(IngestStage::PathUpdate, e));
        }
        attempt.advance(SagaState::PathSet);

        // Step 6: trigger remote processing with the routed strategy.
        let job = match strategy {
            IngestStrategy::PassThrough => ProcessingJob::PassThrough {
                file_id: file.id,
                provider,
            },
            IngestStrategy::RichTextExtraction => ProcessingJob::RichText {
                file_id: file.id,
                provider,
                text: extracted.unwrap_or_default(),
                extension: file.extension().unwrap_or_default().to_string(),
            },
        };
        if let Err(e) = self.trigger.trigger(job).await {
            attempt.compensate().await;
            return Err(IngestError::new(IngestStage::Processing, e));
        }
        attempt.advance(SagaState::Processed);

        // Step 7: re-read the finalized record.
        match self.records.get_file(file.id).await {
            Ok(finalized) => {
                attempt.finish();
                tracing::info!(
                    file_id = %finalized.id,
                    name = %finalized.name,
                    "Ingestion completed"
                );
                Ok(finalized)
            }
            Err(e) => {
                attempt.compensate().await;
                Err(IngestError::new(IngestStage::Finalize, e))
            }
        }
    }
}
