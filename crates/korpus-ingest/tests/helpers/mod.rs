//! In-memory fakes for exercising the ingestion saga without real backends.

use async_trait::async_trait;
use chrono::Utc;
use korpus_core::{AppError, FileRecord, FileWorkspace, NewFile, RecordStore};
use korpus_ingest::{ProcessingJob, ProcessingTrigger};
use korpus_storage::{MemoryStorage, Storage, StorageError, StorageResult};
use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

/// Record store fake with per-operation failure injection.
#[derive(Default)]
pub struct MemoryRecordStore {
    files: Mutex<HashMap<Uuid, FileRecord>>,
    links: Mutex<Vec<FileWorkspace>>,
    pub fail_create_file: AtomicBool,
    pub fail_create_link: AtomicBool,
    pub fail_update_path: AtomicBool,
    pub fail_get_file: AtomicBool,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }

    pub fn link_count(&self) -> usize {
        self.links.lock().unwrap().len()
    }

    pub fn links_for_workspace(&self, workspace_id: Uuid) -> Vec<FileWorkspace> {
        self.links
            .lock()
            .unwrap()
            .iter()
            .filter(|link| link.workspace_id == workspace_id)
            .cloned()
            .collect()
    }

    fn injected(table: &'static str, operation: &'static str) -> AppError {
        AppError::record_store(table, operation, "injected failure")
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn create_file(&self, new: NewFile) -> Result<FileRecord, AppError> {
        if self.fail_create_file.load(Ordering::SeqCst) {
            return Err(Self::injected("files", "insert"));
        }
        let record = FileRecord {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            name: new.name,
            file_path: None,
            size: new.size,
            mime_type: new.mime_type,
            created_at: Utc::now(),
        };
        self.files.lock().unwrap().insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_file(&self, id: Uuid) -> Result<FileRecord, AppError> {
        if self.fail_get_file.load(Ordering::SeqCst) {
            return Err(Self::injected("files", "select"));
        }
        self.files
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("File {} not found", id)))
    }

    async fn update_file_path(&self, id: Uuid, file_path: &str) -> Result<FileRecord, AppError> {
        if self.fail_update_path.load(Ordering::SeqCst) {
            return Err(Self::injected("files", "update"));
        }
        let mut files = self.files.lock().unwrap();
        let record = files
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("File {} not found", id)))?;
        record.file_path = Some(file_path.to_string());
        Ok(record.clone())
    }

    async fn delete_file(&self, id: Uuid) -> Result<(), AppError> {
        self.files.lock().unwrap().remove(&id);
        // Mirrors the cascade in the Postgres schema.
        self.links.lock().unwrap().retain(|link| link.file_id != id);
        Ok(())
    }

    async fn create_file_workspace(
        &self,
        user_id: Uuid,
        file_id: Uuid,
        workspace_id: Uuid,
    ) -> Result<FileWorkspace, AppError> {
        if self.fail_create_link.load(Ordering::SeqCst) {
            return Err(Self::injected("file_workspaces", "insert"));
        }
        let link = FileWorkspace {
            user_id,
            file_id,
            workspace_id,
        };
        self.links.lock().unwrap().push(link.clone());
        Ok(link)
    }

    async fn delete_file_workspace(
        &self,
        file_id: Uuid,
        workspace_id: Uuid,
    ) -> Result<(), AppError> {
        let mut links = self.links.lock().unwrap();
        let before = links.len();
        links.retain(|link| !(link.file_id == file_id && link.workspace_id == workspace_id));
        if links.len() == before {
            return Err(AppError::NotFound(format!(
                "File {} is not linked to workspace {}",
                file_id, workspace_id
            )));
        }
        Ok(())
    }

    async fn list_workspace_files(&self, workspace_id: Uuid) -> Result<Vec<FileRecord>, AppError> {
        let links = self.links_for_workspace(workspace_id);
        let files = self.files.lock().unwrap();
        Ok(links
            .iter()
            .filter_map(|link| files.get(&link.file_id).cloned())
            .collect())
    }

    async fn list_file_workspaces(&self, file_id: Uuid) -> Result<Vec<FileWorkspace>, AppError> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .filter(|link| link.file_id == file_id)
            .cloned()
            .collect())
    }

    async fn create_files(
        &self,
        files: Vec<NewFile>,
        workspace_id: Uuid,
    ) -> Result<Vec<FileRecord>, AppError> {
        let mut created = Vec::with_capacity(files.len());
        for new in files {
            let user_id = new.user_id;
            let record = self.create_file(new).await?;
            self.create_file_workspace(user_id, record.id, workspace_id)
                .await?;
            created.push(record);
        }
        Ok(created)
    }
}

/// Content store fake: in-memory storage with failure injection. An upload
/// with `hang_upload` set never completes, which lets tests abandon an
/// ingestion mid-step.
#[derive(Default)]
pub struct FlakyStorage {
    inner: MemoryStorage,
    pub fail_upload: AtomicBool,
    pub fail_delete: AtomicBool,
    pub hang_upload: AtomicBool,
}

impl FlakyStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blob_count(&self) -> usize {
        self.inner.len()
    }
}

#[async_trait]
impl Storage for FlakyStorage {
    async fn upload(
        &self,
        user_id: Uuid,
        file_id: Uuid,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<String> {
        if self.hang_upload.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.fail_upload.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed("injected failure".to_string()));
        }
        self.inner
            .upload(user_id, file_id, filename, content_type, data)
            .await
    }

    async fn download(&self, path: &str) -> StorageResult<Vec<u8>> {
        self.inner.download(path).await
    }

    async fn delete(&self, path: &str) -> StorageResult<()> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(StorageError::DeleteFailed("injected failure".to_string()));
        }
        self.inner.delete(path).await
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        self.inner.exists(path).await
    }

    fn backend_type(&self) -> korpus_core::StorageBackend {
        self.inner.backend_type()
    }
}

/// Processing trigger fake that records every job.
#[derive(Default)]
pub struct RecordingTrigger {
    pub jobs: Mutex<Vec<ProcessingJob>>,
    pub fail_with: Mutex<Option<(Option<u16>, String)>>,
}

impl RecordingTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(status: Option<u16>, message: &str) -> Self {
        let trigger = Self::default();
        *trigger.fail_with.lock().unwrap() = Some((status, message.to_string()));
        trigger
    }

    pub fn job_count(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }
}

#[async_trait]
impl ProcessingTrigger for RecordingTrigger {
    async fn trigger(&self, job: ProcessingJob) -> Result<(), AppError> {
        self.jobs.lock().unwrap().push(job);
        if let Some((status, message)) = self.fail_with.lock().unwrap().clone() {
            return Err(AppError::Processing { status, message });
        }
        Ok(())
    }
}

/// Minimal docx container holding the given paragraphs.
pub fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", p))
        .collect();
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("word/document.xml", zip::write::FileOptions::default())
        .unwrap();
    writer
        .write_all(
            format!(
                "<?xml version=\"1.0\"?><w:document><w:body>{}</w:body></w:document>",
                body
            )
            .as_bytes(),
        )
        .unwrap();
    writer.finish().unwrap().into_inner()
}
