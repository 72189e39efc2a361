//! Document ingestion pipeline.
//!
//! This crate owns the ordered, side-effecting sequence that turns a raw
//! uploaded document into a processed, workspace-linked file record:
//! metadata insert → workspace link → binary upload → path update → remote
//! processing trigger. The sequence runs as a saga: there is no cross-store
//! transaction, so each completed step has a compensating delete that the
//! orchestrator issues when a later step fails. A failed ingestion leaves no
//! file row, no workspace link, and no uploaded blob behind.

pub mod extract;
pub mod normalize;
pub mod router;
pub mod saga;
pub mod trigger;

// Re-export commonly used types
pub use extract::extract_docx_text;
pub use normalize::{normalize_filename, MAX_FILENAME_LEN};
pub use router::IngestStrategy;
pub use saga::{IngestError, IngestStage, Ingestor, RawUpload};
pub use trigger::{HttpProcessingTrigger, ProcessingJob, ProcessingTrigger};
