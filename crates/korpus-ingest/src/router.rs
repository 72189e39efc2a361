//! Extension routing.
//!
//! The declared extension of an uploaded document selects one of two
//! ingestion strategies. The mapping is a closed table over an enum, so
//! adding a strategy is a compile-checked change rather than a string
//! comparison scattered through the pipeline.

/// How an uploaded document reaches the remote processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStrategy {
    /// The remote processor consumes the uploaded blob directly.
    PassThrough,
    /// Text is extracted locally and sent to the remote processor instead of
    /// the blob.
    RichTextExtraction,
}

impl IngestStrategy {
    /// Select the strategy for a filename, taking the extension
    /// case-insensitively from the substring after the last `.`.
    ///
    /// Total: dotless names, empty extensions, and unrecognized extensions
    /// all route to [`IngestStrategy::PassThrough`], leaving it to the remote
    /// processor to reject formats it does not support.
    pub fn for_filename(filename: &str) -> Self {
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or_default();
        Self::for_extension(extension)
    }

    /// Select the strategy for a bare extension (without the dot).
    pub fn for_extension(extension: &str) -> Self {
        match extension.to_ascii_lowercase().as_str() {
            // Word-processor documents need local text extraction first.
            "docx" => IngestStrategy::RichTextExtraction,
            _ => IngestStrategy::PassThrough,
        }
    }
}
