//! Rich-text extraction for word-processor documents.
//!
//! A `.docx` file is a zip container whose main part, `word/document.xml`,
//! holds the document body as WordprocessingML. The remote processor only
//! needs plain text for embedding, so extraction maps paragraph and tab
//! markup to whitespace, strips the remaining tags, and decodes the basic
//! XML entities.

use std::io::{Cursor, Read};
use std::sync::OnceLock;

use korpus_core::AppError;
use regex::Regex;

const DOCUMENT_PART: &str = "word/document.xml";

/// Extract the plain text body from docx bytes.
pub fn extract_docx_text(data: &[u8]) -> Result<String, AppError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))
        .map_err(|e| AppError::Validation(format!("Not a valid docx container: {}", e)))?;

    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| AppError::Validation(format!("docx is missing {}: {}", DOCUMENT_PART, e)))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)?;

    Ok(document_xml_to_text(&xml))
}

fn tag_pattern() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"))
}

fn document_xml_to_text(xml: &str) -> String {
    // Paragraph ends and explicit breaks become newlines, tabs become tabs,
    // before all markup is dropped.
    let with_breaks = xml
        .replace("</w:p>", "\n")
        .replace("<w:br/>", "\n")
        .replace("<w:tab/>", "\t");

    let stripped = tag_pattern().replace_all(&with_breaks, "");

    decode_entities(&stripped).trim().to_string()
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
