//! Filename normalization.
//!
//! User-supplied display names become storage-safe names: every character
//! outside `[A-Za-z0-9.]` is replaced with `_`, the result is lowercased,
//! and over-long names are truncated in the base portion so that
//! `base + "." + extension` fits the length bound with the extension kept
//! verbatim. Pure and deterministic; normalizing twice yields the same name.

/// Default upper bound for normalized filenames.
pub const MAX_FILENAME_LEN: usize = 100;

/// Base substituted when normalization leaves an empty base (empty input, or
/// a name like ".docx").
const FALLBACK_BASE: &str = "file";

/// Normalize a display name into a storage-safe filename of at most
/// `max_len` bytes.
pub fn normalize_filename(name: &str, max_len: usize) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();

    // Split on the last dot; a dotless name is all base. The cleaned name is
    // pure ASCII, so byte truncation below is char-safe.
    let (base, extension) = match cleaned.rsplit_once('.') {
        Some((base, ext)) => (base.to_string(), Some(ext.to_string())),
        None => (cleaned, None),
    };

    let mut base = if base.is_empty() {
        FALLBACK_BASE.to_string()
    } else {
        base
    };

    match extension {
        Some(ext) if ext.len() + 1 < max_len => {
            let max_base_len = max_len - ext.len() - 1;
            if base.len() > max_base_len {
                base.truncate(max_base_len);
            }
            format!("{}.{}", base, ext)
        }
        Some(ext) => {
            // The extension alone cannot fit the bound; keep what fits.
            let mut whole = format!("{}.{}", base, ext);
            whole.truncate(max_len);
            whole
        }
        None => {
            base.truncate(max_len);
            base
        }
    }
}
