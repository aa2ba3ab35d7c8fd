//! Reader registry: `bytes -> Reader -> RawContent`.
//!
//! The registry picks a reader by extension first; callers with no
//! extension (or an ambiguous one) fall back to [`detect_format`]'s
//! magic-byte sniffing.

mod csv_reader;
mod docx;
mod html;
mod json;
mod markdown;
mod pdf;
mod plain_text;
mod pptx;
mod xlsx;

use std::path::Path;

use crate::error::{PipelineError, Result};
use crate::types::{DocumentFormat, RawContent};

/// Reads `bytes` (named `filename` for format dispatch and provenance) into
/// [`RawContent`].
pub fn read(filename: &str, bytes: &[u8]) -> Result<RawContent> {
    let format = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(DocumentFormat::from_extension)
        .or_else(|| detect_format(bytes))
        .ok_or_else(|| PipelineError::UnsupportedFormat(filename.to_string()))?;

    tracing::debug!(filename, ?format, bytes = bytes.len(), "extracting document");

    match format {
        DocumentFormat::Pdf => pdf::read(filename, bytes),
        DocumentFormat::Docx => docx::read(filename, bytes),
        DocumentFormat::Xlsx => xlsx::read(filename, bytes),
        DocumentFormat::Pptx => pptx::read(filename, bytes),
        DocumentFormat::Markdown => markdown::read(filename, bytes),
        DocumentFormat::Html => html::read(filename, bytes),
        DocumentFormat::PlainText => plain_text::read(filename, bytes),
        DocumentFormat::Json => json::read(filename, bytes),
        DocumentFormat::Csv => csv_reader::read(filename, bytes),
        DocumentFormat::Hwp => Err(PipelineError::UnsupportedFormat(format!(
            "{filename}: legacy HWP binary format has no supported extraction path"
        ))),
    }
}

/// Magic-byte fallback used when the extension is missing or unrecognized.
fn detect_format(bytes: &[u8]) -> Option<DocumentFormat> {
    if bytes.starts_with(b"%PDF-") {
        return Some(DocumentFormat::Pdf);
    }
    if bytes.starts_with(&[0x50, 0x4B, 0x03, 0x04]) {
        // A generic zip signature; OOXML formats are zips. Without the
        // extension we cannot tell docx/xlsx/pptx apart reliably, so this
        // falls back to plain zip-as-docx, the most common case.
        return Some(DocumentFormat::Docx);
    }
    if std::str::from_utf8(bytes).is_ok() {
        let text = String::from_utf8_lossy(bytes);
        let trimmed = text.trim_start();
        if trimmed.starts_with('{') || trimmed.starts_with('[') {
            return Some(DocumentFormat::Json);
        }
        return Some(DocumentFormat::PlainText);
    }
    None
}
