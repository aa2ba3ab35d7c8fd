//! PDF reader: extracts page text via `lopdf`, joining pages with a blank
//! line. No OCR/vision fallback is attempted here — image-only pages simply
//! extract to empty text and are noted as a warning.

use lopdf::Document;

use crate::error::Result;
use crate::types::{DocumentFormat, RawContent};

pub fn read(filename: &str, bytes: &[u8]) -> Result<RawContent> {
    let doc = match Document::load_mem(bytes) {
        Ok(doc) => doc,
        Err(e) => {
            return Ok(RawContent::new(filename, DocumentFormat::Pdf, String::new())
                .with_warning(format!("malformed PDF source: {e}")));
        }
    };

    let mut page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    page_numbers.sort_unstable();

    let mut body = String::new();
    let mut blank_pages = 0usize;
    for page_number in &page_numbers {
        let text = doc.extract_text(&[*page_number]).unwrap_or_default();
        let text = text.trim();
        if text.is_empty() {
            blank_pages += 1;
            continue;
        }
        body.push_str(text);
        body.push_str("\n\n");
    }

    let mut content = RawContent::new(filename, DocumentFormat::Pdf, body);
    if blank_pages > 0 {
        content = content.with_warning(format!(
            "{blank_pages} of {} page(s) produced no extractable text (image-only or malformed)",
            page_numbers.len()
        ));
    }
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_pdf_bytes_surface_as_a_warning_not_an_error() {
        let content = read("a.pdf", b"%PDF-1.4\nnot really a pdf").unwrap();
        assert!(!content.warnings.is_empty());
    }
}
