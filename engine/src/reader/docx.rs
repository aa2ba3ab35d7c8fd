//! DOCX reader: unzips `word/document.xml` and concatenates `<w:t>` runs,
//! inserting a blank line at each paragraph (`<w:p>`) boundary.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use crate::error::Result;
use crate::types::{DocumentFormat, RawContent};

pub fn read(filename: &str, bytes: &[u8]) -> Result<RawContent> {
    let Ok(mut archive) = ZipArchive::new(Cursor::new(bytes)) else {
        return Ok(RawContent::new(filename, DocumentFormat::Docx, String::new())
            .with_warning("DOCX source is not a valid zip archive"));
    };

    let Ok(mut entry) = archive.by_name("word/document.xml") else {
        return Ok(RawContent::new(filename, DocumentFormat::Docx, String::new())
            .with_warning("DOCX source has no word/document.xml part"));
    };

    let mut xml = String::new();
    if entry.read_to_string(&mut xml).is_err() {
        return Ok(RawContent::new(filename, DocumentFormat::Docx, String::new())
            .with_warning("word/document.xml was not valid UTF-8"));
    }
    drop(entry);

    Ok(RawContent::new(filename, DocumentFormat::Docx, extract_text(&xml)))
}

fn extract_text(xml: &str) -> String {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut body = String::new();
    let mut in_text_run = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = e.name();
                let local = name.as_ref();
                if local == b"w:t" || local.ends_with(b":t") || local == b"t" {
                    in_text_run = true;
                }
            }
            Ok(Event::Text(t)) if in_text_run => {
                if let Ok(text) = t.unescape() {
                    body.push_str(&text);
                }
            }
            Ok(Event::End(e)) => {
                let local = e.name();
                if local.as_ref() == b"w:t" || local.as_ref().ends_with(b":t") || local.as_ref() == b"t" {
                    in_text_run = false;
                }
                if local.as_ref() == b"w:p" || local.as_ref().ends_with(b":p") {
                    body.push('\n');
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_text_runs_and_paragraph_breaks() {
        let xml = r#"<w:document><w:body>
            <w:p><w:r><w:t>Hello</w:t></w:r><w:r><w:t> world</w:t></w:r></w:p>
            <w:p><w:r><w:t>Second paragraph</w:t></w:r></w:p>
        </w:body></w:document>"#;
        let text = extract_text(xml);
        assert!(text.contains("Hello world"));
        assert!(text.contains("Second paragraph"));
    }

    #[test]
    fn non_zip_bytes_are_a_warning_not_an_error() {
        let content = read("a.docx", b"not a zip").unwrap();
        assert!(!content.warnings.is_empty());
    }
}
