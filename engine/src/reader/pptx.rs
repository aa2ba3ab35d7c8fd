//! PPTX reader: unzips each `ppt/slides/slideN.xml` part in slide order and
//! concatenates `<a:t>` text runs, one heading per slide.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use crate::error::Result;
use crate::types::{DocumentFormat, RawContent};

pub fn read(filename: &str, bytes: &[u8]) -> Result<RawContent> {
    let Ok(mut archive) = ZipArchive::new(Cursor::new(bytes)) else {
        return Ok(RawContent::new(filename, DocumentFormat::Pptx, String::new())
            .with_warning("PPTX source is not a valid zip archive"));
    };

    let mut slide_names: Vec<String> = (0..archive.len())
        .filter_map(|i| archive.by_index(i).ok().map(|f| f.name().to_string()))
        .filter(|name| name.starts_with("ppt/slides/slide") && name.ends_with(".xml"))
        .collect();
    slide_names.sort_by_key(|name| slide_index(name));

    let mut out = String::new();
    for (i, name) in slide_names.iter().enumerate() {
        let Ok(mut entry) = archive.by_name(name) else { continue };
        let mut xml = String::new();
        if entry.read_to_string(&mut xml).is_err() {
            continue;
        }
        drop(entry);

        out.push_str(&format!("## Slide {}\n\n", i + 1));
        out.push_str(&extract_text(&xml));
        out.push_str("\n\n");
    }

    Ok(RawContent::new(filename, DocumentFormat::Pptx, out))
}

fn slide_index(name: &str) -> u32 {
    name.trim_start_matches("ppt/slides/slide")
        .trim_end_matches(".xml")
        .parse()
        .unwrap_or(u32::MAX)
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
                let local = e.name();
                if local.as_ref() == b"a:t" || local.as_ref().ends_with(b":t") {
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
                if local.as_ref() == b"a:t" || local.as_ref().ends_with(b":t") {
                    in_text_run = false;
                    body.push(' ');
                }
                if local.as_ref() == b"a:p" || local.as_ref().ends_with(b":p") {
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
    fn slides_sort_numerically_not_lexically() {
        assert!(slide_index("ppt/slides/slide2.xml") < slide_index("ppt/slides/slide10.xml"));
    }

    #[test]
    fn extracts_text_runs_from_slide_xml() {
        let xml = r#"<p:sld><p:txBody><a:p><a:r><a:t>Hello</a:t></a:r></a:p></p:txBody></p:sld>"#;
        assert!(extract_text(xml).contains("Hello"));
    }
}
