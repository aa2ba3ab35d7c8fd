//! HTML reader: walks the DOM and renders a Markdown-ish text body so later
//! heading/table normalization treats it like any other source.

use scraper::{Html, Selector};

use crate::error::Result;
use crate::types::{DocumentFormat, RawContent};

fn heading_level(tag: &str) -> Option<u8> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

pub fn read(filename: &str, bytes: &[u8]) -> Result<RawContent> {
    let html = String::from_utf8_lossy(bytes);
    let document = Html::parse_document(&html);

    let block_selector = Selector::parse("h1, h2, h3, h4, h5, h6, p, li, pre, td").unwrap();
    let mut out = String::new();

    for el in document.select(&block_selector) {
        let tag = el.value().name();
        let text: String = el.text().collect::<Vec<_>>().join(" ");
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.is_empty() {
            continue;
        }

        if let Some(level) = heading_level(tag) {
            out.push_str(&"#".repeat(level as usize));
            out.push(' ');
            out.push_str(&text);
            out.push_str("\n\n");
        } else if tag == "li" {
            out.push_str("- ");
            out.push_str(&text);
            out.push('\n');
        } else {
            out.push_str(&text);
            out.push_str("\n\n");
        }
    }

    let mut content = RawContent::new(filename, DocumentFormat::Html, out);
    if document
        .select(&Selector::parse("parsererror").unwrap())
        .next()
        .is_some()
    {
        content = content.with_warning("HTML contained a parser error node");
    }
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_and_paragraphs_render_as_markdown() {
        let html = "<html><body><h1>Title</h1><p>First paragraph.</p><ul><li>one</li><li>two</li></ul></body></html>";
        let content = read("a.html", html.as_bytes()).unwrap();
        assert!(content.text.starts_with("# Title\n\n"));
        assert!(content.text.contains("First paragraph."));
        assert!(content.text.contains("- one"));
        assert!(content.text.contains("- two"));
    }
}
