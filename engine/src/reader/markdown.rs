//! Markdown reader: the source is already the format the parser expects, so
//! this is a pass-through save for encoding normalization.

use crate::error::Result;
use crate::types::{DocumentFormat, RawContent};

pub fn read(filename: &str, bytes: &[u8]) -> Result<RawContent> {
    Ok(RawContent::new(filename, DocumentFormat::Markdown, String::from_utf8_lossy(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_is_passed_through_unchanged() {
        let content = read("a.md", b"# Title\n\nbody text\n").unwrap();
        assert_eq!(content.text, "# Title\n\nbody text\n");
    }
}
