//! JSON reader: pretty-prints the document so headings/structure survive
//! downstream whitespace normalization, and surfaces parse failures as a
//! warning with the raw bytes kept as a fallback body.

use crate::error::Result;
use crate::types::{DocumentFormat, RawContent};

pub fn read(filename: &str, bytes: &[u8]) -> Result<RawContent> {
    let raw_text = String::from_utf8_lossy(bytes).into_owned();
    match serde_json::from_str::<serde_json::Value>(&raw_text) {
        Ok(value) => {
            let pretty = serde_json::to_string_pretty(&value).unwrap_or(raw_text);
            Ok(RawContent::new(filename, DocumentFormat::Json, pretty))
        }
        Err(e) => Ok(RawContent::new(filename, DocumentFormat::Json, raw_text)
            .with_warning(format!("malformed JSON, using raw bytes: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_json_is_pretty_printed() {
        let content = read("a.json", br#"{"a":1,"b":[1,2]}"#).unwrap();
        assert!(content.text.contains("\n"));
        assert!(content.warnings.is_empty());
    }

    #[test]
    fn malformed_json_falls_back_with_a_warning() {
        let content = read("a.json", b"{not json").unwrap();
        assert_eq!(content.text, "{not json");
        assert_eq!(content.warnings.len(), 1);
    }
}
