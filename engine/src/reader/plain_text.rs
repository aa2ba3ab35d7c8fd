//! Plain text reader: bytes in, UTF-8 (lossy) text out.

use crate::error::Result;
use crate::types::{DocumentFormat, RawContent};

pub fn read(filename: &str, bytes: &[u8]) -> Result<RawContent> {
    let text = String::from_utf8_lossy(bytes).into_owned();
    let mut content = RawContent::new(filename, DocumentFormat::PlainText, text);
    if String::from_utf8(bytes.to_vec()).is_err() {
        content = content.with_warning("source was not valid UTF-8; lossily decoded");
    }
    content.byte_size = bytes.len() as u64;
    Ok(content)
}
