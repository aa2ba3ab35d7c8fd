//! CSV reader: renders rows as a Markdown table so the parser's table
//! normalization logic can validate/demote it uniformly with other formats.

use crate::error::Result;
use crate::types::{DocumentFormat, RawContent};

pub fn read(filename: &str, bytes: &[u8]) -> Result<RawContent> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(bytes);
    let mut rows: Vec<Vec<String>> = Vec::new();

    if let Ok(headers) = rdr.headers() {
        rows.push(headers.iter().map(str::to_string).collect());
    }
    for result in rdr.records() {
        match result {
            Ok(record) => rows.push(record.iter().map(str::to_string).collect()),
            Err(_) => continue,
        }
    }

    if rows.is_empty() {
        return Ok(RawContent::new(filename, DocumentFormat::Csv, String::new())
            .with_warning("CSV contained no readable rows"));
    }

    let col_count = rows[0].len();
    let mut out = String::new();
    for (i, row) in rows.iter().enumerate() {
        out.push_str("| ");
        out.push_str(&row.join(" | "));
        out.push_str(" |\n");
        if i == 0 {
            out.push_str("| ");
            out.push_str(&vec!["---"; col_count].join(" | "));
            out.push_str(" |\n");
        }
    }

    Ok(RawContent::new(filename, DocumentFormat::Csv, out))
}
