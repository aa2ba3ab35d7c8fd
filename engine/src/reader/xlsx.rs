//! XLSX reader: renders each worksheet as a heading plus a Markdown table
//! via `calamine`.

use std::io::Cursor;

use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};

use crate::error::Result;
use crate::types::{DocumentFormat, RawContent};

pub fn read(filename: &str, bytes: &[u8]) -> Result<RawContent> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook: Xlsx<_> = match open_workbook_from_rs(cursor) {
        Ok(wb) => wb,
        Err(e) => {
            return Ok(RawContent::new(filename, DocumentFormat::Xlsx, String::new())
                .with_warning(format!("malformed XLSX source: {e}")));
        }
    };

    let mut out = String::new();
    let sheet_names = workbook.sheet_names().to_vec();
    for sheet_name in &sheet_names {
        let Ok(range) = workbook.worksheet_range(sheet_name) else {
            continue;
        };
        out.push_str("## ");
        out.push_str(sheet_name);
        out.push_str("\n\n");

        let mut rows = range.rows();
        if let Some(header) = rows.next() {
            let col_count = header.len();
            out.push_str(&render_row(header));
            out.push_str("| ");
            out.push_str(&vec!["---"; col_count].join(" | "));
            out.push_str(" |\n");
        }
        for row in rows {
            out.push_str(&render_row(row));
        }
        out.push('\n');
    }

    Ok(RawContent::new(filename, DocumentFormat::Xlsx, out))
}

fn render_row(row: &[Data]) -> String {
    let cells: Vec<String> = row.iter().map(Data::to_string).collect();
    format!("| {} |\n", cells.join(" | "))
}
