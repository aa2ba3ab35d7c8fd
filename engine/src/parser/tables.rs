//! Table normalization: a run of `| ... |` rows is a valid table only when
//! every row has the same column count (within the configured variance).
//! Invalid tables are demoted to a fenced text block with a hint comment.

fn column_count(line: &str) -> Option<usize> {
    let trimmed = line.trim();
    if !trimmed.starts_with('|') {
        return None;
    }
    Some(trimmed.trim_matches('|').split('|').count())
}

fn is_separator_row(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with('|') && trimmed.chars().all(|c| matches!(c, '|' | '-' | ':' | ' '))
}

/// Demotes any run of table rows whose column-count variance exceeds
/// `max_variance` to a fenced text block annotated with a hint line.
#[must_use]
pub fn normalize(text: &str, max_variance: usize, warnings: &mut Vec<String>) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let mut out: Vec<String> = Vec::new();
    let mut i = 0usize;

    while i < lines.len() {
        if column_count(lines[i]).is_some() {
            let start = i;
            let mut counts = Vec::new();
            while i < lines.len() {
                match column_count(lines[i]) {
                    Some(c) if !is_separator_row(lines[i]) => counts.push(c),
                    Some(_) => {}
                    None => break,
                }
                i += 1;
            }

            let min = *counts.iter().min().unwrap_or(&0);
            let max = *counts.iter().max().unwrap_or(&0);
            if max.saturating_sub(min) > max_variance {
                warnings.push(format!(
                    "demoted malformed table (column counts {min}..={max}) to a fenced text block"
                ));
                out.push("```text".to_string());
                out.push("<!-- malformed table: inconsistent column counts -->".to_string());
                out.extend(lines[start..i].iter().map(|l| l.to_string()));
                out.push("```".to_string());
            } else {
                out.extend(lines[start..i].iter().map(|l| l.to_string()));
            }
            continue;
        }

        out.push(lines[i].to_string());
        i += 1;
    }

    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consistent_table_is_left_unchanged() {
        let mut warnings = Vec::new();
        let text = "| a | b |\n| --- | --- |\n| 1 | 2 |\n";
        let out = normalize(text, 0, &mut warnings);
        assert_eq!(out.trim_end(), text.trim_end());
        assert!(warnings.is_empty());
    }

    #[test]
    fn ragged_table_is_demoted_to_a_fenced_block() {
        let mut warnings = Vec::new();
        let text = "| a | b |\n| --- | --- |\n| 1 | 2 | 3 |\n";
        let out = normalize(text, 0, &mut warnings);
        assert!(out.contains("```text"));
        assert_eq!(warnings.len(), 1);
    }
}
