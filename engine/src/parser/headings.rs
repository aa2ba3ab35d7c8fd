//! Heading normalization: cap the first heading's level, clamp every
//! subsequent level jump to 1, drop empty headings, and demote
//! annotation-like lines to plain text.

/// Heading lines that, despite matching `#{1,6} text`, read as an
/// annotation rather than a real section title and should be demoted.
fn is_annotation_like(title: &str) -> bool {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return false;
    }
    let parenthesized = trimmed.starts_with('(') && trimmed.ends_with(')') && trimmed.len() <= 42;
    let bracket_note = trimmed.starts_with('[') && trimmed.ends_with(']') && trimmed.len() <= 42;
    parenthesized || bracket_note
}

fn heading_level(line: &str) -> Option<(u8, &str)> {
    let hashes = line.chars().take_while(|&c| c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &line[hashes..];
    if !rest.starts_with(' ') && !rest.is_empty() {
        return None;
    }
    Some((hashes as u8, rest.trim()))
}

/// Returns the normalized body text. Heading level jumps are clamped,
/// empty headings are dropped, and annotation-like headings are demoted to
/// plain paragraph text.
pub fn normalize(text: &str, warnings: &mut Vec<String>) -> String {
    let mut out_lines: Vec<String> = Vec::new();
    let mut prev_level: Option<u8> = None;
    let mut first_heading_seen = false;

    for line in text.lines() {
        let Some((level, title)) = heading_level(line) else {
            out_lines.push(line.to_string());
            continue;
        };

        if title.is_empty() {
            warnings.push("removed an empty heading".to_string());
            continue;
        }

        if is_annotation_like(title) {
            warnings.push(format!("demoted annotation-like heading \"{title}\" to plain text"));
            out_lines.push(title.to_string());
            continue;
        }

        let normalized_level = if !first_heading_seen {
            first_heading_seen = true;
            level.min(2)
        } else {
            let prev = prev_level.unwrap_or(1);
            if level > prev + 1 {
                prev + 1
            } else {
                level
            }
        };

        if normalized_level != level {
            warnings.push(format!(
                "clamped heading level jump for \"{title}\" from {level} to {normalized_level}"
            ));
        }

        prev_level = Some(normalized_level);
        out_lines.push(format!("{} {}", "#".repeat(normalized_level as usize), title));
    }

    out_lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_heading_is_capped_at_level_two() {
        let mut warnings = Vec::new();
        let out = normalize("#### Title\n\nbody\n", &mut warnings);
        assert!(out.starts_with("## Title"));
    }

    #[test]
    fn level_jumps_are_clamped_to_one() {
        let mut warnings = Vec::new();
        let out = normalize("# A\n\n#### B\n", &mut warnings);
        assert!(out.contains("## B"));
    }

    #[test]
    fn empty_headings_are_removed() {
        let mut warnings = Vec::new();
        let out = normalize("# Title\n\n##\n\nbody\n", &mut warnings);
        assert!(!out.contains("##\n"));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn annotation_like_headings_are_demoted() {
        let mut warnings = Vec::new();
        let out = normalize("# Title\n\n## (draft)\n\nbody\n", &mut warnings);
        assert!(out.contains("(draft)"));
        assert!(!out.contains("## (draft)"));
    }
}
