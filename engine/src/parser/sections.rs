//! Builds the flat section tree from a normalized body: `sections[0]` is
//! always the whole-document root (level 0); every heading becomes a node
//! nested under the nearest shallower-or-equal open ancestor.

use crate::types::Section;

struct HeadingLine {
    level: u8,
    title: String,
    start: usize,
}

fn heading_level(line: &str) -> Option<(u8, &str)> {
    let hashes = line.chars().take_while(|&c| c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = line[hashes..].trim();
    if rest.is_empty() {
        return None;
    }
    Some((hashes as u8, rest))
}

fn scan_headings(body: &str) -> Vec<HeadingLine> {
    let mut headings = Vec::new();
    let mut offset = 0usize;
    for line in body.split_inclusive('\n') {
        let content = line.trim_end_matches('\n');
        if let Some((level, title)) = heading_level(content) {
            headings.push(HeadingLine { level, title: title.to_string(), start: offset });
        }
        offset += line.len();
    }
    headings
}

#[must_use]
pub fn build(body: &str) -> Vec<Section> {
    let mut sections = vec![Section { level: 0, title: String::new(), start: 0, end: body.len(), children: Vec::new() }];
    let headings = scan_headings(body);
    if headings.is_empty() {
        return sections;
    }

    let mut stack: Vec<usize> = vec![0];

    for heading in &headings {
        while stack.len() > 1 {
            let top = *stack.last().unwrap();
            if sections[top].level >= heading.level {
                sections[top].end = heading.start;
                stack.pop();
            } else {
                break;
            }
        }

        let idx = sections.len();
        sections.push(Section {
            level: heading.level,
            title: heading.title.clone(),
            start: heading.start,
            end: body.len(),
            children: Vec::new(),
        });

        let parent = *stack.last().unwrap();
        sections[parent].children.push(idx);
        stack.push(idx);
    }

    sections
}
