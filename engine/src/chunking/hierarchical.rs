//! `Hierarchical`: parent chunks covering whole sections, child chunks
//! carrying an explicit `parent_id` link for retrieve-child/expand-to-parent
//! access patterns.

use super::intelligent::IntelligentStrategy;
use super::ChunkingStrategy;
use crate::error::Result;
use crate::tokenize::estimate_tokens;
use crate::types::{ChunkQuality, ChunkingOptions, DocumentChunk, ParsedContent, Section};

/// Produces a parent chunk per section (which may exceed `max_chunk_size`)
/// plus `Intelligent`-style child chunks of that section that reference the
/// parent by id.
#[derive(Debug, Clone, Copy, Default)]
pub struct HierarchicalStrategy;

impl HierarchicalStrategy {
    fn top_level_sections(content: &ParsedContent) -> Vec<&Section> {
        if content.sections.is_empty() {
            return Vec::new();
        }
        let root = &content.sections[0];
        if root.children.is_empty() {
            vec![root]
        } else {
            root.children.iter().map(|&i| &content.sections[i]).collect()
        }
    }
}

impl ChunkingStrategy for HierarchicalStrategy {
    fn name(&self) -> &'static str {
        "hierarchical"
    }

    fn chunk(&self, content: &ParsedContent, options: &ChunkingOptions) -> Result<Vec<DocumentChunk>> {
        let sections = Self::top_level_sections(content);
        let mut chunks = Vec::new();
        let mut seq = 0usize;

        if sections.is_empty() {
            return Ok(IntelligentStrategy::build_chunks("hierarchical", content, options));
        }

        for section in sections {
            let parent_text = &content.body[section.start..section.end];
            let parent_id = format!("chunk-{seq}-parent");
            let mut parent_props = crate::types::PropertyBag::new();
            parent_props.insert("chunk_role".to_string(), "parent".to_string());

            chunks.push(DocumentChunk {
                id: parent_id.clone(),
                content: parent_text.to_string(),
                start: section.start,
                end: section.end,
                page: None,
                heading_path: content.heading_path_at(section.start),
                sequence: seq,
                total: 0, // patched below once the full count is known
                quality: ChunkQuality::default(),
                strategy: self.name().to_string(),
                tokens: estimate_tokens(parent_text),
                props: parent_props,
                parent_id: None,
            });
            seq += 1;

            let child_spans = IntelligentStrategy::build_chunks("hierarchical", content, &ChunkingOptions {
                hints: options.hints.clone(),
                ..options.clone()
            });
            for child in child_spans
                .into_iter()
                .filter(|c| c.start >= section.start && c.end <= section.end)
            {
                let mut props = child.props;
                props.insert("chunk_role".to_string(), "child".to_string());
                chunks.push(DocumentChunk {
                    id: format!("chunk-{seq}"),
                    sequence: seq,
                    total: 0,
                    parent_id: Some(parent_id.clone()),
                    props,
                    ..child
                });
                seq += 1;
            }
        }

        let total = chunks.len();
        for chunk in &mut chunks {
            chunk.total = total;
        }

        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LanguageInfo, ParseQuality};

    #[test]
    fn children_reference_their_parent() {
        let body = "# A\n\npara one under A, long enough to need splitting into pieces for this test to work well.\n\npara two under A, also reasonably long so the section as a whole exceeds budget.\n";
        let content = ParsedContent {
            body: body.to_string(),
            sections: vec![
                Section { level: 0, title: String::new(), start: 0, end: body.len(), children: vec![1] },
                Section { level: 1, title: "A".into(), start: 0, end: body.len(), children: vec![] },
            ],
            language: LanguageInfo { code: "en".into(), confidence: 0.9 },
            topics: vec![],
            quality: ParseQuality::default(),
            source_filename: "doc.md".into(),
        };
        let options = ChunkingOptions { max_chunk_size: 10, overlap_size: 0, ..Default::default() };
        let chunks = HierarchicalStrategy.chunk(&content, &options).unwrap();

        let parent = chunks.iter().find(|c| c.parent_id.is_none()).unwrap();
        let children: Vec<_> = chunks.iter().filter(|c| c.parent_id.is_some()).collect();
        assert!(!children.is_empty());
        for child in children {
            assert_eq!(child.parent_id.as_deref(), Some(parent.id.as_str()));
        }
    }
}
