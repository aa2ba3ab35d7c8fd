//! `Intelligent`: structure-aware chunking that honors the parsed section tree.

use super::splitting::{pack_units, split_paragraphs, split_sentences};
use super::ChunkingStrategy;
use crate::error::Result;
use crate::tokenize::estimate_tokens;
use crate::types::{ChunkQuality, ChunkingOptions, DocumentChunk, ParsedContent, Section};

/// Honors the parsed section tree: a section smaller than `max_chunk_size`
/// is never split. Larger sections split on subsection boundaries first,
/// paragraph boundaries second, sentence boundaries third.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntelligentStrategy;

impl IntelligentStrategy {
    /// Produces leaf spans for one section, recursing into subsections
    /// before falling back to paragraph/sentence splitting.
    fn split_section(content: &ParsedContent, section: &Section, options: &ChunkingOptions) -> Vec<(usize, usize)> {
        let span_tokens = estimate_tokens(&content.body[section.start..section.end]);
        if span_tokens <= options.max_chunk_size {
            return vec![(section.start, section.end)];
        }

        if !section.children.is_empty() {
            let mut spans = Vec::new();
            for &child_idx in &section.children {
                spans.extend(Self::split_section(content, &content.sections[child_idx], options));
            }
            return spans;
        }

        // Leaf section too large for one chunk: paragraph split first.
        let paragraphs = split_paragraphs(&content.body[section.start..section.end]);
        if paragraphs.len() > 1 {
            let offset_paragraphs: Vec<(usize, usize)> = paragraphs
                .into_iter()
                .map(|(s, e)| (s + section.start, e + section.start))
                .collect();
            return pack_units(&offset_paragraphs, &content.body, options.max_chunk_size, options.overlap_size)
                .into_iter()
                .map(|p| (p.start, p.end))
                .collect();
        }

        // Fall back to sentence boundaries.
        let sentences = split_sentences(&content.body[section.start..section.end], &content.language);
        let offset_sentences: Vec<(usize, usize)> = sentences
            .into_iter()
            .map(|(s, e)| (s + section.start, e + section.start))
            .collect();
        if offset_sentences.is_empty() {
            return vec![(section.start, section.end)];
        }
        pack_units(&offset_sentences, &content.body, options.max_chunk_size, options.overlap_size)
            .into_iter()
            .map(|p| (p.start, p.end))
            .collect()
    }

    fn spans_for(content: &ParsedContent, options: &ChunkingOptions) -> Vec<(usize, usize)> {
        if content.sections.is_empty() {
            let paragraphs = split_paragraphs(&content.body);
            return pack_units(&paragraphs, &content.body, options.max_chunk_size, options.overlap_size)
                .into_iter()
                .map(|p| (p.start, p.end))
                .collect();
        }

        // sections[0] is the whole-document root; walk its top-level children.
        let root = &content.sections[0];
        if root.children.is_empty() {
            return Self::split_section(content, root, options);
        }

        let mut spans = Vec::new();
        for &idx in &root.children {
            spans.extend(Self::split_section(content, &content.sections[idx], options));
        }
        spans
    }

    pub(super) fn build_chunks(
        strategy_name: &'static str,
        content: &ParsedContent,
        options: &ChunkingOptions,
    ) -> Vec<DocumentChunk> {
        let spans = Self::spans_for(content, options);
        let total = spans.len();
        spans
            .into_iter()
            .enumerate()
            .map(|(seq, (start, end))| {
                let text = content.body[start..end].trim();
                let trimmed_start = start + (content.body[start..end].len() - content.body[start..end].trim_start().len());
                let trimmed_end = trimmed_start + text.len();
                DocumentChunk {
                    id: format!("chunk-{seq}"),
                    content: text.to_string(),
                    start: trimmed_start,
                    end: trimmed_end,
                    page: None,
                    heading_path: content.heading_path_at(trimmed_start),
                    sequence: seq,
                    total,
                    quality: ChunkQuality::default(),
                    strategy: strategy_name.to_string(),
                    tokens: estimate_tokens(text),
                    props: Default::default(),
                    parent_id: None,
                }
            })
            .collect()
    }
}

impl ChunkingStrategy for IntelligentStrategy {
    fn name(&self) -> &'static str {
        "intelligent"
    }

    fn chunk(&self, content: &ParsedContent, options: &ChunkingOptions) -> Result<Vec<DocumentChunk>> {
        Ok(Self::build_chunks(self.name(), content, options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LanguageInfo, ParseQuality};

    fn doc_with_sections() -> ParsedContent {
        let body = "# A\npara under A.1\n\n## A.1\npara under A.1 only, nice and short.\n\n## A.2\npara under A.2 only, also short.\n";
        ParsedContent {
            body: body.to_string(),
            sections: vec![
                Section { level: 0, title: String::new(), start: 0, end: body.len(), children: vec![1] },
                Section { level: 1, title: "A".into(), start: 0, end: body.len(), children: vec![2, 3] },
                Section { level: 2, title: "A.1".into(), start: body.find("## A.1").unwrap(), end: body.find("## A.2").unwrap(), children: vec![] },
                Section { level: 2, title: "A.2".into(), start: body.find("## A.2").unwrap(), end: body.len(), children: vec![] },
            ],
            language: LanguageInfo { code: "en".into(), confidence: 0.9 },
            topics: vec![],
            quality: ParseQuality::default(),
            source_filename: "doc.md".into(),
        }
    }

    #[test]
    fn one_chunk_per_small_section() {
        let content = doc_with_sections();
        // Small enough that the whole-document "A" section must recurse into
        // its A.1/A.2 children, each of which fits in a single chunk.
        let options = ChunkingOptions { max_chunk_size: 12, overlap_size: 0, ..Default::default() };
        let chunks = IntelligentStrategy.chunk(&content, &options).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].heading_path, vec!["A".to_string(), "A.1".to_string()]);
        assert_eq!(chunks[1].heading_path, vec!["A".to_string(), "A.2".to_string()]);
    }

    #[test]
    fn large_section_splits_further() {
        let body = "# A\n\n## A.1\nFirst sentence under A.1. Second sentence under A.1. Third sentence under A.1.\n\n## A.2\npara under A.2 only, also short.\n";
        let a1_start = body.find("## A.1").unwrap();
        let a2_start = body.find("## A.2").unwrap();
        let content = ParsedContent {
            body: body.to_string(),
            sections: vec![
                Section { level: 0, title: String::new(), start: 0, end: body.len(), children: vec![1] },
                Section { level: 1, title: "A".into(), start: 0, end: body.len(), children: vec![2, 3] },
                Section { level: 2, title: "A.1".into(), start: a1_start, end: a2_start, children: vec![] },
                Section { level: 2, title: "A.2".into(), start: a2_start, end: body.len(), children: vec![] },
            ],
            language: LanguageInfo { code: "en".into(), confidence: 0.9 },
            topics: vec![],
            quality: ParseQuality::default(),
            source_filename: "doc.md".into(),
        };
        // Small enough that A.1's three sentences must be packed into
        // separate chunks while A.2 stays whole.
        let options = ChunkingOptions { max_chunk_size: 6, overlap_size: 0, ..Default::default() };
        let chunks = IntelligentStrategy.chunk(&content, &options).unwrap();
        assert!(chunks.len() > 2);
    }
}
