//! `Smart`: an `Intelligent` variant that trades structure preservation for
//! a stricter sentence-integrity guarantee.

use super::splitting::{pack_units, split_sentences};
use super::ChunkingStrategy;
use crate::error::Result;
use crate::tokenize::estimate_tokens;
use crate::types::{ChunkQuality, ChunkingOptions, DocumentChunk, ParsedContent, Section};

/// Like [`super::intelligent::IntelligentStrategy`] but a section's leaf
/// split always goes straight to sentence boundaries (skipping the
/// paragraph-boundary step), so no chunk ends with a partial sentence
/// unless `max_chunk_size` is physically exceeded by a single sentence.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmartStrategy;

impl SmartStrategy {
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
            let sentences = split_sentences(&content.body, &content.language);
            return pack_units(&sentences, &content.body, options.max_chunk_size, options.overlap_size)
                .into_iter()
                .map(|p| (p.start, p.end))
                .collect();
        }

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
}

impl ChunkingStrategy for SmartStrategy {
    fn name(&self) -> &'static str {
        "smart"
    }

    fn chunk(&self, content: &ParsedContent, options: &ChunkingOptions) -> Result<Vec<DocumentChunk>> {
        let spans = Self::spans_for(content, options);
        let total = spans.len();
        let chunks = spans
            .into_iter()
            .enumerate()
            .map(|(seq, (start, end))| {
                let text = &content.body[start..end];
                DocumentChunk {
                    id: format!("chunk-{seq}"),
                    content: text.to_string(),
                    start,
                    end,
                    page: None,
                    heading_path: content.heading_path_at(start),
                    sequence: seq,
                    total,
                    quality: ChunkQuality::default(),
                    strategy: self.name().to_string(),
                    tokens: estimate_tokens(text),
                    props: Default::default(),
                    parent_id: None,
                }
            })
            .collect();
        Ok(chunks)
    }
}
