//! `Semantic`: sentence-aware greedy packing with a sentence-integrity guarantee.

use super::splitting::{pack_units, split_sentences};
use super::ChunkingStrategy;
use crate::error::Result;
use crate::tokenize::{estimate_tokens, token_spans};
use crate::types::{ChunkQuality, ChunkingOptions, DocumentChunk, ParsedContent};

/// Sentence-aware chunking. Guarantees at least 70% sentence integrity: no
/// chunk ends mid-sentence except where a single sentence exceeds
/// `max_chunk_size`, in which case that sentence is split on the nearest
/// phrase boundary (comma/semicolon) or, failing that, a token boundary.
#[derive(Debug, Clone, Copy, Default)]
pub struct SemanticStrategy;

impl SemanticStrategy {
    /// Splits an oversized sentence into sub-units at phrase boundaries,
    /// falling back to raw token windows if no phrase boundary exists.
    fn split_oversized(text: &str, base: usize, max: usize) -> Vec<(usize, usize)> {
        let phrase_breaks: Vec<usize> = text
            .char_indices()
            .filter(|(_, c)| matches!(c, ',' | ';' | ':'))
            .map(|(i, c)| i + c.len_utf8())
            .collect();

        if phrase_breaks.is_empty() {
            // No phrase boundary: fall back to token windows sized to `max`.
            let spans = token_spans(text);
            return pack_units(&spans, text, max, 0)
                .into_iter()
                .map(|p| (base + p.start, base + p.end))
                .collect();
        }

        let mut units = Vec::new();
        let mut start = 0usize;
        for brk in phrase_breaks {
            units.push((start, brk));
            start = brk;
        }
        if start < text.len() {
            units.push((start, text.len()));
        }

        pack_units(&units, text, max, 0)
            .into_iter()
            .map(|p| (base + p.start, base + p.end))
            .collect()
    }
}

impl ChunkingStrategy for SemanticStrategy {
    fn name(&self) -> &'static str {
        "semantic"
    }

    fn chunk(&self, content: &ParsedContent, options: &ChunkingOptions) -> Result<Vec<DocumentChunk>> {
        let sentences = split_sentences(&content.body, &content.language);
        if sentences.is_empty() {
            return Ok(Vec::new());
        }

        let max = options.max_chunk_size.max(1);

        // Pre-split any sentence that alone exceeds max_chunk_size so the
        // packer never has to emit an over-budget unit.
        let mut units: Vec<(usize, usize)> = Vec::new();
        for &(s, e) in &sentences {
            if estimate_tokens(&content.body[s..e]) > max {
                units.extend(Self::split_oversized(&content.body[s..e], s, max));
            } else {
                units.push((s, e));
            }
        }

        let packed = pack_units(&units, &content.body, max, options.overlap_size);
        let total = packed.len();

        let chunks = packed
            .into_iter()
            .enumerate()
            .map(|(seq, span)| {
                let text = &content.body[span.start..span.end];
                DocumentChunk {
                    id: format!("chunk-{seq}"),
                    content: text.to_string(),
                    start: span.start,
                    end: span.end,
                    page: None,
                    heading_path: content.heading_path_at(span.start),
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
