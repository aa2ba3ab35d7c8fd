//! `FixedSize`: a token-bounded sliding window with configured overlap.

use super::ChunkingStrategy;
use crate::error::Result;
use crate::tokenize::{estimate_tokens, token_spans};
use crate::types::{ChunkQuality, ChunkingOptions, DocumentChunk, ParsedContent};

/// Token-bounded sliding window. Cuts only between token boundaries, never
/// inside a Unicode grapheme cluster.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedSizeStrategy;

impl ChunkingStrategy for FixedSizeStrategy {
    fn name(&self) -> &'static str {
        "fixed_size"
    }

    fn chunk(&self, content: &ParsedContent, options: &ChunkingOptions) -> Result<Vec<DocumentChunk>> {
        let body = &content.body;
        let spans = token_spans(body);
        if spans.is_empty() {
            return Ok(Vec::new());
        }

        let max = options.max_chunk_size.max(1);
        let overlap = options.overlap_size.min(max.saturating_sub(1));

        let mut windows: Vec<(usize, usize)> = Vec::new();
        let mut window_start_idx = 0usize;
        let mut tokens_in_window = 0usize;
        let mut window_start_byte = spans[0].0;
        let mut window_end_byte;

        for (idx, &(_s, e)) in spans.iter().enumerate() {
            tokens_in_window += 1;
            window_end_byte = e;

            let is_last = idx + 1 == spans.len();
            if tokens_in_window >= max || is_last {
                windows.push((window_start_byte, window_end_byte));

                if is_last {
                    break;
                }

                // Seed next window with the trailing `overlap` tokens.
                let seed_start_idx = idx + 1 - overlap.min(idx + 1);
                let new_start_idx = seed_start_idx.max(window_start_idx + 1);
                window_start_idx = new_start_idx;
                window_start_byte = spans[new_start_idx].0;
                tokens_in_window = idx + 1 - new_start_idx;
            }
        }

        let total = windows.len();
        let mut chunks = Vec::with_capacity(total);
        for (seq, (start, end)) in windows.into_iter().enumerate() {
            let text = body[start..end].trim();
            let trimmed_start = start + (body[start..end].len() - body[start..end].trim_start().len());
            let trimmed_end = trimmed_start + text.len();
            if text.is_empty() {
                continue;
            }
            chunks.push(DocumentChunk {
                id: format!("chunk-{seq}"),
                content: text.to_string(),
                start: trimmed_start,
                end: trimmed_end,
                page: None,
                heading_path: content.heading_path_at(trimmed_start),
                sequence: seq,
                total,
                quality: ChunkQuality::default(),
                strategy: self.name().to_string(),
                tokens: estimate_tokens(text),
                props: Default::default(),
                parent_id: None,
            });
        }

        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LanguageInfo, ParseQuality};

    fn parsed(body: &str) -> ParsedContent {
        ParsedContent {
            body: body.to_string(),
            sections: vec![],
            language: LanguageInfo { code: "en".into(), confidence: 0.9 },
            topics: vec![],
            quality: ParseQuality::default(),
            source_filename: "doc.txt".into(),
        }
    }

    #[test]
    fn small_text_single_chunk() {
        let content = parsed("a short document");
        let options = ChunkingOptions { max_chunk_size: 50, overlap_size: 5, ..Default::default() };
        let chunks = FixedSizeStrategy.chunk(&content, &options).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "a short document");
        assert_eq!(chunks[0].sequence, 0);
        assert_eq!(chunks[0].total, 1);
    }

    #[test]
    fn long_text_splits_with_overlap() {
        let body = (0..200).map(|i| format!("word{i}")).collect::<Vec<_>>().join(" ");
        let content = parsed(&body);
        let options = ChunkingOptions { max_chunk_size: 20, overlap_size: 5, ..Default::default() };
        let chunks = FixedSizeStrategy.chunk(&content, &options).unwrap();
        assert!(chunks.len() > 1);
        for (i, c) in chunks.iter().enumerate() {
            assert_eq!(c.sequence, i);
            assert_eq!(c.total, chunks.len());
        }
        // Non-decreasing start order (invariant 1).
        for w in chunks.windows(2) {
            assert!(w[0].start <= w[1].start);
        }
    }

    #[test]
    fn zero_overlap_chunks_are_disjoint_and_cover_body() {
        let body = (0..100).map(|i| format!("tok{i}")).collect::<Vec<_>>().join(" ");
        let content = parsed(&body);
        let options = ChunkingOptions { max_chunk_size: 10, overlap_size: 0, ..Default::default() };
        let chunks = FixedSizeStrategy.chunk(&content, &options).unwrap();

        for w in chunks.windows(2) {
            assert!(w[0].end <= w[1].start);
        }
        let reconstructed: String = chunks.iter().map(|c| c.content.as_str()).collect::<Vec<_>>().join(" ");
        let original_words: Vec<&str> = body.split_whitespace().collect();
        let reconstructed_words: Vec<&str> = reconstructed.split_whitespace().collect();
        assert_eq!(original_words, reconstructed_words);
    }
}
