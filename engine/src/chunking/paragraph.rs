//! `Paragraph`: greedy packing of blank-line-delimited paragraphs.

use super::splitting::{pack_units, split_paragraphs};
use super::ChunkingStrategy;
use crate::error::Result;
use crate::tokenize::estimate_tokens;
use crate::types::{ChunkQuality, ChunkingOptions, DocumentChunk, ParsedContent};

/// Splits on blank-line sequences, then greedily accumulates paragraphs
/// until adding the next would exceed `max_chunk_size`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParagraphStrategy;

impl ChunkingStrategy for ParagraphStrategy {
    fn name(&self) -> &'static str {
        "paragraph"
    }

    fn chunk(&self, content: &ParsedContent, options: &ChunkingOptions) -> Result<Vec<DocumentChunk>> {
        let paragraphs = split_paragraphs(&content.body);
        if paragraphs.is_empty() {
            return Ok(Vec::new());
        }

        let packed = pack_units(&paragraphs, &content.body, options.max_chunk_size, options.overlap_size);
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
    fn packs_paragraphs_until_budget_exceeded() {
        let body = "Para one is short.\n\nPara two is also fairly short.\n\nPara three adds more words to the budget.";
        let content = parsed(body);
        let options = ChunkingOptions { max_chunk_size: 8, overlap_size: 0, ..Default::default() };
        let chunks = ParagraphStrategy.chunk(&content, &options).unwrap();
        assert!(chunks.len() >= 2);
        for w in chunks.windows(2) {
            assert!(w[0].end <= w[1].start);
        }
    }

    #[test]
    fn single_paragraph_single_chunk() {
        let content = parsed("Just one paragraph here with no blank lines.");
        let options = ChunkingOptions::default();
        let chunks = ParagraphStrategy.chunk(&content, &options).unwrap();
        assert_eq!(chunks.len(), 1);
    }
}
