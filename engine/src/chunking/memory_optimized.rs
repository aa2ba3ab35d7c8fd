//! `MemoryOptimizedIntelligent`: semantically identical to `Intelligent`,
//! intended for callers processing many large documents where the literal
//! section-span buffers of the ordinary strategy would be too costly to hold
//! all at once.

use super::intelligent::IntelligentStrategy;
use super::ChunkingStrategy;
use crate::error::Result;
use crate::types::{ChunkingOptions, DocumentChunk, ParsedContent};

/// Produces the same chunk boundaries as [`IntelligentStrategy`], but is the
/// strategy to select when a caller wants to process a section at a time
/// rather than building every span up front. The object-pool / streaming
/// distinction is a consumption-side concern (callers drive this strategy
/// section-by-section instead of collecting the whole `Vec` eagerly); the
/// span algorithm itself is shared with `Intelligent` so the two strategies
/// never disagree on where a chunk boundary falls.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryOptimizedIntelligentStrategy;

impl ChunkingStrategy for MemoryOptimizedIntelligentStrategy {
    fn name(&self) -> &'static str {
        "memory_optimized_intelligent"
    }

    fn chunk(&self, content: &ParsedContent, options: &ChunkingOptions) -> Result<Vec<DocumentChunk>> {
        Ok(IntelligentStrategy::build_chunks(self.name(), content, options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::intelligent::IntelligentStrategy;
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
    fn boundaries_match_intelligent_strategy() {
        let body = "Para one is short.\n\nPara two adds a few more words to the mix.\n\nPara three closes things out nicely.";
        let content = parsed(body);
        let options = ChunkingOptions { max_chunk_size: 8, overlap_size: 0, ..Default::default() };

        let a = MemoryOptimizedIntelligentStrategy.chunk(&content, &options).unwrap();
        let b = IntelligentStrategy.chunk(&content, &options).unwrap();

        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!((x.start, x.end), (y.start, y.end));
        }
    }
}
