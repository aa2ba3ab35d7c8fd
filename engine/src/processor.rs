//! One processor trait replaces the source's deep interface hierarchy
//! (`IDocumentProcessor` / `IStreamingDocumentProcessor` /
//! `IParallelDocumentProcessor` / `IProgressiveDocumentProcessor`, each with
//! a parallel `IProgressive*` variant). Caching, parallelism, and
//! enrichment are orthogonal decorators that wrap a [`Processor`] rather
//! than subclassing it.

use docflux_core::CancelToken;

use crate::cache::{fingerprint, Cache};
use crate::error::Result;
use crate::parser::{self, ParseOptions};
use crate::reader;
use crate::streaming::{ChunkStream, StreamOptions};
use crate::types::{ChunkingOptions, DocumentChunk, ParsedContent, RawContent};

/// `extract -> parse -> chunk`, plus a streaming entry point that composes
/// the three. Implementations are stateless and may be shared across
/// requests; all per-request state lives on the call stack.
pub trait Processor: Send + Sync {
    /// Runs the Reader registry over `bytes`.
    fn extract(&self, filename: &str, bytes: &[u8]) -> Result<RawContent>;

    /// Runs the Parser over a Reader's output.
    fn parse(&self, raw: &RawContent) -> ParsedContent;

    /// Runs the requested chunking strategy over a Parser's output.
    fn chunk(&self, content: &ParsedContent, options: &ChunkingOptions) -> Result<Vec<DocumentChunk>>;

    /// Composes `extract -> parse -> chunk` into a lazily-delivered stream.
    fn process_stream(
        &self,
        filename: &str,
        bytes: &[u8],
        options: &ChunkingOptions,
        cancel: CancelToken,
    ) -> Result<ChunkStream> {
        let raw = self.extract(filename, bytes)?;
        let parsed = self.parse(&raw);
        let chunks = self.chunk(&parsed, options)?;
        Ok(ChunkStream::new(chunks, cancel, StreamOptions::default()))
    }
}

/// The base, rule-based processor: no caching, no enrichment, single document
/// at a time.
#[derive(Debug, Clone, Default)]
pub struct DocumentProcessor {
    parse_options: ParseOptions,
}

impl DocumentProcessor {
    /// Creates a processor using the given parser configuration.
    #[must_use]
    pub fn new(parse_options: ParseOptions) -> Self {
        Self { parse_options }
    }
}

impl Processor for DocumentProcessor {
    fn extract(&self, filename: &str, bytes: &[u8]) -> Result<RawContent> {
        reader::read(filename, bytes)
    }

    fn parse(&self, raw: &RawContent) -> ParsedContent {
        parser::parse(raw, &self.parse_options)
    }

    fn chunk(&self, content: &ParsedContent, options: &ChunkingOptions) -> Result<Vec<DocumentChunk>> {
        let chunks = crate::chunking::resolve(&options.strategy).chunk(content, options)?;
        match crate::chunking::validate_chunk_sizes(&chunks, options) {
            Ok(()) => Ok(chunks),
            Err(crate::error::PipelineError::ChunkingInvariantViolation(reason)) => {
                tracing::warn!(reason = %reason, "chunking invariant violated; falling back to fixed_size");
                let fallback_options = ChunkingOptions { strategy: "fixed_size".to_string(), ..options.clone() };
                let mut fallback = crate::chunking::resolve("fixed_size").chunk(content, &fallback_options)?;
                for chunk in &mut fallback {
                    chunk.props.insert(crate::chunking::CHUNKING_FALLBACK_WARNING_KEY.to_string(), reason.clone());
                }
                Ok(fallback)
            }
            Err(e) => Err(e),
        }
    }
}

/// Wraps a [`Processor`] with a chunk-result cache keyed by
/// `(source bytes, canonical options)` fingerprint. `extract`/`parse`
/// always run (they are comparatively cheap); only the `chunk` stage, and
/// therefore `process_stream`, benefit from memoization.
pub struct CachingProcessor<P: Processor> {
    inner: P,
    cache: Cache,
}

impl<P: Processor> std::fmt::Debug for CachingProcessor<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachingProcessor").field("cache", &self.cache).finish_non_exhaustive()
    }
}

impl<P: Processor> CachingProcessor<P> {
    /// Wraps `inner` with `cache`.
    #[must_use]
    pub fn new(inner: P, cache: Cache) -> Self {
        Self { inner, cache }
    }

    /// Borrows the underlying cache, e.g. for a background TTL sweep.
    #[must_use]
    pub fn cache(&self) -> &Cache {
        &self.cache
    }
}

impl<P: Processor> Processor for CachingProcessor<P> {
    fn extract(&self, filename: &str, bytes: &[u8]) -> Result<RawContent> {
        self.inner.extract(filename, bytes)
    }

    fn parse(&self, raw: &RawContent) -> ParsedContent {
        self.inner.parse(raw)
    }

    fn chunk(&self, content: &ParsedContent, options: &ChunkingOptions) -> Result<Vec<DocumentChunk>> {
        let key = fingerprint(content.body.as_bytes(), &options.canonical_json());
        let cached = self.cache.get_or_build(&key, || {
            self.inner.chunk(content, options).unwrap_or_default()
        });
        Ok((*cached).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentFormat;

    #[test]
    fn base_processor_runs_the_full_pipeline() {
        let processor = DocumentProcessor::default();
        let bytes = b"# Title\n\nSome body text here.\n";
        let raw = processor.extract("doc.md", bytes).unwrap();
        assert_eq!(raw.format, DocumentFormat::Markdown);

        let parsed = processor.parse(&raw);
        assert_eq!(parsed.sections[1].title, "Title");

        let options = ChunkingOptions { strategy: "paragraph".into(), ..ChunkingOptions::default() };
        let chunks = processor.chunk(&parsed, &options).unwrap();
        assert!(!chunks.is_empty());
    }

    #[test]
    fn caching_processor_returns_identical_results_on_repeated_chunk_calls() {
        let processor = CachingProcessor::new(DocumentProcessor::default(), Cache::new(crate::cache::CacheOptions::default()));
        let raw = processor.extract("doc.md", b"# A\n\nbody one.\n").unwrap();
        let parsed = processor.parse(&raw);
        let options = ChunkingOptions { strategy: "paragraph".into(), ..ChunkingOptions::default() };

        let first = processor.chunk(&parsed, &options).unwrap();
        let second = processor.chunk(&parsed, &options).unwrap();
        assert_eq!(first.len(), second.len());
        assert_eq!(processor.cache().len(), 1);
    }

    #[test]
    fn oversized_paragraph_falls_back_to_fixed_size_with_a_warning() {
        let processor = DocumentProcessor::default();
        // One blank-line-free paragraph, far larger than max_chunk_size, with
        // no legal split point for the Paragraph strategy.
        let body = "word ".repeat(500);
        let raw = processor.extract("doc.txt", body.as_bytes()).unwrap();
        let parsed = processor.parse(&raw);

        let options = ChunkingOptions { strategy: "paragraph".into(), max_chunk_size: 50, overlap_size: 10, ..ChunkingOptions::default() };
        let chunks = processor.chunk(&parsed, &options).unwrap();

        assert!(!chunks.is_empty());
        assert_eq!(chunks[0].strategy, "fixed_size");
        assert!(chunks.iter().all(|c| c.props.contains_key(crate::chunking::CHUNKING_FALLBACK_WARNING_KEY)));
    }

    #[test]
    fn process_stream_composes_all_three_stages() {
        let processor = DocumentProcessor::default();
        let options = ChunkingOptions { strategy: "paragraph".into(), ..ChunkingOptions::default() };
        let stream = processor
            .process_stream("doc.md", b"# A\n\nbody text.\n", &options, CancelToken::new())
            .unwrap();
        let items: Vec<_> = stream.collect();
        assert!(matches!(items.last(), Some(crate::streaming::ProcessingResult::Done)));
    }
}
