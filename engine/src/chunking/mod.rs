//! Chunking strategy family.
//!
//! Every strategy implements the same [`ChunkingStrategy`] trait; the
//! concrete variant is resolved from [`ChunkingOptions::strategy`] by
//! [`resolve`]. `Auto` is a thin wrapper that inspects the document and
//! resolves to one of the other variants (see [`auto`]).

pub mod auto;
pub mod fixed;
pub mod hierarchical;
pub mod intelligent;
pub mod memory_optimized;
pub mod paragraph;
pub mod semantic;
pub mod smart;
pub mod splitting;

use crate::error::{PipelineError, Result};
use crate::types::{ChunkingOptions, DocumentChunk, ParsedContent};

/// A chunk may legally exceed `max_chunk_size` by this ratio before the
/// post-chunk invariant check rejects it.
const INVARIANT_SIZE_RATIO: f32 = 1.15;

/// Property-bag key set on every chunk of a `FixedSize` fallback produced
/// after [`validate_chunk_sizes`] rejected a strategy's output.
pub const CHUNKING_FALLBACK_WARNING_KEY: &str = "chunking_fallback_warning";

/// A named algorithm that turns [`ParsedContent`] into [`DocumentChunk`]s.
///
/// Strategies are stateless and may be shared across requests; all
/// per-request state (accumulators, warnings) is local to one
/// [`chunk`](ChunkingStrategy::chunk) call.
pub trait ChunkingStrategy: Send + Sync {
    /// The name this strategy is registered under (matches
    /// [`ChunkingOptions::strategy`]).
    fn name(&self) -> &'static str;

    /// Splits `content` into chunks according to `options`.
    fn chunk(&self, content: &ParsedContent, options: &ChunkingOptions) -> Result<Vec<DocumentChunk>>;

    /// Cheaply estimates how many chunks [`chunk`](Self::chunk) would
    /// produce, without materializing them. Used by the streaming runtime
    /// to size progress reporting and by the parallel runtime to balance
    /// shards.
    fn estimate_chunk_count(&self, content: &ParsedContent, options: &ChunkingOptions) -> usize {
        let total_tokens = crate::tokenize::estimate_tokens(&content.body).max(1);
        let step = options.max_chunk_size.saturating_sub(options.overlap_size).max(1);
        total_tokens.div_ceil(step).max(1)
    }

    /// Options keys this strategy recognizes in [`ChunkingOptions::hints`].
    /// Informational only; unrecognized hints are ignored rather than
    /// rejected.
    fn supported_options(&self) -> &'static [&'static str] {
        &[]
    }
}

/// Resolves a strategy name to an implementation.
///
/// `"auto"` resolves to [`auto::AutoStrategy`], which itself picks and wraps
/// one of the other variants per document. Unknown names fall back to
/// `FixedSize`, which is always a legal choice for any input.
#[must_use]
pub fn resolve(name: &str) -> Box<dyn ChunkingStrategy> {
    match name {
        "fixed_size" | "fixed" => Box::new(fixed::FixedSizeStrategy),
        "paragraph" => Box::new(paragraph::ParagraphStrategy),
        "semantic" => Box::new(semantic::SemanticStrategy),
        "intelligent" => Box::new(intelligent::IntelligentStrategy),
        "smart" => Box::new(smart::SmartStrategy),
        "hierarchical" => Box::new(hierarchical::HierarchicalStrategy),
        "memory_optimized_intelligent" | "memory_optimized" => {
            Box::new(memory_optimized::MemoryOptimizedIntelligentStrategy)
        }
        "auto" => Box::new(auto::AutoStrategy),
        _ => Box::new(fixed::FixedSizeStrategy),
    }
}

/// Checks that no chunk exceeds `max_chunk_size * 1.15`, exempting the
/// document's final chunk and standalone structural units (a Hierarchical
/// strategy's parent chunks, which legitimately span an entire section).
///
/// Callers that see [`PipelineError::ChunkingInvariantViolation`] are
/// expected to fall back to `FixedSize` at the same size/overlap, per
/// [`PipelineError`]'s doc comment.
pub(crate) fn validate_chunk_sizes(chunks: &[DocumentChunk], options: &ChunkingOptions) -> Result<()> {
    let limit = (options.max_chunk_size as f32 * INVARIANT_SIZE_RATIO).ceil() as usize;
    let last_sequence = chunks.len().saturating_sub(1);

    for chunk in chunks {
        let is_final = chunks.len() > 1 && chunk.sequence == last_sequence;
        let is_structural_unit = chunk.strategy == "hierarchical" && chunk.parent_id.is_none();
        if chunk.tokens > limit && !is_final && !is_structural_unit {
            return Err(PipelineError::ChunkingInvariantViolation(format!(
                "chunk {} has {} tokens, exceeding {limit} ({INVARIANT_SIZE_RATIO}x max_chunk_size {})",
                chunk.sequence, chunk.tokens, options.max_chunk_size
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChunkQuality;

    fn chunk(sequence: usize, total: usize, tokens: usize, strategy: &str, parent_id: Option<&str>) -> DocumentChunk {
        DocumentChunk {
            id: format!("c{sequence}"),
            content: "x".repeat(tokens),
            start: 0,
            end: tokens,
            page: None,
            heading_path: vec![],
            sequence,
            total,
            quality: ChunkQuality::default(),
            strategy: strategy.to_string(),
            tokens,
            props: Default::default(),
            parent_id: parent_id.map(str::to_string),
        }
    }

    #[test]
    fn unknown_strategy_falls_back_to_fixed_size() {
        assert_eq!(resolve("nonexistent").name(), "fixed_size");
    }

    #[test]
    fn known_strategies_roundtrip_by_name() {
        for name in [
            "fixed_size",
            "paragraph",
            "semantic",
            "intelligent",
            "smart",
            "hierarchical",
            "memory_optimized_intelligent",
            "auto",
        ] {
            assert_eq!(resolve(name).name(), name);
        }
    }

    #[test]
    fn oversized_non_final_chunk_violates_the_invariant() {
        let options = ChunkingOptions { max_chunk_size: 100, ..ChunkingOptions::default() };
        let chunks = vec![chunk(0, 2, 200, "paragraph", None), chunk(1, 2, 50, "paragraph", None)];
        let err = validate_chunk_sizes(&chunks, &options).unwrap_err();
        assert!(matches!(err, PipelineError::ChunkingInvariantViolation(_)));
    }

    #[test]
    fn oversized_final_chunk_is_exempt() {
        let options = ChunkingOptions { max_chunk_size: 100, ..ChunkingOptions::default() };
        let chunks = vec![chunk(0, 2, 50, "paragraph", None), chunk(1, 2, 200, "paragraph", None)];
        assert!(validate_chunk_sizes(&chunks, &options).is_ok());
    }

    #[test]
    fn oversized_hierarchical_parent_is_exempt() {
        let options = ChunkingOptions { max_chunk_size: 100, ..ChunkingOptions::default() };
        let chunks = vec![chunk(0, 2, 200, "hierarchical", None), chunk(1, 2, 50, "hierarchical", Some("c0"))];
        assert!(validate_chunk_sizes(&chunks, &options).is_ok());
    }

    #[test]
    fn within_bound_chunks_pass() {
        let options = ChunkingOptions { max_chunk_size: 100, ..ChunkingOptions::default() };
        let chunks = vec![chunk(0, 2, 115, "paragraph", None), chunk(1, 2, 50, "paragraph", None)];
        assert!(validate_chunk_sizes(&chunks, &options).is_ok());
    }
}
