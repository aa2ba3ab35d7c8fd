//! Enricher (optional): attaches LLM-generated summaries, keywords, and
//! contextual prefixes to chunks, and builds a cross-chunk relationship
//! graph. Only runs when a [`TextCompletionService`] is supplied; every
//! per-chunk failure downgrades to an unenriched chunk rather than failing
//! the batch.

pub mod graph;

use std::sync::Arc;

use docflux_core::{CancelToken, TextCompletionService};
use tokio::sync::Semaphore;

use crate::error::Result;
use crate::types::DocumentChunk;

/// Property-bag key for a chunk's LLM-generated summary.
pub const SUMMARY_KEY: &str = "summary";
/// Property-bag key for a chunk's comma-joined keyword list.
pub const KEYWORDS_KEY: &str = "keywords";
/// Property-bag key for a chunk's one-sentence contextual placement.
pub const CONTEXTUAL_PREFIX_KEY: &str = "contextual_prefix";
/// Property-bag key for the error message when enrichment fails.
pub const ENRICHMENT_ERROR_KEY: &str = "enrichment_error";

/// Bounds on enrichment concurrency and the relationship graph it builds.
#[derive(Debug, Clone, Copy)]
pub struct EnrichmentOptions {
    /// Maximum number of chunks being enriched concurrently.
    pub max_concurrency: usize,
    /// Minimum confidence an LLM-discovered edge must carry to be kept.
    pub min_edge_confidence: f32,
    /// Maximum edges retained per chunk.
    pub max_edges_per_chunk: usize,
    /// Maximum sequence distance for a `SharedEntity` edge.
    pub shared_entity_window: usize,
}

impl Default for EnrichmentOptions {
    fn default() -> Self {
        Self {
            max_concurrency: 4,
            min_edge_confidence: 0.5,
            max_edges_per_chunk: 10,
            shared_entity_window: 10,
        }
    }
}

fn contextual_prefix_prompt(chunk: &DocumentChunk, keywords: &[String]) -> String {
    let path = if chunk.heading_path.is_empty() {
        "the document".to_string()
    } else {
        chunk.heading_path.join(" > ")
    };
    format!(
        "In one sentence, describe how this excerpt (about: {}) fits within {path}.",
        keywords.join(", ")
    )
}

/// Enriches every chunk in place with a summary, keyword list, and
/// contextual prefix, bounding concurrency with a semaphore. A chunk whose
/// enrichment call fails is left as-is, annotated with
/// [`ENRICHMENT_ERROR_KEY`] rather than aborting the batch.
pub async fn enrich_chunks(
    chunks: &mut [DocumentChunk],
    completion: &dyn TextCompletionService,
    cancel: &CancelToken,
    options: &EnrichmentOptions,
) -> Result<()> {
    tracing::debug!(count = chunks.len(), max_concurrency = options.max_concurrency, "enriching chunks");
    let semaphore = Arc::new(Semaphore::new(options.max_concurrency.max(1)));

    for chunk in chunks.iter_mut() {
        if cancel.is_cancelled() {
            break;
        }
        let _permit = semaphore.acquire().await.expect("semaphore is never closed");
        enrich_one(chunk, completion, cancel).await;
    }

    Ok(())
}

async fn enrich_one(chunk: &mut DocumentChunk, completion: &dyn TextCompletionService, cancel: &CancelToken) {
    match completion.summarize(&chunk.content, cancel).await {
        Ok(summary) => {
            chunk.props.insert(SUMMARY_KEY.to_string(), summary.summary.clone());
            chunk.props.insert(KEYWORDS_KEY.to_string(), summary.keywords.join(","));

            let prefix_prompt = contextual_prefix_prompt(chunk, &summary.keywords);
            match completion.generate(&prefix_prompt, cancel).await {
                Ok(prefix) => {
                    chunk.props.insert(CONTEXTUAL_PREFIX_KEY.to_string(), prefix);
                }
                Err(e) => {
                    chunk.props.insert(ENRICHMENT_ERROR_KEY.to_string(), e.to_string());
                }
            }
        }
        Err(e) => {
            tracing::warn!(chunk_id = %chunk.id, error = %e, "enrichment failed, leaving chunk unenriched");
            chunk.props.insert(ENRICHMENT_ERROR_KEY.to_string(), e.to_string());
        }
    }
}
