//! Parallel runtime: fan out across documents with a bounded worker pool,
//! and shard a single oversized document's chunking across its top-level
//! sections.

use std::sync::atomic::{AtomicU64, Ordering};

use rayon::prelude::*;

use crate::chunking::ChunkingStrategy;
use crate::error::PipelineError;
use crate::types::{ChunkingOptions, DocumentChunk, ParsedContent, Section};

/// Bounds for the fan-out worker pool.
#[derive(Debug, Clone, Copy)]
pub struct ParallelOptions {
    /// Number of worker threads; defaults to the detected CPU count.
    pub max_parallelism: usize,
    /// Bound on the input/output queues (informational here; rayon's own
    /// work-stealing pool absorbs the actual queuing).
    pub backpressure_threshold: usize,
    /// Global memory budget shared across workers.
    pub memory_budget_bytes: u64,
    /// Size above which a single document is chunked via sharding instead
    /// of as one unit.
    pub large_file_threshold_bytes: u64,
    /// Maximum retry attempts per document on failure.
    pub max_retry_attempts: u32,
}

impl Default for ParallelOptions {
    fn default() -> Self {
        Self {
            max_parallelism: num_cpus::get(),
            backpressure_threshold: 1000,
            memory_budget_bytes: 1024 * 1024 * 1024,
            large_file_threshold_bytes: 100 * 1024 * 1024,
            max_retry_attempts: 3,
        }
    }
}

/// The outcome of processing one document in a batch: failures are reported
/// alongside successes rather than aborting the batch.
#[derive(Debug, Clone)]
pub struct BatchResult {
    /// Identity of the input (path, URL, whatever the caller passed in).
    pub source: String,
    /// Whether processing succeeded.
    pub is_success: bool,
    /// Produced chunks, if successful.
    pub chunks: Vec<DocumentChunk>,
    /// Error message, if not successful.
    pub error: Option<String>,
}

/// How long to back off between admission-control retries when the global
/// memory budget is temporarily exhausted by other in-flight workers.
const MEMORY_BUDGET_POLL_MS: u64 = 5;

/// Runs `process_one` over every item in `sources` using a bounded thread
/// pool, retrying transient failures with exponential backoff. Per-document
/// failures never abort the batch.
///
/// `source.to_string()` becomes [`BatchResult::source`], so callers should
/// pass a type whose `Display` is the path/URL/identifier they want reported
/// back. `estimate_bytes` sizes each document's working set against
/// [`ParallelOptions::memory_budget_bytes`]: a worker whose document would
/// push the shared counter over budget waits for other workers to finish and
/// release their share; a document whose estimated size alone exceeds the
/// whole budget is rejected immediately with
/// [`PipelineError::ResourceExhausted`] rather than spinning forever.
pub fn process_batch<T, F, E>(sources: Vec<T>, options: ParallelOptions, estimate_bytes: E, process_one: F) -> Vec<BatchResult>
where
    T: std::fmt::Display + Send + Sync,
    F: Fn(&T) -> crate::error::Result<Vec<DocumentChunk>> + Send + Sync,
    E: Fn(&T) -> u64 + Send + Sync,
{
    tracing::debug!(count = sources.len(), workers = options.max_parallelism, "starting batch");

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.max_parallelism.max(1))
        .build()
        .expect("thread pool with a positive thread count");

    let memory_in_use = AtomicU64::new(0);

    pool.install(|| {
        sources
            .par_iter()
            .map(|source| run_with_retries(source, &options, &process_one, &estimate_bytes, &memory_in_use))
            .collect()
    })
}

/// Blocks until admitting `cost` bytes would not exceed `budget`, then
/// reserves them in `memory_in_use`. Returns `Err` immediately, without
/// blocking, if `cost` alone exceeds `budget` (no amount of waiting would
/// ever admit it).
fn acquire_memory_budget(memory_in_use: &AtomicU64, budget: u64, cost: u64) -> Result<(), PipelineError> {
    if cost > budget {
        return Err(PipelineError::ResourceExhausted(format!(
            "document estimated at {cost} bytes exceeds the {budget} byte memory budget on its own"
        )));
    }

    loop {
        let current = memory_in_use.load(Ordering::Acquire);
        if current + cost > budget {
            std::thread::sleep(std::time::Duration::from_millis(MEMORY_BUDGET_POLL_MS));
            continue;
        }
        if memory_in_use.compare_exchange(current, current + cost, Ordering::AcqRel, Ordering::Relaxed).is_ok() {
            return Ok(());
        }
    }
}

fn run_with_retries<T, F, E>(
    source: &T,
    options: &ParallelOptions,
    process_one: &F,
    estimate_bytes: &E,
    memory_in_use: &AtomicU64,
) -> BatchResult
where
    T: std::fmt::Display + Send + Sync,
    F: Fn(&T) -> crate::error::Result<Vec<DocumentChunk>> + Send + Sync,
    E: Fn(&T) -> u64 + Send + Sync,
{
    let label = source.to_string();
    let cost = estimate_bytes(source);

    if let Err(e) = acquire_memory_budget(memory_in_use, options.memory_budget_bytes, cost) {
        tracing::warn!(source = %label, cost, budget = options.memory_budget_bytes, "rejecting document over memory budget");
        return BatchResult { source: label, is_success: false, chunks: Vec::new(), error: Some(e.to_string()) };
    }

    let mut last_error = String::new();
    let mut outcome = None;
    for attempt in 0..=options.max_retry_attempts {
        match process_one(source) {
            Ok(chunks) => {
                outcome = Some(BatchResult { source: label.clone(), is_success: true, chunks, error: None });
                break;
            }
            Err(e) => {
                last_error = e.to_string();
                if attempt < options.max_retry_attempts {
                    let backoff_ms = 10u64 * 2u64.pow(attempt);
                    tracing::warn!(source = %label, attempt, backoff_ms, error = %last_error, "retrying after failure");
                    std::thread::sleep(std::time::Duration::from_millis(backoff_ms));
                }
            }
        }
    }

    memory_in_use.fetch_sub(cost, Ordering::AcqRel);

    outcome.unwrap_or(BatchResult { source: label, is_success: false, chunks: Vec::new(), error: Some(last_error) })
}

/// Chunks a single large document by partitioning its section tree at
/// top-level sections (the root's direct children) and running the strategy
/// over each shard in parallel, then merging results back into one
/// sequential, correctly-numbered chunk list.
///
/// Within a shard, the usual sequential chunking invariants hold; the
/// merger renumbers `sequence`/`total` across shards while preserving
/// global start-offset order.
pub fn chunk_sharded(
    content: &ParsedContent,
    options: &ChunkingOptions,
    strategy: &dyn ChunkingStrategy,
) -> crate::error::Result<Vec<DocumentChunk>> {
    if content.sections.is_empty() {
        return strategy.chunk(content, options);
    }

    let root = &content.sections[0];
    if root.children.is_empty() {
        return strategy.chunk(content, options);
    }

    let shards: Vec<&Section> = root.children.iter().map(|&idx| &content.sections[idx]).collect();

    let results: Vec<crate::error::Result<Vec<DocumentChunk>>> = shards
        .par_iter()
        .map(|section| {
            let shard_content = ParsedContent {
                body: content.body.clone(),
                sections: content.sections.clone(),
                language: content.language.clone(),
                topics: content.topics.clone(),
                quality: content.quality.clone(),
                source_filename: content.source_filename.clone(),
            };
            let all = strategy.chunk(&shard_content, options)?;
            Ok(all
                .into_iter()
                .filter(|c| c.start >= section.start && c.start < section.end)
                .collect::<Vec<_>>())
        })
        .collect();

    let mut merged: Vec<DocumentChunk> = Vec::new();
    for result in results {
        merged.extend(result.map_err(|e: PipelineError| e)?);
    }
    merged.sort_by_key(|c| c.start);

    let total = merged.len();
    for (i, chunk) in merged.iter_mut().enumerate() {
        chunk.sequence = i;
        chunk.total = total;
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::resolve;
    use crate::types::{LanguageInfo, ParseQuality};

    fn parsed(body: &str, sections: Vec<Section>) -> ParsedContent {
        ParsedContent {
            body: body.to_string(),
            sections,
            language: LanguageInfo { code: "en".into(), confidence: 0.9 },
            topics: vec![],
            quality: ParseQuality::default(),
            source_filename: "doc.md".into(),
        }
    }

    #[test]
    fn batch_reports_per_item_failures_without_aborting() {
        let sources = vec!["ok".to_string(), "bad".to_string()];
        let options = ParallelOptions { max_retry_attempts: 0, ..ParallelOptions::default() };
        let results = process_batch(
            sources,
            options,
            |s| s.len() as u64,
            |s| {
                if s == "bad" {
                    Err(PipelineError::ResourceExhausted("boom".into()))
                } else {
                    Ok(vec![])
                }
            },
        );

        assert_eq!(results.len(), 2);
        assert!(results.iter().any(|r| !r.is_success));
        assert!(results.iter().any(|r| r.is_success));
    }

    #[test]
    fn batch_result_source_reflects_the_caller_supplied_label() {
        let sources = vec!["docs/a.md".to_string(), "docs/b.md".to_string()];
        let options = ParallelOptions::default();
        let results = process_batch(sources, options, |_| 1, |_| Ok(vec![]));

        let mut labels: Vec<&str> = results.iter().map(|r| r.source.as_str()).collect();
        labels.sort_unstable();
        assert_eq!(labels, vec!["docs/a.md", "docs/b.md"]);
    }

    #[test]
    fn document_over_the_whole_budget_is_rejected_as_resource_exhausted() {
        let sources = vec!["huge.pdf".to_string()];
        let options = ParallelOptions { memory_budget_bytes: 100, max_retry_attempts: 0, ..ParallelOptions::default() };
        let results = process_batch(sources, options, |_| 1_000, |_| Ok(vec![]));

        assert_eq!(results.len(), 1);
        assert!(!results[0].is_success);
        assert!(results[0].error.as_deref().unwrap().contains("memory budget"));
    }

    #[test]
    fn documents_within_budget_still_succeed() {
        let sources = vec!["a.md".to_string(), "b.md".to_string(), "c.md".to_string()];
        let options = ParallelOptions { memory_budget_bytes: 1024, ..ParallelOptions::default() };
        let results = process_batch(sources, options, |_| 100, |_| Ok(vec![]));

        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.is_success));
    }

    #[test]
    fn sharded_chunking_renumbers_sequence_across_shards() {
        let body = "# A\npara one.\n\n# B\npara two.\n";
        let a_end = body.find("# B").unwrap();
        let sections = vec![
            Section { level: 0, title: String::new(), start: 0, end: body.len(), children: vec![1, 2] },
            Section { level: 1, title: "A".into(), start: 0, end: a_end, children: vec![] },
            Section { level: 1, title: "B".into(), start: a_end, end: body.len(), children: vec![] },
        ];
        let content = parsed(body, sections);
        let options = ChunkingOptions { strategy: "paragraph".into(), ..ChunkingOptions::default() };
        let strategy = resolve("paragraph");

        let chunks = chunk_sharded(&content, &options, strategy.as_ref()).unwrap();
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.sequence, i);
            assert_eq!(chunk.total, chunks.len());
        }
        assert!(chunks.windows(2).all(|w| w[0].start <= w[1].start));
    }
}
