//! Extract → Parse → Chunk pipeline for retrieval-optimized document chunking.
//!
//! ```text
//! bytes -> Reader -> RawContent -> Parser -> ParsedContent -> Strategy -> DocumentChunk stream -> (Enricher?) -> caller
//! ```
//!
//! The cache intercepts at the `(fingerprint -> chunk list)` boundary; the
//! streaming and parallel runtimes wrap the same underlying pipeline.

pub mod cache;
pub mod chunking;
pub mod error;
pub mod parser;
pub mod enricher;
pub mod output;
pub mod parallel;
pub mod processor;
pub mod quality;
pub mod reader;
pub mod streaming;
pub mod tokenize;
pub mod types;

pub use cache::{Cache, CacheOptions};
pub use chunking::{resolve as resolve_strategy, ChunkingStrategy};
pub use enricher::{enrich_chunks, EnrichmentOptions};
pub use error::{PipelineError, Result};
pub use output::{to_json, to_jsonl, to_markdown, DocumentInfo, RunInfo, SummaryStats};
pub use parallel::{chunk_sharded, process_batch, BatchResult, ParallelOptions};
pub use parser::{parse, parse_with_completion, ParseOptions};
pub use processor::{CachingProcessor, DocumentProcessor, Processor};
pub use quality::{assess as assess_quality, QualityReport};
pub use reader::read;
pub use streaming::{ChunkStream, ProcessingResult, Stage, StreamOptions};
pub use types::{
    ChunkQuality, ChunkingOptions, DocumentChunk, DocumentFormat, ExtractedImage, LanguageInfo,
    ParseQuality, ParsedContent, RawContent, Section,
};
