//! Output serialization: JSON, JSONL, Markdown, and the `info.json`
//! companion describing a run.

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::types::{ChunkingOptions, DocumentChunk};

/// Document-level metadata accompanying a serialized chunk list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Source filename.
    pub source_filename: String,
    /// Strategy actually selected (post-`Auto` resolution).
    pub strategy: String,
}

/// `{ "document": {...}, "chunks": [...] }`.
#[derive(Debug, Clone, Serialize)]
struct JsonEnvelope<'a> {
    document: &'a DocumentInfo,
    chunks: &'a [DocumentChunk],
}

/// Serializes a chunk list as a single JSON object with a `document` header.
pub fn to_json(document: &DocumentInfo, chunks: &[DocumentChunk]) -> Result<String> {
    serde_json::to_string_pretty(&JsonEnvelope { document, chunks })
        .map_err(|e| PipelineError::Serialization(e.to_string()))
}

/// Serializes a chunk list as JSON Lines, one chunk object per line.
pub fn to_jsonl(chunks: &[DocumentChunk]) -> Result<String> {
    let mut out = String::new();
    for chunk in chunks {
        let line = serde_json::to_string(chunk).map_err(|e| PipelineError::Serialization(e.to_string()))?;
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}

/// Serializes a chunk list as Markdown: chunks separated by a horizontal
/// rule, each preceded by a comment line encoding heading path and sequence.
#[must_use]
pub fn to_markdown(chunks: &[DocumentChunk]) -> String {
    let mut out = String::new();
    for chunk in chunks {
        let path = if chunk.heading_path.is_empty() {
            "(root)".to_string()
        } else {
            chunk.heading_path.join(" > ")
        };
        out.push_str(&format!(
            "<!-- heading_path: {path} | sequence: {}/{} -->\n",
            chunk.sequence + 1,
            chunk.total
        ));
        out.push_str(&chunk.content);
        out.push_str("\n\n---\n\n");
    }
    out
}

/// Summary statistics embedded in [`RunInfo`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Number of chunks produced.
    pub chunk_count: usize,
    /// Total characters across all chunks.
    pub total_chars: usize,
    /// Smallest chunk length, in characters.
    pub min_chunk_size: usize,
    /// Mean chunk length, in characters.
    pub avg_chunk_size: f32,
    /// Largest chunk length, in characters.
    pub max_chunk_size: usize,
    /// Number of chunks that carry enrichment annotations.
    pub enriched_chunk_count: usize,
    /// Number of pre-extraction images successfully processed.
    pub extracted_image_count: usize,
    /// Number of pre-extraction images skipped (unsupported, oversized, etc.).
    pub skipped_image_count: usize,
}

impl SummaryStats {
    /// Computes summary statistics over a finished chunk list.
    #[must_use]
    pub fn compute(chunks: &[DocumentChunk]) -> Self {
        if chunks.is_empty() {
            return Self::default();
        }
        let sizes: Vec<usize> = chunks.iter().map(|c| c.content.chars().count()).collect();
        let total_chars = sizes.iter().sum();
        Self {
            chunk_count: chunks.len(),
            total_chars,
            min_chunk_size: *sizes.iter().min().unwrap_or(&0),
            avg_chunk_size: total_chars as f32 / chunks.len() as f32,
            max_chunk_size: *sizes.iter().max().unwrap_or(&0),
            enriched_chunk_count: chunks
                .iter()
                .filter(|c| c.props.contains_key(crate::enricher::SUMMARY_KEY))
                .count(),
            extracted_image_count: 0,
            skipped_image_count: 0,
        }
    }
}

/// The `info.json` companion recorded alongside a chunked-directory output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInfo {
    /// Source filename.
    pub source_filename: String,
    /// The chunking options the run was invoked with.
    pub options: ChunkingOptions,
    /// Strategy actually selected.
    pub strategy: String,
    /// Unix timestamp (seconds) the run completed, supplied by the caller
    /// since this crate does not read the system clock.
    pub completed_at_unix: u64,
    /// Name of the AI/LLM provider used, if enrichment ran.
    pub ai_provider: Option<String>,
    /// Whether enrichment ran for this document.
    pub enriched: bool,
    /// Digest of summary statistics.
    pub summary: SummaryStats,
}

impl RunInfo {
    /// Serializes this run's `info.json` contents.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| PipelineError::Serialization(e.to_string()))
    }
}
