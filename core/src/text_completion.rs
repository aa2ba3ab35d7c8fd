//! Text-completion service abstraction.
//!
//! The parser and quality engine call through this trait when LLM assistance
//! is requested and available; everything about prompting, model choice, and
//! transport lives on the other side of it. Every method accepts a
//! [`CancelToken`] so a caller's cancellation propagates into in-flight LLM
//! requests without the pipeline needing provider-specific abort logic.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::cancel::CancelToken;
use crate::error::Result;

/// A detected document section, as reported by
/// [`TextCompletionService::analyze_structure`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureSection {
    /// Heading level, 1-indexed.
    pub level: u8,
    /// Section title.
    pub title: String,
    /// Character offset where the section starts.
    pub start: usize,
}

/// Structured result of an LLM-assisted structure analysis pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructureAnalysis {
    /// Sections detected in reading order.
    pub sections: Vec<StructureSection>,
    /// Model confidence in the detected structure, `[0, 1]`.
    pub confidence: f32,
}

/// Structured result of an LLM-assisted summarization pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryResult {
    /// Short summary text.
    pub summary: String,
    /// Extracted keywords, most salient first.
    pub keywords: Vec<String>,
}

/// Structured result of an LLM-assisted metadata extraction pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataExtraction {
    /// Extracted key/value metadata fields.
    pub fields: std::collections::BTreeMap<String, String>,
    /// Detected document category (e.g. `"Legal"`, `"Academic"`).
    pub document_category: Option<String>,
}

/// Structured result of an LLM-assisted quality assessment pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualityAssessment {
    /// Overall quality score in `[0, 1]` as judged by the model.
    pub score: f32,
    /// Free-text issues the model flagged.
    pub issues: Vec<String>,
}

/// Generates free-form and schema-typed text completions.
///
/// Implementations wrap a specific LLM provider; the pipeline never depends
/// on one directly. Every call is best-effort: on [`CapabilityError`](crate::error::CapabilityError)
/// the caller downgrades gracefully (disables enrichment, falls back to
/// rule-based parsing) rather than failing the whole document.
#[async_trait]
pub trait TextCompletionService: Send + Sync {
    /// Generates free-form text from a prompt.
    async fn generate(&self, prompt: &str, cancel: &CancelToken) -> Result<String>;

    /// Asks the model to identify heading/section structure in `text`.
    async fn analyze_structure(&self, text: &str, cancel: &CancelToken) -> Result<StructureAnalysis>;

    /// Asks the model to summarize `text` and extract keywords.
    async fn summarize(&self, text: &str, cancel: &CancelToken) -> Result<SummaryResult>;

    /// Asks the model to extract document metadata and classify its category.
    async fn extract_metadata(&self, text: &str, cancel: &CancelToken) -> Result<MetadataExtraction>;

    /// Asks the model to assess the quality of a chunked document.
    async fn assess_quality(&self, text: &str, cancel: &CancelToken) -> Result<QualityAssessment>;
}
