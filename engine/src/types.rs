//! Core data model shared by every pipeline stage.
//!
//! [`RawContent`] is the Reader's output, [`ParsedContent`] is the Parser's
//! output, and [`DocumentChunk`] is what the Chunker (and therefore the whole
//! pipeline) ultimately produces. None of these types are mutated after
//! creation; each stage consumes the previous stage's output and produces a
//! new value.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An open key/value bag for strategy-specific annotations.
///
/// Used both on [`ChunkingOptions`] (strategy hints) and on [`DocumentChunk`]
/// (strategy output, e.g. `AutoSelectedStrategy`).
pub type PropertyBag = BTreeMap<String, String>;

/// A pre-extraction image discovered by a reader before parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedImage {
    /// Raw image bytes.
    pub bytes: Vec<u8>,
    /// MIME type, e.g. `"image/png"`.
    pub mime_type: String,
    /// Placeholder text inserted in the body where the image occurred,
    /// replaced with real text once an `ImageToTextService` runs over it.
    pub embedding_placeholder: String,
}

/// The document format a reader was selected for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentFormat {
    /// Portable Document Format.
    Pdf,
    /// Office Open XML word processing document.
    Docx,
    /// Office Open XML spreadsheet.
    Xlsx,
    /// Office Open XML presentation.
    Pptx,
    /// CommonMark / GitHub-flavored Markdown.
    Markdown,
    /// HTML.
    Html,
    /// Plain text.
    PlainText,
    /// JSON.
    Json,
    /// Comma-separated values.
    Csv,
    /// Hangul Word Processor document (binary or OOXML-style `.hwpx`).
    Hwp,
}

impl DocumentFormat {
    /// Maps a filename extension (without the leading dot, case-insensitive)
    /// to a format, if recognized.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        Some(match ext.to_ascii_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            "xlsx" => Self::Xlsx,
            "pptx" => Self::Pptx,
            "md" | "markdown" => Self::Markdown,
            "html" | "htm" => Self::Html,
            "txt" => Self::PlainText,
            "json" => Self::Json,
            "csv" => Self::Csv,
            "hwp" | "hwpx" => Self::Hwp,
            _ => return None,
        })
    }
}

/// The Reader's output: extracted plain text plus provenance.
///
/// Owned by the pipeline driver for the duration of one parse; consumed
/// once by the [`Parser`](crate::parser::Parser) and then typically
/// discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawContent {
    /// Source filename, as given to the reader.
    pub filename: String,
    /// Size of the source in bytes.
    pub byte_size: u64,
    /// Format the reader matched on.
    pub format: DocumentFormat,
    /// Extracted plain text.
    pub text: String,
    /// Images discovered before parsing, in document order.
    pub images: Vec<ExtractedImage>,
    /// Non-fatal warnings raised during extraction (malformed input, etc.).
    pub warnings: Vec<String>,
}

impl RawContent {
    /// Creates a new raw content value with no images or warnings.
    #[must_use]
    pub fn new(filename: impl Into<String>, format: DocumentFormat, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            filename: filename.into(),
            byte_size: text.len() as u64,
            format,
            text,
            images: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Attaches a warning and returns `self` for chaining.
    #[must_use]
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

/// A node in the parsed section tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Heading level, 1-indexed, after normalization.
    pub level: u8,
    /// Section title text.
    pub title: String,
    /// Character span of the section body (inclusive start, exclusive end)
    /// in the normalized text, including the heading line itself.
    pub start: usize,
    /// End offset of the section, which is the start of the next
    /// same-or-shallower-level section or the end of the document.
    pub end: usize,
    /// Indices of direct child sections within
    /// [`ParsedContent::sections`].
    pub children: Vec<usize>,
}

/// Detected primary language of a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageInfo {
    /// ISO-639-1 language code, e.g. `"en"`, `"ko"`, `"ja"`, `"zh"`.
    pub code: String,
    /// Detector confidence, clamped to `[0.1, 0.99]`.
    pub confidence: f32,
}

/// Parsing-quality summary attached to [`ParsedContent`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParseQuality {
    /// Confidence in the detected heading/section structure, `[0, 1]`.
    pub structure_confidence: f32,
    /// Non-fatal warnings accumulated while normalizing (heading jumps
    /// clamped, tables demoted, etc.).
    pub warnings: Vec<String>,
}

/// The Parser's output: normalized, structured text ready for chunking.
///
/// Created once per document and shared read-only with the chunking stage;
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedContent {
    /// Normalized text body (cleaned, heading hierarchy corrected).
    pub body: String,
    /// Flattened section tree; `sections[0]` is always the document root
    /// section spanning the whole body (level 0) when any sections exist.
    pub sections: Vec<Section>,
    /// Detected primary language.
    pub language: LanguageInfo,
    /// Detected topics/keywords, if any.
    pub topics: Vec<String>,
    /// Parsing-quality summary.
    pub quality: ParseQuality,
    /// Source filename, carried through for diagnostics and `info.json`.
    pub source_filename: String,
}

impl ParsedContent {
    /// Returns the heading path (root-to-leaf titles) of the deepest
    /// section containing `offset`.
    #[must_use]
    pub fn heading_path_at(&self, offset: usize) -> Vec<String> {
        let mut path = Vec::new();
        let mut candidates: Vec<&Section> = self
            .sections
            .iter()
            .filter(|s| s.level > 0 && s.start <= offset && offset < s.end)
            .collect();
        candidates.sort_by_key(|s| s.level);
        for section in candidates {
            path.push(section.title.clone());
        }
        path
    }

    /// Non-whitespace character count of the normalized body, used to check
    /// the chunk-coverage invariant.
    #[must_use]
    pub fn non_whitespace_chars(&self) -> usize {
        self.body.chars().filter(|c| !c.is_whitespace()).count()
    }
}

/// Per-chunk quality fields computed by the quality engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkQuality {
    /// Ends on sentence punctuation, starts with capital/heading, length in range.
    pub completeness: f32,
    /// How well this chunk reads as a coherent unit.
    pub coherence: f32,
    /// Meaningful-word ratio within the chunk.
    pub density: f32,
    /// Estimated importance relative to the rest of the document.
    pub importance: f32,
    /// How much this chunk depends on surrounding context to be understood.
    pub context_dependency: f32,
}

/// The pipeline's primary output: one retrieval-ready text window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    /// Unique, stable (per content+options fingerprint) identifier.
    pub id: String,
    /// Exact text as it should be embedded.
    pub content: String,
    /// Start offset in the normalized source body (inclusive).
    pub start: usize,
    /// End offset in the normalized source body (exclusive).
    pub end: usize,
    /// Page number in the original source, if the format has pages.
    pub page: Option<u32>,
    /// Ordered ancestor section titles ("breadcrumb").
    pub heading_path: Vec<String>,
    /// Index of this chunk within the document, 0-based.
    pub sequence: usize,
    /// Total number of chunks produced for the document.
    pub total: usize,
    /// Per-chunk quality fields.
    pub quality: ChunkQuality,
    /// Name of the strategy that produced this chunk.
    pub strategy: String,
    /// Estimated token count.
    pub tokens: usize,
    /// Open key/value bag for strategy-specific annotations.
    pub props: PropertyBag,
    /// Set for child chunks produced by the `Hierarchical` strategy;
    /// references the id of the parent chunk.
    pub parent_id: Option<String>,
}

/// Options controlling chunking behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingOptions {
    /// Name of the strategy to use (resolved by the strategy registry).
    pub strategy: String,
    /// Maximum chunk size, in estimated tokens.
    pub max_chunk_size: usize,
    /// Overlap between adjacent chunks, in estimated tokens.
    pub overlap_size: usize,
    /// Whether strategies should prefer preserving structural units
    /// (headings, tables, code blocks) over hitting `max_chunk_size` exactly.
    pub preserve_structure: bool,
    /// Whether to expand overlap up to 1.5x when the preceding chunk ends in
    /// a context-dependent (pronoun/reference-heavy) tail.
    pub adaptive_overlap: bool,
    /// Strategy-specific hints (e.g. `enableMetadataEnrichment`, `metadataSchema`).
    pub hints: PropertyBag,
}

impl Default for ChunkingOptions {
    fn default() -> Self {
        Self {
            strategy: "auto".to_string(),
            max_chunk_size: 512,
            overlap_size: 64,
            preserve_structure: true,
            adaptive_overlap: false,
            hints: PropertyBag::new(),
        }
    }
}

impl ChunkingOptions {
    /// Returns a canonical JSON representation used for cache-key
    /// fingerprinting: keys are sorted, so semantically identical options
    /// always produce the same bytes regardless of construction order.
    #[must_use]
    pub fn canonical_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_dispatch() {
        assert_eq!(DocumentFormat::from_extension("PDF"), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_extension("markdown"), Some(DocumentFormat::Markdown));
        assert_eq!(DocumentFormat::from_extension("htm"), Some(DocumentFormat::Html));
        assert_eq!(DocumentFormat::from_extension("hwpx"), Some(DocumentFormat::Hwp));
        assert_eq!(DocumentFormat::from_extension("exe"), None);
    }

    #[test]
    fn heading_path_picks_deepest_containing_section() {
        let parsed = ParsedContent {
            body: "x".repeat(100),
            sections: vec![
                Section { level: 1, title: "A".into(), start: 0, end: 100, children: vec![1] },
                Section { level: 2, title: "A.1".into(), start: 0, end: 50, children: vec![] },
            ],
            language: LanguageInfo { code: "en".into(), confidence: 0.9 },
            topics: vec![],
            quality: ParseQuality::default(),
            source_filename: "doc.md".into(),
        };

        assert_eq!(parsed.heading_path_at(10), vec!["A".to_string(), "A.1".to_string()]);
        assert_eq!(parsed.heading_path_at(75), vec!["A".to_string()]);
    }

    #[test]
    fn canonical_json_is_order_independent() {
        let mut a = ChunkingOptions::default();
        a.hints.insert("z".into(), "1".into());
        a.hints.insert("a".into(), "2".into());

        let mut b = ChunkingOptions::default();
        b.hints.insert("a".into(), "2".into());
        b.hints.insert("z".into(), "1".into());

        assert_eq!(a.canonical_json(), b.canonical_json());
    }
}
