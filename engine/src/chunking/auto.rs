//! `Auto`: inspects the parsed document and delegates to the best-fit strategy.

use super::{fixed, intelligent, paragraph, semantic, smart, ChunkingStrategy};
use crate::error::Result;
use crate::types::{ChunkingOptions, DocumentChunk, ParsedContent};

/// A category the document-type detector can report, each with its own
/// default `max_chunk_size` / `overlap_size` band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentCategory {
    Technical,
    Legal,
    Medical,
    Academic,
    General,
}

impl DocumentCategory {
    /// Midpoint of the static `MaxChunkSize` / `OverlapSize` (as a fraction
    /// of `MaxChunkSize`) band for this category.
    fn defaults(self) -> (usize, f32) {
        match self {
            Self::Technical => (650, 0.25),
            Self::Legal => (400, 0.20),
            Self::Medical => (400, 0.20),
            Self::Academic => (300, 0.30),
            Self::General => (512, 0.125),
        }
    }

    fn detect(content: &ParsedContent) -> Self {
        let lower = content.body.to_ascii_lowercase();
        let legal_hits = ["whereas", "hereinafter", "pursuant to", "the party"]
            .iter()
            .filter(|kw| lower.contains(**kw))
            .count();
        let medical_hits = ["diagnosis", "patient", "mg/kg", "dosage", "symptom"]
            .iter()
            .filter(|kw| lower.contains(**kw))
            .count();
        let academic_hits = ["abstract", "references", "et al.", "hypothesis"]
            .iter()
            .filter(|kw| lower.contains(**kw))
            .count();
        let technical_hits = ["```", "fn ", "def ", "class ", "import "]
            .iter()
            .filter(|kw| lower.contains(**kw))
            .count();

        let scores = [
            (Self::Legal, legal_hits),
            (Self::Medical, medical_hits),
            (Self::Academic, academic_hits),
            (Self::Technical, technical_hits),
        ];
        match scores.iter().max_by_key(|(_, hits)| *hits) {
            Some((category, hits)) if *hits > 0 => *category,
            _ => Self::General,
        }
    }
}

fn heading_line_ratio(content: &ParsedContent) -> f32 {
    let lines: Vec<&str> = content.body.lines().collect();
    if lines.is_empty() {
        return 0.0;
    }
    let heading_lines = lines.iter().filter(|l| l.trim_start().starts_with('#')).count();
    heading_lines as f32 / lines.len() as f32
}

fn has_code_fences(content: &ParsedContent) -> bool {
    content.body.contains("```")
}

fn average_sentence_length(content: &ParsedContent) -> f32 {
    let sentences = super::splitting::split_sentences(&content.body, &content.language);
    if sentences.is_empty() {
        return 0.0;
    }
    let total_words: usize = sentences
        .iter()
        .map(|&(s, e)| content.body[s..e].split_whitespace().count())
        .sum();
    total_words as f32 / sentences.len() as f32
}

fn is_table_heavy_extension(content: &ParsedContent) -> bool {
    let lower = content.source_filename.to_ascii_lowercase();
    lower.ends_with(".xlsx") || lower.ends_with(".csv")
}

fn section_count(content: &ParsedContent) -> usize {
    content.sections.len().saturating_sub(usize::from(!content.sections.is_empty()))
}

/// The selector's decision, mirroring the `select(...) -> { strategy_name,
/// confidence, reasoning, used_llm }` contract: rationale and confidence are
/// surfaced alongside the chosen strategy rather than computed and dropped.
struct Selection {
    strategy: Box<dyn ChunkingStrategy>,
    max_chunk_size: usize,
    overlap_size: usize,
    reasoning: &'static str,
    confidence: f32,
}

/// Picks a concrete strategy and a tuned `(max_chunk_size, overlap_size)` pair.
///
/// Selection is purely rule-based (no LLM consulted), so `used_llm` is always
/// `false` for this variant.
fn select(content: &ParsedContent) -> Selection {
    if is_table_heavy_extension(content) {
        let (max, overlap_ratio) = DocumentCategory::Technical.defaults();
        let biased_max = (max as f32 * 1.3) as usize;
        return Selection {
            strategy: Box::new(fixed::FixedSizeStrategy),
            max_chunk_size: biased_max,
            overlap_size: (biased_max as f32 * overlap_ratio) as usize,
            reasoning: "table-heavy extension biases toward FixedSize with a larger window",
            confidence: 0.95,
        };
    }

    let headings = heading_line_ratio(content);
    if headings > 0.05 || has_code_fences(content) || section_count(content) > 1 {
        let (max, overlap_ratio) = DocumentCategory::Technical.defaults();
        return Selection {
            strategy: Box::new(intelligent::IntelligentStrategy),
            max_chunk_size: max,
            overlap_size: (max as f32 * overlap_ratio) as usize,
            reasoning: "heading/code-fence density favors structure-aware Intelligent",
            confidence: 0.9,
        };
    }

    if average_sentence_length(content) > 20.0 {
        let (max, overlap_ratio) = DocumentCategory::General.defaults();
        return Selection {
            strategy: Box::new(semantic::SemanticStrategy),
            max_chunk_size: max,
            overlap_size: (max as f32 * overlap_ratio) as usize,
            reasoning: "long average sentence length in narrative prose favors Semantic",
            confidence: 0.75,
        };
    }

    let category = DocumentCategory::detect(content);
    if matches!(category, DocumentCategory::Legal | DocumentCategory::Medical | DocumentCategory::Academic) {
        let (max, overlap_ratio) = category.defaults();
        return Selection {
            strategy: Box::new(smart::SmartStrategy),
            max_chunk_size: max,
            overlap_size: (max as f32 * overlap_ratio) as usize,
            reasoning: "document-type detector reports a formal category favoring Smart",
            confidence: 0.85,
        };
    }

    let (max, overlap_ratio) = DocumentCategory::General.defaults();
    Selection {
        strategy: Box::new(paragraph::ParagraphStrategy),
        max_chunk_size: max,
        overlap_size: (max as f32 * overlap_ratio) as usize,
        reasoning: "no stronger signal; default to Paragraph",
        confidence: 0.5,
    }
}

/// Inspects document characteristics and resolves to the best-fit strategy,
/// tuning `max_chunk_size`/`overlap_size` for the detected document category.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoStrategy;

impl ChunkingStrategy for AutoStrategy {
    fn name(&self) -> &'static str {
        "auto"
    }

    fn chunk(&self, content: &ParsedContent, options: &ChunkingOptions) -> Result<Vec<DocumentChunk>> {
        let Selection { strategy, max_chunk_size, overlap_size, reasoning, confidence } = select(content);
        let tuned = ChunkingOptions {
            strategy: strategy.name().to_string(),
            max_chunk_size,
            overlap_size,
            preserve_structure: options.preserve_structure,
            adaptive_overlap: options.adaptive_overlap,
            hints: options.hints.clone(),
        };

        let mut chunks = strategy.chunk(content, &tuned)?;
        if let Some(first) = chunks.first_mut() {
            first.props.insert("AutoSelectedStrategy".to_string(), strategy.name().to_string());
            first.props.insert("OptimizedMaxChunkSize".to_string(), max_chunk_size.to_string());
            first.props.insert("OptimizedOverlapSize".to_string(), overlap_size.to_string());
            first.props.insert("AutoSelectionConfidence".to_string(), confidence.to_string());
            first.props.insert("AutoSelectionReasoning".to_string(), reasoning.to_string());
            first.props.insert("AutoUsedLlm".to_string(), "false".to_string());
        }
        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LanguageInfo, ParseQuality};

    fn parsed(body: &str, filename: &str) -> ParsedContent {
        ParsedContent {
            body: body.to_string(),
            sections: vec![],
            language: LanguageInfo { code: "en".into(), confidence: 0.9 },
            topics: vec![],
            quality: ParseQuality::default(),
            source_filename: filename.to_string(),
        }
    }

    #[test]
    fn table_extensions_force_fixed_size() {
        let content = parsed("a,b,c\n1,2,3\n4,5,6\n", "data.csv");
        let chunks = AutoStrategy.chunk(&content, &ChunkingOptions::default()).unwrap();
        assert_eq!(chunks[0].props.get("AutoSelectedStrategy"), Some(&"fixed_size".to_string()));
    }

    #[test]
    fn heading_heavy_markdown_favors_intelligent() {
        let body = "# Title\n\n## A\nsome text\n\n## B\nmore text\n\n## C\nand more\n";
        let content = parsed(body, "doc.md");
        let chunks = AutoStrategy.chunk(&content, &ChunkingOptions::default()).unwrap();
        assert_eq!(chunks[0].props.get("AutoSelectedStrategy"), Some(&"intelligent".to_string()));
    }

    #[test]
    fn first_chunk_carries_auto_annotations() {
        let content = parsed("Plain short text with no structure at all.", "doc.txt");
        let chunks = AutoStrategy.chunk(&content, &ChunkingOptions::default()).unwrap();
        let props = &chunks[0].props;
        assert!(props.contains_key("AutoSelectedStrategy"));
        assert!(props.contains_key("OptimizedMaxChunkSize"));
        assert!(props.contains_key("OptimizedOverlapSize"));
        assert!(props.contains_key("AutoSelectionConfidence"));
        assert_eq!(props.get("AutoSelectionReasoning"), Some(&"no stronger signal; default to Paragraph".to_string()));
        assert_eq!(props.get("AutoUsedLlm"), Some(&"false".to_string()));
    }
}
