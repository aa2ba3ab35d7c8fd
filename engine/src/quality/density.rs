//! Information-density bundle: meaningful-word ratio, keyword richness,
//! factual-content ratio, and redundancy level across a chunk sequence.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::types::DocumentChunk;

/// The four information-density metrics, each in `[0, 1]`. `redundancy` is
/// not inverted here; the overall-score formula inverts it when folding
/// this bundle in.
#[derive(Debug, Clone, Copy, Default, serde::Serialize, serde::Deserialize)]
pub struct DensityQuality {
    /// Fraction of tokens longer than 3 characters that are not stop words.
    pub meaningful_word_ratio: f32,
    /// Rate of technical-vocabulary seed-set hits, scaled x10 and capped at 1.
    pub keyword_richness: f32,
    /// Fraction of chunks containing digits or a factual-keyword pattern.
    pub factual_content_ratio: f32,
    /// Mean word-set Jaccard similarity between consecutive chunks.
    pub redundancy_level: f32,
}

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "is", "are", "was", "were", "be", "been", "being", "to",
    "of", "in", "on", "at", "for", "with", "by", "from", "as", "that", "this", "it", "its", "he",
    "she", "they", "we", "you", "i",
];

const TECHNICAL_VOCABULARY: &[&str] = &[
    "algorithm", "function", "system", "configuration", "parameter", "protocol", "interface",
    "implementation", "architecture", "database", "api", "framework", "module", "pipeline",
];

static FACTUAL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(percent|%|according to|study|rate|approximately|statistics|measured)\b")
        .expect("valid literal regex")
});

fn meaningful_word_ratio(text: &str) -> f32 {
    let words: Vec<String> = text.unicode_words().map(|w| w.to_lowercase()).collect();
    if words.is_empty() {
        return 0.0;
    }
    let meaningful = words
        .iter()
        .filter(|w| w.chars().count() > 3 && !STOP_WORDS.contains(&w.as_str()))
        .count();
    meaningful as f32 / words.len() as f32
}

fn keyword_richness(text: &str) -> f32 {
    let words: Vec<String> = text.unicode_words().map(|w| w.to_lowercase()).collect();
    if words.is_empty() {
        return 0.0;
    }
    let hits = words.iter().filter(|w| TECHNICAL_VOCABULARY.contains(&w.as_str())).count();
    ((hits as f32 / words.len() as f32) * 10.0).min(1.0)
}

fn has_factual_content(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit()) || FACTUAL_PATTERN.is_match(text)
}

fn word_set(text: &str) -> HashSet<String> {
    text.unicode_words().map(|w| w.to_lowercase()).collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f32 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let union = a.union(b).count() as f32;
    if union == 0.0 {
        0.0
    } else {
        a.intersection(b).count() as f32 / union
    }
}

/// Computes the information-density bundle across a chunk sequence.
#[must_use]
pub fn assess(chunks: &[DocumentChunk]) -> DensityQuality {
    if chunks.is_empty() {
        return DensityQuality::default();
    }

    let n = chunks.len() as f32;
    let meaningful_word_ratio =
        chunks.iter().map(|c| meaningful_word_ratio(&c.content)).sum::<f32>() / n;
    let keyword_richness = chunks.iter().map(|c| keyword_richness(&c.content)).sum::<f32>() / n;
    let factual_content_ratio =
        chunks.iter().filter(|c| has_factual_content(&c.content)).count() as f32 / n;

    let redundancy_level = if chunks.len() < 2 {
        0.0
    } else {
        let sets: Vec<HashSet<String>> = chunks.iter().map(|c| word_set(&c.content)).collect();
        let sum: f32 = sets.windows(2).map(|p| jaccard(&p[0], &p[1])).sum();
        sum / (chunks.len() - 1) as f32
    };

    DensityQuality { meaningful_word_ratio, keyword_richness, factual_content_ratio, redundancy_level }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChunkQuality, PropertyBag};

    fn chunk(content: &str) -> DocumentChunk {
        DocumentChunk {
            id: "c".into(),
            content: content.to_string(),
            start: 0,
            end: content.len(),
            page: None,
            heading_path: vec![],
            sequence: 0,
            total: 1,
            quality: ChunkQuality::default(),
            strategy: "fixed".into(),
            tokens: 0,
            props: PropertyBag::new(),
            parent_id: None,
        }
    }

    #[test]
    fn technical_vocabulary_boosts_keyword_richness() {
        let q = assess(&[chunk("the algorithm configures the interface protocol")]);
        assert!(q.keyword_richness > 0.0);
    }

    #[test]
    fn digits_mark_factual_content() {
        let q = assess(&[chunk("the rate was measured at 42 percent")]);
        assert_eq!(q.factual_content_ratio, 1.0);
    }

    #[test]
    fn identical_chunks_are_fully_redundant() {
        let q = assess(&[chunk("same words repeated"), chunk("same words repeated")]);
        assert_eq!(q.redundancy_level, 1.0);
    }
}
