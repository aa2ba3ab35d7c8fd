//! Chunking-quality bundle: completeness, consistency, boundary quality,
//! size distribution, and overlap effectiveness across a chunk sequence.

use std::collections::HashSet;

use crate::types::DocumentChunk;

/// The five chunking-quality metrics, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, serde::Serialize, serde::Deserialize)]
pub struct ChunkingQuality {
    /// Mean per-chunk completeness (sentence-ending, capitalized/heading
    /// start, length within `[50, 2000]` chars).
    pub completeness: f32,
    /// `1 - normalized variance` of chunk length.
    pub content_consistency: f32,
    /// Fraction of adjacent pairs whose join respects a sentence boundary.
    pub boundary_quality: f32,
    /// `1 - coefficient of variation` of chunk length, clamped to `[0, 1]`.
    pub size_distribution: f32,
    /// Mean word-set Jaccard similarity between adjacent chunks.
    pub overlap_effectiveness: f32,
}

impl ChunkingQuality {
    /// Unweighted mean of the five metrics, used as this bundle's
    /// contribution to the overall score.
    #[must_use]
    pub fn mean(&self) -> f32 {
        (self.completeness
            + self.content_consistency
            + self.boundary_quality
            + self.size_distribution
            + self.overlap_effectiveness)
            / 5.0
    }
}

fn word_set(text: &str) -> HashSet<String> {
    text.split_whitespace().map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase()).collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f32 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count() as f32;
    let union = a.union(b).count() as f32;
    if union == 0.0 {
        0.0
    } else {
        intersection / union
    }
}

fn is_complete(content: &str) -> bool {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return false;
    }
    let starts_ok = trimmed.starts_with('#') || trimmed.chars().next().is_some_and(char::is_uppercase);
    let ends_ok = matches!(trimmed.chars().last(), Some('.' | '!' | '?' | '\u{3002}'));
    let len = trimmed.chars().count();
    starts_ok && ends_ok && (50..=2000).contains(&len)
}

/// Computes the chunking-quality bundle for a chunk sequence. Returns the
/// zero bundle for fewer than two chunks (nothing to measure boundaries or
/// overlap against).
#[must_use]
pub fn assess(chunks: &[DocumentChunk]) -> ChunkingQuality {
    if chunks.is_empty() {
        return ChunkingQuality::default();
    }

    let completeness =
        chunks.iter().filter(|c| is_complete(&c.content)).count() as f32 / chunks.len() as f32;

    let lengths: Vec<f32> = chunks.iter().map(|c| c.content.chars().count() as f32).collect();
    let mean_len = lengths.iter().sum::<f32>() / lengths.len() as f32;
    let variance = if mean_len > 0.0 {
        lengths.iter().map(|l| (l - mean_len).powi(2)).sum::<f32>() / lengths.len() as f32
    } else {
        0.0
    };
    let normalized_variance = if mean_len > 0.0 { (variance.sqrt() / mean_len).min(1.0) } else { 0.0 };
    let content_consistency = (1.0 - normalized_variance).clamp(0.0, 1.0);
    let coefficient_of_variation = normalized_variance;
    let size_distribution = (1.0 - coefficient_of_variation).clamp(0.0, 1.0);

    if chunks.len() == 1 {
        return ChunkingQuality {
            completeness,
            content_consistency,
            boundary_quality: 1.0,
            size_distribution,
            overlap_effectiveness: 0.0,
        };
    }

    let mut boundary_hits = 0usize;
    let mut overlap_sum = 0.0f32;
    let word_sets: Vec<HashSet<String>> = chunks.iter().map(|c| word_set(&c.content)).collect();

    for window in chunks.windows(2) {
        let current = window[0].content.trim();
        let next = window[1].content.trim();
        let current_ends_clean = matches!(current.chars().last(), Some('.' | '!' | '?' | '\u{3002}'));
        let next_starts_clean =
            next.starts_with('#') || next.chars().next().is_some_and(char::is_uppercase);
        if current_ends_clean && next_starts_clean {
            boundary_hits += 1;
        }
    }
    for pair in word_sets.windows(2) {
        overlap_sum += jaccard(&pair[0], &pair[1]);
    }

    let pairs = (chunks.len() - 1) as f32;
    ChunkingQuality {
        completeness,
        content_consistency,
        boundary_quality: boundary_hits as f32 / pairs,
        size_distribution,
        overlap_effectiveness: overlap_sum / pairs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChunkQuality, PropertyBag};

    fn chunk(content: &str, sequence: usize) -> DocumentChunk {
        DocumentChunk {
            id: format!("c{sequence}"),
            content: content.to_string(),
            start: 0,
            end: content.len(),
            page: None,
            heading_path: vec![],
            sequence,
            total: 1,
            quality: ChunkQuality::default(),
            strategy: "fixed".into(),
            tokens: content.split_whitespace().count(),
            props: PropertyBag::new(),
            parent_id: None,
        }
    }

    #[test]
    fn clean_sentence_boundaries_score_high() {
        let a = "Capital letters begin this chunk and it ends with a period.";
        let b = "Another chunk continues the idea cleanly and fully.";
        let chunks = vec![chunk(a, 0), chunk(b, 1)];
        let q = assess(&chunks);
        assert_eq!(q.boundary_quality, 1.0);
    }

    #[test]
    fn single_chunk_has_no_overlap_to_measure() {
        let q = assess(&[chunk("Just one chunk here, nothing else to compare against.", 0)]);
        assert_eq!(q.overlap_effectiveness, 0.0);
        assert_eq!(q.boundary_quality, 1.0);
    }

    #[test]
    fn empty_input_is_the_zero_bundle() {
        let q = assess(&[]);
        assert_eq!(q.mean(), 0.0);
    }
}
