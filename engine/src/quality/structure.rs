//! Structural-coherence bundle: structure preservation, context continuity,
//! reference integrity, and metadata richness across a chunk sequence.

use std::collections::HashSet;

use crate::types::DocumentChunk;

/// The four structural-coherence metrics, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, serde::Serialize, serde::Deserialize)]
pub struct StructureQuality {
    /// Fraction of chunks containing a list or heading marker.
    pub structure_preservation: f32,
    /// Mean adjacent-Jaccard plus a bonus when the next chunk opens with a
    /// discourse connective.
    pub context_continuity: f32,
    /// Fraction of chunks mentioning a cross-reference word.
    pub reference_integrity: f32,
    /// Fraction of chunks with a populated heading path.
    pub metadata_richness: f32,
}

const DISCOURSE_CONNECTIVES: &[&str] = &[
    "however", "therefore", "furthermore", "moreover", "consequently", "additionally", "thus",
    "meanwhile", "nevertheless",
];

const REFERENCE_WORDS: &[&str] =
    &["see", "refer", "above", "below", "appendix", "figure", "table", "section"];

fn has_structure_marker(text: &str) -> bool {
    text.lines().any(|l| {
        let t = l.trim_start();
        t.starts_with('#') || t.starts_with("- ") || t.starts_with("* ") || t.starts_with("1. ")
    })
}

fn mentions_reference(text: &str) -> bool {
    let lower = text.to_lowercase();
    REFERENCE_WORDS.iter().any(|w| lower.contains(w))
}

fn opens_with_connective(text: &str) -> bool {
    let first_word = text.split_whitespace().next().unwrap_or("").to_lowercase();
    let first_word = first_word.trim_matches(|c: char| !c.is_alphanumeric());
    DISCOURSE_CONNECTIVES.contains(&first_word)
}

fn word_set(text: &str) -> HashSet<String> {
    text.split_whitespace().map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase()).collect()
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

/// Computes the structural-coherence bundle across a chunk sequence.
#[must_use]
pub fn assess(chunks: &[DocumentChunk]) -> StructureQuality {
    if chunks.is_empty() {
        return StructureQuality::default();
    }

    let n = chunks.len() as f32;
    let structure_preservation =
        chunks.iter().filter(|c| has_structure_marker(&c.content)).count() as f32 / n;
    let reference_integrity =
        chunks.iter().filter(|c| mentions_reference(&c.content)).count() as f32 / n;
    let metadata_richness =
        chunks.iter().filter(|c| !c.heading_path.is_empty()).count() as f32 / n;

    let context_continuity = if chunks.len() < 2 {
        0.0
    } else {
        let sum: f32 = chunks
            .windows(2)
            .map(|pair| {
                let base = jaccard(&word_set(&pair[0].content), &word_set(&pair[1].content));
                if opens_with_connective(&pair[1].content) {
                    (base + 0.2).min(1.0)
                } else {
                    base
                }
            })
            .sum();
        sum / (chunks.len() - 1) as f32
    };

    StructureQuality {
        structure_preservation,
        context_continuity,
        reference_integrity,
        metadata_richness,
    }
}
