//! Per-chunk context-dependency score: how much a chunk relies on
//! surrounding text to be understood, used both as a [`ChunkQuality`] field
//! and as the signal driving adaptive overlap.

use unicode_segmentation::UnicodeSegmentation;

use crate::types::DocumentChunk;

const EN_PRONOUNS: &[&str] = &[
    "it", "he", "she", "they", "this", "that", "these", "those", "its", "his", "her", "their",
];
const KO_PRONOUNS: &[&str] = &["그것", "그는", "그녀", "이것", "저것", "그들"];

const EN_REFERENCES: &[&str] = &[
    "above", "below", "aforementioned", "previously", "former", "latter", "aforesaid",
];
const KO_REFERENCES: &[&str] = &["위에서", "앞서", "전술한", "상기"];

/// Computes the `[0, 1]` context-dependency score for a single chunk's text,
/// using the vocabulary for `language_code` (falls back to English).
#[must_use]
pub fn score(text: &str, language_code: &str) -> f32 {
    let words: Vec<String> = text.unicode_words().map(|w| w.to_lowercase()).collect();
    if words.is_empty() {
        return 0.0;
    }
    let total = words.len() as f32;

    let (pronouns, references) = if language_code == "ko" {
        (KO_PRONOUNS, KO_REFERENCES)
    } else {
        (EN_PRONOUNS, EN_REFERENCES)
    };

    let pronoun_ratio = words.iter().filter(|w| pronouns.contains(&w.as_str())).count() as f32 / total;
    let reference_ratio =
        words.iter().filter(|w| references.contains(&w.as_str())).count() as f32 / total;

    let incomplete = incomplete_sentence_indicator(text);

    let proper_nouns = text
        .split_whitespace()
        .filter(|w| w.chars().next().is_some_and(char::is_uppercase))
        .count() as f32;
    let proper_noun_density = (proper_nouns / total).min(1.0);
    let inverse_proper_noun_density = 1.0 - proper_noun_density;

    let weighted = 0.30 * pronoun_ratio.min(1.0)
        + 0.25 * reference_ratio.min(1.0)
        + 0.25 * incomplete
        + 0.20 * inverse_proper_noun_density;

    weighted.clamp(0.0, 1.0)
}

/// `1.0` when the chunk neither starts with a capital/heading marker nor
/// ends on sentence punctuation, `0.0` when both hold, `0.5` otherwise.
fn incomplete_sentence_indicator(text: &str) -> f32 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 1.0;
    }
    let starts_clean =
        trimmed.starts_with('#') || trimmed.chars().next().is_some_and(char::is_uppercase);
    let ends_clean = matches!(trimmed.chars().last(), Some('.' | '!' | '?' | '"' | '\u{3002}'));

    match (starts_clean, ends_clean) {
        (true, true) => 0.0,
        (false, false) => 1.0,
        _ => 0.5,
    }
}

/// Fills in [`ChunkQuality::context_dependency`] for every chunk in place.
pub fn annotate(chunks: &mut [DocumentChunk], language_code: &str) {
    for chunk in chunks {
        chunk.quality.context_dependency = score(&chunk.content, language_code);
    }
}
