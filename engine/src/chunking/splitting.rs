//! Shared boundary-detection and greedy-packing primitives used by several
//! chunking strategies (`Paragraph`, `Semantic`, `Intelligent`, `Smart`,
//! `Hierarchical`).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::tokenize::estimate_tokens;
use crate::types::LanguageInfo;

/// Splits `text` into paragraph byte spans: runs of non-blank lines
/// separated by one or more blank lines.
#[must_use]
pub fn split_paragraphs(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;
    let mut offset = 0usize;

    for line in text.split_inclusive('\n') {
        let trimmed = line.trim_end_matches('\n');
        let line_start = offset;
        offset += line.len();

        if trimmed.trim().is_empty() {
            if let Some(s) = start.take() {
                spans.push((s, line_start));
            }
        } else if start.is_none() {
            start = Some(line_start);
        }
    }
    if let Some(s) = start {
        spans.push((s, text.len()));
    }
    trim_spans(text, spans)
}

static LATIN_SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?](?:[\s]+|$)").expect("valid regex"));

/// Splits `text` into sentence byte spans using language-conditioned rules:
/// Latin scripts split on `.!?` followed by whitespace or end-of-text; CJK
/// splits on the ideographic sentence terminators `。！？」』` with no
/// trailing-whitespace requirement (CJK text is not space-delimited).
#[must_use]
pub fn split_sentences(text: &str, language: &LanguageInfo) -> Vec<(usize, usize)> {
    if is_cjk(&language.code) {
        split_sentences_cjk(text)
    } else {
        split_sentences_latin(text)
    }
}

fn is_cjk(code: &str) -> bool {
    matches!(code, "ko" | "ja" | "zh")
}

fn split_sentences_latin(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = 0usize;
    for m in LATIN_SENTENCE_END.find_iter(text) {
        let end = m.end();
        if end > start {
            spans.push((start, end));
            start = end;
        }
    }
    if start < text.len() {
        spans.push((start, text.len()));
    }
    trim_spans(text, spans)
}

const CJK_TERMINATORS: &[char] = &['。', '!', '?', '！', '？', '」', '』'];

fn split_sentences_cjk(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = 0usize;
    for (idx, ch) in text.char_indices() {
        if CJK_TERMINATORS.contains(&ch) {
            let end = idx + ch.len_utf8();
            spans.push((start, end));
            start = end;
        }
    }
    if start < text.len() {
        spans.push((start, text.len()));
    }
    trim_spans(text, spans)
}

fn trim_spans(text: &str, spans: Vec<(usize, usize)>) -> Vec<(usize, usize)> {
    spans
        .into_iter()
        .filter_map(|(s, e)| {
            let slice = &text[s..e];
            let trimmed_start = slice.len() - slice.trim_start().len();
            let trimmed_end = slice.trim_end().len();
            if trimmed_end <= trimmed_start {
                None
            } else {
                Some((s + trimmed_start, s + trimmed_end))
            }
        })
        .collect()
}

/// A packed group of source units, ready to become one chunk.
#[derive(Debug, Clone, Copy)]
pub struct PackedSpan {
    /// Start offset of the chunk content (trimmed).
    pub start: usize,
    /// End offset of the chunk content (trimmed).
    pub end: usize,
}

/// Greedily packs `units` (non-overlapping, ascending byte spans over
/// `text`) into chunks bounded by `max_chunk_size` estimated tokens, with
/// each chunk after the first re-including trailing units from the previous
/// chunk totalling up to `overlap_size` tokens.
///
/// A single unit that alone exceeds `max_chunk_size` is still emitted
/// standalone (callers that need finer splitting, e.g. `Semantic`'s
/// phrase-boundary fallback, pre-split such units before calling this).
///
/// On a tie between closing the current chunk now or after the next unit,
/// this always prefers including the next unit (the later split point),
/// producing the longer chunk per the strategy tie-break rule.
#[must_use]
pub fn pack_units(units: &[(usize, usize)], text: &str, max_chunk_size: usize, overlap_size: usize) -> Vec<PackedSpan> {
    if units.is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut current_start = units[0].0;
    let mut current_tokens = 0usize;
    let mut last_unit_end = units[0].0;
    let mut unit_start_idx = 0usize;

    for (i, &(u_start, u_end)) in units.iter().enumerate() {
        let unit_tokens = estimate_tokens(&text[u_start..u_end]);

        if current_tokens > 0 && current_tokens + unit_tokens > max_chunk_size {
            chunks.push(PackedSpan { start: current_start, end: last_unit_end });

            // Seed the next chunk with trailing units covering up to
            // `overlap_size` tokens, walking backward from the unit just closed.
            let mut overlap_tokens = 0usize;
            let mut seed_idx = i;
            while seed_idx > unit_start_idx {
                let (s, e) = units[seed_idx - 1];
                let t = estimate_tokens(&text[s..e]);
                if overlap_tokens + t > overlap_size {
                    break;
                }
                overlap_tokens += t;
                seed_idx -= 1;
            }
            unit_start_idx = seed_idx;
            current_start = units[seed_idx].0;
            current_tokens = overlap_tokens;
        }

        current_tokens += unit_tokens;
        last_unit_end = u_end;
    }

    chunks.push(PackedSpan { start: current_start, end: last_unit_end });
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_blank_line_runs() {
        let text = "para one\nstill one\n\npara two\n\n\npara three";
        let spans = split_paragraphs(text);
        assert_eq!(spans.len(), 3);
        assert_eq!(&text[spans[0].0..spans[0].1], "para one\nstill one");
        assert_eq!(&text[spans[1].0..spans[1].1], "para two");
        assert_eq!(&text[spans[2].0..spans[2].1], "para three");
    }

    #[test]
    fn latin_sentence_split() {
        let lang = LanguageInfo { code: "en".into(), confidence: 0.9 };
        let spans = split_sentences("Hello world. This is a test! Is it? Yes.", &lang);
        let texts: Vec<&str> = spans
            .iter()
            .map(|(s, e)| "Hello world. This is a test! Is it? Yes.".get(*s..*e).unwrap())
            .collect();
        assert_eq!(texts, vec!["Hello world.", "This is a test!", "Is it?", "Yes."]);
    }

    #[test]
    fn cjk_sentence_split() {
        let lang = LanguageInfo { code: "ko".into(), confidence: 0.9 };
        let text = "안녕하세요. 오늘은 날씨가 좋네요。반갑습니다！";
        let spans = split_sentences(text, &lang);
        assert_eq!(spans.len(), 2);
    }

    #[test]
    fn pack_units_respects_overlap_budget() {
        let text = "one two three four five six seven eight nine ten";
        // crude units: each word is its own unit.
        let mut units = Vec::new();
        let mut offset = 0;
        for word in text.split(' ') {
            let start = text[offset..].find(word).unwrap() + offset;
            let end = start + word.len();
            units.push((start, end));
            offset = end;
        }

        let packed = pack_units(&units, text, 3, 1);
        assert!(packed.len() > 1);
        // Every packed span after the first should start at or before the
        // previous span's end (i.e. some overlap or exact continuation).
        for w in packed.windows(2) {
            assert!(w[1].start <= w[0].end);
        }
    }

    #[test]
    fn oversized_single_unit_is_emitted_standalone() {
        let text = "a".repeat(10_000);
        let units = vec![(0, text.len())];
        let packed = pack_units(&units, &text, 10, 0);
        assert_eq!(packed.len(), 1);
        assert_eq!(packed[0].start, 0);
        assert_eq!(packed[0].end, text.len());
    }
}
