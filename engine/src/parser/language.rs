//! Language detection: a Unicode-range check for CJK scripts, falling back
//! to a small rank-based n-gram identifier for Latin-script languages.

use crate::types::LanguageInfo;

fn is_hangul(c: char) -> bool {
    ('\u{AC00}'..='\u{D7A3}').contains(&c)
}

fn is_kana(c: char) -> bool {
    ('\u{3040}'..='\u{309F}').contains(&c) || ('\u{30A0}'..='\u{30FF}').contains(&c)
}

fn is_cjk_ideograph(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
}

/// A small set of common function words per language, used to rank Latin
/// candidates when no CJK signal is present.
const LATIN_PROFILES: &[(&str, &[&str])] = &[
    ("en", &["the", "and", "of", "to", "is", "in", "that", "it", "for", "with"]),
    ("es", &["el", "la", "de", "que", "y", "en", "los", "del", "se", "las"]),
    ("fr", &["le", "la", "de", "et", "les", "des", "un", "une", "dans", "que"]),
    ("de", &["der", "die", "und", "das", "ist", "den", "mit", "von", "zu", "nicht"]),
];

/// Detects the primary language of `text`. CJK scripts take priority over
/// the Latin n-gram fallback per the configured ratio thresholds.
#[must_use]
pub fn detect(text: &str) -> LanguageInfo {
    let non_whitespace: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
    if non_whitespace.is_empty() {
        return LanguageInfo { code: "en".to_string(), confidence: 0.1 };
    }

    let total = non_whitespace.len() as f32;
    let hangul_ratio = non_whitespace.iter().filter(|&&c| is_hangul(c)).count() as f32 / total;
    let kana_ratio = non_whitespace.iter().filter(|&&c| is_kana(c)).count() as f32 / total;
    let cjk_ratio = non_whitespace.iter().filter(|&&c| is_cjk_ideograph(c)).count() as f32 / total;

    if hangul_ratio > 0.10 {
        return LanguageInfo { code: "ko".to_string(), confidence: hangul_ratio.clamp(0.1, 0.99) };
    }
    if kana_ratio > 0.05 {
        return LanguageInfo { code: "ja".to_string(), confidence: kana_ratio.clamp(0.1, 0.99) };
    }
    if cjk_ratio > 0.10 {
        return LanguageInfo { code: "zh".to_string(), confidence: cjk_ratio.clamp(0.1, 0.99) };
    }

    detect_latin(text)
}

fn detect_latin(text: &str) -> LanguageInfo {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_ascii_lowercase())
        .filter(|w| !w.is_empty())
        .collect();

    if words.is_empty() {
        return LanguageInfo { code: "en".to_string(), confidence: 0.1 };
    }

    let mut scores: Vec<(&str, f32)> = LATIN_PROFILES
        .iter()
        .map(|(code, markers)| {
            let hits = words.iter().filter(|w| markers.contains(&w.as_str())).count();
            (*code, hits as f32 / words.len() as f32)
        })
        .collect();
    scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());

    let (top_code, top_score) = scores[0];
    let second_score = scores.get(1).map_or(0.0, |s| s.1);
    let gap = if top_score + second_score > 0.0 {
        (top_score - second_score) / (top_score + second_score).max(f32::EPSILON)
    } else {
        0.0
    };

    let code = if top_score > 0.0 { top_code } else { "en" };
    LanguageInfo { code: code.to_string(), confidence: gap.clamp(0.1, 0.99) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn korean_text_is_detected_by_hangul_ratio() {
        let info = detect("안녕하세요 반갑습니다 오늘 날씨가 좋네요");
        assert_eq!(info.code, "ko");
    }

    #[test]
    fn japanese_text_is_detected_by_kana_ratio() {
        let info = detect("これはひらがなとカタカナのテストです");
        assert_eq!(info.code, "ja");
    }

    #[test]
    fn chinese_text_is_detected_by_ideograph_ratio() {
        let info = detect("这是一个中文句子用来测试语言检测功能");
        assert_eq!(info.code, "zh");
    }

    #[test]
    fn english_text_falls_back_to_the_latin_identifier() {
        let info = detect("the quick brown fox jumps over the lazy dog and the cat");
        assert_eq!(info.code, "en");
    }

    #[test]
    fn confidence_is_always_clamped() {
        let info = detect("");
        assert!(info.confidence >= 0.1 && info.confidence <= 0.99);
    }
}
