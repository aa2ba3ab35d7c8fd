//! Parser: `RawContent -> ParsedContent`.
//!
//! Rule-based by default; `parse_with_completion` additionally runs an
//! injected [`TextCompletionService`](docflux_core::TextCompletionService)
//! over the normalized body to populate topics when one is supplied and
//! requested.

mod headings;
mod language;
mod sections;
mod tables;
mod whitespace;

use docflux_core::TextCompletionService;

use crate::error::Result;
use crate::types::{ParseQuality, ParsedContent, RawContent};

/// Options controlling the parser. All fields have sensible defaults; an
/// absent `completion` simply skips the LLM-assisted topic pass.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Maximum allowed column-count variance before a table is demoted to a
    /// fenced text block.
    pub max_table_column_variance: usize,
    /// Whether to request LLM-assisted topic extraction when a completion
    /// service is supplied to [`parse_with_completion`].
    pub enable_llm_assist: bool,
}

/// Rule-based parse: heading/table/whitespace normalization, section tree
/// construction, and language detection. Never fails; malformed structure
/// degrades to warnings on the returned [`ParsedContent`].
#[must_use]
pub fn parse(raw: &RawContent, options: &ParseOptions) -> ParsedContent {
    let mut warnings = Vec::new();

    let body = headings::normalize(&raw.text, &mut warnings);
    let body = tables::normalize(&body, options.max_table_column_variance, &mut warnings);
    let body = whitespace::normalize(&body);

    let sections = sections::build(&body);
    let language = language::detect(&body);

    let structure_confidence = if sections.len() > 1 { 0.8 } else { 0.4 };

    ParsedContent {
        body,
        sections,
        language,
        topics: Vec::new(),
        quality: ParseQuality { structure_confidence, warnings },
        source_filename: raw.filename.clone(),
    }
}

/// Like [`parse`], but additionally asks `completion` to extract topics from
/// the normalized body when `options.enable_llm_assist` is set. LLM failures
/// are folded into a warning; they never abort parsing.
pub async fn parse_with_completion(
    raw: &RawContent,
    options: &ParseOptions,
    completion: &dyn TextCompletionService,
    cancel: &docflux_core::CancelToken,
) -> Result<ParsedContent> {
    let mut parsed = parse(raw, options);
    if !options.enable_llm_assist {
        return Ok(parsed);
    }

    match completion.extract_metadata(&parsed.body, cancel).await {
        Ok(metadata) => parsed.topics = metadata.fields.into_values().collect(),
        Err(e) => parsed
            .quality
            .warnings
            .push(format!("LLM-assisted topic extraction failed: {e}")),
    }

    Ok(parsed)
}
