//! Image-to-text (vision) service abstraction.
//!
//! Readers that encounter embedded images (scanned PDF pages, DOCX inline
//! pictures) hand them to this service rather than decoding them locally.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::cancel::CancelToken;
use crate::error::Result;

/// Requested extraction quality. Providers may trade latency for accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractionQuality {
    /// Fast, lower-fidelity extraction.
    Low,
    /// Balanced default.
    Medium,
    /// Slow, highest-fidelity extraction.
    High,
}

/// Options controlling a single [`ImageToTextService::extract`] call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageToTextOptions {
    /// BCP-47-ish language hint, or `"auto"` to let the provider detect it.
    pub language: String,
    /// Hint about the kind of image (e.g. `"scanned_page"`, `"chart"`, `"photo"`).
    pub image_type_hint: Option<String>,
    /// Requested extraction quality.
    pub quality: ExtractionQuality,
    /// Whether to additionally report structural elements (tables, lists).
    pub extract_structure: bool,
    /// Whether to additionally report image metadata (dimensions, DPI).
    pub extract_metadata: bool,
    /// A custom prompt overriding the provider's default instruction.
    pub custom_prompt: Option<String>,
    /// Opaque provider-specific parameters.
    pub provider_specific: BTreeMap<String, String>,
}

impl Default for ImageToTextOptions {
    fn default() -> Self {
        Self {
            language: "auto".to_string(),
            image_type_hint: None,
            quality: ExtractionQuality::Medium,
            extract_structure: false,
            extract_metadata: false,
            custom_prompt: None,
            provider_specific: BTreeMap::new(),
        }
    }
}

/// Result of an [`ImageToTextService::extract`] call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageToTextResult {
    /// Extracted text.
    pub text: String,
    /// Provider confidence in the extraction, `[0, 1]`.
    pub confidence: f32,
    /// Detected language of the extracted text.
    pub language: Option<String>,
    /// Provider-reported image classification (e.g. `"chart"`, `"scanned_page"`).
    pub image_type: Option<String>,
    /// Structural elements detected, when requested.
    pub structural_elements: Vec<String>,
    /// Image metadata, when requested.
    pub metadata: BTreeMap<String, String>,
    /// Wall-clock processing time in milliseconds.
    pub processing_ms: u64,
    /// Non-fatal provider error message (extraction still returns best-effort text).
    pub error: Option<String>,
}

/// A source image, either already in memory or identified by path.
#[derive(Debug, Clone)]
pub enum ImageSource<'a> {
    /// Raw image bytes and a MIME type (e.g. `"image/png"`).
    Bytes(&'a [u8], &'a str),
    /// Path to an image file on disk.
    Path(&'a std::path::Path),
}

/// Extracts text and structure from images.
#[async_trait]
pub trait ImageToTextService: Send + Sync {
    /// Extracts text from `source` according to `options`.
    async fn extract(
        &self,
        source: ImageSource<'_>,
        options: &ImageToTextOptions,
        cancel: &CancelToken,
    ) -> Result<ImageToTextResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_are_auto_medium() {
        let opts = ImageToTextOptions::default();
        assert_eq!(opts.language, "auto");
        assert_eq!(opts.quality, ExtractionQuality::Medium);
        assert!(!opts.extract_structure);
    }
}
