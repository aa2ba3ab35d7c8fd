//! Error taxonomy for the pipeline.
//!
//! Most conditions in the pipeline are recoverable: they attach a warning to
//! the chunk or document that experienced them and processing continues.
//! Only [`PipelineError::Cancelled`], I/O failure on the primary source, and
//! [`PipelineError::ChunkingInvariantViolation`] escalate and stop the
//! request.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can abort processing of a single document.
///
/// Recoverable conditions (`MalformedSource`, parse warnings, table
/// demotions, LLM unavailability) are intentionally *not* represented here:
/// they are folded into warnings on [`RawContent`](crate::types::RawContent)
/// or [`ParsedContent`](crate::types::ParsedContent) instead of propagating
/// as errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The requested source path or stream does not exist / could not be opened.
    #[error("input not found: {0}")]
    InputNotFound(PathBuf),

    /// No reader matches the input's extension or magic bytes.
    #[error("unsupported format for {0}")]
    UnsupportedFormat(String),

    /// An I/O failure occurred reading the primary source. Propagated unchanged.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A chunking strategy could not produce a legal split within 1.15x
    /// `max_chunk_size`. Fatal to the request for the strategy that raised
    /// it; the runtime retries the same document with `FixedSize` at the
    /// same size/overlap and emits a warning.
    #[error("chunking invariant violated: {0}")]
    ChunkingInvariantViolation(String),

    /// Memory budget exceeded or a work queue is saturated.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    /// The caller's cancellation token fired; no partial results beyond what
    /// was already delivered are emitted.
    #[error("operation cancelled")]
    Cancelled,

    /// An injected capability (LLM, embedding, vision) failed in a way the
    /// caller could not recover from locally.
    #[error("capability error: {0}")]
    Capability(#[from] docflux_core::CapabilityError),

    /// Serialization to the requested output format failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl PipelineError {
    /// Returns `true` for conditions that a CLI-style exit-code mapping
    /// should treat as user-visible rather than operational.
    #[must_use]
    pub fn is_user_visible(&self) -> bool {
        matches!(
            self,
            Self::InputNotFound(_) | Self::UnsupportedFormat(_)
        )
    }
}

/// Result type alias used throughout the pipeline.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_not_found_is_user_visible() {
        let err = PipelineError::InputNotFound(PathBuf::from("missing.txt"));
        assert!(err.is_user_visible());
    }

    #[test]
    fn io_error_is_not_user_visible() {
        let err = PipelineError::Io(std::io::Error::other("boom"));
        assert!(!err.is_user_visible());
    }
}
