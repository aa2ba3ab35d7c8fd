//! Error types shared by every injected capability in this crate.

use thiserror::Error;

/// Errors that can occur while invoking an injected capability
/// ([`TextCompletionService`](crate::TextCompletionService),
/// [`ImageToTextService`](crate::ImageToTextService) or
/// [`EmbeddingService`](crate::EmbeddingService)).
#[derive(Debug, Error)]
pub enum CapabilityError {
    /// The call exceeded its configured timeout.
    #[error("capability call timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The caller's cancellation token was triggered before completion.
    #[error("capability call was cancelled")]
    Cancelled,

    /// The underlying provider returned an error.
    #[error("provider error: {0}")]
    Provider(#[source] anyhow::Error),

    /// The provider's response could not be parsed into the requested shape.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

/// Result type alias for capability calls.
pub type Result<T> = std::result::Result<T, CapabilityError>;
