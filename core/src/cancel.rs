//! Cooperative cancellation shared across the pipeline.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A cheaply cloneable cooperative cancellation signal.
///
/// The pipeline checks [`CancelToken::is_cancelled`] at every chunk boundary,
/// every suspension point in the streaming and parallel runtimes, and before
/// issuing any call through an injected capability. Triggering the token does
/// not interrupt in-flight work directly; it is observed at the next checked
/// point, so cancellation latency is bounded by the distance between
/// checkpoints (one chunk, one section, one I/O call).
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token that has not been triggered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if [`cancel`](Self::cancel) has been called on this
    /// token or any of its clones.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Triggers cancellation. Visible to every clone of this token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns an error if this token has been cancelled, otherwise `Ok(())`.
    ///
    /// Intended to be called at suspension points with `?`.
    pub fn check(&self) -> Result<(), crate::error::CapabilityError> {
        if self.is_cancelled() {
            Err(crate::error::CapabilityError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uncancelled() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        assert!(token.check().is_ok());
    }

    #[test]
    fn clone_observes_cancellation() {
        let token = CancelToken::new();
        let clone = token.clone();
        token.cancel();
        assert!(clone.is_cancelled());
        assert!(clone.check().is_err());
    }
}
