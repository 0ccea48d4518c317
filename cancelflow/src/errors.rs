//! Error types for the cancelflow crate.
//!
//! There are exactly two cancellation kinds and no transient or retryable
//! errors: once a kind is recorded for a node it is permanent.

use thiserror::Error;

/// The reason a canceller transitioned to the cancelled state.
///
/// A node cancelled by an ancestor adopts the ancestor's reason verbatim;
/// intermediate nodes never substitute their own reason or wrap it with
/// additional context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum CancelError {
    /// The cancel handle of this node, or of an ancestor, was invoked.
    #[error("task cancelled")]
    CancelRequested,

    /// The effective deadline of this node, or of an ancestor, elapsed.
    #[error("deadline reached")]
    DeadlineExceeded,
}

impl CancelError {
    /// Returns true if the cancellation came from an explicit request.
    #[must_use]
    pub fn is_requested(&self) -> bool {
        matches!(self, CancelError::CancelRequested)
    }

    /// Returns true if the cancellation came from an elapsed deadline.
    #[must_use]
    pub fn is_deadline(&self) -> bool {
        matches!(self, CancelError::DeadlineExceeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(CancelError::CancelRequested.to_string(), "task cancelled");
        assert_eq!(CancelError::DeadlineExceeded.to_string(), "deadline reached");
    }

    #[test]
    fn test_kind_predicates() {
        assert!(CancelError::CancelRequested.is_requested());
        assert!(!CancelError::CancelRequested.is_deadline());
        assert!(CancelError::DeadlineExceeded.is_deadline());
        assert!(!CancelError::DeadlineExceeded.is_requested());
    }
}
