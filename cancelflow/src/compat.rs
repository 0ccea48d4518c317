//! Compatibility adapter for context-style cancellation APIs.
//!
//! Some libraries accept a generic "context" capability set: a deadline, a
//! done-signal, a recorded error, and an opaque typed value lookup. The
//! canceller tree deliberately carries no value store, so [`wrap`] adapts a
//! [`Canceller`] to such APIs by forwarding the cancellation surface
//! unchanged and answering every lookup with `None`.
//!
//! This is a boundary module: nothing in the core depends on it.

use crate::canceller::Canceller;
use crate::errors::CancelError;
use async_trait::async_trait;
use std::any::{Any, TypeId};
use std::sync::Arc;
use tokio::time::Instant;

/// The capability set expected by context-consuming libraries.
#[async_trait]
pub trait Context: Send + Sync {
    /// The deadline by which the work must stop, if one exists.
    fn deadline(&self) -> Option<Instant>;

    /// The recorded cancellation reason, or `None` while pending.
    fn err(&self) -> Option<CancelError>;

    /// Waits for cancellation and returns the reason.
    async fn done(&self) -> CancelError;

    /// Looks up a context value by type.
    fn value(&self, key: TypeId) -> Option<Arc<dyn Any + Send + Sync>>;
}

/// Adapter exposing a [`Canceller`] as a [`Context`].
///
/// Deadline, done-signal, and error pass through unchanged; value lookups
/// always report absent.
#[derive(Debug, Clone)]
pub struct ContextWrap {
    inner: Canceller,
}

/// Wraps a canceller for use with context-consuming libraries.
#[must_use]
pub fn wrap(canceller: Canceller) -> ContextWrap {
    ContextWrap { inner: canceller }
}

impl ContextWrap {
    /// The wrapped canceller.
    #[must_use]
    pub fn canceller(&self) -> &Canceller {
        &self.inner
    }
}

#[async_trait]
impl Context for ContextWrap {
    fn deadline(&self) -> Option<Instant> {
        self.inner.deadline()
    }

    fn err(&self) -> Option<CancelError> {
        self.inner.err()
    }

    async fn done(&self) -> CancelError {
        self.inner.cancelled().await
    }

    fn value(&self, _key: TypeId) -> Option<Arc<dyn Any + Send + Sync>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[tokio::test]
    async fn test_value_always_absent() {
        let (canceller, _cancel) = Canceller::root().with_cancel();
        let ctx = wrap(canceller);

        assert!(ctx.value(TypeId::of::<String>()).is_none());
        assert!(ctx.value(TypeId::of::<u64>()).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_forwards_deadline_and_err() {
        let at = tokio::time::Instant::now() + Duration::from_millis(30);
        let (canceller, _cancel) = Canceller::root().with_deadline(at);
        let ctx = wrap(canceller.clone());

        assert_eq!(ctx.deadline(), Some(at));
        assert_eq!(ctx.err(), None);

        let reason = ctx.done().await;

        assert_eq!(reason, CancelError::DeadlineExceeded);
        assert_eq!(ctx.err(), canceller.err());
    }

    #[tokio::test]
    async fn test_usable_as_trait_object() {
        let (canceller, cancel) = Canceller::root().with_cancel();
        let ctx: Box<dyn Context> = Box::new(wrap(canceller));

        cancel.cancel();

        assert_eq!(ctx.done().await, CancelError::CancelRequested);
        assert_eq!(ctx.err(), Some(CancelError::CancelRequested));
    }
}
