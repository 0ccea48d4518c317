//! Canceller nodes: construction, deadline merging, and the watcher task.

use super::state::CancelState;
use crate::errors::CancelError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, Instant};
use tracing::trace;

/// A handle onto one node of the cancellation tree.
///
/// A `Canceller` reports whether the unit of work it represents has been
/// cancelled, why, and the deadline by which it must stop at the latest.
/// Cancellation is cooperative: nothing is interrupted, holders check
/// [`is_cancelled`](Canceller::is_cancelled) or await
/// [`cancelled`](Canceller::cancelled) at their own pace.
///
/// Children are built from a parent with [`with_cancel`](Canceller::with_cancel),
/// [`with_deadline`](Canceller::with_deadline) or
/// [`with_time_limit`](Canceller::with_time_limit); cancelling a node cancels
/// all of its descendants. Handles are cheap to clone and clones observe the
/// same node.
#[derive(Clone)]
pub struct Canceller {
    state: Arc<CancelState>,
}

/// The cancel side of a node, returned by the child constructors.
///
/// Invoking [`cancel`](CancelHandle::cancel) closes the node with
/// [`CancelError::CancelRequested`]. The handle may be cloned and shared;
/// repeat or concurrent invocations are no-ops after the first.
#[derive(Clone)]
pub struct CancelHandle {
    state: Arc<CancelState>,
}

impl Canceller {
    pub(super) fn from_state(state: Arc<CancelState>) -> Self {
        Self { state }
    }

    /// Effective deadline of this node, clamped to all ancestors' deadlines.
    ///
    /// `None` means neither this node nor any ancestor carries a deadline;
    /// the node then only cancels on an explicit request.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.state.deadline()
    }

    /// The recorded cancellation reason, or `None` while the node is pending.
    #[must_use]
    pub fn err(&self) -> Option<CancelError> {
        self.state.err()
    }

    /// Returns true once the node has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.state.is_cancelled()
    }

    /// Waits for the node to be cancelled and returns the reason.
    ///
    /// Completes immediately if the node is already cancelled; all current
    /// and future waiters observe the same reason. For the terminal root the
    /// returned future never completes.
    pub async fn cancelled(&self) -> CancelError {
        self.state.fired().await
    }

    /// Creates a child that cancels when the returned handle is invoked or
    /// when `self` cancels, whichever comes first.
    ///
    /// The child inherits `self`'s effective deadline unchanged and starts no
    /// timer of its own. The node's watcher task runs until the node is
    /// cancelled; invoke the handle once the work completes to release it.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime: the child's watcher task is
    /// spawned immediately.
    #[must_use]
    pub fn with_cancel(&self) -> (Canceller, CancelHandle) {
        self.new_child(self.deadline(), None)
    }

    /// Creates a child that cancels at `at`, when the returned handle is
    /// invoked, or when `self` cancels, whichever comes first.
    ///
    /// The child's effective deadline is `at` clamped to `self`'s effective
    /// deadline. When the clamped deadline equals the parent's own, the child
    /// starts no timer: the parent is guaranteed to fire no later, and the
    /// child adopts its error when it does.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime: the child's watcher task is
    /// spawned immediately.
    #[must_use]
    pub fn with_deadline(&self, at: Instant) -> (Canceller, CancelHandle) {
        let effective = match self.deadline() {
            Some(parent) => at.min(parent),
            None => at,
        };
        let timer = (self.deadline() != Some(effective)).then_some(effective);
        self.new_child(Some(effective), timer)
    }

    /// Creates a child that cancels after `limit` from now, when the returned
    /// handle is invoked, or when `self` cancels, whichever comes first.
    ///
    /// Equivalent to [`with_deadline`](Canceller::with_deadline) at
    /// `Instant::now() + limit`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime: the child's watcher task is
    /// spawned immediately.
    #[must_use]
    pub fn with_time_limit(&self, limit: Duration) -> (Canceller, CancelHandle) {
        self.with_deadline(Instant::now() + limit)
    }

    fn new_child(&self, deadline: Option<Instant>, timer: Option<Instant>) -> (Canceller, CancelHandle) {
        let state = Arc::new(CancelState::new(deadline));
        let child = Canceller {
            state: Arc::clone(&state),
        };
        let handle = CancelHandle {
            state: Arc::clone(&state),
        };
        tokio::spawn(watch(state, self.clone(), timer));
        (child, handle)
    }
}

impl fmt::Debug for Canceller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canceller")
            .field("cancelled", &self.is_cancelled())
            .field("err", &self.err())
            .field("deadline", &self.deadline())
            .finish()
    }
}

impl CancelHandle {
    /// Requests cancellation of the node.
    ///
    /// Across any number of calls, and any race with the node's deadline or
    /// an ancestor's cancellation, exactly one reason is recorded and the
    /// done-signal fires once.
    pub fn cancel(&self) {
        if self.state.close(CancelError::CancelRequested) {
            trace!("canceller closed by explicit request");
        }
    }
}

impl fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelHandle")
            .field("cancelled", &self.state.is_cancelled())
            .finish()
    }
}

/// Watcher task for a single node.
///
/// Suspends once in a multi-way wait over the node's own done-signal, its
/// owned timer (when `timer` is set), and the parent's done-signal, then
/// performs the close transition for the winning event and exits. The select
/// is biased so a tie resolves deterministically: own signal, then own
/// deadline, then parent cancellation.
async fn watch(state: Arc<CancelState>, parent: Canceller, timer: Option<Instant>) {
    if let Some(at) = timer {
        tokio::select! {
            biased;
            _ = state.fired() => {}
            () = time::sleep_until(at) => {
                if state.close(CancelError::DeadlineExceeded) {
                    trace!("canceller closed by elapsed deadline");
                }
            }
            reason = parent.cancelled() => {
                if state.close(reason) {
                    trace!(?reason, "canceller closed by parent cancellation");
                }
            }
        }
    } else {
        tokio::select! {
            biased;
            _ = state.fired() => {}
            reason = parent.cancelled() => {
                if state.close(reason) {
                    trace!(?reason, "canceller closed by parent cancellation");
                }
            }
        }
    }
}
