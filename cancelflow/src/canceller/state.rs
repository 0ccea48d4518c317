//! Shared per-node cancellation state.
//!
//! `CancelState` is the only mutable state a node carries: the recorded
//! cancellation reason and the one-shot done-signal. Every mutation goes
//! through [`CancelState::close`], which guarantees that exactly one caller
//! performs the transition no matter how many race for it.

use crate::errors::CancelError;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;
use tokio::time::Instant;

/// State shared between a node's handles and its watcher task.
pub(crate) struct CancelState {
    /// Effective deadline for this node, already clamped to all ancestors.
    deadline: Option<Instant>,
    /// Fast-path flag, published after the reason is recorded.
    cancelled: AtomicBool,
    /// The recorded cancellation reason (first close wins).
    reason: RwLock<Option<CancelError>>,
    /// Broadcast wakeup for tasks waiting on the done-signal.
    done: Notify,
}

impl CancelState {
    pub(crate) fn new(deadline: Option<Instant>) -> Self {
        Self {
            deadline,
            cancelled: AtomicBool::new(false),
            reason: RwLock::new(None),
            done: Notify::new(),
        }
    }

    /// Effective deadline, if this node has one.
    pub(crate) fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the close transition has completed.
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// The recorded reason, or `None` while still pending.
    pub(crate) fn err(&self) -> Option<CancelError> {
        *self.reason.read()
    }

    /// Performs the exactly-once close transition.
    ///
    /// Only the first caller's `reason` is recorded and the done-signal fires
    /// once; every later call, from any source, is a no-op. Returns whether
    /// this call won the transition.
    pub(crate) fn close(&self, reason: CancelError) -> bool {
        {
            let mut slot = self.reason.write();
            if slot.is_some() {
                return false;
            }
            *slot = Some(reason);
        }
        self.cancelled.store(true, Ordering::Release);
        self.done.notify_waiters();
        true
    }

    /// Waits until the done-signal has fired and returns the recorded reason.
    ///
    /// Completes immediately when the transition already happened, so waiters
    /// that subscribe late still observe it. Never completes for a state that
    /// is never closed.
    pub(crate) async fn fired(&self) -> CancelError {
        loop {
            let notified = self.done.notified();
            tokio::pin!(notified);
            // Register before checking the slot so a close that lands between
            // the check and the await cannot be missed.
            notified.as_mut().enable();
            if let Some(reason) = self.err() {
                return reason;
            }
            notified.await;
        }
    }
}
