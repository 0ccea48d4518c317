//! The terminal root of the cancellation tree.

use super::node::Canceller;
use super::state::CancelState;
use std::sync::{Arc, OnceLock};

static TERMINAL: OnceLock<Arc<CancelState>> = OnceLock::new();

impl Canceller {
    /// The terminal root: a canceller that never cancels.
    ///
    /// The root has no deadline and no cancel handle; `err()` stays `None`
    /// and [`cancelled`](Canceller::cancelled) never completes for the entire
    /// process lifetime. Every call observes the same process-wide instance,
    /// so obtaining the root allocates nothing beyond a reference-count bump.
    ///
    /// Use it as the parent for top-level nodes.
    #[must_use]
    pub fn root() -> Canceller {
        let state = TERMINAL.get_or_init(|| Arc::new(CancelState::new(None)));
        Canceller::from_state(Arc::clone(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;
    use tokio_test::{assert_pending, task};

    #[test]
    fn test_root_done_signal_stays_pending() {
        let root = Canceller::root();

        let mut done = task::spawn(root.cancelled());
        assert_pending!(done.poll());
    }

    #[tokio::test(start_paused = true)]
    async fn test_root_never_fires() {
        let root = Canceller::root();

        let waited = timeout(Duration::from_millis(50), root.cancelled()).await;

        assert!(waited.is_err());
        assert!(!root.is_cancelled());
        assert!(root.err().is_none());
    }

    #[test]
    fn test_root_has_no_deadline() {
        assert!(Canceller::root().deadline().is_none());
    }

    #[tokio::test]
    async fn test_root_children_are_independent() {
        let (left, cancel_left) = Canceller::root().with_cancel();
        let (right, _cancel_right) = Canceller::root().with_cancel();

        cancel_left.cancel();

        assert!(left.is_cancelled());
        assert!(!right.is_cancelled());
        assert!(!Canceller::root().is_cancelled());
    }
}
