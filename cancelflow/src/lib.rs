//! # Cancelflow
//!
//! Hierarchical cooperative cancellation for async tasks.
//!
//! Cancelflow provides a tree of cancellable handles ("cancellers") with
//! support for:
//!
//! - **Downward propagation**: cancelling a node cancels every descendant
//! - **Deadlines**: a node may carry a deadline after which it auto-cancels
//! - **Deadline clamping**: a child's effective deadline never exceeds its
//!   ancestors' deadlines
//! - **Advisory semantics**: running work is never interrupted; holders poll
//!   the done-signal at their own pace
//! - **Context interop**: a boundary adapter for context-style cancellation
//!   APIs
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cancelflow::prelude::*;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     // A node that cancels after 50ms, or earlier through the handle.
//!     let (canceller, cancel) = Canceller::root().with_time_limit(Duration::from_millis(50));
//!
//!     tokio::select! {
//!         reason = canceller.cancelled() => println!("stopped: {reason}"),
//!         () = do_work() => println!("finished"),
//!     }
//!
//!     // Safe to invoke any number of times.
//!     cancel.cancel();
//! }
//! # async fn do_work() {}
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod canceller;
pub mod compat;
pub mod errors;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::canceller::{CancelHandle, Canceller};
    pub use crate::compat::{wrap, Context, ContextWrap};
    pub use crate::errors::CancelError;
}
