//! Progress reporting for the spreadsheet download.
//!
//! The loader only knows about the [`ProgressCallback`] trait. Binaries
//! decide how progress is rendered (an `indicatif` bar in the CLI, nothing
//! in the server and in tests).

use std::sync::Arc;

/// Receives progress updates from a long-running load.
///
/// Units are bytes for downloads. Implementations are shared behind an
/// [`Arc`] and must be `Send + Sync`.
pub trait ProgressCallback: Send + Sync {
    /// Sets the expected total, when the server reports a content length.
    fn set_total(&self, total: u64);

    /// Advances by `delta` units.
    fn inc(&self, delta: u64);

    /// Replaces the status message.
    fn set_message(&self, msg: String);

    /// Marks the work as done, leaving `msg` visible.
    fn finish(&self, msg: String);

    /// Marks the work as done and removes the indicator.
    fn finish_and_clear(&self);
}

/// Discards every update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
    fn finish_and_clear(&self) {}
}

/// Returns a shared [`NullProgress`].
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
