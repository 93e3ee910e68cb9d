//! Progress reporting for multi-step operations

use crate::merge::MergeState;

/// Receives progress from long-running operations.
///
/// The library never prints; the CLI implements this to render output and
/// tests implement it to record what happened.
pub trait ProgressCallback {
    /// The operation reached a new state
    fn on_state(&self, state: MergeState);

    /// Informational message
    fn on_message(&self, message: &str);

    /// Something failed but the operation continues
    fn on_warning(&self, message: &str);
}

/// Discards all progress
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_state(&self, _state: MergeState) {}

    fn on_message(&self, _message: &str) {}

    fn on_warning(&self, _message: &str) {}
}
