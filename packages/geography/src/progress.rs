//! Progress hooks for dataset builds.
//!
//! The assigner and the file loader report through [`ProgressCallback`];
//! the CLI renders it as terminal bars and library callers pass
//! [`NullProgress`].

/// Receives progress from a loading or assignment stage.
pub trait ProgressCallback: Send + Sync {
    /// Number of items the stage will process.
    fn set_total(&self, total: u64);

    /// `delta` more items are done.
    fn inc(&self, delta: u64);

    /// Describes the current item or step.
    fn set_message(&self, msg: String);

    /// The stage is done; `msg` summarises it.
    fn finish(&self, msg: String);
}

/// Ignores all progress.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}
