//! Synchronous progress reporting for batch generation.

/// Observer invoked around each unit of work during batch generation.
///
/// Generation is strictly sequential, so implementations need no internal
/// synchronization beyond being shareable across await points.
pub trait ProgressReporter: Send + Sync {
    /// Called before generation of panel `index` (zero-based) begins.
    fn panel_started(&self, index: usize, total: usize);

    /// Called after panel `index` finishes, successfully or not.
    fn panel_finished(&self, index: usize, total: usize, ok: bool);
}

/// A reporter that ignores all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ProgressReporter for NullProgress {
    fn panel_started(&self, _index: usize, _total: usize) {}

    fn panel_finished(&self, _index: usize, _total: usize, _ok: bool) {}
}
