//! Per-worker statistics

/// Outcome counts tracked by each worker
///
/// Local to the worker task; the shared
/// [`ResultCounters`](crate::counters::ResultCounters) are what the monitor
/// reads. The harness sums these after the join to cross-check the counters.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WorkerStats {
    /// Items executed successfully
    pub completed: usize,

    /// Items that failed
    pub errors: usize,
}

impl WorkerStats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful item
    pub fn record_success(&mut self) {
        self.completed += 1;
    }

    /// Record a failed item
    pub fn record_error(&mut self) {
        self.errors += 1;
    }
}
