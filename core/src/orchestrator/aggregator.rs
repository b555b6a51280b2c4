//! Result aggregation and the run summary

use serde::Serialize;
use std::time::Duration;

use crate::counters::CounterSnapshot;
use crate::worker::WorkerStats;

/// Worker totals summed after the join
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedStats {
    /// Total successful items
    pub total_completed: usize,

    /// Total failed items
    pub total_errors: usize,
}

impl AggregatedStats {
    /// Whether these totals agree with the shared counters
    pub fn matches(&self, snapshot: &CounterSnapshot) -> bool {
        self.total_completed as u64 == snapshot.success
            && self.total_errors as u64 == snapshot.errors
    }
}

/// Sum the per-worker results
pub fn aggregate_worker_stats(stats: &[WorkerStats]) -> AggregatedStats {
    stats.iter().fold(AggregatedStats::default(), |acc, s| AggregatedStats {
        total_completed: acc.total_completed + s.completed,
        total_errors: acc.total_errors + s.errors,
    })
}

/// Final report of a completed run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Workload name
    pub workload: String,

    /// Number of workers used
    pub connections: usize,

    /// Number of items requested
    pub requests: usize,

    /// Items executed successfully
    pub success: u64,

    /// Items that failed
    pub errors: u64,

    /// Wall-clock time from the start of dispatch to observed completion
    pub elapsed: Duration,

    /// `requests / elapsed`
    pub requests_per_second: f64,
}

impl RunSummary {
    /// Build a summary from the final counter snapshot
    pub fn new(
        workload: impl Into<String>,
        connections: usize,
        requests: usize,
        snapshot: CounterSnapshot,
        elapsed: Duration,
    ) -> Self {
        let secs = elapsed.as_secs_f64();
        let requests_per_second = if secs > 0.0 {
            requests as f64 / secs
        } else {
            0.0
        };

        Self {
            workload: workload.into(),
            connections,
            requests,
            success: snapshot.success,
            errors: snapshot.errors,
            elapsed,
            requests_per_second,
        }
    }
}
