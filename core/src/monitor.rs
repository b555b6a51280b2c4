//! Polling progress monitor
//!
//! Runs on the harness task after dispatch and returns once the counters
//! account for every requested item. Completion is detected by polling at a
//! fixed interval, so a run is observed as finished up to one interval late.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};

use crate::config::DEFAULT_POLL_INTERVAL;
use crate::counters::{CounterSnapshot, ResultCounters};
use crate::report::ProgressReporter;

/// Monitor state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    /// Items are still outstanding
    Polling,
    /// Every item has been accounted for
    Done,
}

/// Polls the result counters until `target` items are accounted for
pub struct ProgressMonitor {
    counters: Arc<ResultCounters>,
    reporter: Arc<dyn ProgressReporter>,
    target: u64,
    poll_interval: Duration,
}

impl ProgressMonitor {
    /// Create a monitor for `target` items
    pub fn new(
        counters: Arc<ResultCounters>,
        reporter: Arc<dyn ProgressReporter>,
        target: u64,
    ) -> Self {
        Self {
            counters,
            reporter,
            target,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Set the poll interval
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Read the counters once and report
    ///
    /// Returns the state after this tick together with the snapshot taken.
    pub fn tick(&self) -> (MonitorState, CounterSnapshot) {
        let snapshot = self.counters.snapshot();
        if snapshot.total() < self.target {
            self.reporter.progress(chrono::Local::now(), snapshot);
            (MonitorState::Polling, snapshot)
        } else {
            self.reporter.finished(snapshot);
            (MonitorState::Done, snapshot)
        }
    }

    /// Poll until done and return the final snapshot
    ///
    /// There is no timeout: if items are never accounted for this never
    /// returns.
    pub async fn run(&self) -> CounterSnapshot {
        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of a tokio interval completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let (state, snapshot) = self.tick();
            tracing::trace!(
                success = snapshot.success,
                errors = snapshot.errors,
                target = self.target,
                "Progress poll"
            );
            if state == MonitorState::Done {
                return snapshot;
            }
        }
    }
}

impl std::fmt::Debug for ProgressMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressMonitor")
            .field("target", &self.target)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}
