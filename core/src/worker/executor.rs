//! Worker execution loop

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;

use crate::channel::WorkReceiver;
use crate::counters::ResultCounters;
use crate::report::ProgressReporter;
use crate::traits::{Workload, WorkloadError};

use super::stats::WorkerStats;

/// Worker drains the work queue: take -> execute -> count -> repeat
///
/// Workers are tokio tasks spawned by the Harness. They share the
/// workload, the queue receiver and the result counters via `Arc`.
pub struct Worker<W: Workload> {
    /// Unique worker identifier
    id: usize,

    /// Workload (shared across workers via Arc)
    workload: Arc<W>,

    /// Shared receiving half of the work queue
    queue: WorkReceiver<W::Item>,

    /// Shared success/error counters
    counters: Arc<ResultCounters>,

    /// Destination for per-item failure diagnostics
    reporter: Arc<dyn ProgressReporter>,
}

impl<W: Workload> Worker<W> {
    /// Create a new worker
    pub fn new(
        id: usize,
        workload: Arc<W>,
        queue: WorkReceiver<W::Item>,
        counters: Arc<ResultCounters>,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Self {
        Self {
            id,
            workload,
            queue,
            counters,
            reporter,
        }
    }

    /// Run the worker loop
    ///
    /// Returns once the queue is closed and empty. Items still buffered when
    /// the queue closes are executed first.
    pub async fn run(self) -> WorkerStats {
        let mut stats = WorkerStats::new();

        tracing::debug!(worker_id = self.id, "Worker started");

        while let Some(item) = self.queue.recv().await {
            match self.execute_one(item).await {
                Ok(()) => {
                    self.counters.increment_success();
                    stats.record_success();
                }
                Err(e) => {
                    self.counters.increment_error();
                    stats.record_error();
                    tracing::warn!(worker_id = self.id, error = %e, "Item failed");
                    self.reporter.item_failed(chrono::Local::now(), self.id, &e);
                }
            }
        }

        tracing::debug!(
            worker_id = self.id,
            completed = stats.completed,
            errors = stats.errors,
            "Worker finished"
        );

        stats
    }

    /// Execute a single item, turning a panic into a per-item error
    async fn execute_one(&self, item: W::Item) -> Result<(), WorkloadError> {
        match AssertUnwindSafe(self.workload.execute(item))
            .catch_unwind()
            .await
        {
            Ok(result) => result,
            Err(payload) => Err(WorkloadError::Panicked(panic_message(payload.as_ref()))),
        }
    }

    /// Get the worker ID
    pub fn id(&self) -> usize {
        self.id
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

impl<W: Workload> std::fmt::Debug for Worker<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("id", &self.id)
            .field("workload", &self.workload.name())
            .finish()
    }
}
