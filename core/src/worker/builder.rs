//! Builder pattern for Worker construction

use crate::channel::WorkReceiver;
use crate::counters::ResultCounters;
use crate::error::{BenchError, BenchResult};
use crate::report::{ProgressReporter, SilentReporter};
use crate::traits::Workload;

use super::executor::Worker;

use std::sync::Arc;

/// Builder for creating Worker instances
///
/// The reporter defaults to [`SilentReporter`]; everything else is required.
///
/// # Example
/// ```ignore
/// let worker = WorkerBuilder::new(0)
///     .workload(workload)
///     .queue(receiver)
///     .counters(counters)
///     .build()?;
/// ```
pub struct WorkerBuilder<W: Workload> {
    id: usize,
    workload: Option<Arc<W>>,
    queue: Option<WorkReceiver<W::Item>>,
    counters: Option<Arc<ResultCounters>>,
    reporter: Option<Arc<dyn ProgressReporter>>,
}

impl<W: Workload> WorkerBuilder<W> {
    /// Create a new builder with the given worker ID
    pub fn new(id: usize) -> Self {
        Self {
            id,
            workload: None,
            queue: None,
            counters: None,
            reporter: None,
        }
    }

    /// Set the workload
    pub fn workload(mut self, workload: Arc<W>) -> Self {
        self.workload = Some(workload);
        self
    }

    /// Set the work queue receiver
    pub fn queue(mut self, queue: WorkReceiver<W::Item>) -> Self {
        self.queue = Some(queue);
        self
    }

    /// Set the shared result counters
    pub fn counters(mut self, counters: Arc<ResultCounters>) -> Self {
        self.counters = Some(counters);
        self
    }

    /// Set the failure reporter
    pub fn reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Build the Worker
    ///
    /// # Errors
    /// Returns an error if any required field is missing.
    pub fn build(self) -> BenchResult<Worker<W>> {
        let workload = self
            .workload
            .ok_or_else(|| BenchError::missing_config("workload"))?;
        let queue = self
            .queue
            .ok_or_else(|| BenchError::missing_config("queue"))?;
        let counters = self
            .counters
            .ok_or_else(|| BenchError::missing_config("counters"))?;
        let reporter = self
            .reporter
            .unwrap_or_else(|| Arc::new(SilentReporter));

        Ok(Worker::new(self.id, workload, queue, counters, reporter))
    }
}
