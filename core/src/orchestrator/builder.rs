//! Builder pattern for Harness construction

use std::sync::Arc;
use std::time::Duration;

use crate::config::HarnessConfig;
use crate::error::{BenchError, BenchResult};
use crate::report::{ConsoleReporter, ProgressReporter};
use crate::traits::Workload;

use super::executor::Harness;

/// Builder for creating a Harness with proper configuration
///
/// The reporter defaults to a [`ConsoleReporter`] on stdout.
///
/// # Example
///
/// ```ignore
/// let harness = HarnessBuilder::new()
///     .connections(8)
///     .requests(1000)
///     .queue_capacity(64)
///     .workload(Arc::new(workload))
///     .build()?;
/// ```
pub struct HarnessBuilder<W: Workload> {
    config: HarnessConfig,
    workload: Option<Arc<W>>,
    reporter: Option<Arc<dyn ProgressReporter>>,
}

impl<W: Workload> HarnessBuilder<W> {
    /// Create a new harness builder with default configuration
    pub fn new() -> Self {
        Self {
            config: HarnessConfig::default(),
            workload: None,
            reporter: None,
        }
    }

    /// Set the full run configuration
    pub fn config(mut self, config: HarnessConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the number of concurrent workers
    pub fn connections(mut self, connections: usize) -> Self {
        self.config.connections = connections;
        self
    }

    /// Set the number of items to produce and execute
    pub fn requests(mut self, requests: usize) -> Self {
        self.config.requests = requests;
        self
    }

    /// Set the work queue capacity
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    /// Set the progress poll interval
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    /// Set the workload
    pub fn workload(mut self, workload: Arc<W>) -> Self {
        self.workload = Some(workload);
        self
    }

    /// Set the progress reporter
    pub fn reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Build the harness
    ///
    /// # Errors
    ///
    /// Returns an error if the workload is not set or if configuration
    /// validation fails.
    pub fn build(self) -> BenchResult<Harness<W>> {
        let workload = self
            .workload
            .ok_or_else(|| BenchError::missing_config("workload"))?;

        self.config.validate()?;

        let reporter = self
            .reporter
            .unwrap_or_else(|| Arc::new(ConsoleReporter::stdout()));

        Ok(Harness::new(self.config, workload, reporter))
    }
}

impl<W: Workload> Default for HarnessBuilder<W> {
    fn default() -> Self {
        Self::new()
    }
}
