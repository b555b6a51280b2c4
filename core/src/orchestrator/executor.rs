//! Harness execution logic

use std::fmt;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::channel::{ChannelConfig, WorkSender};
use crate::config::HarnessConfig;
use crate::counters::ResultCounters;
use crate::error::{BenchError, BenchResult};
use crate::monitor::ProgressMonitor;
use crate::report::ProgressReporter;
use crate::traits::Workload;
use crate::worker::{WorkerBuilder, WorkerStats};

use super::aggregator::{aggregate_worker_stats, RunSummary};

/// Phases of a harness run
///
/// A run moves strictly forward through these; no state is revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessState {
    /// Nothing started yet
    Init,
    /// Workers are parked on the empty queue
    WorkersStarted,
    /// The workload returned its items
    DataProduced,
    /// Items are being pushed into the queue
    Dispatching,
    /// All items enqueued; polling for completion
    Monitoring,
    /// Run completed and reported
    Done,
    /// Setup failed; nothing was dispatched
    Failed,
}

impl fmt::Display for HarnessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HarnessState::Init => "init",
            HarnessState::WorkersStarted => "workers_started",
            HarnessState::DataProduced => "data_produced",
            HarnessState::Dispatching => "dispatching",
            HarnessState::Monitoring => "monitoring",
            HarnessState::Done => "done",
            HarnessState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Harness drives one workload run across a fixed worker pool
///
/// Responsible for startup ordering, dispatch, completion detection and the
/// throughput report. `run` consumes the harness: one instance, one run.
pub struct Harness<W: Workload> {
    /// Run configuration
    pub(crate) config: HarnessConfig,

    /// Workload (shared with every worker)
    pub(crate) workload: Arc<W>,

    /// Console/progress sink
    pub(crate) reporter: Arc<dyn ProgressReporter>,

    /// Success/error counters for this run
    pub(crate) counters: Arc<ResultCounters>,
}

impl<W: Workload> Harness<W> {
    /// Create a new harness
    ///
    /// Use `HarnessBuilder` for validated construction.
    pub fn new(
        config: HarnessConfig,
        workload: Arc<W>,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Self {
        Self {
            config,
            workload,
            reporter,
            counters: Arc::new(ResultCounters::new()),
        }
    }

    /// Get the run configuration
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Handle to this run's counters
    ///
    /// Take it before calling [`run`](Self::run) to observe progress or the
    /// final counts from elsewhere.
    pub fn counters(&self) -> Arc<ResultCounters> {
        Arc::clone(&self.counters)
    }

    /// Run the workload to completion
    ///
    /// Returns an error only when the run could not be set up: the workload
    /// failed to produce its items, produced the wrong number, or the items
    /// could not be dispatched. Per-item failures are counted, not returned.
    pub async fn run(self) -> BenchResult<RunSummary> {
        let connections = self.config.connections;
        let requests = self.config.requests;

        tracing::info!(
            workload = self.workload.name(),
            connections,
            requests,
            queue_capacity = self.config.queue_capacity,
            "Starting run"
        );

        let (tx, rx) = ChannelConfig::default()
            .with_queue_capacity(self.config.queue_capacity)
            .open()?;

        // Workers must be consuming before anything is enqueued, otherwise a
        // run larger than the queue capacity blocks the producer forever.
        let mut handles = Vec::with_capacity(connections);
        for worker_id in 0..connections {
            let worker = WorkerBuilder::new(worker_id)
                .workload(Arc::clone(&self.workload))
                .queue(rx.clone())
                .counters(Arc::clone(&self.counters))
                .reporter(Arc::clone(&self.reporter))
                .build()?;
            handles.push(tokio::spawn(worker.run()));
        }
        drop(rx);
        self.enter(HarnessState::WorkersStarted);

        let items = match self.produce(requests).await {
            Ok(items) => items,
            Err(e) => {
                self.enter(HarnessState::Failed);
                tracing::error!(error = %e, "Data production failed");
                // Closing the queue releases the parked workers.
                drop(tx);
                join_workers(handles).await;
                return Err(e);
            }
        };
        self.enter(HarnessState::DataProduced);

        let start = Instant::now();
        self.enter(HarnessState::Dispatching);
        if let Err(e) = dispatch(tx, items).await {
            self.enter(HarnessState::Failed);
            tracing::error!(error = %e, "Dispatch failed");
            join_workers(handles).await;
            return Err(BenchError::orchestration(format!(
                "failed to enqueue work: {}",
                e
            )));
        }

        self.enter(HarnessState::Monitoring);
        let snapshot = ProgressMonitor::new(
            Arc::clone(&self.counters),
            Arc::clone(&self.reporter),
            requests as u64,
        )
        .with_poll_interval(self.config.poll_interval)
        .run()
        .await;
        let elapsed = start.elapsed();

        let worker_stats = join_workers(handles).await;
        let aggregated = aggregate_worker_stats(&worker_stats);
        if !aggregated.matches(&snapshot) {
            tracing::warn!(
                counted_success = snapshot.success,
                counted_errors = snapshot.errors,
                worker_success = aggregated.total_completed,
                worker_errors = aggregated.total_errors,
                "Worker totals disagree with result counters"
            );
        }

        let summary = RunSummary::new(
            self.workload.name(),
            connections,
            requests,
            snapshot,
            elapsed,
        );
        self.reporter.summary(chrono::Local::now(), &summary);
        self.enter(HarnessState::Done);

        tracing::info!(
            elapsed_secs = elapsed.as_secs_f64(),
            success = summary.success,
            errors = summary.errors,
            rps = summary.requests_per_second,
            "Run completed"
        );

        Ok(summary)
    }

    /// Ask the workload for exactly `n` items
    async fn produce(&self, n: usize) -> BenchResult<Vec<W::Item>> {
        let items = self.workload.produce(n).await?;
        if items.len() != n {
            return Err(BenchError::workload(format!(
                "workload produced {} items, expected {}",
                items.len(),
                n
            )));
        }
        Ok(items)
    }

    fn enter(&self, state: HarnessState) {
        tracing::debug!(workload = self.workload.name(), state = %state, "Harness state");
    }
}

/// Push every item into the queue, closing it on return
async fn dispatch<T>(tx: WorkSender<T>, items: Vec<T>) -> BenchResult<()> {
    for item in items {
        tx.send(item).await?;
    }
    Ok(())
}

/// Wait for every worker to exit
///
/// Only call once the queue is closed.
async fn join_workers(handles: Vec<JoinHandle<WorkerStats>>) -> Vec<WorkerStats> {
    let mut results = Vec::with_capacity(handles.len());
    for (idx, handle) in handles.into_iter().enumerate() {
        match handle.await {
            Ok(stats) => {
                tracing::debug!(
                    worker_id = idx,
                    completed = stats.completed,
                    errors = stats.errors,
                    "Worker joined"
                );
                results.push(stats);
            }
            Err(e) => {
                tracing::error!(worker_id = idx, error = %e, "Worker task failed");
            }
        }
    }
    results
}

impl<W: Workload> fmt::Debug for Harness<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Harness")
            .field("config", &self.config)
            .field("workload", &self.workload.name())
            .finish()
    }
}
