//! Tests for the Harness module

use super::aggregator::{aggregate_worker_stats, AggregatedStats, RunSummary};
use super::builder::HarnessBuilder;
use super::executor::HarnessState;
use super::start;
use crate::counters::CounterSnapshot;
use crate::error::BenchErrorKind;
use crate::report::{ProgressReporter, SilentReporter};
use crate::traits::{Workload, WorkloadError};
use crate::worker::WorkerStats;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Mock Workload
// ============================================================================

/// Items are sequence numbers; execution is recorded so tests can check
/// exactly-once delivery.
struct MockWorkload {
    delay: Option<Duration>,
    fail_every: Option<u64>,
    fail_produce: bool,
    short_by: usize,
    executed: Mutex<Vec<u64>>,
    produce_calls: AtomicUsize,
}

impl MockWorkload {
    fn new() -> Self {
        Self {
            delay: None,
            fail_every: None,
            fail_produce: false,
            short_by: 0,
            executed: Mutex::new(Vec::new()),
            produce_calls: AtomicUsize::new(0),
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn with_fail_every(mut self, n: u64) -> Self {
        self.fail_every = Some(n);
        self
    }

    fn with_failing_produce(mut self) -> Self {
        self.fail_produce = true;
        self
    }

    fn with_short_produce(mut self, missing: usize) -> Self {
        self.short_by = missing;
        self
    }

    fn executed_sorted(&self) -> Vec<u64> {
        let mut executed = self.executed.lock().unwrap().clone();
        executed.sort_unstable();
        executed
    }
}

#[async_trait]
impl Workload for MockWorkload {
    type Item = u64;

    fn name(&self) -> &str {
        "mock"
    }

    async fn produce(&self, n: usize) -> Result<Vec<u64>, WorkloadError> {
        self.produce_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_produce {
            return Err(WorkloadError::failed("fixture file missing"));
        }
        Ok((0..n.saturating_sub(self.short_by) as u64).collect())
    }

    async fn execute(&self, item: u64) -> Result<(), WorkloadError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.executed.lock().unwrap().push(item);

        if let Some(n) = self.fail_every {
            if item % n == 0 {
                return Err(WorkloadError::failed(format!("item {} failed", item)));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Recording reporter
// ============================================================================

#[derive(Default)]
struct RecordingReporter {
    progress: AtomicUsize,
    failures: AtomicUsize,
    finished: Mutex<Option<CounterSnapshot>>,
    summary: Mutex<Option<RunSummary>>,
}

impl ProgressReporter for RecordingReporter {
    fn progress(&self, _at: DateTime<Local>, _snapshot: CounterSnapshot) {
        self.progress.fetch_add(1, Ordering::SeqCst);
    }

    fn item_failed(&self, _at: DateTime<Local>, _worker_id: usize, _error: &WorkloadError) {
        self.failures.fetch_add(1, Ordering::SeqCst);
    }

    fn finished(&self, snapshot: CounterSnapshot) {
        *self.finished.lock().unwrap() = Some(snapshot);
    }

    fn summary(&self, _at: DateTime<Local>, summary: &RunSummary) {
        *self.summary.lock().unwrap() = Some(summary.clone());
    }
}

fn silent() -> Arc<dyn ProgressReporter> {
    Arc::new(SilentReporter)
}

async fn run_mock(
    workload: &Arc<MockWorkload>,
    connections: usize,
    requests: usize,
) -> RunSummary {
    HarnessBuilder::new()
        .connections(connections)
        .requests(requests)
        .poll_interval(Duration::from_millis(5))
        .workload(Arc::clone(workload))
        .reporter(silent())
        .build()
        .unwrap()
        .run()
        .await
        .unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
fn test_aggregate_worker_stats() {
    let workers = [
        WorkerStats { completed: 50, errors: 5 },
        WorkerStats { completed: 40, errors: 5 },
    ];
    let aggregated = aggregate_worker_stats(&workers);

    assert_eq!(aggregated.total_completed, 90);
    assert_eq!(aggregated.total_errors, 10);
    assert!(aggregated.matches(&CounterSnapshot { success: 90, errors: 10 }));
    assert!(!aggregated.matches(&CounterSnapshot { success: 91, errors: 9 }));
}

#[test]
fn test_aggregate_worker_stats_empty() {
    let stats = aggregate_worker_stats(&[]);
    assert_eq!(stats, AggregatedStats::default());
    assert!(stats.matches(&CounterSnapshot::default()));
}

#[test]
fn test_run_summary_throughput() {
    let summary = RunSummary::new(
        "mock",
        4,
        500,
        CounterSnapshot { success: 400, errors: 100 },
        Duration::from_millis(2500),
    );

    assert_eq!(summary.success + summary.errors, 500);
    assert!((summary.requests_per_second - 200.0).abs() < 1e-9);
}

#[test]
fn test_run_summary_zero_elapsed() {
    let summary = RunSummary::new("mock", 1, 1, CounterSnapshot::default(), Duration::ZERO);
    assert_eq!(summary.requests_per_second, 0.0);
}

#[test]
fn test_run_summary_serializes() {
    let summary = RunSummary::new(
        "mock",
        2,
        10,
        CounterSnapshot { success: 10, errors: 0 },
        Duration::from_secs(1),
    );
    let json = serde_json::to_value(&summary).unwrap();

    assert_eq!(json["workload"], "mock");
    assert_eq!(json["success"], 10);
    assert_eq!(json["requests_per_second"], 10.0);
}

#[test]
fn test_harness_state_display() {
    assert_eq!(HarnessState::WorkersStarted.to_string(), "workers_started");
    assert_eq!(HarnessState::Failed.to_string(), "failed");
}

#[test]
fn test_builder_missing_workload() {
    let result = HarnessBuilder::<MockWorkload>::new()
        .connections(1)
        .requests(10)
        .build();

    let err = result.unwrap_err();
    assert_eq!(err.kind, BenchErrorKind::Config);
    assert!(err.message.contains("workload"));
}

#[test]
fn test_builder_rejects_zero_connections() {
    let result = HarnessBuilder::new()
        .connections(0)
        .requests(10)
        .workload(Arc::new(MockWorkload::new()))
        .reporter(silent())
        .build();

    let err = result.unwrap_err();
    assert_eq!(err.kind, BenchErrorKind::Config);
    assert!(err.message.contains("connections"));
}

#[test]
fn test_builder_rejects_zero_queue_capacity() {
    let result = HarnessBuilder::new()
        .connections(2)
        .requests(10)
        .queue_capacity(0)
        .workload(Arc::new(MockWorkload::new()))
        .reporter(silent())
        .build();

    assert!(result.is_err());
}

#[test]
fn test_builder_success() {
    let harness = HarnessBuilder::new()
        .connections(3)
        .requests(30)
        .queue_capacity(8)
        .workload(Arc::new(MockWorkload::new()))
        .reporter(silent())
        .build()
        .unwrap();

    assert_eq!(harness.config().connections, 3);
    assert_eq!(harness.config().queue_capacity, 8);
    assert_eq!(harness.counters().snapshot(), CounterSnapshot::default());
}

// ============================================================================
// Run Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_every_item_executed_exactly_once() {
    let workload = Arc::new(MockWorkload::new());
    let summary = run_mock(&workload, 16, 2000).await;

    assert_eq!(summary.success, 2000);
    assert_eq!(summary.errors, 0);
    assert_eq!(summary.success + summary.errors, 2000);
    assert_eq!(workload.executed_sorted(), (0..2000).collect::<Vec<_>>());
    assert_eq!(workload.produce_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_backpressure_small_queue_completes() {
    let workload = Arc::new(MockWorkload::new());

    let run = HarnessBuilder::new()
        .connections(8)
        .requests(1000)
        .queue_capacity(4)
        .poll_interval(Duration::from_millis(5))
        .workload(Arc::clone(&workload))
        .reporter(silent())
        .build()
        .unwrap()
        .run();

    let summary = tokio::time::timeout(Duration::from_secs(30), run)
        .await
        .expect("run must not deadlock")
        .unwrap();

    assert_eq!(summary.success, 1000);
    assert_eq!(summary.errors, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_failures_are_isolated_per_item() {
    let workload = Arc::new(MockWorkload::new().with_fail_every(3));
    let reporter = Arc::new(RecordingReporter::default());

    let summary = HarnessBuilder::new()
        .connections(8)
        .requests(999)
        .poll_interval(Duration::from_millis(5))
        .workload(Arc::clone(&workload))
        .reporter(reporter.clone())
        .build()
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(summary.errors, 333);
    assert_eq!(summary.success, 666);
    assert_eq!(summary.success + summary.errors, 999);
    assert_eq!(reporter.failures.load(Ordering::SeqCst), 333);
    assert_eq!(
        *reporter.finished.lock().unwrap(),
        Some(CounterSnapshot { success: 666, errors: 333 })
    );
    assert_eq!(reporter.summary.lock().unwrap().as_ref(), Some(&summary));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_all_failing_workload_still_completes() {
    let workload = Arc::new(MockWorkload::new().with_fail_every(1));
    let summary = run_mock(&workload, 4, 200).await;

    assert_eq!(summary.errors, 200);
    assert_eq!(summary.success, 0);
    assert_eq!(workload.executed_sorted().len(), 200);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_produce_failure_short_circuits() {
    let workload = Arc::new(MockWorkload::new().with_failing_produce());
    let harness = HarnessBuilder::new()
        .connections(4)
        .requests(100)
        .workload(Arc::clone(&workload))
        .reporter(silent())
        .build()
        .unwrap();
    let counters = harness.counters();

    let result = tokio::time::timeout(Duration::from_secs(10), harness.run())
        .await
        .expect("parked workers must be released on failure");

    let err = result.unwrap_err();
    assert_eq!(err.kind, BenchErrorKind::Workload);
    assert!(err.message.contains("fixture file missing"));
    assert_eq!(counters.snapshot(), CounterSnapshot::default());
    assert!(workload.executed_sorted().is_empty());
}

#[tokio::test]
async fn test_short_produce_is_rejected() {
    let workload = Arc::new(MockWorkload::new().with_short_produce(3));
    let result = HarnessBuilder::new()
        .connections(2)
        .requests(10)
        .workload(Arc::clone(&workload))
        .reporter(silent())
        .build()
        .unwrap()
        .run()
        .await;

    let err = result.unwrap_err();
    assert_eq!(err.kind, BenchErrorKind::Workload);
    assert!(err.message.contains("produced 7 items, expected 10"));
    assert!(workload.executed_sorted().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_totals_independent_of_worker_count() {
    let single = Arc::new(MockWorkload::new().with_fail_every(4));
    let many = Arc::new(MockWorkload::new().with_fail_every(4));

    let a = run_mock(&single, 1, 800).await;
    let b = run_mock(&many, 50, 800).await;

    assert_eq!(a.success, b.success);
    assert_eq!(a.errors, b.errors);
    assert_eq!(a.errors, 200);
}

#[tokio::test(start_paused = true)]
async fn test_throughput_matches_per_item_delay() {
    let delay = Duration::from_millis(100);
    let requests = 20;
    let workload = Arc::new(MockWorkload::new().with_delay(delay));
    let reporter = Arc::new(RecordingReporter::default());

    let summary = HarnessBuilder::new()
        .connections(1)
        .requests(requests)
        .poll_interval(Duration::from_millis(50))
        .workload(workload)
        .reporter(reporter.clone())
        .build()
        .unwrap()
        .run()
        .await
        .unwrap();

    // 20 items * 100ms, observed at the next 50ms poll at the latest.
    assert!(summary.elapsed >= Duration::from_secs(2));
    assert!(summary.elapsed <= Duration::from_millis(2100));
    assert!(summary.requests_per_second > 9.0);
    assert!(summary.requests_per_second <= 10.0);
    assert!(reporter.progress.load(Ordering::SeqCst) > 0);
}

#[tokio::test(start_paused = true)]
async fn test_parallel_workers_divide_elapsed_time() {
    let workload = Arc::new(MockWorkload::new().with_delay(Duration::from_millis(100)));

    let summary = HarnessBuilder::new()
        .connections(10)
        .requests(100)
        .poll_interval(Duration::from_millis(50))
        .workload(workload)
        .reporter(silent())
        .build()
        .unwrap()
        .run()
        .await
        .unwrap();

    // Ten workers each sleep through ten items.
    assert!(summary.elapsed >= Duration::from_secs(1));
    assert!(summary.elapsed <= Duration::from_millis(1100));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_start_runs_with_explicit_instances() {
    struct Quiet;

    #[async_trait]
    impl Workload for Quiet {
        type Item = usize;

        async fn produce(&self, n: usize) -> Result<Vec<usize>, WorkloadError> {
            Ok((0..n).collect())
        }

        async fn execute(&self, item: usize) -> Result<(), WorkloadError> {
            if item == 3 {
                Err(WorkloadError::failed("three"))
            } else {
                Ok(())
            }
        }
    }

    // Two independent runs share nothing.
    let (a, b) = tokio::join!(start(2, 5, Quiet), start(3, 5, Quiet));
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!((a.success, a.errors), (4, 1));
    assert_eq!((b.success, b.errors), (4, 1));
    assert_eq!(a.workload, "workload");
    assert_eq!(b.connections, 3);
}

#[tokio::test(start_paused = true)]
async fn test_empty_run_completes_with_zero_counts() {
    let workload = Arc::new(MockWorkload::new());
    let reporter = Arc::new(RecordingReporter::default());

    let summary = HarnessBuilder::new()
        .connections(2)
        .requests(0)
        .poll_interval(Duration::from_millis(50))
        .workload(Arc::clone(&workload))
        .reporter(reporter.clone())
        .build()
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!((summary.success, summary.errors), (0, 0));
    assert_eq!(summary.requests_per_second, 0.0);
    assert!(summary.elapsed >= Duration::from_millis(50));
    assert!(summary.elapsed < Duration::from_millis(100));
    assert_eq!(workload.produce_calls.load(Ordering::SeqCst), 1);
    assert!(workload.executed_sorted().is_empty());
    assert_eq!(reporter.progress.load(Ordering::SeqCst), 0);
    assert_eq!(*reporter.finished.lock().unwrap(), Some(CounterSnapshot::default()));
}

#[tokio::test(start_paused = true)]
async fn test_start_accepts_zero_requests() {
    let summary = start(1, 0, MockWorkload::new()).await.unwrap();

    assert_eq!(summary.requests, 0);
    assert_eq!(summary.success + summary.errors, 0);
}
