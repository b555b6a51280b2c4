//! benchtool-core: concurrency engine for load generation
//!
//! Drives a caller-supplied [`Workload`] across a fixed pool of workers and
//! reports throughput. The moving parts:
//!
//! - A bounded work queue with backpressure ([`channel`])
//! - The worker pool ([`worker`])
//! - Lock-free success/error counters ([`counters`])
//! - A polling progress monitor ([`monitor`])
//! - The harness that sequences a run ([`orchestrator`])
//!
//! # Example
//!
//! ```ignore
//! use benchtool_core::{start, Workload, WorkloadError};
//!
//! struct Ping;
//!
//! #[async_trait::async_trait]
//! impl Workload for Ping {
//!     type Item = u32;
//!
//!     async fn produce(&self, n: usize) -> Result<Vec<u32>, WorkloadError> {
//!         Ok((0..n as u32).collect())
//!     }
//!
//!     async fn execute(&self, _item: u32) -> Result<(), WorkloadError> {
//!         Ok(())
//!     }
//! }
//!
//! let summary = start(8, 10_000, Ping).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod channel;
pub mod config;
pub mod counters;
pub mod error;
pub mod monitor;
pub mod orchestrator;
pub mod report;
pub mod traits;
pub mod worker;

pub use channel::{work_queue, ChannelConfig, WorkReceiver, WorkSender, DEFAULT_QUEUE_CAPACITY};
pub use config::{ConfigError, HarnessConfig, DEFAULT_POLL_INTERVAL};
pub use counters::{CounterSnapshot, ResultCounters};
pub use error::*;
pub use monitor::{MonitorState, ProgressMonitor};
pub use orchestrator::{
    aggregate_worker_stats, start, AggregatedStats, Harness, HarnessBuilder, HarnessState,
    RunSummary,
};
pub use report::{ConsoleReporter, ProgressReporter, SilentReporter};
pub use traits::*;
pub use worker::{Worker, WorkerBuilder, WorkerStats};
