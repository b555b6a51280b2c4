//! Harness orchestration for one load-generation run
//!
//! The Harness sequences a run so that it cannot deadlock:
//! - spawn the worker pool against the empty work queue
//! - ask the workload for its items
//! - start the clock and push the items (backpressure on a full queue)
//! - close the queue and poll the counters until every item is accounted for
//! - join the workers and report throughput
//!
//! # Example
//!
//! ```ignore
//! use benchtool_core::HarnessBuilder;
//!
//! let summary = HarnessBuilder::new()
//!     .connections(8)
//!     .requests(10_000)
//!     .workload(Arc::new(workload))
//!     .build()?
//!     .run()
//!     .await?;
//!
//! println!("{:.1} req/s", summary.requests_per_second);
//! ```

mod aggregator;
mod builder;
mod executor;

pub use aggregator::{aggregate_worker_stats, AggregatedStats, RunSummary};
pub use builder::HarnessBuilder;
pub use executor::{Harness, HarnessState};

use std::sync::Arc;

use crate::error::BenchResult;
use crate::traits::Workload;

/// Run `workload` once with default settings
///
/// Builds a fresh [`Harness`] for every call; no state is shared between
/// runs. Returns an error only if the configuration is invalid or the run
/// could not be set up.
pub async fn start<W: Workload>(
    connections: usize,
    requests: usize,
    workload: W,
) -> BenchResult<RunSummary> {
    HarnessBuilder::new()
        .connections(connections)
        .requests(requests)
        .workload(Arc::new(workload))
        .build()?
        .run()
        .await
}

#[cfg(test)]
mod tests;
