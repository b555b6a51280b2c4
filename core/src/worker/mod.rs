//! Worker pool members
//!
//! Each Worker is a tokio task running one loop:
//! **take item -> execute -> count -> repeat** until the work queue is closed
//! and drained.
//!
//! Workers never retry or re-enqueue an item. An `execute` failure, or a
//! panic inside it, counts that item as an error and the worker moves on.
//!
//! # Example
//!
//! ```ignore
//! use benchtool_core::worker::WorkerBuilder;
//!
//! let worker = WorkerBuilder::new(0)
//!     .workload(workload)
//!     .queue(receiver)
//!     .counters(counters)
//!     .reporter(reporter)
//!     .build()?;
//!
//! let stats = tokio::spawn(worker.run()).await?;
//! println!("Completed: {}", stats.completed);
//! ```

mod builder;
mod executor;
mod stats;

pub use builder::WorkerBuilder;
pub use executor::Worker;
pub use stats::WorkerStats;
