//! The workload contract
//!
//! A workload is supplied by the embedding code. The harness treats its items
//! as opaque and makes no attempt to serialize calls to [`Workload::execute`].

use async_trait::async_trait;

/// Caller-supplied unit of work driven by the harness
///
/// `produce` is called exactly once per run, before timing starts. `execute`
/// is invoked concurrently from every worker, once per produced item.
///
/// Workloads doing blocking work inside `execute` should hand it to
/// `tokio::task::spawn_blocking` so they do not starve the worker pool.
#[async_trait]
pub trait Workload: Send + Sync + 'static {
    /// One opaque unit of input data
    type Item: Send + 'static;

    /// Workload identifier used in logs and the run summary
    fn name(&self) -> &str {
        "workload"
    }

    /// Produce exactly `n` items
    ///
    /// An error is fatal and aborts the run before anything is dispatched.
    async fn produce(&self, n: usize) -> Result<Vec<Self::Item>, WorkloadError>;

    /// Execute one item
    ///
    /// An error marks only this item as failed; the run continues.
    async fn execute(&self, item: Self::Item) -> Result<(), WorkloadError>;
}

/// Errors reported by a workload
#[derive(Debug, thiserror::Error)]
pub enum WorkloadError {
    /// The operation failed with a message
    #[error("{0}")]
    Failed(String),

    /// `execute` panicked; the payload message if one was available
    #[error("execute panicked: {0}")]
    Panicked(String),

    /// Any other error raised by the workload
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl WorkloadError {
    /// Create a plain failure
    pub fn failed(message: impl Into<String>) -> Self {
        WorkloadError::Failed(message.into())
    }

    /// Wrap an arbitrary error
    pub fn other<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        WorkloadError::Other(Box::new(err))
    }
}
