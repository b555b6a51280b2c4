//! Error types for benchtool-core

use std::fmt;

use thiserror::Error;

/// Classification of a [`BenchError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchErrorKind {
    /// Invalid or incomplete harness configuration
    Config,
    /// The workload failed to produce its input items
    Workload,
    /// Work could not be handed to the worker pool
    Orchestration,
    /// The queue or a worker went away while the run was in progress
    Shutdown,
}

impl fmt::Display for BenchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BenchErrorKind::Config => "configuration error",
            BenchErrorKind::Workload => "workload error",
            BenchErrorKind::Orchestration => "orchestration error",
            BenchErrorKind::Shutdown => "shutdown",
        };
        f.write_str(s)
    }
}

/// Fatal error returned by a harness run
///
/// Per-item execution failures never surface here; they are counted and
/// reported while the run continues.
#[derive(Error, Debug)]
#[error("{kind}: {message}")]
pub struct BenchError {
    /// Error classification
    pub kind: BenchErrorKind,

    /// Human readable detail
    pub message: String,
}

impl BenchError {
    /// Create an error of the given kind
    pub fn new(kind: BenchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Invalid configuration
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(BenchErrorKind::Config, message)
    }

    /// A required builder field was never set
    pub fn missing_config(field: &str) -> Self {
        Self::config(format!("missing required field: {}", field))
    }

    /// Data production failed
    pub fn workload(message: impl Into<String>) -> Self {
        Self::new(BenchErrorKind::Workload, message)
    }

    /// Dispatch or worker coordination failed
    pub fn orchestration(message: impl Into<String>) -> Self {
        Self::new(BenchErrorKind::Orchestration, message)
    }

    /// The work queue was closed underneath the caller
    pub fn shutdown() -> Self {
        Self::new(BenchErrorKind::Shutdown, "work queue closed")
    }
}

impl From<crate::config::ConfigError> for BenchError {
    fn from(err: crate::config::ConfigError) -> Self {
        Self::config(err.to_string())
    }
}

impl From<crate::traits::WorkloadError> for BenchError {
    fn from(err: crate::traits::WorkloadError) -> Self {
        Self::workload(err.to_string())
    }
}

/// Result type alias
pub type BenchResult<T> = std::result::Result<T, BenchError>;
