//! Harness run configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::channel::DEFAULT_QUEUE_CAPACITY;

/// Default interval between progress polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Run parameters for one harness run
///
/// Held immutably for the duration of the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Number of concurrent workers
    pub connections: usize,

    /// Total number of items to produce and execute
    pub requests: usize,

    /// Capacity of the bounded work queue
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Interval between progress monitor polls
    #[serde(default = "default_poll_interval")]
    pub poll_interval: Duration,
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

fn default_poll_interval() -> Duration {
    DEFAULT_POLL_INTERVAL
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            connections: 1,
            requests: 100,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl HarnessConfig {
    /// Create a config with the given worker and item counts
    pub fn new(connections: usize, requests: usize) -> Self {
        Self {
            connections,
            requests,
            ..Default::default()
        }
    }

    /// Set the work queue capacity
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Set the progress poll interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Validate the configuration
    ///
    /// Zero connections is rejected here: with no consumer the producer
    /// would stall forever once the queue fills.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.connections == 0 {
            return Err(ConfigError::InvalidConnections(
                "connections must be at least 1".into(),
            ));
        }

        if self.queue_capacity == 0 {
            return Err(ConfigError::InvalidQueueCapacity(
                "queue capacity must be at least 1".into(),
            ));
        }

        if self.poll_interval.is_zero() {
            return Err(ConfigError::InvalidPollInterval(
                "poll interval must be non-zero".into(),
            ));
        }

        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid connection (worker) count
    #[error("Invalid connections: {0}")]
    InvalidConnections(String),

    /// Invalid work queue capacity
    #[error("Invalid queue capacity: {0}")]
    InvalidQueueCapacity(String),

    /// Invalid poll interval
    #[error("Invalid poll interval: {0}")]
    InvalidPollInterval(String),
}
