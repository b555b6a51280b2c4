//! Synthetic workload used by the `run` command

use std::time::Duration;

use async_trait::async_trait;
use benchtool_core::{Workload, WorkloadError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Sleeps for a fixed delay per item and fails a seeded fraction of them
///
/// The outcome for an item depends only on the seed and its sequence number,
/// so repeated runs with the same seed fail the same items.
pub struct SleepWorkload {
    delay: Duration,
    error_rate: f64,
    seed: u64,
}

impl SleepWorkload {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            error_rate: 0.0,
            seed: 0,
        }
    }

    /// Set the failure fraction, clamped to 0.0..=1.0
    pub fn with_error_rate(mut self, rate: f64) -> Self {
        self.error_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn fails(&self, item: u64) -> bool {
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(item));
        rng.gen_bool(self.error_rate)
    }
}

#[async_trait]
impl Workload for SleepWorkload {
    type Item = u64;

    fn name(&self) -> &str {
        "sleep"
    }

    async fn produce(&self, n: usize) -> Result<Vec<u64>, WorkloadError> {
        Ok((0..n as u64).collect())
    }

    async fn execute(&self, item: u64) -> Result<(), WorkloadError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fails(item) {
            return Err(WorkloadError::failed(format!("item {} failed", item)));
        }
        Ok(())
    }
}
