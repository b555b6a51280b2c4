//! Lock-free success/error counters shared by the worker pool
//!
//! Workers only ever `fetch_add`; the progress monitor takes relaxed
//! snapshots. A snapshot may lag the true value, which is fine for progress
//! output. The terminal read happens once the total has been observed at the
//! target, and counts never decrease.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Result aggregator for one run
#[derive(Debug, Default)]
pub struct ResultCounters {
    success: AtomicU64,
    errors: AtomicU64,
}

impl ResultCounters {
    /// Create counters initialized to zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one successfully executed item
    #[inline]
    pub fn increment_success(&self) {
        self.success.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one failed item
    #[inline]
    pub fn increment_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Read both counters
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            success: self.success.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of the counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CounterSnapshot {
    /// Items executed successfully
    pub success: u64,

    /// Items that failed
    pub errors: u64,
}

impl CounterSnapshot {
    /// Items accounted for so far
    pub fn total(&self) -> u64 {
        self.success + self.errors
    }

    /// Success rate (0.0 - 1.0)
    pub fn success_rate(&self) -> f64 {
        let total = self.total();
        if total > 0 {
            self.success as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Error rate (0.0 - 1.0)
    pub fn error_rate(&self) -> f64 {
        let total = self.total();
        if total > 0 {
            self.errors as f64 / total as f64
        } else {
            0.0
        }
    }
}
