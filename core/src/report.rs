//! Console presentation of run progress
//!
//! Output here is for humans and is not a stable machine-readable format.
//! Structured data is available from [`RunSummary`] instead.

use std::io::{self, Write};
use std::sync::Mutex;

use chrono::{DateTime, Local};
use crossterm::style::Stylize;

use crate::counters::CounterSnapshot;
use crate::orchestrator::RunSummary;
use crate::traits::WorkloadError;

const TIME_FORMAT: &str = "%H:%M:%S%.3f";

/// Sink for everything the harness shows while a run is in progress
///
/// `item_failed` is called from worker tasks and may run concurrently with
/// the other methods.
pub trait ProgressReporter: Send + Sync {
    /// Periodic progress from the monitor while the run is incomplete
    fn progress(&self, at: DateTime<Local>, snapshot: CounterSnapshot);

    /// A single item failed
    fn item_failed(&self, at: DateTime<Local>, worker_id: usize, error: &WorkloadError);

    /// The monitor observed all items accounted for
    fn finished(&self, snapshot: CounterSnapshot);

    /// Final throughput report
    fn summary(&self, at: DateTime<Local>, summary: &RunSummary);
}

/// Discards all output
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn progress(&self, _at: DateTime<Local>, _snapshot: CounterSnapshot) {}

    fn item_failed(&self, _at: DateTime<Local>, _worker_id: usize, _error: &WorkloadError) {}

    fn finished(&self, _snapshot: CounterSnapshot) {}

    fn summary(&self, _at: DateTime<Local>, _summary: &RunSummary) {}
}

/// Writes a progress line that is rewritten in place, one line per failed
/// item, and a closing summary line
pub struct ConsoleReporter {
    out: Mutex<Box<dyn Write + Send>>,
    color: bool,
}

impl ConsoleReporter {
    /// Report to stdout with colours
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }

    /// Report to an arbitrary writer
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            out: Mutex::new(Box::new(writer)),
            color: true,
        }
    }

    /// Enable or disable ANSI colouring
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    fn write(&self, text: &str) {
        // Console failures must not take the run down.
        let Ok(mut out) = self.out.lock() else {
            return;
        };
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }

    fn success_count(&self, n: u64) -> String {
        if self.color {
            n.to_string().green().bold().to_string()
        } else {
            n.to_string()
        }
    }

    fn error_count(&self, n: u64) -> String {
        if self.color {
            n.to_string().red().bold().to_string()
        } else {
            n.to_string()
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::stdout()
    }
}

impl std::fmt::Debug for ConsoleReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleReporter")
            .field("color", &self.color)
            .finish()
    }
}

impl ProgressReporter for ConsoleReporter {
    fn progress(&self, at: DateTime<Local>, snapshot: CounterSnapshot) {
        self.write(&format!(
            "\r[{}] success: {}  errors: {}",
            at.format(TIME_FORMAT),
            self.success_count(snapshot.success),
            self.error_count(snapshot.errors),
        ));
    }

    fn item_failed(&self, at: DateTime<Local>, worker_id: usize, error: &WorkloadError) {
        // Leading newline keeps the diagnostic off the in-place progress line.
        self.write(&format!(
            "\n[{}] worker {} item failed: {}\n",
            at.format(TIME_FORMAT),
            worker_id,
            error
        ));
    }

    fn finished(&self, _snapshot: CounterSnapshot) {
        self.write("\n");
    }

    fn summary(&self, at: DateTime<Local>, summary: &RunSummary) {
        self.write(&format!(
            "[{}] {} requests in {:.3?} ({} ok, {} failed), {:.2} req/s\n",
            at.format(TIME_FORMAT),
            summary.requests,
            summary.elapsed,
            summary.success,
            summary.errors,
            summary.requests_per_second,
        ));
    }
}
