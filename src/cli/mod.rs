//! CLI argument parsing

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "benchtool")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a synthetic sleep workload through the harness
    Run(RunArgs),
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Number of concurrent workers
    #[arg(short, long, default_value = "8")]
    pub connections: usize,

    /// Total number of items to execute
    #[arg(short, long, default_value = "1000")]
    pub requests: usize,

    /// Work queue capacity
    #[arg(long, default_value = "1024")]
    pub queue_capacity: usize,

    /// Interval between progress lines (e.g. "1s", "250ms")
    #[arg(long, default_value = "1s")]
    pub poll_interval: humantime::Duration,

    /// Simulated time spent on each item
    #[arg(short, long, default_value = "5ms")]
    pub delay: humantime::Duration,

    /// Fraction of items that fail (0.0 to 1.0)
    #[arg(long, default_value = "0.0")]
    pub error_rate: f64,

    /// Seed for the failure pattern (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the run summary as JSON instead of console progress
    #[arg(long)]
    pub json: bool,

    /// Disable coloured console output
    #[arg(long)]
    pub no_color: bool,
}
