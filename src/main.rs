//! benchtool - concurrent load-generation harness

use std::sync::Arc;

use anyhow::{ensure, Result};
use benchtool_core::{ConsoleReporter, HarnessBuilder, ProgressReporter, SilentReporter};
use clap::Parser;

mod cli;
mod workload;

use cli::{Cli, Commands, RunArgs};
use workload::SleepWorkload;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    // Logs go to stderr; stdout carries the progress report.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run(args) => run(args).await,
    }
}

async fn run(args: RunArgs) -> Result<()> {
    ensure!(
        (0.0..=1.0).contains(&args.error_rate),
        "--error-rate must be between 0.0 and 1.0, got {}",
        args.error_rate
    );

    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::debug!(seed, "Failure pattern seed");

    let workload = SleepWorkload::new(*args.delay)
        .with_error_rate(args.error_rate)
        .with_seed(seed);

    let reporter: Arc<dyn ProgressReporter> = if args.json {
        Arc::new(SilentReporter)
    } else {
        Arc::new(ConsoleReporter::stdout().with_color(!args.no_color))
    };

    let summary = HarnessBuilder::new()
        .connections(args.connections)
        .requests(args.requests)
        .queue_capacity(args.queue_capacity)
        .poll_interval(*args.poll_interval)
        .workload(Arc::new(workload))
        .reporter(reporter)
        .build()?
        .run()
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}
