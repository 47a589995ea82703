//! Restcheck command line entry point
//!
//! Exit codes: `0` when every scenario passed or was skipped, `1` when a
//! scenario failed, `2` when the run could not start or finish.

use std::process::ExitCode;

use clap::Parser;
use restcheck::cli::Cli;
use tracing::info;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("restcheck v{}", env!("CARGO_PKG_VERSION"));

    match restcheck::run(&cli).await {
        Ok(outcome) => {
            let summary = outcome.report.summary();
            println!(
                "{} scenarios: {} passed, {} failed, {} skipped ({:.1}% pass rate)",
                summary.total,
                summary.passed,
                summary.failed,
                summary.skipped,
                summary.pass_rate()
            );
            for path in &outcome.written {
                println!("report: {}", path.display());
            }
            for error in &outcome.worker_errors {
                eprintln!("worker error: {error}");
            }

            if outcome.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
