//! Command line arguments

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use restcheck_application::scenario::DEFAULT_WORKERS;
use restcheck_application::{DEFAULT_ENVIRONMENT, RetryOn};
use restcheck_domain::LogDetail;
use restcheck_infrastructure::DEFAULT_REPORT_DIR;

/// Runs the REST API scenario suites and writes an HTML report.
#[derive(Debug, Clone, Parser)]
#[command(name = "restcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Environment to load (`<config-dir>/config-<env>.properties`)
    #[arg(long, env = "RESTCHECK_ENV", default_value = DEFAULT_ENVIRONMENT)]
    pub env: String,

    /// Directory holding the property files
    #[arg(long, default_value = "config")]
    pub config_dir: PathBuf,

    /// Directory the reports are written to
    #[arg(long, default_value = DEFAULT_REPORT_DIR)]
    pub report_dir: PathBuf,

    /// Number of parallel workers
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Suite to run; repeat to select several (default: all)
    #[arg(long = "suite", value_enum)]
    pub suites: Vec<SuiteName>,

    /// Extra attempts for a failed scenario (overrides `retry.max`)
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Failures that are retried (overrides `retry.on`)
    #[arg(long, value_enum)]
    pub retry_on: Option<RetryOnArg>,

    /// How much of each exchange is logged (overrides `log.detail`)
    #[arg(long, value_enum)]
    pub log_detail: Option<LogDetailArg>,

    /// Also write the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Name recorded as the tester in the report
    #[arg(long, env = "RESTCHECK_TESTER", default_value = "restcheck")]
    pub tester: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Selected suites, every suite when none was named.
    #[must_use]
    pub fn selected_suites(&self) -> Vec<SuiteName> {
        if self.suites.is_empty() {
            SuiteName::value_variants().to_vec()
        } else {
            let mut selected = Vec::new();
            for suite in &self.suites {
                if !selected.contains(suite) {
                    selected.push(*suite);
                }
            }
            selected
        }
    }
}

/// Available suites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SuiteName {
    /// User CRUD and search scenarios
    Users,
    /// Product CRUD, list and schema scenarios
    Products,
}

/// `--retry-on` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RetryOnArg {
    /// Retry only when no response was received
    Transport,
    /// Retry every failure
    Any,
}

/// `--log-detail` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogDetailArg {
    /// Request headers and bodies, response status and body
    All,
    /// Status line and timing only
    Status,
    /// Request line only
    None,
}

impl From<LogDetailArg> for LogDetail {
    fn from(arg: LogDetailArg) -> Self {
        match arg {
            LogDetailArg::All => Self::All,
            LogDetailArg::Status => Self::Status,
            LogDetailArg::None => Self::None,
        }
    }
}

impl From<RetryOnArg> for RetryOn {
    fn from(arg: RetryOnArg) -> Self {
        match arg {
            RetryOnArg::Transport => Self::Transport,
            RetryOnArg::Any => Self::Any,
        }
    }
}
