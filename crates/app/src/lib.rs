//! Restcheck
//!
//! Command line runner for the user and product API suites. [`run`] wires the
//! property-file configuration, the reqwest transport and the report writers
//! into a [`Runner`] and executes the selected suites.

pub mod cli;
pub mod suites;

use std::sync::Arc;

use anyhow::Context;
use restcheck_application::{ConfigProvider, RetryPolicy, RunOutcome, Runner};
use restcheck_domain::LogDetail;
use restcheck_domain::settings::LOG_DETAIL_KEY;
use restcheck_infrastructure::{
    HtmlReportWriter, JsonReportWriter, PropertiesFileSource, ReqwestHttpClient, SystemClock,
};
use tracing::info;

use crate::cli::{Cli, SuiteName};

/// Runs the suites selected on the command line.
///
/// # Errors
///
/// Returns an error if the configuration is missing or invalid, a suite
/// cannot be planned, or a report cannot be written. Failed scenarios are
/// part of the returned outcome.
pub async fn run(cli: &Cli) -> anyhow::Result<RunOutcome> {
    let mut source = PropertiesFileSource::new(&cli.config_dir).with_env_overrides();
    if let Some(detail) = cli.log_detail {
        source = source.with_override(LOG_DETAIL_KEY, LogDetail::from(detail).as_str());
    }
    let location = source.path_for(&cli.env);
    let config = Arc::new(ConfigProvider::new(cli.env.as_str(), Arc::new(source)));

    let settings = config
        .settings()
        .with_context(|| format!("failed to load configuration from {}", location.display()))?;
    let mut retry = RetryPolicy::from_settings(&settings)
        .with_context(|| format!("invalid retry settings in {}", location.display()))?;
    if let Some(max_retries) = cli.max_retries {
        retry.max_retries = max_retries;
    }
    if let Some(on) = cli.retry_on {
        retry.on = on.into();
    }

    info!(
        environment = %settings.environment,
        base_url = %settings.base_url,
        workers = cli.workers,
        max_retries = retry.max_retries,
        retry_on = %retry.on,
        "starting run"
    );

    let http = ReqwestHttpClient::new().context("failed to build the HTTP client")?;
    let mut runner = Runner::new(config, Arc::new(http), Arc::new(SystemClock))
        .with_workers(cli.workers)
        .with_retry(retry)
        .with_report_writer(Arc::new(HtmlReportWriter::new(&cli.report_dir)))
        .with_system_info("Tester", cli.tester.as_str())
        .with_system_info("Harness", concat!("restcheck ", env!("CARGO_PKG_VERSION")));
    if cli.json {
        runner = runner.with_report_writer(Arc::new(JsonReportWriter::new(&cli.report_dir)));
    }

    for suite in cli.selected_suites() {
        match suite {
            SuiteName::Users => runner.add_suite(suites::user::suite())?,
            SuiteName::Products => runner.add_suite(suites::product::suite())?,
        }
    }

    Ok(runner.run().await?)
}
