//! Lifecycle hooks
//!
//! The runner calls these at suite, chain and scenario boundaries. The
//! runner itself performs the bookkeeping tied to each boundary (spec reset,
//! cache clearing, report flushing); listeners only observe.

use std::path::Path;

use restcheck_domain::{Report, ReportEntry, ScenarioStatus, WorkerId};
use tracing::{info, warn};

/// Observer of a run.
pub trait LifecycleListener: Send + Sync {
    /// The run is about to start.
    fn on_suite_start(&self, _report: &Report) {}

    /// A worker picked up a chain.
    fn on_chain_start(&self, _worker: WorkerId, _suite: &str, _scenarios: &[&str]) {}

    /// A worker finished a chain.
    fn on_chain_end(&self, _worker: WorkerId, _suite: &str) {}

    /// A scenario entry was opened.
    fn on_scenario_start(&self, _entry: &ReportEntry) {}

    /// A scenario entry was closed and is about to be recorded.
    fn on_scenario_end(&self, _entry: &ReportEntry) {}

    /// A report file was written.
    fn on_report_written(&self, _path: &Path) {}

    /// Every chain has finished and the report is final.
    fn on_suite_end(&self, _report: &Report) {}
}

/// Logs every boundary through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingListener;

impl LifecycleListener for TracingListener {
    fn on_suite_start(&self, report: &Report) {
        info!(run_id = %report.run_id, "test suite started");
    }

    fn on_chain_start(&self, worker: WorkerId, suite: &str, scenarios: &[&str]) {
        info!(%worker, suite, scenarios = ?scenarios, "test class started");
    }

    fn on_chain_end(&self, worker: WorkerId, suite: &str) {
        info!(%worker, suite, "test class finished");
    }

    fn on_scenario_start(&self, entry: &ReportEntry) {
        info!(worker = %entry.worker, suite = %entry.category, scenario = %entry.name, "test started");
    }

    fn on_scenario_end(&self, entry: &ReportEntry) {
        match entry.status {
            ScenarioStatus::Passed => info!(
                worker = %entry.worker,
                scenario = %entry.name,
                attempts = entry.attempts,
                duration_ms = entry.duration_ms,
                "test passed"
            ),
            ScenarioStatus::Failed => warn!(
                worker = %entry.worker,
                scenario = %entry.name,
                attempts = entry.attempts,
                error = entry.error.as_deref().unwrap_or(""),
                "test failed"
            ),
            ScenarioStatus::Skipped => info!(
                worker = %entry.worker,
                scenario = %entry.name,
                reason = entry.error.as_deref().unwrap_or(""),
                "test skipped"
            ),
        }
    }

    fn on_report_written(&self, path: &Path) {
        info!(path = %path.display(), "report written");
    }

    fn on_suite_end(&self, report: &Report) {
        let summary = report.summary();
        info!(
            total = summary.total,
            passed = summary.passed,
            failed = summary.failed,
            skipped = summary.skipped,
            "test suite finished"
        );
    }
}
