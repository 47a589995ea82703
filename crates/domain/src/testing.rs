//! Scenario outcomes and the run report.
//!
//! A [`Report`] collects one [`ReportEntry`] per scenario. Entries carry the
//! final status, timing, attempts and free-text log lines written while the
//! scenario ran.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::worker::WorkerId;

/// Final status of a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStatus {
    /// Ran and every check held.
    Passed,
    /// Ran and a check or the transport failed.
    Failed,
    /// Never ran because a predecessor did not pass.
    Skipped,
}

impl ScenarioStatus {
    /// Short upper-case label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Passed => "PASS",
            Self::Failed => "FAIL",
            Self::Skipped => "SKIP",
        }
    }
}

impl fmt::Display for ScenarioStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        };
        f.write_str(text)
    }
}

/// Severity of a report log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Informational step.
    Info,
    /// A check passed.
    Pass,
    /// A check failed.
    Fail,
    /// The scenario was skipped.
    Skip,
    /// Something worth noticing, e.g. a retried attempt.
    Warning,
}

/// One line of free text attached to a report entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    /// Severity.
    pub level: LogLevel,
    /// Text.
    pub message: String,
    /// When it was written.
    pub at: DateTime<Utc>,
}

/// Report record for one scenario.
///
/// An entry counts as passed until [`ReportEntry::finish`] records otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// Unique identifier.
    pub id: Uuid,
    /// Scenario name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Suite the scenario belongs to.
    pub category: String,
    /// Worker that handled the scenario.
    pub worker: WorkerId,
    /// Final status.
    pub status: ScenarioStatus,
    /// Number of times the body ran (0 for skipped scenarios).
    pub attempts: u32,
    /// When the scenario started.
    pub started_at: DateTime<Utc>,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
    /// Failure or skip reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Log lines in write order.
    #[serde(default)]
    pub logs: Vec<LogLine>,
}

impl ReportEntry {
    /// Opens an entry for a scenario starting now.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        worker: WorkerId,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            description: description.into(),
            category: category.into(),
            worker,
            status: ScenarioStatus::Passed,
            attempts: 0,
            started_at,
            duration_ms: 0,
            error: None,
            logs: Vec::new(),
        }
    }

    /// Appends a log line.
    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.logs.push(LogLine {
            level,
            message: message.into(),
            at: Utc::now(),
        });
    }

    /// Appends an informational line.
    pub fn info(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    /// Appends a passed-check line.
    pub fn pass(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Pass, message);
    }

    /// Appends a failed-check line.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Fail, message);
    }

    /// Appends a skip line.
    pub fn skip(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Skip, message);
    }

    /// Appends a warning line.
    pub fn warning(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    /// Records the final status.
    #[allow(clippy::cast_possible_truncation)]
    pub fn finish(&mut self, status: ScenarioStatus, duration: Duration, error: Option<String>) {
        self.status = status;
        self.duration_ms = duration.as_millis() as u64;
        self.error = error;
    }
}

/// Counts over a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    /// All recorded entries.
    pub total: usize,
    /// Passed entries.
    pub passed: usize,
    /// Failed entries.
    pub failed: usize,
    /// Skipped entries.
    pub skipped: usize,
}

impl ReportSummary {
    /// True when nothing failed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Pass rate among executed (non-skipped) entries, as a percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pass_rate(&self) -> f64 {
        let executed = self.passed + self.failed;
        if executed == 0 {
            100.0
        } else {
            (self.passed as f64 / executed as f64) * 100.0
        }
    }
}

/// Everything a run produced, ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Run identifier.
    pub run_id: Uuid,
    /// Document title.
    pub title: String,
    /// Report heading.
    pub name: String,
    /// Free-form environment facts (environment, tester, version...).
    #[serde(default)]
    pub system_info: BTreeMap<String, String>,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run ended, once flushed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    /// Recorded entries in completion order.
    #[serde(default)]
    pub entries: Vec<ReportEntry>,
}

impl Report {
    /// Creates an empty report.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        name: impl Into<String>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            run_id: Uuid::now_v7(),
            title: title.into(),
            name: name.into(),
            system_info: BTreeMap::new(),
            started_at,
            finished_at: None,
            entries: Vec::new(),
        }
    }

    /// Adds a system info line.
    #[must_use]
    pub fn with_system_info(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.system_info.insert(key.into(), value.into());
        self
    }

    /// Counts entries by status.
    #[must_use]
    pub fn summary(&self) -> ReportSummary {
        self.entries
            .iter()
            .fold(ReportSummary::default(), |mut summary, entry| {
                summary.total += 1;
                match entry.status {
                    ScenarioStatus::Passed => summary.passed += 1,
                    ScenarioStatus::Failed => summary.failed += 1,
                    ScenarioStatus::Skipped => summary.skipped += 1,
                }
                summary
            })
    }

    /// Finds an entry by category and scenario name.
    #[must_use]
    pub fn entry(&self, category: &str, name: &str) -> Option<&ReportEntry> {
        self.entries
            .iter()
            .find(|e| e.category == category && e.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(name: &str, status: ScenarioStatus) -> ReportEntry {
        let mut entry = ReportEntry::new(name, "", "Suite", WorkerId(1), Utc::now());
        entry.finish(status, Duration::from_millis(12), None);
        entry
    }

    #[test]
    fn test_summary_counts() {
        let mut report = Report::new("t", "n", Utc::now());
        report.entries.push(entry("a", ScenarioStatus::Passed));
        report.entries.push(entry("b", ScenarioStatus::Failed));
        report.entries.push(entry("c", ScenarioStatus::Skipped));

        let summary = report.summary();
        assert_eq!(
            summary,
            ReportSummary {
                total: 3,
                passed: 1,
                failed: 1,
                skipped: 1,
            }
        );
        assert!(!summary.is_success());
        assert!((summary.pass_rate() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_entry_logging_and_finish() {
        let mut entry = ReportEntry::new("create", "Create", "Products", WorkerId(2), Utc::now());
        entry.info("Creating new product");
        entry.warning("attempt 1 failed");
        entry.finish(
            ScenarioStatus::Failed,
            Duration::from_millis(1500),
            Some("boom".to_string()),
        );

        assert_eq!(entry.logs.len(), 2);
        assert_eq!(entry.logs[1].level, LogLevel::Warning);
        assert_eq!(entry.duration_ms, 1500);
        assert_eq!(entry.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(ScenarioStatus::Skipped.label(), "SKIP");
        assert_eq!(ScenarioStatus::Failed.to_string(), "failed");
    }
}
