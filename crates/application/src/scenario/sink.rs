//! Shared report sink
//!
//! Workers record finished entries concurrently; the sink serialises the
//! writes and hands back the finished report at suite end.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use restcheck_domain::{Report, ReportEntry};

/// Thread-safe collector of report entries.
#[derive(Debug, Clone)]
pub struct ReportSink {
    report: Arc<Mutex<Report>>,
}

impl ReportSink {
    /// Wraps an empty report.
    #[must_use]
    pub fn new(report: Report) -> Self {
        Self {
            report: Arc::new(Mutex::new(report)),
        }
    }

    /// Appends a finished entry.
    pub fn record(&self, entry: ReportEntry) {
        self.report.lock().entries.push(entry);
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.report.lock().entries.len()
    }

    /// True if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stamps the end time and returns a copy of the report.
    #[must_use]
    pub fn finish(&self, finished_at: DateTime<Utc>) -> Report {
        let mut report = self.report.lock();
        report.finished_at = Some(finished_at);
        report.clone()
    }
}
