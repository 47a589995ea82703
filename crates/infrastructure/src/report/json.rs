//! Machine-readable JSON report

use std::path::PathBuf;

use restcheck_application::ports::{ReportError, ReportWriter};
use restcheck_domain::Report;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use super::{report_stem, write_file};

/// Two-space indentation, trailing newline. Struct fields keep their
/// declaration order; map keys (`system_info`) come out sorted.
fn encode(report: &Report) -> Result<Vec<u8>, ReportError> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"  "));
    report
        .serialize(&mut serializer)
        .map_err(|e| ReportError::Encoding(e.to_string()))?;
    buf.push(b'\n');
    Ok(buf)
}

/// Writes `<dir>/ApiReport_<timestamp>.json`.
#[derive(Debug, Clone)]
pub struct JsonReportWriter {
    dir: PathBuf,
}

impl JsonReportWriter {
    /// Creates a writer targeting `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File name used for `report`.
    #[must_use]
    pub fn file_name(report: &Report) -> String {
        format!("{}.json", report_stem(report))
    }
}

impl ReportWriter for JsonReportWriter {
    fn write(&self, report: &Report) -> Result<PathBuf, ReportError> {
        write_file(&self.dir, &Self::file_name(report), &encode(report)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::report::fixtures;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_written_report_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let report = fixtures::report();

        let path = JsonReportWriter::new(dir.path()).write(&report).unwrap();
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("ApiReport_2024-05-01_09-30-05.json")
        );

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.ends_with('\n'));
        assert!(contents.starts_with("{\n  \""));
        let restored: Report = serde_json::from_str(&contents).unwrap();
        assert_eq!(restored, report);
    }

    #[test]
    fn test_fields_in_declaration_order_and_map_keys_sorted() {
        let report = fixtures::report()
            .with_system_info("Zone", "eu")
            .with_system_info("Build", "42");

        let contents = String::from_utf8(encode(&report).unwrap()).unwrap();
        let at = |needle: &str| contents.find(needle).unwrap();

        assert!(at("\"run_id\"") < at("\"title\""));
        assert!(at("\"title\"") < at("\"name\""));
        assert!(at("\"name\"") < at("\"system_info\""));
        assert!(at("\"system_info\"") < at("\"started_at\""));
        assert!(at("\"Build\"") < at("\"Environment\""));
        assert!(at("\"Environment\"") < at("\"Tester\""));
        assert!(at("\"Tester\"") < at("\"Zone\""));
    }
}
