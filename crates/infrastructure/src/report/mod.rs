//! Report writers
//!
//! Both writers name their file after the run start time, so repeated runs
//! never overwrite each other.

mod html;
mod json;

use std::fs;
use std::path::{Path, PathBuf};

use restcheck_application::ports::ReportError;
use restcheck_domain::Report;

pub use html::HtmlReportWriter;
pub use json::JsonReportWriter;

/// Directory reports are written to by default.
pub const DEFAULT_REPORT_DIR: &str = "test-output";

/// Base file name for `report`: `ApiReport_<yyyy-MM-dd_HH-mm-ss>`.
#[must_use]
pub fn report_stem(report: &Report) -> String {
    format!("ApiReport_{}", report.started_at.format("%Y-%m-%d_%H-%M-%S"))
}

fn write_file(dir: &Path, file_name: &str, contents: &[u8]) -> Result<PathBuf, ReportError> {
    fs::create_dir_all(dir).map_err(|source| ReportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(file_name);
    fs::write(&path, contents).map_err(|source| ReportError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
