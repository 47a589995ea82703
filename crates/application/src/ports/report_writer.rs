//! Report writer port

use std::path::PathBuf;

use restcheck_domain::Report;
use thiserror::Error;

/// Errors raised while persisting a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Filesystem failure.
    #[error("I/O error writing {path}: {source}")]
    Io {
        /// Target file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The report could not be encoded.
    #[error("failed to encode report: {0}")]
    Encoding(String),
}

/// Renders a finished report to a persistent artifact.
pub trait ReportWriter: Send + Sync {
    /// Writes the report and returns the path of the created file.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact cannot be written.
    fn write(&self, report: &Report) -> Result<PathBuf, ReportError>;
}
