//! Restcheck infrastructure
//!
//! The reqwest transport, the property-file configuration source and the
//! HTML/JSON report writers behind the application ports.

pub mod adapters;
pub mod config;
pub mod report;

pub use adapters::{ReqwestHttpClient, SystemClock};
pub use config::PropertiesFileSource;
pub use report::{DEFAULT_REPORT_DIR, HtmlReportWriter, JsonReportWriter};
