//! Response specification: what a call is expected to return

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Response;

/// Status codes a response spec accepts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatusExpectation {
    /// Any status is accepted.
    #[default]
    Any,
    /// Exact status code.
    Exact {
        /// The code.
        code: u16,
    },
}

impl StatusExpectation {
    /// Create an exact status expectation.
    #[must_use]
    pub const fn exact(code: u16) -> Self {
        Self::Exact { code }
    }

    /// Check if a status code matches this expectation.
    #[must_use]
    pub const fn matches(&self, status: u16) -> bool {
        match *self {
            Self::Any => true,
            Self::Exact { code } => status == code,
        }
    }

    /// Get description of the expectation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Any => "any".to_string(),
            Self::Exact { code } => format!("= {code}"),
        }
    }
}

/// How much of each exchange is written to the log.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogDetail {
    /// Status line, headers and body.
    #[default]
    All,
    /// Status line and timing only.
    Status,
    /// Nothing beyond the facade's own summary line.
    None,
}

impl LogDetail {
    /// Setting value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Status => "status",
            Self::None => "none",
        }
    }
}

impl fmt::Display for LogDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogDetail {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "status" => Ok(Self::Status),
            "none" => Ok(Self::None),
            other => Err(format!("expected one of all, status, none; got '{other}'")),
        }
    }
}

/// A response did not carry the expected status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected status {}, got {actual}", expected.description())]
pub struct StatusMismatch {
    /// What the spec expected.
    pub expected: StatusExpectation,
    /// What the server returned.
    pub actual: u16,
}

/// Default assertions applied to every response of a call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ResponseSpec {
    /// Accepted status codes
    #[serde(default)]
    pub expected_status: StatusExpectation,
    /// Logging verbosity
    #[serde(default)]
    pub log_detail: LogDetail,
}

impl ResponseSpec {
    /// Accepts any status and logs everything.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            expected_status: StatusExpectation::Any,
            log_detail: LogDetail::All,
        }
    }

    /// Expects exactly the given status.
    #[must_use]
    pub const fn with_expected_status(mut self, code: u16) -> Self {
        self.expected_status = StatusExpectation::exact(code);
        self
    }

    /// Sets the logging verbosity.
    #[must_use]
    pub const fn with_log_detail(mut self, log_detail: LogDetail) -> Self {
        self.log_detail = log_detail;
        self
    }

    /// Applies the expectation to a received response.
    ///
    /// # Errors
    ///
    /// Returns `StatusMismatch` if the status is not accepted.
    pub const fn verify(&self, response: &Response) -> Result<(), StatusMismatch> {
        if self.expected_status.matches(response.status) {
            Ok(())
        } else {
            Err(StatusMismatch {
                expected: self.expected_status,
                actual: response.status,
            })
        }
    }
}
