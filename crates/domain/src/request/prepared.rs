//! Fully resolved request handed to the transport

use std::time::Duration;

use url::Url;

use super::{Headers, HttpMethod};

/// A request with its URL resolved and body encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Absolute URL including query string
    pub url: Url,
    /// Headers to send
    pub headers: Headers,
    /// Encoded body, present only for POST, PUT and PATCH
    pub body: Option<String>,
    /// Transport timeout in milliseconds
    pub timeout_ms: u64,
}

impl PreparedRequest {
    /// Returns the timeout as a `Duration`.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
