//! HTTP Client port

use async_trait::async_trait;
use restcheck_domain::{PreparedRequest, Response};
use thiserror::Error;

/// Transport-level failures. Anything here means no HTTP response was read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpClientError {
    /// The request did not complete within its timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Configured timeout.
        timeout_ms: u64,
    },

    /// The server refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// The host name could not be resolved.
    #[error("could not resolve host {host}: {message}")]
    DnsError {
        /// Target host.
        host: String,
        /// Resolver message.
        message: String,
    },

    /// Any other connection problem.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Redirect limit exceeded.
    #[error("too many redirects (max {max})")]
    TooManyRedirects {
        /// Redirect limit.
        max: usize,
    },

    /// The URL was rejected by the transport.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The response body could not be read.
    #[error("failed to read body: {0}")]
    Body(String),

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

/// Port for executing HTTP requests.
///
/// This trait abstracts the HTTP client implementation, allowing
/// the application layer to be independent of specific HTTP libraries.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Executes a prepared request and returns the response, whatever its
    /// status code.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails due to network issues,
    /// timeout, or other transport problems.
    async fn execute(&self, request: &PreparedRequest) -> Result<Response, HttpClientError>;
}
