//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// An endpoint template still contains a `{placeholder}` after resolution.
    #[error("unresolved path parameter '{name}' in endpoint '{endpoint}'")]
    UnresolvedPathParam {
        /// Placeholder name.
        name: String,
        /// The endpoint template.
        endpoint: String,
    },

    /// The response body could not be decoded.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// A JSON path expression is malformed.
    #[error("invalid JSON path '{path}': {reason}")]
    InvalidJsonPath {
        /// The offending expression.
        path: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A payload is missing a field the server should have assigned.
    #[error("missing field: {0}")]
    MissingField(&'static str),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
