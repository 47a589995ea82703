//! Application error types

use restcheck_domain::{DomainError, StatusMismatch};
use thiserror::Error;

use crate::ports::HttpClientError;

/// Errors returned by the client facade.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// The request could not be built (bad template, bad base URL).
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] DomainError),

    /// No response was received.
    #[error("transport error: {0}")]
    Transport(#[from] HttpClientError),

    /// The response status did not satisfy the response spec.
    #[error(transparent)]
    UnexpectedStatus(#[from] StatusMismatch),

    /// The request body could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl ClientError {
    /// True for transport failures (connection, timeout, DNS).
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Result type alias for client calls.
pub type ClientResult<T> = Result<T, ClientError>;

/// Why a scenario did not pass.
#[derive(Debug, Clone, Error)]
pub enum ScenarioError {
    /// A client call failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A check on the response did not hold.
    #[error("assertion failed: {0}")]
    Assertion(String),

    /// A response payload could not be decoded.
    #[error("invalid payload: {0}")]
    Payload(#[from] DomainError),

    /// State a predecessor should have left behind is missing.
    #[error("precondition not met: {0}")]
    Precondition(String),

    /// The scenario body panicked.
    #[error("scenario panicked: {0}")]
    Panicked(String),
}

impl ScenarioError {
    /// True when the failure came from the transport rather than a check.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Client(e) if e.is_transport())
    }
}

/// Result type alias for scenario bodies.
pub type ScenarioResult<T = ()> = Result<T, ScenarioError>;
