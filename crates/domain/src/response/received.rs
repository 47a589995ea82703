//! Responses as handed back by the transport
//!
//! Status, headers, body and timing of one completed call, plus typed and
//! path-based access to a JSON body.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::json_path::query_json_path;
use crate::error::{DomainError, DomainResult};
use crate::request::{Header, Headers};

/// Reason phrase for the status codes the API is known to return.
#[must_use]
pub const fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        408 => "Request Timeout",
        409 => "Conflict",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Unknown",
    }
}

/// One response from the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Status text (e.g., "OK", "Not Found")
    pub status_text: String,
    /// Response headers
    #[serde(default)]
    pub headers: Headers,
    /// Response body as string
    pub body: String,
    /// Time between sending the request and reading the full body
    #[serde(with = "duration_millis")]
    pub duration: Duration,
    /// Response size in bytes
    pub size: usize,
}

impl Response {
    /// Creates a response from raw transport data.
    ///
    /// Bodies that are not valid UTF-8 are decoded lossily.
    #[must_use]
    pub fn new(
        status: u16,
        headers: impl IntoIterator<Item = (String, String)>,
        body: Vec<u8>,
        duration: Duration,
    ) -> Self {
        let size = body.len();
        let body = String::from_utf8(body)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned());

        Self {
            status,
            status_text: reason_phrase(status).to_string(),
            headers: headers
                .into_iter()
                .map(|(name, value)| Header::new(name, value))
                .collect(),
            body,
            duration,
            size,
        }
    }

    /// Looks up a response header (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Elapsed time in whole milliseconds.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn elapsed_ms(&self) -> u64 {
        self.duration.as_millis() as u64
    }

    /// Decodes the body into a typed payload.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidBody` if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> DomainResult<T> {
        serde_json::from_str(&self.body).map_err(|e| DomainError::InvalidBody(e.to_string()))
    }

    /// Decodes the body as an untyped JSON value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidBody` if the body is not JSON.
    pub fn json_value(&self) -> DomainResult<serde_json::Value> {
        self.json()
    }

    /// Evaluates a `$.field[0].nested` path against the JSON body.
    ///
    /// Returns `Ok(None)` when the path does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not JSON or the path is malformed.
    pub fn json_path(&self, path: &str) -> DomainResult<Option<serde_json::Value>> {
        query_json_path(&self.json_value()?, path)
    }

    /// Length of the top-level JSON array, if the body is one.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not JSON.
    pub fn json_array_len(&self) -> DomainResult<Option<usize>> {
        Ok(self.json_value()?.as_array().map(Vec::len))
    }
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status: 0,
            status_text: String::new(),
            headers: Headers::new(),
            body: String::new(),
            duration: Duration::ZERO,
            size: 0,
        }
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    fn json_response(status: u16, body: &str) -> Response {
        Response::new(
            status,
            [("Content-Type".to_string(), "application/json".to_string())],
            body.as_bytes().to_vec(),
            Duration::from_millis(42),
        )
    }

    #[test]
    fn test_new_fills_metadata() {
        let response = json_response(201, r#"{"id":1}"#);
        assert_eq!(response.status_text, "Created");
        assert_eq!(response.size, 8);
        assert_eq!(response.elapsed_ms(), 42);
        assert_eq!(response.header("content-type"), Some("application/json"));
    }

    #[test]
    fn test_typed_json() {
        #[derive(Deserialize)]
        struct Item {
            id: u64,
        }

        let response = json_response(200, r#"{"id": 7, "extra": true}"#);
        let item: Item = response.json().unwrap();
        assert_eq!(item.id, 7);

        let bad = json_response(200, "not json");
        assert!(matches!(bad.json::<Item>(), Err(DomainError::InvalidBody(_))));
    }

    #[test]
    fn test_json_path_on_array() {
        let response = json_response(200, r#"[{"id": 1, "user_id": 9, "title": "T"}]"#);
        assert_eq!(
            response.json_path("$[0].user_id").unwrap(),
            Some(serde_json::json!(9))
        );
        assert_eq!(response.json_path("$[0].body").unwrap(), None);
        assert_eq!(response.json_array_len().unwrap(), Some(1));
    }
}
