//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port using the reqwest library.
//! It handles all HTTP communication for the harness.

use std::error::Error as _;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, Method};
use restcheck_application::ports::{HttpClient, HttpClientError};
use restcheck_domain::{HttpMethod, PreparedRequest, Response};
use tracing::trace;

/// User-Agent sent with every request.
pub const USER_AGENT: &str = concat!("restcheck/", env!("CARGO_PKG_VERSION"));

const MAX_REDIRECTS: usize = 10;

/// HTTP client implementation using reqwest.
///
/// Wraps a shared `reqwest::Client`; one instance serves every worker.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Creates a new HTTP client with default settings.
    ///
    /// Default configuration:
    /// - Follow redirects: up to 10
    /// - TLS verification: enabled
    /// - User-Agent: `restcheck/<version>`
    ///
    /// Timeouts are applied per request from the request spec.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new() -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Ok(Self { client })
    }

    /// Creates a new HTTP client with a custom reqwest client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Maps reqwest errors to `HttpClientError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout { timeout_ms };
        }

        let host = || {
            error
                .url()
                .and_then(|u| u.host_str())
                .unwrap_or("unknown")
                .to_string()
        };

        if error.is_connect() {
            let message = describe(error);
            let lower = message.to_lowercase();
            if lower.contains("dns") || lower.contains("resolve") {
                return HttpClientError::DnsError {
                    host: host(),
                    message,
                };
            }
            if lower.contains("refused") {
                return HttpClientError::ConnectionRefused {
                    host: host(),
                    port: error
                        .url()
                        .and_then(reqwest::Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return HttpClientError::ConnectionFailed(message);
        }

        if error.is_redirect() {
            return HttpClientError::TooManyRedirects { max: MAX_REDIRECTS };
        }

        if error.is_builder() {
            return HttpClientError::InvalidUrl(describe(error));
        }

        HttpClientError::Other(describe(error))
    }
}

/// Flattens an error and its sources into one line.
fn describe(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: &PreparedRequest) -> Result<Response, HttpClientError> {
        let timeout_ms = request.timeout_ms;
        let start = Instant::now();

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), request.url.clone())
            .timeout(request.timeout());

        for header in request.headers.iter() {
            builder = builder.header(&header.name, &header.value);
        }

        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(&e, timeout_ms))?;

        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| HttpClientError::Body(describe(&e)))?
            .to_vec();

        let duration = start.elapsed();
        trace!(status, bytes = body.len(), elapsed_ms = duration.as_millis(), "transport complete");

        Ok(Response::new(status, headers, body, duration))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::http::HeaderMap;
    use axum::routing::{get, post};
    use pretty_assertions::assert_eq;
    use restcheck_domain::RequestSpec;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_to_reqwest_method() {
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Get),
            Method::GET
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Post),
            Method::POST
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Patch),
            Method::PATCH
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Delete),
            Method::DELETE
        );
    }

    #[test]
    fn test_client_creation() {
        assert!(ReqwestHttpClient::new().is_ok());
    }

    #[tokio::test]
    async fn test_sends_headers_and_body() {
        let router = Router::new().route(
            "/echo",
            post(|headers: HeaderMap, body: String| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("")
                    .to_string();
                (axum::http::StatusCode::CREATED, format!("{auth}|{body}"))
            }),
        );
        let base = serve(router).await;

        let request = RequestSpec::new(base)
            .with_bearer_token("abc")
            .prepare(HttpMethod::Post, "/echo", Some(r#"{"a":1}"#.to_string()))
            .unwrap();
        let response = ReqwestHttpClient::new()
            .unwrap()
            .execute(&request)
            .await
            .unwrap();

        assert_eq!(response.status, 201);
        assert_eq!(response.status_text, "Created");
        assert_eq!(response.body, r#"Bearer abc|{"a":1}"#);
    }

    #[tokio::test]
    async fn test_error_statuses_are_responses() {
        let router = Router::new().route(
            "/missing",
            get(|| async { (axum::http::StatusCode::NOT_FOUND, "nope") }),
        );
        let base = serve(router).await;

        let request = RequestSpec::new(base)
            .prepare(HttpMethod::Get, "/missing", None)
            .unwrap();
        let response = ReqwestHttpClient::new()
            .unwrap()
            .execute(&request)
            .await
            .unwrap();

        assert_eq!(response.status, 404);
        assert_eq!(response.body, "nope");
    }

    #[tokio::test]
    async fn test_connection_refused_is_a_transport_error() {
        let request = RequestSpec::new("http://127.0.0.1:1")
            .with_timeout_ms(2_000)
            .prepare(HttpMethod::Get, "/", None)
            .unwrap();

        let err = ReqwestHttpClient::new()
            .unwrap()
            .execute(&request)
            .await
            .unwrap_err();

        assert!(
            matches!(
                err,
                HttpClientError::ConnectionRefused { .. } | HttpClientError::ConnectionFailed(_)
            ),
            "unexpected error: {err:?}"
        );
    }

    #[tokio::test]
    async fn test_timeout_is_reported() {
        let router = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(std::time::Duration::from_millis(500)).await;
                "late"
            }),
        );
        let base = serve(router).await;

        let request = RequestSpec::new(base)
            .with_timeout_ms(50)
            .prepare(HttpMethod::Get, "/slow", None)
            .unwrap();
        let err = ReqwestHttpClient::new()
            .unwrap()
            .execute(&request)
            .await
            .unwrap_err();

        assert_eq!(err, HttpClientError::Timeout { timeout_ms: 50 });
    }
}
