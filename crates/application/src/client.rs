//! Single-use REST client facade
//!
//! A [`RestClient`] takes the worker's active specification pair when it is
//! created, is refined through consuming builder calls, and is spent by the
//! verb that sends it.

use restcheck_domain::{Headers, HttpMethod, LogDetail, RequestSpec, Response, ResponseSpec};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::context::WorkerContext;
use crate::error::{ClientError, ClientResult};

/// Request builder bound to one worker for one call.
#[must_use = "a RestClient does nothing until a verb method is awaited"]
pub struct RestClient<'w> {
    worker: &'w mut WorkerContext,
    request: RequestSpec,
    response: ResponseSpec,
}

impl<'w> RestClient<'w> {
    /// Starts a client from the worker's active specs.
    ///
    /// The worker cache is left empty, so the next client rebuilds defaults.
    pub fn new(worker: &'w mut WorkerContext) -> Self {
        let (request, response) = worker.specs().take_active();
        Self {
            worker,
            request,
            response,
        }
    }

    /// Sets a header, replacing any header of the same name.
    pub fn add_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request = self.request.with_header(name, value);
        self
    }

    /// Sets several headers.
    pub fn add_headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.request = self.request.with_headers(headers);
        self
    }

    /// Appends a query parameter.
    pub fn add_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.request = self.request.with_query_param(key, value);
        self
    }

    /// Appends several query parameters.
    pub fn add_query_params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.request = self.request.with_query_params(params);
        self
    }

    /// Binds a `{name}` placeholder of the endpoint template.
    pub fn add_path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request = self.request.with_path_param(name, value);
        self
    }

    /// Binds several placeholders.
    pub fn add_path_params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.request = self.request.with_path_params(params);
        self
    }

    /// Overrides the `Content-Type` header.
    pub fn set_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.request = self.request.with_content_type(content_type);
        self
    }

    /// Asserts an exact status for this call only.
    pub const fn expect_status(mut self, status: u16) -> Self {
        self.response = self.response.with_expected_status(status);
        self
    }

    /// Sends a GET.
    ///
    /// # Errors
    ///
    /// See [`ClientError`].
    pub async fn get(self, endpoint: &str) -> ClientResult<Response> {
        self.send(HttpMethod::Get, endpoint, None).await
    }

    /// Sends a POST with `body` encoded as JSON.
    ///
    /// # Errors
    ///
    /// See [`ClientError`].
    pub async fn post<T>(self, endpoint: &str, body: &T) -> ClientResult<Response>
    where
        T: Serialize + Sync + ?Sized,
    {
        let body = encode(body)?;
        self.send(HttpMethod::Post, endpoint, Some(body)).await
    }

    /// Sends a PUT with `body` encoded as JSON.
    ///
    /// # Errors
    ///
    /// See [`ClientError`].
    pub async fn put<T>(self, endpoint: &str, body: &T) -> ClientResult<Response>
    where
        T: Serialize + Sync + ?Sized,
    {
        let body = encode(body)?;
        self.send(HttpMethod::Put, endpoint, Some(body)).await
    }

    /// Sends a PATCH with `body` encoded as JSON.
    ///
    /// # Errors
    ///
    /// See [`ClientError`].
    pub async fn patch<T>(self, endpoint: &str, body: &T) -> ClientResult<Response>
    where
        T: Serialize + Sync + ?Sized,
    {
        let body = encode(body)?;
        self.send(HttpMethod::Patch, endpoint, Some(body)).await
    }

    /// Sends a DELETE.
    ///
    /// # Errors
    ///
    /// See [`ClientError`].
    pub async fn delete(self, endpoint: &str) -> ClientResult<Response> {
        self.send(HttpMethod::Delete, endpoint, None).await
    }

    /// Sends a POST that must answer with `status`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::UnexpectedStatus`] when the server answers with
    /// any other code.
    pub async fn post_with_expected_status<T>(
        self,
        endpoint: &str,
        body: &T,
        status: u16,
    ) -> ClientResult<Response>
    where
        T: Serialize + Sync + ?Sized,
    {
        info!(worker = %self.worker.id(), status, "creating response specification with expected status");
        self.expect_status(status).post(endpoint, body).await
    }

    async fn send(
        self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<String>,
    ) -> ClientResult<Response> {
        let Self {
            worker,
            request,
            response: expectation,
        } = self;
        let worker_id = worker.id();
        let prepared = request.prepare(method, endpoint, body)?;

        info!(worker = %worker_id, %method, url = %prepared.url, "sending request");
        if expectation.log_detail == LogDetail::All {
            debug!(
                worker = %worker_id,
                headers = ?loggable_headers(&prepared.headers),
                body = prepared.body.as_deref().unwrap_or(""),
                "request details"
            );
        }

        let response = match worker.http().execute(&prepared).await {
            Ok(response) => response,
            Err(e) => {
                warn!(worker = %worker_id, %method, url = %prepared.url, error = %e, "request failed");
                return Err(e.into());
            }
        };

        if expectation.log_detail != LogDetail::None {
            info!(
                worker = %worker_id,
                status = response.status,
                elapsed_ms = response.elapsed_ms(),
                "response received"
            );
        }
        if expectation.log_detail == LogDetail::All {
            debug!(worker = %worker_id, body = %response.body, "response body");
        }

        expectation.verify(&response)?;
        Ok(response)
    }
}

impl std::fmt::Debug for RestClient<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("worker", &self.worker.id())
            .field("request", &self.request)
            .field("response", &self.response)
            .finish()
    }
}

fn encode<T: Serialize + ?Sized>(body: &T) -> ClientResult<String> {
    serde_json::to_string(body).map_err(|e| ClientError::Serialization(e.to_string()))
}

fn loggable_headers(headers: &Headers) -> Vec<String> {
    headers
        .iter()
        .map(|h| {
            if h.name.eq_ignore_ascii_case("authorization") {
                format!("{}: ***", h.name)
            } else {
                format!("{}: {}", h.name, h.value)
            }
        })
        .collect()
}
