//! Request specification type

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::Url;

use super::{Header, Headers, HttpMethod, PreparedRequest, QueryParam, QueryParams};
use crate::error::{DomainError, DomainResult};

/// Default transport timeout when configuration does not set one.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Reusable request settings: base URL, headers, query and path parameters.
///
/// A `RequestSpec` is a value. Every `with_*` method consumes it and returns
/// the modified spec, and [`RequestSpec::prepare`] consumes it into a
/// [`PreparedRequest`], so nothing configured for one call can leak into the
/// next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSpec {
    /// Base URL every relative endpoint is resolved against
    pub base_url: String,
    /// HTTP headers
    #[serde(default)]
    pub headers: Headers,
    /// Query parameters appended to the resolved URL
    #[serde(default)]
    pub query: QueryParams,
    /// Values for `{name}` placeholders in endpoint templates
    #[serde(default)]
    pub path_params: BTreeMap<String, String>,
    /// Transport timeout in milliseconds
    pub timeout_ms: u64,
}

impl RequestSpec {
    /// Creates an empty specification for the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            headers: Headers::new(),
            query: QueryParams::new(),
            path_params: BTreeMap::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Sets a header, replacing an existing one with the same name.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(Header::new(name, value));
        self
    }

    /// Sets several headers at once.
    #[must_use]
    pub fn with_headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self.headers.set(Header::new(name, value));
        }
        self
    }

    /// Removes a header if present.
    #[must_use]
    pub fn without_header(mut self, name: &str) -> Self {
        self.headers.remove(name);
        self
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.add(QueryParam::new(key, value));
        self
    }

    /// Appends several query parameters.
    #[must_use]
    pub fn with_query_params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in params {
            self.query.add(QueryParam::new(key, value));
        }
        self
    }

    /// Binds a value to a `{name}` placeholder.
    #[must_use]
    pub fn with_path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    /// Binds several placeholders.
    #[must_use]
    pub fn with_path_params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.path_params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Sets the `Content-Type` header.
    #[must_use]
    pub fn with_content_type(self, content_type: impl Into<String>) -> Self {
        self.with_header("Content-Type", content_type)
    }

    /// Sets the `Accept` header.
    #[must_use]
    pub fn with_accept(self, accept: impl Into<String>) -> Self {
        self.with_header("Accept", accept)
    }

    /// Sets `Authorization: Bearer <token>`.
    #[must_use]
    pub fn with_bearer_token(self, token: &str) -> Self {
        self.with_header("Authorization", format!("Bearer {token}"))
    }

    /// Drops the `Authorization` header.
    #[must_use]
    pub fn without_auth(self) -> Self {
        self.without_header("Authorization")
    }

    /// Sets the transport timeout.
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Resolves an endpoint template into a full URL.
    ///
    /// Relative endpoints are appended to the base URL. Each `{name}`
    /// placeholder is replaced by its bound path parameter (percent-encoded as
    /// a path segment) and query parameters are appended in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is malformed or a placeholder has no
    /// bound value.
    pub fn resolve_url(&self, endpoint: &str) -> DomainResult<Url> {
        let (origin, template) = split_absolute(endpoint).unwrap_or((self.base_url.as_str(), endpoint));

        let mut url =
            Url::parse(origin).map_err(|e| DomainError::InvalidUrl(format!("{e}: {origin}")))?;

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| DomainError::InvalidUrl(format!("{origin} cannot be a base")))?;
            segments.pop_if_empty();
            for raw in template.split('/').filter(|s| !s.is_empty()) {
                segments.push(&self.substitute(raw, endpoint)?);
            }
        }

        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for param in self.query.iter() {
                pairs.append_pair(&param.key, &param.value);
            }
        }

        Ok(url)
    }

    /// Consumes the spec into a request ready for the transport.
    ///
    /// The body is attached only for verbs that carry one.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint cannot be resolved.
    pub fn prepare(
        self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<String>,
    ) -> DomainResult<PreparedRequest> {
        let url = self.resolve_url(endpoint)?;
        Ok(PreparedRequest {
            method,
            url,
            headers: self.headers,
            body: body.filter(|_| method.has_body()),
            timeout_ms: self.timeout_ms,
        })
    }

    fn substitute(&self, segment: &str, endpoint: &str) -> DomainResult<String> {
        let mut out = String::with_capacity(segment.len());
        let mut rest = segment;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| {
                DomainError::InvalidUrl(format!("unclosed '{{' in endpoint '{endpoint}'"))
            })?;
            let name = &after[..close];
            let value =
                self.path_params
                    .get(name)
                    .ok_or_else(|| DomainError::UnresolvedPathParam {
                        name: name.to_string(),
                        endpoint: endpoint.to_string(),
                    })?;
            out.push_str(value);
            rest = &after[close + 1..];
        }

        out.push_str(rest);
        Ok(out)
    }
}

/// Splits `https://host:port/path` into origin and path template.
fn split_absolute(endpoint: &str) -> Option<(&str, &str)> {
    if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
        return None;
    }
    let scheme_end = endpoint.find("://")? + 3;
    match endpoint[scheme_end..].find('/') {
        Some(offset) => Some(endpoint.split_at(scheme_end + offset)),
        None => Some((endpoint, "")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn spec() -> RequestSpec {
        RequestSpec::new("https://gorest.co.in")
    }

    #[test]
    fn test_resolve_relative_endpoint() {
        let url = spec().resolve_url("/public/v2/users").unwrap();
        assert_eq!(url.as_str(), "https://gorest.co.in/public/v2/users");
    }

    #[test]
    fn test_resolve_keeps_base_path() {
        let url = RequestSpec::new("http://localhost:8080/api/")
            .resolve_url("/public/v2/posts")
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/public/v2/posts");
    }

    #[test]
    fn test_resolve_path_param() {
        let url = spec()
            .with_path_param("userId", "42")
            .resolve_url("/public/v2/users/{userId}")
            .unwrap();
        assert_eq!(url.as_str(), "https://gorest.co.in/public/v2/users/42");
    }

    #[test]
    fn test_path_param_is_encoded_as_segment() {
        let url = spec()
            .with_path_param("name", "a b/c")
            .resolve_url("/items/{name}")
            .unwrap();
        assert_eq!(url.as_str(), "https://gorest.co.in/items/a%20b%2Fc");
    }

    #[test]
    fn test_unresolved_path_param() {
        let err = spec().resolve_url("/public/v2/users/{userId}").unwrap_err();
        assert_eq!(
            err,
            DomainError::UnresolvedPathParam {
                name: "userId".to_string(),
                endpoint: "/public/v2/users/{userId}".to_string(),
            }
        );
    }

    #[test]
    fn test_query_params_appended() {
        let url = spec()
            .with_query_param("status", "active")
            .with_query_params([("name", "John Doe")])
            .resolve_url("/public/v2/users")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://gorest.co.in/public/v2/users?status=active&name=John+Doe"
        );
    }

    #[test]
    fn test_absolute_endpoint_ignores_base() {
        let url = spec()
            .with_path_param("id", "7")
            .resolve_url("http://127.0.0.1:9000/posts/{id}")
            .unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/posts/7");
    }

    #[test]
    fn test_auth_helpers() {
        let spec = spec().with_bearer_token("abc");
        assert_eq!(spec.headers.get("authorization"), Some("Bearer abc"));

        let spec = spec.without_auth();
        assert_eq!(spec.headers.get("Authorization"), None);
    }

    #[test]
    fn test_prepare_drops_body_for_get() {
        let prepared = spec()
            .prepare(HttpMethod::Get, "/x", Some("{}".to_string()))
            .unwrap();
        assert_eq!(prepared.body, None);

        let prepared = spec()
            .with_timeout_ms(500)
            .prepare(HttpMethod::Put, "/x", Some("{}".to_string()))
            .unwrap();
        assert_eq!(prepared.body.as_deref(), Some("{}"));
        assert_eq!(prepared.timeout_ms, 500);
    }
}
