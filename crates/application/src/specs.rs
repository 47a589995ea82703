//! Per-worker request/response specification cache
//!
//! Each worker owns one [`SpecBuilder`]. It holds at most one active
//! request/response pair; a client facade takes the pair when it is built,
//! which leaves the cache empty so the next call starts from fresh defaults.

use std::sync::Arc;

use restcheck_domain::{RequestSpec, ResponseSpec, Settings, WorkerId};
use tracing::{debug, info};

/// Media type sent and accepted by default.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Builds and caches the default specifications of one worker.
#[derive(Debug)]
pub struct SpecBuilder {
    worker: WorkerId,
    settings: Arc<Settings>,
    request: Option<RequestSpec>,
    response: Option<ResponseSpec>,
}

impl SpecBuilder {
    /// Creates an empty cache for `worker`.
    #[must_use]
    pub const fn new(worker: WorkerId, settings: Arc<Settings>) -> Self {
        Self {
            worker,
            settings,
            request: None,
            response: None,
        }
    }

    /// Settings the defaults are built from.
    #[must_use]
    pub const fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    /// Returns the cached request spec, creating the default one if absent.
    pub fn request_spec(&mut self) -> &RequestSpec {
        self.request
            .get_or_insert_with(|| default_request_spec(self.worker, &self.settings))
    }

    /// Returns the cached response spec, creating the default one if absent.
    pub fn response_spec(&mut self) -> &ResponseSpec {
        self.response
            .get_or_insert_with(|| default_response_spec(self.worker, &self.settings))
    }

    /// Replaces the request spec with one authenticated by `token`.
    pub fn with_token(&mut self, token: &str) -> &RequestSpec {
        info!(worker = %self.worker, "creating request specification with custom token");
        self.request
            .insert(base_request_spec(&self.settings).with_bearer_token(token))
    }

    /// Replaces the request spec with one that sends no `Authorization`.
    pub fn without_auth(&mut self) -> &RequestSpec {
        info!(worker = %self.worker, "creating request specification without auth");
        self.request.insert(base_request_spec(&self.settings))
    }

    /// Replaces the response spec with one expecting exactly `status`.
    pub fn with_expected_status(&mut self, status: u16) -> &ResponseSpec {
        info!(worker = %self.worker, status, "creating response specification with expected status");
        self.response
            .insert(base_response_spec(&self.settings).with_expected_status(status))
    }

    /// Rebuilds both defaults, discarding any override.
    pub fn reset(&mut self) {
        debug!(worker = %self.worker, "resetting specifications");
        self.request = Some(default_request_spec(self.worker, &self.settings));
        self.response = Some(default_response_spec(self.worker, &self.settings));
    }

    /// Discards both cached specs.
    pub fn clear(&mut self) {
        debug!(worker = %self.worker, "clearing specifications");
        self.request = None;
        self.response = None;
    }

    /// Hands the active pair to a caller, leaving the cache empty.
    ///
    /// Missing halves are filled with defaults first.
    pub fn take_active(&mut self) -> (RequestSpec, ResponseSpec) {
        let request = self
            .request
            .take()
            .unwrap_or_else(|| default_request_spec(self.worker, &self.settings));
        let response = self
            .response
            .take()
            .unwrap_or_else(|| default_response_spec(self.worker, &self.settings));
        (request, response)
    }

    /// True while a request or response spec is cached.
    #[must_use]
    pub const fn has_active(&self) -> bool {
        self.request.is_some() || self.response.is_some()
    }
}

fn base_request_spec(settings: &Settings) -> RequestSpec {
    RequestSpec::new(settings.base_url.clone())
        .with_content_type(JSON_CONTENT_TYPE)
        .with_accept(JSON_CONTENT_TYPE)
        .with_timeout_ms(settings.timeout_ms)
}

fn default_request_spec(worker: WorkerId, settings: &Settings) -> RequestSpec {
    info!(worker = %worker, "creating request specification");
    base_request_spec(settings).with_bearer_token(&settings.auth_token)
}

const fn base_response_spec(settings: &Settings) -> ResponseSpec {
    ResponseSpec::new().with_log_detail(settings.log_detail)
}

fn default_response_spec(worker: WorkerId, settings: &Settings) -> ResponseSpec {
    info!(worker = %worker, log_detail = %settings.log_detail, "creating response specification");
    base_response_spec(settings)
}
