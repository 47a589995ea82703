//! In-memory doubles shared by unit tests

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use restcheck_domain::{PreparedRequest, Response, Settings, WorkerId};

use crate::config::{ConfigProvider, StaticConfigSource};
use crate::context::WorkerContext;
use crate::ports::{Clock, HttpClient, HttpClientError};

pub const MOCK_BASE_URL: &str = "http://mock.test";

#[derive(Default)]
struct MockState {
    scripted: VecDeque<Result<Response, HttpClientError>>,
    requests: Vec<PreparedRequest>,
}

/// Replays scripted responses in order and records every request.
#[derive(Clone, Default)]
pub struct MockHttpClient {
    state: Arc<Mutex<MockState>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        let response = Response::new(
            status,
            [("content-type".to_string(), "application/json".to_string())],
            body.as_bytes().to_vec(),
            Duration::from_millis(3),
        );
        self.state.lock().scripted.push_back(Ok(response));
        self
    }

    pub fn fail(self, error: HttpClientError) -> Self {
        self.state.lock().scripted.push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<PreparedRequest> {
        self.state.lock().requests.clone()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn execute(&self, request: &PreparedRequest) -> Result<Response, HttpClientError> {
        let mut state = self.state.lock();
        state.requests.push(request.clone());
        state
            .scripted
            .pop_front()
            .unwrap_or_else(|| Err(HttpClientError::Other("no scripted response".to_string())))
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl Default for FixedClock {
    fn default() -> Self {
        Self(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn settings(base_url: &str) -> Arc<Settings> {
    let values = BTreeMap::from([
        ("base.url".to_string(), base_url.to_string()),
        ("auth.token".to_string(), "test-token".to_string()),
        ("timeout".to_string(), "2000".to_string()),
    ]);
    Arc::new(Settings::from_values("test", values).unwrap())
}

pub fn worker(http: &MockHttpClient) -> WorkerContext {
    WorkerContext::new(
        WorkerId(1),
        settings(MOCK_BASE_URL),
        Arc::new(http.clone()),
        Arc::new(FixedClock::default()),
    )
}

pub fn provider() -> Arc<ConfigProvider> {
    let source = StaticConfigSource::new().with_environment(
        "test",
        [
            ("base.url", MOCK_BASE_URL),
            ("auth.token", "test-token"),
            ("timeout", "2000"),
        ],
    );
    Arc::new(ConfigProvider::new("test", Arc::new(source)))
}
