//! Worker context
//!
//! Everything one worker needs to run scenarios, handed explicitly to every
//! service and client call instead of living in thread-local storage.

use std::sync::Arc;

use restcheck_domain::{Settings, WorkerId};

use crate::client::RestClient;
use crate::ports::{Clock, HttpClient};
use crate::specs::SpecBuilder;

/// Mutable state owned by exactly one worker.
pub struct WorkerContext {
    id: WorkerId,
    specs: SpecBuilder,
    http: Arc<dyn HttpClient>,
    clock: Arc<dyn Clock>,
}

impl WorkerContext {
    /// Creates the context of worker `id`.
    #[must_use]
    pub fn new(
        id: WorkerId,
        settings: Arc<Settings>,
        http: Arc<dyn HttpClient>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            id,
            specs: SpecBuilder::new(id, settings),
            http,
            clock,
        }
    }

    /// This worker's identity.
    #[must_use]
    pub const fn id(&self) -> WorkerId {
        self.id
    }

    /// Settings shared by all workers.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        self.specs.settings()
    }

    /// The worker's specification cache.
    pub const fn specs(&mut self) -> &mut SpecBuilder {
        &mut self.specs
    }

    /// The transport.
    #[must_use]
    pub fn http(&self) -> &dyn HttpClient {
        self.http.as_ref()
    }

    /// The clock.
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Starts a single-use client from the worker's active specs.
    pub fn client(&mut self) -> RestClient<'_> {
        RestClient::new(self)
    }

    /// Releases everything cached for the current scenario.
    pub fn clear_caches(&mut self) {
        self.specs.clear();
    }
}

impl std::fmt::Debug for WorkerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerContext")
            .field("id", &self.id)
            .field("specs", &self.specs)
            .finish_non_exhaustive()
    }
}
