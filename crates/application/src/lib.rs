//! Restcheck Application - Harness core
//!
//! This crate wires the domain types into a runnable harness:
//! - Ports to the outside world (HTTP transport, clock, config, report output)
//! - The configuration provider and per-worker specification builder
//! - The single-use REST client facade and the resource services
//! - Scenario suites, their dependency planning and the worker-pool runner

pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod ports;
pub mod scenario;
pub mod services;
pub mod specs;

#[cfg(test)]
#[allow(clippy::unwrap_used, missing_docs)]
mod test_support;

pub use client::RestClient;
pub use config::{ConfigProvider, DEFAULT_ENVIRONMENT, StaticConfigSource};
pub use context::WorkerContext;
pub use error::{ClientError, ClientResult, ScenarioError, ScenarioResult};
pub use ports::{
    Clock, ConfigError, ConfigSource, HttpClient, HttpClientError, ReportError, ReportWriter,
};
pub use scenario::{
    ExecutionPlan, GraphError, LifecycleListener, RetryOn, RetryPolicy, RunError, RunOutcome,
    Runner, Scenario, ScenarioContext, ScenarioFn, ScenarioFuture, Suite,
};
pub use services::{ProductService, UserService};
pub use specs::SpecBuilder;
