//! Scenarios, suites and their execution
//!
//! A [`Suite`] is a named list of [`Scenario`]s sharing a state type `S`.
//! Scenarios declare predecessors by name; the suite is planned into chains
//! that the [`Runner`] spreads over a pool of workers.

mod check;
mod graph;
mod lifecycle;
mod retry;
mod runner;
mod sink;

use std::future::Future;
use std::pin::Pin;

use restcheck_domain::ReportEntry;

use crate::context::WorkerContext;
use crate::error::ScenarioResult;

pub use check::{ensure, ensure_eq, ensure_status};
pub use graph::{ExecutionPlan, GraphError};
pub use lifecycle::{LifecycleListener, TracingListener};
pub use retry::{DEFAULT_MAX_RETRIES, MAX_RETRIES_KEY, RETRY_ON_KEY, RetryOn, RetryPolicy};
pub use runner::{DEFAULT_WORKERS, REPORT_NAME, REPORT_TITLE, RunError, RunOutcome, Runner};
pub use sink::ReportSink;

/// Future returned by a scenario body.
pub type ScenarioFuture<'a> = Pin<Box<dyn Future<Output = ScenarioResult> + Send + 'a>>;

/// A scenario body.
///
/// Written as a plain function returning a boxed async block:
///
/// ```ignore
/// fn get_all_users(cx: ScenarioContext<'_, UserState>) -> ScenarioFuture<'_> {
///     boxed(async move {
///         let response = UserService::new().get_all_users(cx.worker).await?;
///         ensure_status(&response, 200)
///     })
/// }
/// ```
pub type ScenarioFn<S> = for<'a> fn(ScenarioContext<'a, S>) -> ScenarioFuture<'a>;

/// Boxes the async block of a scenario body.
pub fn boxed<'a, F>(body: F) -> ScenarioFuture<'a>
where
    F: Future<Output = ScenarioResult> + Send + 'a,
{
    Box::pin(body)
}

/// What a scenario body can touch while it runs.
pub struct ScenarioContext<'a, S> {
    /// The worker running the scenario.
    pub worker: &'a mut WorkerContext,
    /// State shared with the other scenarios of the same chain.
    pub state: &'a mut S,
    /// The scenario's report entry, for log lines.
    pub entry: &'a mut ReportEntry,
}

impl<S> std::fmt::Debug for ScenarioContext<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioContext")
            .field("worker", &self.worker.id())
            .field("entry", &self.entry.name)
            .finish_non_exhaustive()
    }
}

/// One named, dependency-aware test case.
pub struct Scenario<S> {
    name: String,
    description: String,
    depends_on: Vec<String>,
    enabled: bool,
    body: ScenarioFn<S>,
}

impl<S> Scenario<S> {
    /// Creates an enabled scenario with no predecessors.
    #[must_use]
    pub fn new(name: impl Into<String>, body: ScenarioFn<S>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            depends_on: Vec::new(),
            enabled: true,
            body,
        }
    }

    /// Sets the description shown in the report.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Adds a predecessor that must pass first.
    #[must_use]
    pub fn depends_on(mut self, scenario: impl Into<String>) -> Self {
        self.depends_on.push(scenario.into());
        self
    }

    /// Marks the scenario as disabled; it is reported as skipped.
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Scenario name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scenario description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Declared predecessors.
    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        &self.depends_on
    }

    /// False if the scenario should not run.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Runs the body once.
    pub fn call<'a>(&self, cx: ScenarioContext<'a, S>) -> ScenarioFuture<'a> {
        (self.body)(cx)
    }
}

impl<S> Clone for Scenario<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            description: self.description.clone(),
            depends_on: self.depends_on.clone(),
            enabled: self.enabled,
            body: self.body,
        }
    }
}

impl<S> std::fmt::Debug for Scenario<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("depends_on", &self.depends_on)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

/// A category of scenarios sharing one state type.
pub struct Suite<S> {
    name: String,
    scenarios: Vec<Scenario<S>>,
}

impl<S> Suite<S> {
    /// Creates an empty suite.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scenarios: Vec::new(),
        }
    }

    /// Appends a scenario.
    #[must_use]
    pub fn with_scenario(mut self, scenario: Scenario<S>) -> Self {
        self.scenarios.push(scenario);
        self
    }

    /// Suite (category) name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scenarios in declaration order.
    #[must_use]
    pub fn scenarios(&self) -> &[Scenario<S>] {
        &self.scenarios
    }

    /// Resolves the dependency graph.
    ///
    /// # Errors
    ///
    /// See [`GraphError`].
    pub fn plan(&self) -> Result<ExecutionPlan, GraphError> {
        ExecutionPlan::resolve(
            &self.name,
            self.scenarios
                .iter()
                .map(|s| (s.name(), s.dependencies())),
        )
    }
}

impl<S> std::fmt::Debug for Suite<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Suite")
            .field("name", &self.name)
            .field("scenarios", &self.scenarios)
            .finish()
    }
}
