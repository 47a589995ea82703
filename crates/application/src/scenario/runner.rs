//! Worker pool running planned suites
//!
//! Every chain of every suite becomes one unit of work in a shared queue.
//! A fixed number of tokio tasks pull units until the queue is empty; each
//! task owns one [`WorkerContext`] and runs its chains one after another.

use std::any::Any;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use futures::FutureExt;
use parking_lot::Mutex;
use restcheck_domain::{Report, ReportEntry, ScenarioStatus, WorkerId};
use thiserror::Error;
use tracing::{error, info, warn};

use super::{
    ExecutionPlan, GraphError, LifecycleListener, ReportSink, RetryPolicy, Scenario,
    ScenarioContext, Suite, TracingListener,
};
use crate::config::ConfigProvider;
use crate::context::WorkerContext;
use crate::error::ScenarioError;
use crate::ports::{Clock, ConfigError, HttpClient, ReportError, ReportWriter};

/// Report document title.
pub const REPORT_TITLE: &str = "API Automation Report";
/// Report heading.
pub const REPORT_NAME: &str = "REST API Test Results";
/// Worker pool size when none is configured.
pub const DEFAULT_WORKERS: usize = 4;

/// Failures that abort a run.
#[derive(Debug, Error)]
pub enum RunError {
    /// Settings could not be loaded before the first scenario.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A report artifact could not be written.
    #[error(transparent)]
    Report(#[from] ReportError),
}

/// What a completed run produced.
#[derive(Debug)]
pub struct RunOutcome {
    /// The finished report.
    pub report: Report,
    /// Files written by the report writers, in writer order.
    pub written: Vec<PathBuf>,
    /// Workers that stopped abnormally.
    pub worker_errors: Vec<String>,
}

impl RunOutcome {
    /// True if no scenario failed and every worker finished.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.report.summary().is_success() && self.worker_errors.is_empty()
    }
}

/// Runs suites over a worker pool and flushes the report.
pub struct Runner {
    config: Arc<ConfigProvider>,
    http: Arc<dyn HttpClient>,
    clock: Arc<dyn Clock>,
    workers: usize,
    retry: Option<RetryPolicy>,
    writers: Vec<Arc<dyn ReportWriter>>,
    listeners: Vec<Arc<dyn LifecycleListener>>,
    system_info: BTreeMap<String, String>,
    jobs: Vec<Box<dyn WorkUnit>>,
}

impl Runner {
    /// Creates a runner with the default pool size and a tracing listener.
    #[must_use]
    pub fn new(
        config: Arc<ConfigProvider>,
        http: Arc<dyn HttpClient>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            http,
            clock,
            workers: DEFAULT_WORKERS,
            retry: None,
            writers: Vec::new(),
            listeners: vec![Arc::new(TracingListener)],
            system_info: BTreeMap::new(),
            jobs: Vec::new(),
        }
    }

    /// Sets the pool size (at least one worker is always used).
    #[must_use]
    pub const fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Overrides the retry policy read from settings.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Adds a writer invoked at suite end.
    #[must_use]
    pub fn with_report_writer(mut self, writer: Arc<dyn ReportWriter>) -> Self {
        self.writers.push(writer);
        self
    }

    /// Adds a lifecycle observer.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn LifecycleListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Adds a system info line to the report.
    #[must_use]
    pub fn with_system_info(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.system_info.insert(key.into(), value.into());
        self
    }

    /// Plans `suite` and queues its chains.
    ///
    /// # Errors
    ///
    /// Returns the planning error; nothing is queued in that case.
    pub fn add_suite<S>(&mut self, suite: Suite<S>) -> Result<(), GraphError>
    where
        S: Default + Send + 'static,
    {
        let plan = Arc::new(suite.plan()?);
        let suite = Arc::new(suite);
        info!(
            suite = suite.name(),
            scenarios = plan.len(),
            chains = plan.chains().len(),
            "suite planned"
        );
        for chain in 0..plan.chains().len() {
            self.jobs.push(Box::new(ChainJob {
                suite: Arc::clone(&suite),
                plan: Arc::clone(&plan),
                chain,
            }));
        }
        Ok(())
    }

    /// Number of queued chains.
    #[must_use]
    pub fn chain_count(&self) -> usize {
        self.jobs.len()
    }

    /// Runs every queued chain, then writes the report.
    ///
    /// Configuration is loaded before any scenario runs and its cache is
    /// cleared once the report is written.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or a report writer
    /// fails. Scenario failures are reported, not returned.
    pub async fn run(self) -> Result<RunOutcome, RunError> {
        let Self {
            config,
            http,
            clock,
            workers,
            retry,
            writers,
            listeners,
            system_info,
            jobs,
        } = self;

        let settings = config.settings()?;
        let retry = match retry {
            Some(retry) => retry,
            None => RetryPolicy::from_settings(&settings).map_err(|source| ConfigError::Invalid {
                environment: settings.environment.clone(),
                source,
            })?,
        };

        let mut report = Report::new(REPORT_TITLE, REPORT_NAME, clock.now())
            .with_system_info("Environment", settings.environment.as_str())
            .with_system_info("Base URL", settings.base_url.as_str());
        report.system_info.extend(system_info);
        for listener in &listeners {
            listener.on_suite_start(&report);
        }

        let env = Arc::new(RunEnv {
            sink: ReportSink::new(report),
            retry,
            listeners,
        });

        let pool = workers.max(1).min(jobs.len());
        info!(workers = pool, chains = jobs.len(), max_retries = retry.max_retries, retry_on = %retry.on, "starting workers");
        let queue = Arc::new(Mutex::new(VecDeque::from(jobs)));

        let mut handles = Vec::with_capacity(pool);
        for n in 1..=pool {
            let id = WorkerId(n);
            let mut worker = WorkerContext::new(
                id,
                Arc::clone(&settings),
                Arc::clone(&http),
                Arc::clone(&clock),
            );
            let queue = Arc::clone(&queue);
            let env = Arc::clone(&env);
            let handle = tokio::spawn(async move {
                loop {
                    let job = queue.lock().pop_front();
                    let Some(job) = job else { break };
                    job.run(&mut worker, &env).await;
                }
            });
            handles.push((id, handle));
        }

        let mut worker_errors = Vec::new();
        for (id, handle) in handles {
            if let Err(e) = handle.await {
                error!(worker = %id, error = %e, "worker stopped abnormally");
                worker_errors.push(format!("{id}: {e}"));
            }
        }

        let report = env.sink.finish(clock.now());
        let mut written = Vec::with_capacity(writers.len());
        for writer in &writers {
            let path = writer.write(&report)?;
            for listener in &env.listeners {
                listener.on_report_written(&path);
            }
            written.push(path);
        }
        for listener in &env.listeners {
            listener.on_suite_end(&report);
        }
        config.clear();

        Ok(RunOutcome {
            report,
            written,
            worker_errors,
        })
    }
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("workers", &self.workers)
            .field("retry", &self.retry)
            .field("chains", &self.jobs.len())
            .finish_non_exhaustive()
    }
}

struct RunEnv {
    sink: ReportSink,
    retry: RetryPolicy,
    listeners: Vec<Arc<dyn LifecycleListener>>,
}

impl RunEnv {
    fn notify(&self, event: impl Fn(&dyn LifecycleListener)) {
        for listener in &self.listeners {
            event(listener.as_ref());
        }
    }
}

/// A chain with its suite type erased.
#[async_trait]
trait WorkUnit: Send {
    async fn run(self: Box<Self>, worker: &mut WorkerContext, env: &RunEnv);
}

struct ChainJob<S> {
    suite: Arc<Suite<S>>,
    plan: Arc<ExecutionPlan>,
    chain: usize,
}

#[async_trait]
impl<S> WorkUnit for ChainJob<S>
where
    S: Default + Send + 'static,
{
    async fn run(self: Box<Self>, worker: &mut WorkerContext, env: &RunEnv) {
        let Some(chain) = self.plan.chains().get(self.chain) else {
            return;
        };
        let suite = self.suite.as_ref();
        let scenarios = suite.scenarios();
        let names: Vec<&str> = chain.iter().map(|&i| scenarios[i].name()).collect();
        env.notify(|l| l.on_chain_start(worker.id(), suite.name(), &names));

        let mut state = S::default();
        let mut blocked: HashMap<usize, String> = HashMap::new();

        for &index in chain {
            let scenario = &scenarios[index];
            worker.specs().reset();
            let mut entry = ReportEntry::new(
                scenario.name(),
                scenario.description(),
                suite.name(),
                worker.id(),
                worker.clock().now(),
            );
            env.notify(|l| l.on_scenario_start(&entry));
            let started = Instant::now();

            let (status, reason) = if let Some(reason) = blocked.get(&index) {
                entry.skip(reason.as_str());
                (ScenarioStatus::Skipped, Some(reason.clone()))
            } else if scenario.is_enabled() {
                run_with_retry(scenario, worker, &mut state, &mut entry, env.retry).await
            } else {
                let reason = "scenario is disabled".to_string();
                entry.skip(reason.as_str());
                (ScenarioStatus::Skipped, Some(reason))
            };
            entry.finish(status, started.elapsed(), reason);

            if status != ScenarioStatus::Passed {
                for &dependent in self.plan.dependents(index) {
                    blocked.entry(dependent).or_insert_with(|| {
                        format!("dependency '{}' {status}", scenario.name())
                    });
                }
            }

            worker.clear_caches();
            env.notify(|l| l.on_scenario_end(&entry));
            env.sink.record(entry);
        }

        env.notify(|l| l.on_chain_end(worker.id(), suite.name()));
    }
}

async fn run_with_retry<S: Send>(
    scenario: &Scenario<S>,
    worker: &mut WorkerContext,
    state: &mut S,
    entry: &mut ReportEntry,
    retry: RetryPolicy,
) -> (ScenarioStatus, Option<String>) {
    let mut attempts = 0;
    loop {
        attempts += 1;
        entry.attempts = attempts;

        let attempt = async {
            scenario
                .call(ScenarioContext {
                    worker: &mut *worker,
                    state: &mut *state,
                    entry: &mut *entry,
                })
                .await
        };
        let result = AssertUnwindSafe(attempt)
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(ScenarioError::Panicked(panic_message(&*payload))));

        match result {
            Ok(()) => {
                entry.pass("test passed");
                return (ScenarioStatus::Passed, None);
            }
            Err(e) if retry.should_retry(&e, attempts) => {
                warn!(
                    worker = %worker.id(),
                    scenario = scenario.name(),
                    attempts,
                    error = %e,
                    "retrying scenario"
                );
                entry.warning(format!("attempt {attempts} failed, retrying: {e}"));
                worker.specs().reset();
            }
            Err(e) => {
                let message = e.to_string();
                entry.fail(message.as_str());
                return (ScenarioStatus::Failed, Some(message));
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}
