//! Stress run orchestration.

use crate::config::RunContext;
use crate::error::StressError;
use crate::report::{ChildCountCheck, RunReport, WorkerError, WorkerErrorKind, WorkerResult};
use crate::scenario::{ScenarioKind, ScenarioSpec};
use crate::session::{close_within, SessionFactory};
use crate::worker::Worker;
use chrono::Utc;
use docstore_client::StoreError;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// (clients, runs per client) configurations exercised by a full suite.
pub const STANDARD_MATRIX: [(usize, usize); 4] = [(10, 10), (10, 50), (50, 10), (50, 50)];

/// Outcome of one scenario within a suite.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SuiteOutcome {
    /// The scenario ran; inspect the report for pass/fail.
    Completed(Box<RunReport>),
    /// The configuration was invalid for this scenario; nothing ran.
    Rejected { scenario: ScenarioKind, reason: String },
    /// Store creation or precondition setup failed.
    Aborted { scenario: ScenarioKind, reason: String },
}

impl SuiteOutcome {
    pub fn scenario(&self) -> ScenarioKind {
        match self {
            SuiteOutcome::Completed(report) => report.scenario,
            SuiteOutcome::Rejected { scenario, .. } | SuiteOutcome::Aborted { scenario, .. } => {
                *scenario
            }
        }
    }

    /// Only completed, passing runs count as passed.
    pub fn passed(&self) -> bool {
        matches!(self, SuiteOutcome::Completed(report) if report.passed())
    }

    /// Completed runs that did not pass and aborted runs. Rejected
    /// configurations never ran, so they are not failures.
    pub fn failed(&self) -> bool {
        match self {
            SuiteOutcome::Completed(report) => !report.passed(),
            SuiteOutcome::Rejected { .. } => false,
            SuiteOutcome::Aborted { .. } => true,
        }
    }
}

/// Drives concurrent workers against one shared store per run.
pub struct Orchestrator {
    context: RunContext,
}

impl Orchestrator {
    pub fn new(context: RunContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &RunContext {
        &self.context
    }

    /// Run one scenario with `client_count` workers of `runs_per_client`
    /// statements each.
    ///
    /// Returns `Err` only when the run could not start: invalid counts or a
    /// failed setup. Everything that goes wrong afterwards is on the report.
    pub async fn execute(
        &self,
        client_count: usize,
        runs_per_client: usize,
        scenario: ScenarioKind,
    ) -> Result<RunReport, StressError> {
        let config = &self.context.config;
        let spec = scenario.spec(client_count, runs_per_client, &config.child_name)?;
        let store = config.store_name(scenario, client_count, runs_per_client);
        let factory = self.context.session_factory();

        let started_at = Utc::now();
        let start = Instant::now();

        info!(
            "Starting {} stress run on {}: {} clients x {} runs",
            scenario, store, client_count, runs_per_client
        );

        self.setup(&factory, &store, &spec).await?;

        // Concurrent phase
        let statement = spec.statement_template.bind(&store);
        let cancel = CancellationToken::new();
        let handles: Vec<JoinHandle<WorkerResult>> = (0..client_count)
            .map(|index| {
                let worker = Worker::new(
                    index,
                    factory.clone(),
                    statement.clone(),
                    spec.repeat_count,
                    config.pacing,
                    cancel.child_token(),
                )
                .with_close_timeout(config.close_timeout);
                tokio::spawn(worker.run())
            })
            .collect();

        let (results, timed_out) = self.await_all(handles, &cancel).await;

        let mut report = RunReport::from_results(&spec, &store, results, started_at);
        report.timed_out = timed_out;

        // Post-conditions, then teardown on every path
        match self.count_children(&factory, &store).await {
            Ok(observed) => {
                report.child_count = Some(ChildCountCheck {
                    expected: spec.expected_children,
                    observed,
                });
            }
            Err(e) => {
                warn!("Could not read final child count of {}: {}", store, e);
                report.verification_error = Some(e.to_string());
            }
        }

        if let Err(e) = self.context.service.drop_store(&store).await {
            error!("Teardown of {} failed: {}", store, e);
            report.teardown_error = Some(e.to_string());
        }

        report.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            "{} stress run on {} finished in {}ms: {}/{} workers failed, {}",
            scenario,
            store,
            report.duration_ms,
            report.failed,
            report.total,
            if report.passed() { "PASSED" } else { "FAILED" }
        );

        Ok(report)
    }

    /// Run every scenario with the same counts, each against a fresh store.
    pub async fn run_suite(&self, client_count: usize, runs_per_client: usize) -> Vec<SuiteOutcome> {
        let mut outcomes = Vec::with_capacity(ScenarioKind::ALL.len());

        for scenario in ScenarioKind::ALL {
            let outcome = match self.execute(client_count, runs_per_client, scenario).await {
                Ok(report) => SuiteOutcome::Completed(Box::new(report)),
                Err(e @ StressError::InvalidConfiguration(_)) => {
                    warn!("Skipping {} scenario: {}", scenario, e);
                    SuiteOutcome::Rejected {
                        scenario,
                        reason: e.to_string(),
                    }
                }
                Err(e @ StressError::Setup { .. }) => {
                    error!("{} scenario aborted: {}", scenario, e);
                    SuiteOutcome::Aborted {
                        scenario,
                        reason: e.to_string(),
                    }
                }
            };
            outcomes.push(outcome);
        }

        outcomes
    }

    /// Create the store and provision the scenario's shared state.
    ///
    /// On failure the store is dropped again, best effort.
    async fn setup(
        &self,
        factory: &SessionFactory,
        store: &str,
        spec: &ScenarioSpec,
    ) -> Result<(), StressError> {
        let config = &self.context.config;
        self.context
            .service
            .create_store(store, &config.root_name)
            .await
            .map_err(|e| StressError::setup(store, e))?;

        if spec.required_precondition_count == 0 {
            return Ok(());
        }

        let prepared: Result<(), StoreError> = async {
            let mut session = factory.open().await?;
            let outcome = spec.prepare(session.as_mut(), store).await;
            let closed = close_within(session.as_mut(), config.close_timeout).await;
            outcome.and(closed)
        }
        .await;

        if let Err(e) = prepared {
            error!("Precondition setup for {} failed: {}", store, e);
            if let Err(drop_err) = self.context.service.drop_store(store).await {
                warn!("Could not drop {} after failed setup: {}", store, drop_err);
            }
            return Err(StressError::setup(store, e));
        }

        info!(
            "Provisioned {} <{}/> children in {}",
            spec.required_precondition_count, config.child_name, store
        );
        Ok(())
    }

    /// Full barrier over all workers, bounded by the configured deadline.
    ///
    /// When the deadline elapses every worker is cancelled and still
    /// awaited, so each one closes its session and reports.
    async fn await_all(
        &self,
        handles: Vec<JoinHandle<WorkerResult>>,
        cancel: &CancellationToken,
    ) -> (Vec<WorkerResult>, bool) {
        let mut joined = Box::pin(join_all(handles));

        let mut timed_out = false;
        let outcomes = match self.context.config.deadline {
            Some(deadline) => match tokio::time::timeout(deadline, &mut joined).await {
                Ok(outcomes) => outcomes,
                Err(_) => {
                    warn!(
                        "Workers did not finish within {:?}; cancelling",
                        deadline
                    );
                    timed_out = true;
                    cancel.cancel();
                    joined.await
                }
            },
            None => joined.await,
        };

        let results = outcomes
            .into_iter()
            .enumerate()
            .map(|(index, outcome)| match outcome {
                Ok(result) => result,
                Err(e) => {
                    error!("Worker {} did not complete: {}", index, e);
                    let mut result = WorkerResult::new(index);
                    result.errors.push(WorkerError::new(
                        index,
                        None,
                        WorkerErrorKind::Panicked,
                        e.to_string(),
                    ));
                    result
                }
            })
            .collect();

        (results, timed_out)
    }

    async fn count_children(
        &self,
        factory: &SessionFactory,
        store: &str,
    ) -> Result<usize, StoreError> {
        let mut session = factory.open().await?;
        let counted = session
            .count_children(store, &self.context.config.child_name)
            .await;
        let closed = close_within(session.as_mut(), self.context.config.close_timeout).await;
        let count = counted?;
        closed?;
        Ok(count)
    }
}
