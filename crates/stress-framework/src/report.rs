//! Run report types.

use crate::scenario::{ScenarioKind, ScenarioSpec};
use chrono::{DateTime, Utc};
use docstore_client::StoreError;
use serde::{Deserialize, Serialize};

/// Where in a worker's life a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerErrorKind {
    /// Opening the session failed; no statement ran.
    Open,
    /// One statement execution failed.
    Execute,
    /// Closing the session failed.
    Close,
    /// The run deadline elapsed before the worker finished.
    Cancelled,
    /// The worker task panicked.
    Panicked,
}

/// One recorded failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerError {
    pub worker_index: usize,
    /// 1-based iteration, if the failure belongs to one.
    pub iteration: Option<usize>,
    pub kind: WorkerErrorKind,
    pub message: String,
}

impl WorkerError {
    pub fn new(
        worker_index: usize,
        iteration: Option<usize>,
        kind: WorkerErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            worker_index,
            iteration,
            kind,
            message: message.into(),
        }
    }

    pub fn from_store(
        worker_index: usize,
        iteration: Option<usize>,
        kind: WorkerErrorKind,
        err: &StoreError,
    ) -> Self {
        Self::new(worker_index, iteration, kind, err.to_string())
    }
}

impl std::fmt::Display for WorkerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.iteration {
            Some(iteration) => write!(
                f,
                "worker {} iteration {} ({:?}): {}",
                self.worker_index, iteration, self.kind, self.message
            ),
            None => write!(
                f,
                "worker {} ({:?}): {}",
                self.worker_index, self.kind, self.message
            ),
        }
    }
}

/// Outcome of one worker, produced exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerResult {
    pub worker_index: usize,
    /// Statements that completed successfully.
    pub statements_executed: usize,
    #[serde(default)]
    pub errors: Vec<WorkerError>,
    pub duration_ms: u64,
}

impl WorkerResult {
    pub fn new(worker_index: usize) -> Self {
        Self {
            worker_index,
            statements_executed: 0,
            errors: Vec::new(),
            duration_ms: 0,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.errors.is_empty()
    }

    /// Failed statement executions, excluding open/close failures.
    pub fn failed_statements(&self) -> usize {
        self.errors
            .iter()
            .filter(|e| e.kind == WorkerErrorKind::Execute)
            .count()
    }
}

/// Expected vs observed children after the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildCountCheck {
    pub expected: usize,
    pub observed: usize,
}

impl ChildCountCheck {
    pub fn passed(&self) -> bool {
        self.expected == self.observed
    }
}

/// Aggregated outcome of one orchestrated run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub scenario: ScenarioKind,
    pub store: String,
    pub client_count: usize,
    pub runs_per_client: usize,
    /// Children provisioned before workers started.
    pub precondition_count: usize,
    /// Number of workers; always equals `client_count`.
    pub total: usize,
    /// Workers that recorded at least one error.
    pub failed: usize,
    /// Every recorded failure across all workers.
    pub errors: Vec<WorkerError>,
    /// Per-worker results, ordered by worker index.
    pub workers: Vec<WorkerResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_count: Option<ChildCountCheck>,
    /// Failure to read the final child count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_error: Option<String>,
    /// Failure to drop the store. Never replaces worker errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teardown_error: Option<String>,
    /// The deadline elapsed and the workers were cancelled.
    pub timed_out: bool,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl RunReport {
    /// Aggregate worker results into a report.
    pub fn from_results(
        spec: &ScenarioSpec,
        store: &str,
        mut workers: Vec<WorkerResult>,
        started_at: DateTime<Utc>,
    ) -> Self {
        workers.sort_by_key(|w| w.worker_index);
        let total = workers.len();
        let failed = workers.iter().filter(|w| !w.succeeded()).count();
        let errors = workers.iter().flat_map(|w| w.errors.clone()).collect();

        Self {
            scenario: spec.kind,
            store: store.to_string(),
            client_count: spec.client_count,
            runs_per_client: spec.repeat_count,
            precondition_count: spec.required_precondition_count,
            total,
            failed,
            errors,
            workers,
            child_count: None,
            verification_error: None,
            teardown_error: None,
            timed_out: false,
            started_at,
            duration_ms: 0,
        }
    }

    /// No worker failed, the child count matched and teardown succeeded.
    pub fn passed(&self) -> bool {
        self.failed == 0
            && !self.timed_out
            && self.verification_error.is_none()
            && self.teardown_error.is_none()
            && self.child_count.map(|c| c.passed()).unwrap_or(false)
    }

    /// Statements that completed successfully across all workers.
    pub fn statements_executed(&self) -> usize {
        self.workers.iter().map(|w| w.statements_executed).sum()
    }

    /// Statement executions that failed across all workers.
    pub fn failed_statements(&self) -> usize {
        self.workers.iter().map(|w| w.failed_statements()).sum()
    }

    /// Generate a summary string.
    pub fn summary(&self) -> String {
        let status_str = if self.passed() { "PASSED" } else { "FAILED" };

        let mut summary = format!(
            "Stress Run Report: {}\n\
             ==================\n\
             Scenario: {}\n\
             Store: {}\n\
             Clients: {}  Runs per client: {}\n\
             Precondition: {} children\n\n",
            status_str,
            self.scenario,
            self.store,
            self.client_count,
            self.runs_per_client,
            self.precondition_count
        );

        summary.push_str(&format!(
            "Results:\n\
             - Workers: {} total, {} failed\n\
             - Statements: {} executed, {} failed\n",
            self.total,
            self.failed,
            self.statements_executed(),
            self.failed_statements()
        ));

        if let Some(check) = self.child_count {
            summary.push_str(&format!(
                "- Children: {} expected, {} observed\n",
                check.expected, check.observed
            ));
        }
        if self.timed_out {
            summary.push_str("- Deadline elapsed, workers cancelled\n");
        }
        summary.push_str(&format!("- Duration: {}ms\n", self.duration_ms));

        if let Some(ref err) = self.verification_error {
            summary.push_str(&format!("\nVerification error: {err}\n"));
        }
        if let Some(ref err) = self.teardown_error {
            summary.push_str(&format!("\nTeardown error: {err}\n"));
        }
        if !self.errors.is_empty() {
            summary.push_str("\nErrors:\n");
            for error in &self.errors {
                summary.push_str(&format!("- {error}\n"));
            }
        }

        summary
    }
}
