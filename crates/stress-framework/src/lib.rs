//! Concurrent update stress testing for document stores.
//!
//! Many independent clients each run the same mutating statement a fixed
//! number of times against one shared store, and the run is checked
//! against the child count the scenario predicts:
//! 1. Create the store and size its shared state for the scenario
//! 2. Spawn one worker per client, each with its own session
//! 3. Wait for every worker (optionally bounded by a deadline)
//! 4. Read the final child count, then drop the store
//!
//! Worker failures are never raised; they are collected on the
//! `RunReport` so the caller decides pass or fail.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use stress_framework::{Orchestrator, RunContext, ScenarioKind, StressConfig};
//!
//! let service = Arc::new(docstore_memory::MemoryService::default());
//! let context = RunContext::new(service, StressConfig::new("insert_test"));
//! let report = Orchestrator::new(context)
//!     .execute(10, 10, ScenarioKind::Insert)
//!     .await?;
//! assert!(report.passed());
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod orchestrator;
pub mod report;
pub mod scenario;
pub mod session;
pub mod worker;

pub use config::{RunContext, StressConfig, DEFAULT_CLOSE_TIMEOUT, DEFAULT_PACING};
pub use error::StressError;
pub use orchestrator::{Orchestrator, SuiteOutcome, STANDARD_MATRIX};
pub use report::{ChildCountCheck, RunReport, WorkerError, WorkerErrorKind, WorkerResult};
pub use scenario::{ScenarioKind, ScenarioSpec, StatementTemplate, DELETE_SAFETY_MARGIN};
pub use session::{close_within, SessionFactory};
pub use worker::Worker;
