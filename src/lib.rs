//! docstress library
//!
//! Concurrent update stress testing for hierarchical document stores. Many
//! independent clients insert into, or delete from, one shared document
//! while the harness checks that no update is lost.
//!
//! # Backends
//!
//! - `memory` - in-process document store, useful for exercising the harness
//! - `surreal` - a running SurrealDB server, one database per store
//!
//! # CLI Usage
//!
//! ```bash
//! # 10 clients inserting 10 nodes each into an in-process store
//! docstress run --scenario insert --clients 10 --runs 10
//!
//! # Insert then delete against SurrealDB for the standard matrix
//! docstress suite --backend surreal --surreal-endpoint ws://localhost:8000
//! ```

pub mod cli;

pub use docstore_client::{Credential, DocumentService, Session, Statement, StoreError};
pub use stress_framework::{
    Orchestrator, RunContext, RunReport, ScenarioKind, StressConfig, StressError, SuiteOutcome,
};

use clap::{Parser, ValueEnum};
use docstore_memory::MemoryService;
use docstore_surreal::{SurrealConfig, SurrealService};
use std::sync::Arc;
use std::time::Duration;

/// Document store backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    Memory,
    Surreal,
}

#[derive(Parser, Clone, Debug)]
pub struct ServiceOpts {
    /// Document store backend
    #[arg(long, value_enum, default_value = "memory", env = "DOCSTRESS_BACKEND")]
    pub backend: Backend,

    /// SurrealDB endpoint URL
    #[arg(
        long,
        default_value = "ws://localhost:8000",
        env = "SURREAL_ENDPOINT"
    )]
    pub surreal_endpoint: String,

    /// SurrealDB username
    #[arg(long, default_value = "root", env = "SURREAL_USERNAME")]
    pub surreal_username: String,

    /// SurrealDB password
    #[arg(long, default_value = "root", env = "SURREAL_PASSWORD")]
    pub surreal_password: String,

    /// SurrealDB namespace holding the stress databases
    #[arg(long, default_value = "stress", env = "SURREAL_NAMESPACE")]
    pub surreal_namespace: String,
}

impl ServiceOpts {
    /// Credential sessions are opened with.
    pub fn credential(&self) -> Credential {
        match self.backend {
            Backend::Memory => Credential::default(),
            Backend::Surreal => {
                Credential::new(self.surreal_username.clone(), self.surreal_password.clone())
            }
        }
    }

    /// Build the document service for the selected backend.
    pub fn build_service(&self) -> Arc<dyn DocumentService> {
        match self.backend {
            Backend::Memory => Arc::new(MemoryService::new(self.credential())),
            Backend::Surreal => Arc::new(SurrealService::new(
                SurrealConfig {
                    endpoint: self.surreal_endpoint.clone(),
                    namespace: self.surreal_namespace.clone(),
                },
                self.credential(),
            )),
        }
    }
}

#[derive(Parser, Clone, Debug)]
pub struct StressOpts {
    /// Test identity; store names are derived from it
    #[arg(long, default_value = "docstress")]
    pub test_identity: String,

    /// Pause before each statement, in milliseconds
    #[arg(long, default_value = "100")]
    pub pacing_ms: u64,

    /// Cancel workers that have not finished after this many seconds
    #[arg(long)]
    pub deadline_secs: Option<u64>,
}

impl StressOpts {
    pub fn to_config(&self, credential: Credential) -> StressConfig {
        let config = StressConfig::new(self.test_identity.clone())
            .with_credential(credential)
            .with_pacing(Duration::from_millis(self.pacing_ms));
        match self.deadline_secs {
            Some(secs) => config.with_deadline(Duration::from_secs(secs)),
            None => config,
        }
    }
}

/// Build the run context from parsed options.
pub fn run_context(service: &ServiceOpts, stress: &StressOpts) -> RunContext {
    RunContext::new(service.build_service(), stress.to_config(service.credential()))
}
