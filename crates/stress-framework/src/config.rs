//! Configuration types for stress runs.

use crate::scenario::ScenarioKind;
use crate::session::SessionFactory;
use docstore_client::{Credential, DocumentService};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Default pause before each statement a worker executes.
pub const DEFAULT_PACING: Duration = Duration::from_millis(100);

/// Default upper bound on closing one session.
pub const DEFAULT_CLOSE_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for a stress run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressConfig {
    /// Identity of the test; store names are derived from it.
    pub test_identity: String,
    /// Credential every session is opened with.
    pub credential: Credential,
    /// Pause before each statement.
    pub pacing: Duration,
    /// Upper bound on the wait for all workers (None = wait forever).
    pub deadline: Option<Duration>,
    /// Upper bound on closing each worker's session.
    pub close_timeout: Duration,
    /// Name of the document's root element.
    pub root_name: String,
    /// Name of the child elements scenarios insert and delete.
    pub child_name: String,
}

impl StressConfig {
    /// Create a configuration with defaults for the given test identity.
    pub fn new(test_identity: impl Into<String>) -> Self {
        Self {
            test_identity: test_identity.into(),
            credential: Credential::default(),
            pacing: DEFAULT_PACING,
            deadline: None,
            close_timeout: DEFAULT_CLOSE_TIMEOUT,
            root_name: "doc".to_string(),
            child_name: "node".to_string(),
        }
    }

    /// Set the session credential.
    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = credential;
        self
    }

    /// Set the pause before each statement.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Bound the wait for all workers.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_close_timeout(mut self, close_timeout: Duration) -> Self {
        self.close_timeout = close_timeout;
        self
    }

    /// Set the root and child element names.
    pub fn with_element_names(
        mut self,
        root_name: impl Into<String>,
        child_name: impl Into<String>,
    ) -> Self {
        self.root_name = root_name.into();
        self.child_name = child_name.into();
        self
    }

    /// Store name for one run: `<identity>_<scenario>_c<clients>_r<runs>`.
    ///
    /// Only `[A-Za-z0-9_]` survives, and the name never starts with a digit.
    pub fn store_name(&self, scenario: ScenarioKind, clients: usize, runs: usize) -> String {
        let identity: String = self
            .test_identity
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        let name = format!("{identity}_{scenario}_c{clients}_r{runs}");
        if name.starts_with(|c: char| c.is_ascii_digit()) {
            format!("s_{name}")
        } else {
            name
        }
    }
}

impl Default for StressConfig {
    fn default() -> Self {
        Self::new("stress")
    }
}

/// Everything one run needs: the collaborator and the configuration.
#[derive(Clone)]
pub struct RunContext {
    pub service: Arc<dyn DocumentService>,
    pub config: StressConfig,
}

impl RunContext {
    pub fn new(service: Arc<dyn DocumentService>, config: StressConfig) -> Self {
        Self { service, config }
    }

    /// Factory handing out sessions with the configured credential.
    pub fn session_factory(&self) -> SessionFactory {
        SessionFactory::new(Arc::clone(&self.service), self.config.credential.clone())
    }
}
