//! Mutation scenarios and the shared state they require.

use crate::error::StressError;
use docstore_client::{Session, Statement, StoreError};
use serde::{Deserialize, Serialize};

/// Fixed number of extra nodes provisioned for the delete scenario, on top
/// of `clients²`.
pub const DELETE_SAFETY_MARGIN: usize = 100;

/// A named mutation pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioKind {
    /// Every statement appends one leaf under the root.
    Insert,
    /// Every statement removes the first leaf under the root.
    Delete,
}

impl ScenarioKind {
    /// Scenarios in the order a suite runs them.
    pub const ALL: [ScenarioKind; 2] = [ScenarioKind::Insert, ScenarioKind::Delete];

    /// Reject counts that cannot produce a meaningful run.
    pub fn validate(&self, clients: usize, runs: usize) -> Result<(), StressError> {
        if clients == 0 {
            return Err(StressError::InvalidConfiguration(
                "client count must be at least 1".to_string(),
            ));
        }
        if runs == 0 {
            return Err(StressError::InvalidConfiguration(
                "runs per client must be at least 1".to_string(),
            ));
        }

        let consumed = clients.checked_mul(runs).ok_or_else(|| {
            StressError::InvalidConfiguration(format!("{clients} x {runs} statements overflow"))
        })?;

        if let ScenarioKind::Delete = self {
            let available = delete_precondition_count(clients)?;
            if available < consumed {
                return Err(StressError::InvalidConfiguration(format!(
                    "delete scenario provisions {available} nodes but {clients} clients x \
                     {runs} runs would delete {consumed}"
                )));
            }
        }
        Ok(())
    }

    /// Build the `ScenarioSpec` for validated counts.
    pub fn spec(&self, clients: usize, runs: usize, child: &str) -> Result<ScenarioSpec, StressError> {
        self.validate(clients, runs)?;
        let consumed = clients * runs;

        let spec = match self {
            ScenarioKind::Insert => ScenarioSpec {
                kind: *self,
                statement_template: StatementTemplate::InsertChild {
                    child: child.to_string(),
                },
                client_count: clients,
                repeat_count: runs,
                required_precondition_count: 0,
                expected_children: consumed,
            },
            ScenarioKind::Delete => {
                let provisioned = delete_precondition_count(clients)?;
                ScenarioSpec {
                    kind: *self,
                    statement_template: StatementTemplate::DeleteFirstChild {
                        child: child.to_string(),
                    },
                    client_count: clients,
                    repeat_count: runs,
                    required_precondition_count: provisioned,
                    expected_children: provisioned - consumed,
                }
            }
        };
        Ok(spec)
    }
}

/// `DELETE_SAFETY_MARGIN + clients²`.
fn delete_precondition_count(clients: usize) -> Result<usize, StressError> {
    clients
        .checked_mul(clients)
        .and_then(|squared| squared.checked_add(DELETE_SAFETY_MARGIN))
        .ok_or_else(|| {
            StressError::InvalidConfiguration(format!(
                "delete precondition for {clients} clients overflows"
            ))
        })
}

impl std::fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioKind::Insert => write!(f, "insert"),
            ScenarioKind::Delete => write!(f, "delete"),
        }
    }
}

impl std::str::FromStr for ScenarioKind {
    type Err = StressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "insert" => Ok(ScenarioKind::Insert),
            "delete" => Ok(ScenarioKind::Delete),
            _ => Err(StressError::InvalidConfiguration(format!(
                "Invalid scenario: '{s}'. Expected 'insert' or 'delete'"
            ))),
        }
    }
}

/// A statement shape not yet bound to a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatementTemplate {
    InsertChild { child: String },
    DeleteFirstChild { child: String },
}

impl StatementTemplate {
    pub fn bind(&self, store: &str) -> Statement {
        match self {
            StatementTemplate::InsertChild { child } => Statement::InsertChild {
                store: store.to_string(),
                child: child.clone(),
            },
            StatementTemplate::DeleteFirstChild { child } => Statement::DeleteFirstChild {
                store: store.to_string(),
                child: child.clone(),
            },
        }
    }

    fn child(&self) -> &str {
        match self {
            StatementTemplate::InsertChild { child }
            | StatementTemplate::DeleteFirstChild { child } => child,
        }
    }
}

/// Immutable description of one scenario run, computed before any worker
/// starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSpec {
    pub kind: ScenarioKind,
    pub statement_template: StatementTemplate,
    pub client_count: usize,
    /// Statements each worker executes.
    pub repeat_count: usize,
    /// Children that must exist under the root before workers start.
    pub required_precondition_count: usize,
    /// Children the root holds once every statement has succeeded.
    pub expected_children: usize,
}

impl ScenarioSpec {
    /// Provision the shared state with a single sequential statement.
    pub async fn prepare(&self, session: &mut dyn Session, store: &str) -> Result<(), StoreError> {
        if self.required_precondition_count == 0 {
            return Ok(());
        }
        let bulk = Statement::BulkInsert {
            store: store.to_string(),
            child: self.statement_template.child().to_string(),
            count: self.required_precondition_count,
        };
        session.execute(&bulk).await?;

        let present = session
            .count_children(store, self.statement_template.child())
            .await?;
        if present != self.required_precondition_count {
            return Err(StoreError::ExecutionError(format!(
                "precondition expected {} children, found {}",
                self.required_precondition_count, present
            )));
        }
        Ok(())
    }
}
