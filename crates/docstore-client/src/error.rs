//! Error types reported by document store collaborators.

use thiserror::Error;

/// Errors a document service or session can report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A store with this name already exists.
    #[error("Store already exists: {0}")]
    StoreAlreadyExists(String),

    /// No store with this name exists.
    #[error("Store not found: {0}")]
    StoreNotFound(String),

    /// The service refused a service-level operation.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The credential was rejected.
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The endpoint could not be reached.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The statement was malformed or referenced something unknown.
    #[error("Statement error: {0}")]
    StatementError(String),

    /// The statement failed while running.
    #[error("Execution error: {0}")]
    ExecutionError(String),

    /// The session was used after it was closed.
    #[error("Session already closed")]
    SessionClosed,
}

impl StoreError {
    /// Short machine-friendly name of the error variant.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::StoreAlreadyExists(_) => "store_already_exists",
            StoreError::StoreNotFound(_) => "store_not_found",
            StoreError::ServiceUnavailable(_) => "service_unavailable",
            StoreError::AuthenticationError(_) => "authentication",
            StoreError::ConnectionError(_) => "connection",
            StoreError::StatementError(_) => "statement",
            StoreError::ExecutionError(_) => "execution",
            StoreError::SessionClosed => "session_closed",
        }
    }
}
