//! Trait definitions for document store collaborators.

use crate::{Credential, Statement, StoreError};

/// Service-level operations on named stores.
///
/// Implementations are shared by every worker of a run, so they must be
/// cheap to call concurrently. Sessions they hand out are not shared.
#[async_trait::async_trait]
pub trait DocumentService: Send + Sync {
    /// Create a store whose document is an empty root element named `root`.
    ///
    /// Fails with `StoreAlreadyExists` or `ServiceUnavailable`.
    async fn create_store(&self, name: &str, root: &str) -> Result<(), StoreError>;

    /// Open a new session authenticated with `credential`.
    ///
    /// Fails with `AuthenticationError` or `ConnectionError`.
    async fn open_session(&self, credential: &Credential) -> Result<Box<dyn Session>, StoreError>;

    /// Drop a store. Dropping a missing store fails with `StoreNotFound`.
    async fn drop_store(&self, name: &str) -> Result<(), StoreError>;
}

/// A client connection owned by exactly one worker.
#[async_trait::async_trait]
pub trait Session: Send {
    /// Execute a mutating statement.
    ///
    /// Fails with `StatementError` for malformed statements and
    /// `ExecutionError` for runtime failures such as nothing to delete.
    async fn execute(&mut self, statement: &Statement) -> Result<(), StoreError>;

    /// Count the root's children named `child` in `store`.
    async fn count_children(&mut self, store: &str, child: &str) -> Result<usize, StoreError>;

    /// Close the session. Calling it again is a no-op.
    async fn close(&mut self) -> Result<(), StoreError>;
}
