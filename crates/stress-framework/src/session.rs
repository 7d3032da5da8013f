//! Session factory bound to one service and credential.

use docstore_client::{Credential, DocumentService, Session, StoreError};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Close `session`, giving up after `limit`.
///
/// A close that does not finish in time is reported as a `ConnectionError`.
pub async fn close_within(session: &mut dyn Session, limit: Duration) -> Result<(), StoreError> {
    match tokio::time::timeout(limit, session.close()).await {
        Ok(closed) => closed,
        Err(_) => Err(StoreError::ConnectionError(format!(
            "session close timed out after {limit:?}"
        ))),
    }
}

/// Opens a fresh, exclusively owned session per caller.
#[derive(Clone)]
pub struct SessionFactory {
    service: Arc<dyn DocumentService>,
    credential: Credential,
}

impl SessionFactory {
    pub fn new(service: Arc<dyn DocumentService>, credential: Credential) -> Self {
        Self {
            service,
            credential,
        }
    }

    /// Open a new session.
    ///
    /// Fails with `ConnectionError` or `AuthenticationError`; the caller
    /// decides whether that is fatal.
    pub async fn open(&self) -> Result<Box<dyn Session>, StoreError> {
        debug!("Opening session as {}", self.credential.username);
        self.service.open_session(&self.credential).await
    }

    pub fn service(&self) -> &Arc<dyn DocumentService> {
        &self.service
    }
}
