//! Collaborator test doubles wrapping the in-process store.

use docstore_client::{Credential, DocumentService, Session, Statement, StoreError};
use docstore_memory::MemoryService;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// How a wrapped session misbehaves.
#[derive(Clone, Copy)]
pub enum Behaviour {
    /// Every `n`th statement across all sessions fails.
    FailEvery(usize),
    /// Statements never complete.
    Hang,
    /// Statements panic inside the session.
    Panic,
}

/// Wraps `MemoryService`, optionally rejecting opens, corrupting sessions
/// or failing teardown.
pub struct WrappedService {
    pub inner: MemoryService,
    behaviour: Option<Behaviour>,
    reject_odd_opens: bool,
    fail_drop: bool,
    hang_close: bool,
    opens: AtomicUsize,
    statements: Arc<AtomicUsize>,
}

impl WrappedService {
    pub fn new(inner: MemoryService) -> Self {
        Self {
            inner,
            behaviour: None,
            reject_odd_opens: false,
            fail_drop: false,
            hang_close: false,
            opens: AtomicUsize::new(0),
            statements: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_behaviour(mut self, behaviour: Behaviour) -> Self {
        self.behaviour = Some(behaviour);
        self
    }

    /// Every second `open_session` call fails with `ConnectionError`.
    pub fn rejecting_odd_opens(mut self) -> Self {
        self.reject_odd_opens = true;
        self
    }

    pub fn failing_drop(mut self) -> Self {
        self.fail_drop = true;
        self
    }

    /// Session `close` never completes.
    pub fn hanging_close(mut self) -> Self {
        self.hang_close = true;
        self
    }
}

#[async_trait::async_trait]
impl DocumentService for WrappedService {
    async fn create_store(&self, name: &str, root: &str) -> Result<(), StoreError> {
        self.inner.create_store(name, root).await
    }

    async fn open_session(&self, credential: &Credential) -> Result<Box<dyn Session>, StoreError> {
        let attempt = self.opens.fetch_add(1, Ordering::SeqCst);
        if self.reject_odd_opens && attempt % 2 == 1 {
            return Err(StoreError::ConnectionError("connection refused".to_string()));
        }
        let inner = self.inner.open_session(credential).await?;
        Ok(Box::new(WrappedSession {
            inner,
            behaviour: self.behaviour,
            hang_close: self.hang_close,
            statements: Arc::clone(&self.statements),
        }))
    }

    async fn drop_store(&self, name: &str) -> Result<(), StoreError> {
        if self.fail_drop {
            return Err(StoreError::ServiceUnavailable(
                "drop rejected".to_string(),
            ));
        }
        self.inner.drop_store(name).await
    }
}

struct WrappedSession {
    inner: Box<dyn Session>,
    behaviour: Option<Behaviour>,
    hang_close: bool,
    statements: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl Session for WrappedSession {
    async fn execute(&mut self, statement: &Statement) -> Result<(), StoreError> {
        match self.behaviour {
            Some(Behaviour::FailEvery(n)) => {
                let seen = self.statements.fetch_add(1, Ordering::SeqCst) + 1;
                if seen % n == 0 {
                    return Err(StoreError::ExecutionError(
                        "concurrent modification conflict".to_string(),
                    ));
                }
                self.inner.execute(statement).await
            }
            Some(Behaviour::Hang) => std::future::pending().await,
            Some(Behaviour::Panic) => panic!("session corrupted while executing {statement}"),
            None => self.inner.execute(statement).await,
        }
    }

    async fn count_children(&mut self, store: &str, child: &str) -> Result<usize, StoreError> {
        self.inner.count_children(store, child).await
    }

    async fn close(&mut self) -> Result<(), StoreError> {
        if self.hang_close {
            return std::future::pending().await;
        }
        self.inner.close().await
    }
}
