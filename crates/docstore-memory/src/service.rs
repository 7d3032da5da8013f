//! `DocumentService` implementation over in-process documents.

use crate::document::Element;
use docstore_client::{Credential, DocumentService, Session, Statement, StoreError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Session open/close counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionStats {
    pub opened: usize,
    pub closed: usize,
}

impl SessionStats {
    /// Sessions opened but not yet closed.
    pub fn open(&self) -> usize {
        self.opened.saturating_sub(self.closed)
    }
}

struct Inner {
    stores: Mutex<HashMap<String, Element>>,
    credential: Credential,
    available: AtomicBool,
    opened: AtomicUsize,
    closed: AtomicUsize,
}

/// In-process document service. Clones share the same stores.
#[derive(Clone)]
pub struct MemoryService {
    inner: Arc<Inner>,
}

impl MemoryService {
    /// Create a service accepting only `credential`.
    pub fn new(credential: Credential) -> Self {
        Self {
            inner: Arc::new(Inner {
                stores: Mutex::new(HashMap::new()),
                credential,
                available: AtomicBool::new(true),
                opened: AtomicUsize::new(0),
                closed: AtomicUsize::new(0),
            }),
        }
    }

    /// Mark the endpoint reachable or unreachable.
    ///
    /// While unreachable, new sessions fail with `ConnectionError` and
    /// service-level operations with `ServiceUnavailable`. Sessions already
    /// open keep working.
    pub fn set_available(&self, available: bool) {
        self.inner.available.store(available, Ordering::SeqCst);
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            opened: self.inner.opened.load(Ordering::SeqCst),
            closed: self.inner.closed.load(Ordering::SeqCst),
        }
    }

    /// Names of the stores that currently exist, sorted.
    pub async fn store_names(&self) -> Vec<String> {
        let stores = self.inner.stores.lock().await;
        let mut names: Vec<String> = stores.keys().cloned().collect();
        names.sort();
        names
    }

    /// Snapshot of a store's document.
    pub async fn document(&self, store: &str) -> Option<Element> {
        self.inner.stores.lock().await.get(store).cloned()
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.inner.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::ServiceUnavailable(
                "memory service is offline".to_string(),
            ))
        }
    }
}

impl Default for MemoryService {
    fn default() -> Self {
        Self::new(Credential::default())
    }
}

#[async_trait::async_trait]
impl DocumentService for MemoryService {
    async fn create_store(&self, name: &str, root: &str) -> Result<(), StoreError> {
        self.ensure_available()?;
        let mut stores = self.inner.stores.lock().await;
        if stores.contains_key(name) {
            return Err(StoreError::StoreAlreadyExists(name.to_string()));
        }
        stores.insert(name.to_string(), Element::leaf(root));
        debug!("Created store {} with root <{}/>", name, root);
        Ok(())
    }

    async fn open_session(&self, credential: &Credential) -> Result<Box<dyn Session>, StoreError> {
        if !self.inner.available.load(Ordering::SeqCst) {
            return Err(StoreError::ConnectionError(
                "memory service is offline".to_string(),
            ));
        }
        if *credential != self.inner.credential {
            return Err(StoreError::AuthenticationError(format!(
                "access denied for user '{}'",
                credential.username
            )));
        }
        self.inner.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemorySession {
            inner: Arc::clone(&self.inner),
            closed: false,
        }))
    }

    async fn drop_store(&self, name: &str) -> Result<(), StoreError> {
        self.ensure_available()?;
        match self.inner.stores.lock().await.remove(name) {
            Some(_) => {
                debug!("Dropped store {}", name);
                Ok(())
            }
            None => Err(StoreError::StoreNotFound(name.to_string())),
        }
    }
}

/// Session handed out by `MemoryService`.
pub struct MemorySession {
    inner: Arc<Inner>,
    closed: bool,
}

impl MemorySession {
    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed {
            Err(StoreError::SessionClosed)
        } else {
            Ok(())
        }
    }
}

#[async_trait::async_trait]
impl Session for MemorySession {
    async fn execute(&mut self, statement: &Statement) -> Result<(), StoreError> {
        self.ensure_open()?;
        let mut stores = self.inner.stores.lock().await;
        let root = stores.get_mut(statement.store()).ok_or_else(|| {
            StoreError::StatementError(format!("unknown store '{}'", statement.store()))
        })?;

        match statement {
            Statement::InsertChild { child, .. } => {
                root.push_leaf(child);
                Ok(())
            }
            Statement::DeleteFirstChild { child, .. } => {
                if root.remove_first(child) {
                    Ok(())
                } else {
                    Err(StoreError::ExecutionError(format!(
                        "no <{child}/> left under <{}/>",
                        root.name
                    )))
                }
            }
            Statement::BulkInsert { child, count, .. } => {
                if *count == 0 {
                    return Err(StoreError::StatementError(
                        "bulk insert of zero elements".to_string(),
                    ));
                }
                for _ in 0..*count {
                    root.push_leaf(child);
                }
                Ok(())
            }
        }
    }

    async fn count_children(&mut self, store: &str, child: &str) -> Result<usize, StoreError> {
        self.ensure_open()?;
        let stores = self.inner.stores.lock().await;
        stores
            .get(store)
            .map(|root| root.count_named(child))
            .ok_or_else(|| StoreError::StoreNotFound(store.to_string()))
    }

    async fn close(&mut self) -> Result<(), StoreError> {
        if !self.closed {
            self.closed = true;
            self.inner.closed.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}
