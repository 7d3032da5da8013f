//! `DocumentService` implementation for SurrealDB servers.

use crate::classify::{read_error, service_error, statement_error, validate_identifier};
use docstore_client::{Credential, DocumentService, Session, Statement, StoreError};
use serde::{Deserialize, Serialize};
use surrealdb::engine::any::Any;
use surrealdb::Surreal;
use tracing::debug;

const ROOT_RECORD: &str = "document:root";

/// Removes the first matching child, or throws when none is left so the
/// failure is not mistaken for a malformed statement.
const DELETE_FIRST_CHILD: &str = "BEGIN TRANSACTION; \
     LET $index = array::find_index(document:root.children, $child); \
     IF $index = NONE { THROW \"nothing to delete\" }; \
     UPDATE ONLY document:root SET children = array::remove(children, $index); \
     COMMIT TRANSACTION;";

/// SurrealDB connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurrealConfig {
    /// Endpoint URL (e.g., "ws://localhost:8000").
    pub endpoint: String,
    /// Namespace holding one database per store.
    pub namespace: String,
}

impl Default for SurrealConfig {
    fn default() -> Self {
        Self {
            endpoint: "ws://localhost:8000".to_string(),
            namespace: "stress".to_string(),
        }
    }
}

/// Connect, sign in and select the namespace.
async fn connect(config: &SurrealConfig, credential: &Credential) -> Result<Surreal<Any>, StoreError> {
    // Convert http:// to ws:// for WebSocket connection
    let ws_endpoint = config
        .endpoint
        .replace("http://", "ws://")
        .replace("https://", "wss://");

    debug!("Connecting to SurrealDB at {}", ws_endpoint);

    let client = surrealdb::engine::any::connect(&ws_endpoint)
        .await
        .map_err(|e| StoreError::ConnectionError(e.to_string()))?;

    client
        .signin(surrealdb::opt::auth::Root {
            username: &credential.username,
            password: &credential.password,
        })
        .await
        .map_err(|e| StoreError::AuthenticationError(e.to_string()))?;

    client
        .use_ns(&config.namespace)
        .await
        .map_err(|e| StoreError::ConnectionError(e.to_string()))?;

    Ok(client)
}

/// Document service backed by a SurrealDB server.
///
/// Service-level operations open a short-lived connection with the
/// administrative credential.
pub struct SurrealService {
    config: SurrealConfig,
    admin: Credential,
}

impl SurrealService {
    pub fn new(config: SurrealConfig, admin: Credential) -> Self {
        Self { config, admin }
    }

    async fn admin_client(&self) -> Result<Surreal<Any>, StoreError> {
        connect(&self.config, &self.admin)
            .await
            .map_err(|e| StoreError::ServiceUnavailable(e.to_string()))
    }
}

#[async_trait::async_trait]
impl DocumentService for SurrealService {
    async fn create_store(&self, name: &str, root: &str) -> Result<(), StoreError> {
        validate_identifier(name)?;
        let client = self.admin_client().await?;

        client
            .query(format!("DEFINE DATABASE {name};"))
            .await
            .and_then(|response| response.check())
            .map_err(|e| service_error(name, e.to_string()))?;

        client
            .use_db(name)
            .await
            .map_err(|e| service_error(name, e.to_string()))?;

        client
            .query(format!(
                "CREATE {ROOT_RECORD} SET name = $root, children = [];"
            ))
            .bind(("root", root.to_string()))
            .await
            .and_then(|response| response.check())
            .map_err(|e| service_error(name, e.to_string()))?;

        debug!("Created SurrealDB store {} with root <{}/>", name, root);
        Ok(())
    }

    async fn open_session(&self, credential: &Credential) -> Result<Box<dyn Session>, StoreError> {
        let client = connect(&self.config, credential).await?;
        Ok(Box::new(SurrealSession {
            client: Some(client),
        }))
    }

    async fn drop_store(&self, name: &str) -> Result<(), StoreError> {
        validate_identifier(name)?;
        let client = self.admin_client().await?;

        client
            .query(format!("REMOVE DATABASE {name};"))
            .await
            .and_then(|response| response.check())
            .map_err(|e| service_error(name, e.to_string()))?;

        debug!("Dropped SurrealDB store {}", name);
        Ok(())
    }
}

/// Session over one SurrealDB WebSocket connection.
pub struct SurrealSession {
    client: Option<Surreal<Any>>,
}

impl SurrealSession {
    async fn select_store(&self, store: &str) -> Result<&Surreal<Any>, StoreError> {
        let client = self.client.as_ref().ok_or(StoreError::SessionClosed)?;
        validate_identifier(store)?;
        client
            .use_db(store)
            .await
            .map_err(|e| StoreError::ConnectionError(e.to_string()))?;
        Ok(client)
    }
}

#[async_trait::async_trait]
impl Session for SurrealSession {
    async fn execute(&mut self, statement: &Statement) -> Result<(), StoreError> {
        let client = self.select_store(statement.store()).await?;

        let query = match statement {
            Statement::InsertChild { child, .. } => client
                .query(format!(
                    "UPDATE ONLY {ROOT_RECORD} SET children = array::append(children, $child);"
                ))
                .bind(("child", child.clone())),
            Statement::DeleteFirstChild { child, .. } => client
                .query(DELETE_FIRST_CHILD)
                .bind(("child", child.clone())),
            Statement::BulkInsert { child, count, .. } => {
                if *count == 0 {
                    return Err(StoreError::StatementError(
                        "bulk insert of zero elements".to_string(),
                    ));
                }
                client
                    .query(format!(
                        "UPDATE ONLY {ROOT_RECORD} SET children = \
                         array::concat(children, array::repeat($child, $count));"
                    ))
                    .bind(("child", child.clone()))
                    .bind(("count", *count as i64))
            }
        };

        query
            .await
            .and_then(|response| response.check())
            .map_err(|e| statement_error(e.to_string()))?;
        Ok(())
    }

    async fn count_children(&mut self, store: &str, child: &str) -> Result<usize, StoreError> {
        let client = self.select_store(store).await?;

        let mut response = client
            .query(format!("SELECT children FROM ONLY {ROOT_RECORD};"))
            .await
            .and_then(|response| response.check())
            .map_err(|e| read_error(store, e.to_string()))?;

        let children: Option<Vec<String>> = response
            .take((0, "children"))
            .map_err(|e| StoreError::ExecutionError(e.to_string()))?;

        Ok(children
            .unwrap_or_default()
            .iter()
            .filter(|name| name.as_str() == child)
            .count())
    }

    async fn close(&mut self) -> Result<(), StoreError> {
        if let Some(client) = self.client.take() {
            client
                .invalidate()
                .await
                .map_err(|e| StoreError::ConnectionError(e.to_string()))?;
        }
        Ok(())
    }
}
