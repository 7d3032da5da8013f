//! Stress runs against a live SurrealDB server.
//!
//! Set `SURREAL_ENDPOINT` (default `ws://localhost:8000`) and run with
//! `cargo test --test stress -- --ignored`.

use crate::{init_tracing, TEST_PACING};
use docstore_surreal::{SurrealConfig, SurrealService};
use docstress::{Credential, Orchestrator, RunContext, ScenarioKind, StressConfig};
use std::sync::Arc;

fn surreal_orchestrator(identity: &str) -> Orchestrator {
    let config = SurrealConfig {
        endpoint: std::env::var("SURREAL_ENDPOINT")
            .unwrap_or_else(|_| "ws://localhost:8000".to_string()),
        ..SurrealConfig::default()
    };
    let credential = Credential::new("root", "root");
    let service = SurrealService::new(config, credential.clone());
    let config = StressConfig::new(identity)
        .with_credential(credential)
        .with_pacing(TEST_PACING);
    Orchestrator::new(RunContext::new(Arc::new(service), config))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
#[ignore = "requires a running SurrealDB server"]
async fn test_surreal_insert_clients10_runs10() {
    init_tracing();
    let report = surreal_orchestrator("surreal_insert")
        .execute(10, 10, ScenarioKind::Insert)
        .await
        .expect("run should start");

    assert!(report.passed(), "{}", report.summary());
    assert_eq!(report.child_count.map(|c| c.observed), Some(100));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
#[ignore = "requires a running SurrealDB server"]
async fn test_surreal_delete_clients10_runs10() {
    init_tracing();
    let report = surreal_orchestrator("surreal_delete")
        .execute(10, 10, ScenarioKind::Delete)
        .await
        .expect("run should start");

    assert!(report.passed(), "{}", report.summary());
    assert_eq!(report.precondition_count, 200);
    assert_eq!(report.child_count.map(|c| c.observed), Some(100));
}

#[tokio::test]
#[ignore = "requires a running SurrealDB server"]
async fn test_surreal_empty_delete_is_execution_error() {
    use docstress::{DocumentService, Session, Statement, StoreError};

    let credential = Credential::new("root", "root");
    let config = SurrealConfig {
        endpoint: std::env::var("SURREAL_ENDPOINT")
            .unwrap_or_else(|_| "ws://localhost:8000".to_string()),
        ..SurrealConfig::default()
    };
    let service = SurrealService::new(config, credential.clone());
    let store = "surreal_empty_delete";
    let _ = service.drop_store(store).await;
    service.create_store(store, "doc").await.unwrap();

    let mut session = service.open_session(&credential).await.unwrap();
    let result = session
        .execute(&Statement::DeleteFirstChild {
            store: store.to_string(),
            child: "node".to_string(),
        })
        .await;
    session.close().await.unwrap();
    service.drop_store(store).await.unwrap();

    assert!(
        matches!(result, Err(StoreError::ExecutionError(_))),
        "{result:?}"
    );
}
