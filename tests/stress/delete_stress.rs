//! Delete scenario: pre-provisioned nodes are consumed exactly once each.

use crate::{init_tracing, memory_orchestrator};
use docstore_memory::MemoryService;
use docstress::{ScenarioKind, StressError};

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_delete_clients10_runs10() {
    init_tracing();
    let service = MemoryService::default();

    let report = memory_orchestrator(&service, "delete_stress")
        .execute(10, 10, ScenarioKind::Delete)
        .await
        .expect("run should start");

    assert!(report.passed(), "{}", report.summary());
    assert_eq!(report.precondition_count, 200);
    assert_eq!(report.child_count.map(|c| c.observed), Some(100));
    assert!(service.store_names().await.is_empty());
    assert_eq!(service.stats().open(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_delete_clients50_runs50() {
    init_tracing();
    let service = MemoryService::default();

    let report = memory_orchestrator(&service, "delete_stress")
        .execute(50, 50, ScenarioKind::Delete)
        .await
        .expect("run should start");

    assert!(report.passed(), "{}", report.summary());
    assert_eq!(report.precondition_count, 2600);
    assert_eq!(report.statements_executed(), 2500);
    assert_eq!(report.child_count.map(|c| c.observed), Some(100));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_delete_consumes_every_provisioned_node() {
    let service = MemoryService::default();

    // 100 + 10² == 10 × 20
    let report = memory_orchestrator(&service, "delete_boundary")
        .execute(10, 20, ScenarioKind::Delete)
        .await
        .expect("run should start");

    assert!(report.passed(), "{}", report.summary());
    assert_eq!(report.child_count.map(|c| c.observed), Some(0));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_delete_outcome_is_repeatable() {
    let service = MemoryService::default();
    let orchestrator = memory_orchestrator(&service, "delete_repeat");

    let mut observed = Vec::new();
    for _ in 0..3 {
        let report = orchestrator
            .execute(8, 6, ScenarioKind::Delete)
            .await
            .expect("run should start");
        assert!(report.passed(), "{}", report.summary());
        assert_eq!(report.precondition_count, 164);
        observed.push(report.child_count.map(|c| c.observed));
    }

    // 100 + 8² - 8 × 6
    assert_eq!(observed, vec![Some(116); 3]);
    assert!(service.store_names().await.is_empty());
    assert_eq!(service.stats().open(), 0);
}

#[tokio::test]
async fn test_delete_undersized_configuration_rejected() {
    let service = MemoryService::default();

    let result = memory_orchestrator(&service, "delete_undersized")
        .execute(10, 50, ScenarioKind::Delete)
        .await;

    assert!(matches!(result, Err(StressError::InvalidConfiguration(_))));
    // Rejected before any resource was touched
    assert!(service.store_names().await.is_empty());
    assert_eq!(service.stats().opened, 0);
}
