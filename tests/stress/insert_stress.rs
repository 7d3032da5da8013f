//! Insert scenario: no update may be lost under concurrent appends.

use crate::{init_tracing, memory_orchestrator};
use docstore_memory::MemoryService;
use docstress::ScenarioKind;

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_insert_clients10_runs10() {
    init_tracing();
    let service = MemoryService::default();

    let report = memory_orchestrator(&service, "insert_stress")
        .execute(10, 10, ScenarioKind::Insert)
        .await
        .expect("run should start");

    assert!(report.passed(), "{}", report.summary());
    assert_eq!(report.total, 10);
    assert_eq!(report.failed, 0);
    assert_eq!(report.precondition_count, 0);
    assert_eq!(report.statements_executed(), 100);
    let check = report.child_count.expect("child count should be read");
    assert_eq!(check.observed, 100);

    assert!(service.store_names().await.is_empty());
    assert_eq!(service.stats().open(), 0);
    // One session per worker plus the verification read
    assert_eq!(service.stats().opened, 11);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_insert_clients50_runs10() {
    init_tracing();
    let service = MemoryService::default();

    let report = memory_orchestrator(&service, "insert_stress")
        .execute(50, 10, ScenarioKind::Insert)
        .await
        .expect("run should start");

    assert!(report.passed(), "{}", report.summary());
    assert_eq!(report.total, 50);
    assert_eq!(report.child_count.map(|c| c.observed), Some(500));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_insert_single_client_single_run() {
    let service = MemoryService::default();

    let report = memory_orchestrator(&service, "insert_stress")
        .execute(1, 1, ScenarioKind::Insert)
        .await
        .expect("run should start");

    assert!(report.passed(), "{}", report.summary());
    assert_eq!(report.child_count.map(|c| c.observed), Some(1));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_insert_outcome_is_repeatable() {
    let service = MemoryService::default();
    let orchestrator = memory_orchestrator(&service, "insert_repeat");

    let mut observed = Vec::new();
    for _ in 0..3 {
        let report = orchestrator
            .execute(8, 6, ScenarioKind::Insert)
            .await
            .expect("run should start");
        assert!(report.passed(), "{}", report.summary());
        observed.push(report.child_count.map(|c| c.observed));
    }

    assert_eq!(observed, vec![Some(48); 3]);
    assert!(service.store_names().await.is_empty());
}
