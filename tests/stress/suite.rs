//! Full suite over the standard client/run matrix.

use crate::{init_tracing, memory_orchestrator};
use docstore_memory::MemoryService;
use docstress::{ScenarioKind, SuiteOutcome};
use stress_framework::STANDARD_MATRIX;

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_standard_matrix() {
    init_tracing();
    let service = MemoryService::default();
    let orchestrator = memory_orchestrator(&service, "suite");

    for (clients, runs) in STANDARD_MATRIX {
        let outcomes = orchestrator.run_suite(clients, runs).await;
        assert_eq!(outcomes.len(), 2);

        for outcome in &outcomes {
            match (outcome.scenario(), clients, runs) {
                // 100 + 10² < 10 × 50: not enough nodes could be provisioned
                (ScenarioKind::Delete, 10, 50) => {
                    assert!(matches!(outcome, SuiteOutcome::Rejected { .. }));
                    assert!(!outcome.failed());
                }
                (scenario, _, _) => {
                    assert!(
                        outcome.passed(),
                        "{} with {} clients x {} runs: {:?}",
                        scenario,
                        clients,
                        runs,
                        outcome
                    );
                }
            }
        }
    }

    assert!(service.store_names().await.is_empty());
    assert_eq!(service.stats().open(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_suite_aborts_when_service_offline() {
    let service = MemoryService::default();
    service.set_available(false);

    let outcomes = memory_orchestrator(&service, "suite_offline")
        .run_suite(2, 2)
        .await;

    assert_eq!(outcomes.len(), 2);
    for outcome in &outcomes {
        assert!(matches!(outcome, SuiteOutcome::Aborted { .. }));
        assert!(outcome.failed());
    }
}
