use protospec_storage::conformance::run_conformance_suite;
use protospec_storage::Repositories;

#[tokio::test]
async fn in_memory_repositories_pass_conformance() {
    let report = run_conformance_suite(|| async { Repositories::in_memory() }).await;
    assert!(report.total >= 12, "suite shrank: {}", report.total);
    assert_eq!(report.failed, 0, "{report}");
}
