//! Compile → trace → diff → gate over the PRD fixtures.

use std::path::Path;

use protospec_analyze::{
    build_trace_map, compute_spec_diff, run_quality_gate, CheckName, GateOptions,
};
use protospec_core::{compile_prd_to_proto_spec, CompilerOptions};
use protospec_interchange::{PrdSource, ProtoSpec};

fn compile(name: &str) -> ProtoSpec {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures/prd")
        .join(name);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
    compile_prd_to_proto_spec(
        &PrdSource::markdown("proj-pipeline", content),
        &CompilerOptions::default(),
    )
    .unwrap_or_else(|e| panic!("compile failed for {}: {}", name, e))
    .spec
}

// ──────────────────────────────────────────────
// Gate
// ──────────────────────────────────────────────

#[tokio::test]
async fn every_fixture_passes_the_gate() {
    for name in ["orders.md", "orders_added.md", "orders_modified.md", "storefront.md"] {
        let spec = compile(name);
        let report = run_quality_gate(&spec, &GateOptions::default()).await;
        assert!(report.passed, "{} failed the gate:\n{}", name, report);
        assert_eq!(report.checks.len(), 3);
    }
}

#[tokio::test]
async fn gate_report_serializes_camel_case() {
    let spec = compile("orders.md");
    let report = run_quality_gate(&spec, &GateOptions::default()).await;
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["passed"], true);
    assert_eq!(json["checks"][2]["name"], "interaction_replay");
    assert!(json["checks"][0]["durationMs"].is_u64());
}

#[tokio::test]
async fn removing_every_target_fails_only_traceability() {
    let mut spec = compile("storefront.md");
    for page in &mut spec.pages {
        for interaction in &mut page.interactions {
            interaction.target_node_id = None;
        }
    }
    let report = run_quality_gate(&spec, &GateOptions::default()).await;
    let trace = report.check(CheckName::Traceability).unwrap();
    assert_eq!(trace.details.len(), 4);
    assert!(trace
        .details
        .iter()
        .all(|d| d.ends_with(": missing targetNodeId")));
    assert!(report.check(CheckName::InteractionReplay).unwrap().passed);
}

// ──────────────────────────────────────────────
// Trace and diff
// ──────────────────────────────────────────────

#[test]
fn storefront_trace_covers_every_interaction() {
    let spec = compile("storefront.md");
    let map = build_trace_map(&spec);
    assert_eq!(map.len(), 4);
    assert_eq!(map.for_requirement("page-product-catalog").len(), 2);
    assert_eq!(map.for_requirement("page-checkout").len(), 2);
    let apply = map.for_node("page-product-catalog/filters/apply-button");
    assert_eq!(apply.len(), 1);
    assert_eq!(
        apply[0].interaction_id,
        "page-product-catalog:ix:click-apply-button"
    );
}

#[test]
fn recompiling_the_same_prd_is_not_a_change() {
    let a = compile("storefront.md");
    let b = compile("storefront.md");
    assert!(!compute_spec_diff(&a, &b).has_changes());
}

#[test]
fn fixture_edits_diff_as_expected() {
    let base = compile("orders.md");

    let added = compute_spec_diff(&base, &compile("orders_added.md"));
    assert!(added.summary.interactions_added > 0);
    assert_eq!(added.summary.interactions_removed, 0);

    let modified = compute_spec_diff(&base, &compile("orders_modified.md"));
    assert!(modified.summary.interactions_modified > 0);
    assert_eq!(modified.summary.interactions_added, 0);
    assert_eq!(modified.summary.interactions_removed, 0);
}
