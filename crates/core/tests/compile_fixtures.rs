//! End-to-end compiler behavior over the PRD fixtures in fixtures/prd.

use std::path::Path;

use protospec_core::{codes, compile_prd_to_proto_spec, CompileOutput, CompilerOptions};
use protospec_interchange::{ActionKind, ComponentBody, PrdSource};
use serde_json::json;

fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures/prd")
        .join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
}

fn compile(content: &str) -> CompileOutput {
    compile_prd_to_proto_spec(
        &PrdSource::markdown("proj-test", content),
        &CompilerOptions::default(),
    )
    .unwrap()
}

fn all_ids(out: &CompileOutput) -> (Vec<String>, Vec<String>) {
    let mut nodes = Vec::new();
    let mut interactions = Vec::new();
    for page in &out.spec.pages {
        nodes.extend(page.root.ids().into_iter().map(str::to_string));
        interactions.extend(page.interactions.iter().map(|i| i.id.clone()));
    }
    (nodes, interactions)
}

#[test]
fn ids_are_deterministic_across_runs() {
    for name in ["orders.md", "orders_added.md", "storefront.md"] {
        let src = fixture(name);
        let a = compile(&src);
        let b = compile(&src);
        assert_eq!(all_ids(&a), all_ids(&b), "{} ids differ between runs", name);
        assert_ne!(a.spec.id, b.spec.id, "spec ids are per-compilation");
    }
}

#[test]
fn orders_fixture_compiles_to_one_targeted_page() {
    let out = compile(&fixture("orders.md"));
    assert_eq!(out.spec.pages.len(), 1);
    let page = &out.spec.pages[0];
    assert_eq!(page.title, "订单页");
    assert!(!page.interactions.is_empty());
    let target = page.interactions[0].target_node_id.as_deref().unwrap();
    assert!(page.root.contains(target));
    assert_eq!(page.acceptance_criteria.len(), 1);
    assert!(out.warnings.is_empty(), "{:?}", out.warnings);
    assert!(!out.review.needs_human_review);
}

#[test]
fn storefront_fixture_has_two_pages() {
    let out = compile(&fixture("storefront.md"));
    let ids: Vec<&str> = out.spec.pages.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["page-product-catalog", "page-checkout"]);

    let catalog = &out.spec.pages[0];
    assert_eq!(catalog.summary, "Browse and filter the product range.");
    let select = catalog
        .root
        .find("page-product-catalog/filters/category-select-all-books-music")
        .unwrap();
    assert_eq!(
        select.body,
        ComponentBody::Select {
            label: "Category select".to_string(),
            options: vec!["All".into(), "Books".into(), "Music".into()],
        }
    );

    let apply = &catalog.interactions[0];
    assert_eq!(apply.id, "page-product-catalog:ix:click-apply-button");
    assert_eq!(
        apply.target_node_id.as_deref(),
        Some("page-product-catalog/filters/apply-button")
    );
    assert_eq!(apply.actions.len(), 2);
    assert_eq!(apply.actions[1].kind, ActionKind::SetState);
    assert_eq!(apply.actions[1].payload, json!({"key": "loading", "value": true}));
    assert_eq!(catalog.interactions[1].event, "hover");
    assert!(catalog.acceptance_criteria[0].completed);
    assert!(!catalog.acceptance_criteria[1].completed);

    let checkout = &out.spec.pages[1];
    let note = &checkout.interactions[1];
    assert_eq!(note.event, "dblclick");
    assert_eq!(note.target_node_id.as_deref(), Some("page-checkout/表单/备注文本域"));
    assert_eq!(note.actions[0].kind, ActionKind::OpenModal);
}

#[test]
fn added_line_adds_an_interaction_id() {
    let before = compile(&fixture("orders.md"));
    let after = compile(&fixture("orders_added.md"));
    let (_, a) = all_ids(&before);
    let (_, b) = all_ids(&after);
    assert!(a.iter().all(|id| b.contains(id)));
    assert_eq!(b.len(), a.len() + 1);
}

#[test]
fn fallback_title_lowers_confidence() {
    let out = compile_prd_to_proto_spec(
        &PrdSource {
            title: Some("Inbox".to_string()),
            ..PrdSource::markdown("p", "## Page Main\n- Message list\n")
        },
        &CompilerOptions::default(),
    )
    .unwrap();
    assert_eq!(out.spec.pages[0].id, "page-inbox");
    assert!(out.review.needs_human_review);
    assert!(out.review.confidence < 0.7);
}

#[test]
fn malformed_heading_reports_line() {
    let err = compile_prd_to_proto_spec(
        &PrdSource::markdown("p", "# T\n\n####### too deep\n"),
        &CompilerOptions::default(),
    )
    .unwrap_err();
    match err {
        protospec_core::CompileError::Prd(e) => {
            assert_eq!(e.code, codes::MALFORMED_HEADING);
            assert_eq!(e.details.get("line"), Some(&json!(3)));
        }
        other => panic!("expected Prd error, got {:?}", other),
    }
}
