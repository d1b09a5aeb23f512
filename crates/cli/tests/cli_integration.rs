//! CLI integration tests for every subcommand.
//!
//! Uses `assert_cmd` to spawn the `protospec` binary and verify exit codes,
//! stdout and stderr. Commands run from the workspace root so that fixture
//! paths resolve.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .to_path_buf()
}

fn protospec() -> Command {
    let mut cmd = cargo_bin_cmd!("protospec");
    cmd.current_dir(workspace_root());
    cmd.env_remove("PROTOSPEC_PORT");
    cmd.env_remove("PROTOSPEC_REVIEW_THRESHOLD");
    cmd.env("RUST_LOG", "off");
    cmd
}

/// Compile `prd` into `dir/<name>` and return the spec path.
fn compile_to(dir: &TempDir, prd: &str, name: &str) -> PathBuf {
    let out = dir.path().join(name);
    protospec()
        .args(["compile", prd, "--out"])
        .arg(&out)
        .assert()
        .success();
    out
}

fn json_stdout(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().expect("run protospec");
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

// ──────────────────────────────────────────────
// 1. Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    protospec()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "PRD-to-ProtoSpec compiler and verification toolchain",
        ));
}

#[test]
fn version_exits_0() {
    protospec()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("protospec"));
}

// ──────────────────────────────────────────────
// 2. compile
// ──────────────────────────────────────────────

#[test]
fn compile_prints_spec_json() {
    let spec = json_stdout(protospec().args(["compile", "fixtures/prd/orders.md"]));
    assert_eq!(spec["meta"]["projectId"], "local");
    assert_eq!(spec["pages"][0]["id"], "page-订单页");
    assert_eq!(
        spec["pages"][0]["interactions"][0]["targetNodeId"],
        "page-订单页/列表"
    );
}

#[test]
fn compile_json_output_includes_review() {
    let out = json_stdout(protospec().args([
        "compile",
        "fixtures/prd/storefront.md",
        "--project",
        "shop",
        "--output",
        "json",
    ]));
    assert_eq!(out["spec"]["meta"]["projectId"], "shop");
    assert_eq!(out["review"]["needsHumanReview"], false);
    assert!(out["warnings"].is_array());
}

#[test]
fn compile_structural_error_exits_1() {
    let dir = TempDir::new().unwrap();
    let prd = dir.path().join("untitled.md");
    fs::write(&prd, "## 页面 x\n- y\n").unwrap();
    protospec()
        .arg("compile")
        .arg(&prd)
        .assert()
        .failure()
        .stderr(predicate::str::contains("MISSING_TITLE"));
}

#[test]
fn compile_title_flag_rescues_headless_prd() {
    let dir = TempDir::new().unwrap();
    let prd = dir.path().join("untitled.md");
    fs::write(&prd, "## 页面 x\n- y\n").unwrap();
    let spec = json_stdout(protospec().arg("compile").arg(&prd).args(["--title", "Inbox"]));
    assert_eq!(spec["pages"][0]["id"], "page-inbox");
}

// ──────────────────────────────────────────────
// 3. validate
// ──────────────────────────────────────────────

#[test]
fn compiled_spec_validates() {
    let dir = TempDir::new().unwrap();
    let spec = compile_to(&dir, "fixtures/prd/storefront.md", "spec.json");
    protospec()
        .arg("validate")
        .arg(&spec)
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"));
}

#[test]
fn schema_violation_is_reported() {
    let dir = TempDir::new().unwrap();
    let spec = dir.path().join("bad.json");
    fs::write(&spec, r#"{"id": "x", "pages": []}"#).unwrap();
    protospec()
        .arg("validate")
        .arg(&spec)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid spec"))
        .stderr(predicate::str::contains("schema:"));
}

#[test]
fn dangling_target_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = compile_to(&dir, "fixtures/prd/orders.md", "spec.json");
    let mut spec: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    spec["pages"][0]["interactions"][0]["targetNodeId"] = "nowhere".into();
    fs::write(&path, spec.to_string()).unwrap();

    let output = protospec()
        .args(["validate", "--output", "json"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(!output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["valid"], false);
    assert!(report["errors"][0]
        .as_str()
        .unwrap()
        .starts_with("DANGLING_TARGET_NODE"));
}

// ──────────────────────────────────────────────
// 4. diff
// ──────────────────────────────────────────────

#[test]
fn diff_reports_added_interaction() {
    protospec()
        .args(["diff", "fixtures/prd/orders.md", "fixtures/prd/orders_added.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "+ interaction page-订单页:ix:点击返回",
        ));
}

#[test]
fn diff_of_prd_against_its_own_spec_is_empty() {
    let dir = TempDir::new().unwrap();
    let spec = compile_to(&dir, "fixtures/prd/orders.md", "spec.json");
    protospec()
        .args(["diff", "fixtures/prd/orders.md"])
        .arg(&spec)
        .assert()
        .success()
        .stdout("no changes\n");
}

#[test]
fn diff_json_counts_modifications() {
    let diff = json_stdout(protospec().args([
        "diff",
        "fixtures/prd/orders.md",
        "fixtures/prd/orders_modified.md",
        "--output",
        "json",
    ]));
    assert_eq!(diff["summary"]["interactionsModified"], 1);
    assert_eq!(diff["summary"]["interactionsAdded"], 0);
    assert_eq!(diff["summary"]["interactionsRemoved"], 0);
}

// ──────────────────────────────────────────────
// 5. gate
// ──────────────────────────────────────────────

#[test]
fn gate_passes_on_orders_fixture() {
    protospec()
        .args(["gate", "fixtures/prd/orders.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PASSED"));
}

#[test]
fn gate_fails_without_target() {
    let dir = TempDir::new().unwrap();
    let path = compile_to(&dir, "fixtures/prd/orders.md", "spec.json");
    let mut spec: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    spec["pages"][0]["interactions"][0]
        .as_object_mut()
        .unwrap()
        .remove("targetNodeId");
    fs::write(&path, spec.to_string()).unwrap();

    protospec()
        .arg("gate")
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("missing targetNodeId"))
        .stdout(predicate::str::contains("FAILED"));
}

// ──────────────────────────────────────────────
// 6. render
// ──────────────────────────────────────────────

#[test]
fn render_prints_outline() {
    protospec()
        .args([
            "render",
            "fixtures/prd/storefront.md",
            "--page",
            "page-product-catalog",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Page [page-product-catalog]"))
        .stdout(predicate::str::contains(
            "Button [page-product-catalog/filters/apply-button]",
        ));
}

#[test]
fn render_unknown_page_exits_1() {
    protospec()
        .args(["render", "fixtures/prd/orders.md", "--page", "page-none"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no page 'page-none'"));
}

#[test]
fn render_keeps_locked_summary() {
    let dir = TempDir::new().unwrap();
    let old = dir.path().join("old.md");
    let new = dir.path().join("new.md");
    fs::write(&old, "# 订单页\nold summary\n## 页面 列表\n- 列表展示订单\n").unwrap();
    fs::write(&new, "# 订单页\nnew summary\n## 页面 列表\n- 列表展示订单\n").unwrap();

    let rendered = json_stdout(
        protospec()
            .arg("render")
            .arg(&new)
            .args(["--page", "page-订单页", "--lock", "page-订单页/summary", "--previous"])
            .arg(&old)
            .args(["--output", "json"]),
    );
    let summary = &rendered["page"]["root"]["children"][1];
    assert_eq!(summary["id"], "page-订单页/summary");
    assert_eq!(summary["props"]["text"], "old summary");
    assert_eq!(rendered["warnings"].as_array().map(Vec::len), Some(0));
}

#[test]
fn lock_without_previous_is_an_error() {
    protospec()
        .args([
            "render",
            "fixtures/prd/orders.md",
            "--page",
            "page-订单页",
            "--lock",
            "page-订单页/summary",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--previous"));
}

// ──────────────────────────────────────────────
// 7. tokens and config
// ──────────────────────────────────────────────

#[test]
fn tokens_print_css_variables() {
    protospec()
        .arg("tokens")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(":root {"))
        .stdout(predicate::str::contains("--color-primary: #2563eb;"));
}

#[test]
fn token_overrides_apply() {
    let dir = TempDir::new().unwrap();
    let overrides = dir.path().join("overrides.json");
    fs::write(&overrides, r##"{"color": {"primary": "#000000"}, "bogus": 1}"##).unwrap();
    protospec()
        .args(["tokens", "--dark", "--overrides"])
        .arg(&overrides)
        .assert()
        .success()
        .stdout(predicate::str::contains("--color-primary: #000000;"));
}

#[test]
fn bad_config_file_exits_1() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("protospec.toml");
    fs::write(&config, "[server]\nhost = \"nope\"\n").unwrap();
    protospec()
        .arg("--config")
        .arg(&config)
        .arg("tokens")
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not parse"));
}

#[test]
fn review_threshold_from_environment() {
    let dir = TempDir::new().unwrap();
    let prd = dir.path().join("prd.md");
    // One unrecognized section costs 0.05 confidence.
    fs::write(
        &prd,
        "# T\n## 页面 A\n- a\n## 交互\n- 点击a -> navigate: /\n## 验收标准\n- ok\n## Misc\n- x\n",
    )
    .unwrap();

    let relaxed = json_stdout(protospec().arg("compile").arg(&prd).args(["--output", "json"]));
    assert_eq!(relaxed["review"]["confidence"], 0.95);
    assert_eq!(relaxed["review"]["needsHumanReview"], false);

    let strict = json_stdout(
        protospec()
            .env("PROTOSPEC_REVIEW_THRESHOLD", "0.99")
            .arg("compile")
            .arg(&prd)
            .args(["--output", "json"]),
    );
    assert_eq!(strict["review"]["needsHumanReview"], true);
}
