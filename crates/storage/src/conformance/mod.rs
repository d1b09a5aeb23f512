//! Conformance test suite for repository implementations.
//!
//! This module provides a backend-agnostic test suite that any pair of
//! `ProtoSpecRepository` / `CompileJobRepository` implementations can run
//! to verify correctness. The suite covers:
//!
//! - **Specs**: create, lookup, duplicate detection, per-project listing
//! - **Jobs**: create, lookup, creation-order listing, status transitions,
//!   immutable fields
//!
//! # Usage
//!
//! Backend crates call [`run_conformance_suite`] with a factory function that
//! creates fresh, empty repositories for each test:
//!
//! ```ignore
//! use protospec_storage::conformance::run_conformance_suite;
//!
//! #[tokio::test]
//! async fn postgres_conformance() {
//!     let report = run_conformance_suite(|| async {
//!         create_test_postgres_repositories().await
//!     }).await;
//!     assert!(report.failed == 0, "{report}");
//! }
//! ```

mod jobs;
mod specs;

use std::fmt;
use std::future::Future;

use protospec_interchange::{ComponentBody, ComponentNode, PageSpec, ProtoSpec, SpecMeta};

use crate::record::{CompileJobPayload, CompileJobRecord};
use crate::Repositories;

/// Result of a single conformance test.
#[derive(Debug, Clone)]
pub struct TestResult {
    /// Test category ("specs" or "jobs").
    pub category: String,
    /// Test name (e.g. "duplicate_spec_is_rejected").
    pub name: String,
    /// Whether the test passed.
    pub passed: bool,
    /// Error message if the test failed.
    pub message: Option<String>,
}

impl TestResult {
    fn pass(category: &str, name: &str) -> Self {
        Self {
            category: category.to_string(),
            name: name.to_string(),
            passed: true,
            message: None,
        }
    }

    fn fail(category: &str, name: &str, msg: String) -> Self {
        Self {
            category: category.to_string(),
            name: name.to_string(),
            passed: false,
            message: Some(msg),
        }
    }

    fn from_result(category: &str, name: &str, result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Self::pass(category, name),
            Err(msg) => Self::fail(category, name, msg),
        }
    }
}

/// Aggregated report from a full conformance suite run.
#[derive(Debug, Clone)]
pub struct ConformanceReport {
    pub results: Vec<TestResult>,
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Conformance: {}/{} passed ({} failed)",
            self.passed, self.total, self.failed
        )?;
        for r in &self.results {
            if !r.passed {
                writeln!(
                    f,
                    "  FAIL [{}/{}]: {}",
                    r.category,
                    r.name,
                    r.message.as_deref().unwrap_or("(no message)")
                )?;
            }
        }
        Ok(())
    }
}

/// Run the full conformance suite against a repository backend.
///
/// The `factory` function is called once per test to create fresh, empty
/// repositories, ensuring test isolation.
pub async fn run_conformance_suite<F, Fut>(factory: F) -> ConformanceReport
where
    F: Fn() -> Fut,
    Fut: Future<Output = Repositories>,
{
    let mut results = Vec::new();

    results.extend(specs::run_spec_tests(&factory).await);
    results.extend(jobs::run_job_tests(&factory).await);

    let passed = results.iter().filter(|r| r.passed).count();
    let total = results.len();

    ConformanceReport {
        results,
        passed,
        failed: total - passed,
        total,
    }
}

// ── Helpers: record constructors with sensible defaults ──────────────────────

fn make_spec(id: &str, project_id: &str) -> ProtoSpec {
    ProtoSpec {
        id: id.to_string(),
        meta: SpecMeta {
            project_id: project_id.to_string(),
            generated_at: "2025-01-01T00:00:00Z".to_string(),
            source_hash: String::new(),
            compiler_version: String::new(),
            title: Some("Test".to_string()),
        },
        tokens: Default::default(),
        pages: vec![PageSpec {
            id: "page-test".to_string(),
            slug: "test".to_string(),
            title: "Test".to_string(),
            summary: String::new(),
            root: ComponentNode::new("page-test", "Test", ComponentBody::Page),
            interactions: Vec::new(),
            acceptance_criteria: Vec::new(),
        }],
    }
}

fn make_job(id: &str, project_id: &str) -> CompileJobRecord {
    CompileJobRecord::queued(
        id,
        project_id,
        CompileJobPayload {
            title: None,
            source_type: Default::default(),
            prd_content: "# Test".to_string(),
        },
        "2025-01-01T00:00:00Z",
    )
}
