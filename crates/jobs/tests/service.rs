//! CompileJobService behavior against the in-memory repositories.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use protospec_core::{codes as compiler_codes, CompileError, CompileOutput, CompilerOptions};
use protospec_interchange::{PrdSource, ProtoSpec};
use protospec_jobs::{
    codes, CompileJobService, CreateJobRequest, JobServiceConfig, JobServiceError, PrdCompiler,
};
use protospec_storage::{
    CompileJobRecord, CompileJobRepository, InMemoryCompileJobRepository,
    InMemoryProtoSpecRepository, JobStatus, ProtoSpecRepository, Repositories, StorageError,
};
use tokio::sync::broadcast;

const ORDERS: &str = "# 订单页\n## 页面 列表\n- 列表展示订单\n### 交互\n- 点击订单 -> navigate: /orders/1\n### 验收标准\n- 用户可查看订单列表\n";

fn request(project: &str, content: &str) -> CreateJobRequest {
    CreateJobRequest {
        project_id: project.to_string(),
        prd_content: content.to_string(),
        ..CreateJobRequest::default()
    }
}

async fn next_terminal(rx: &mut broadcast::Receiver<CompileJobRecord>) -> CompileJobRecord {
    tokio::time::timeout(Duration::from_secs(10), rx.recv())
        .await
        .expect("timed out waiting for a job to finish")
        .expect("notification channel closed")
}

// ──────────────────────────────────────────────
// Request validation
// ──────────────────────────────────────────────

#[tokio::test]
async fn blank_fields_are_rejected() {
    let service = CompileJobService::new(Repositories::in_memory(), JobServiceConfig::default());

    let err = service.create_job(request("  ", ORDERS)).await.unwrap_err();
    assert!(matches!(err, JobServiceError::BlankField { field: "projectId" }));
    assert!(err.is_client_error());

    let err = service.create_job(request("p", "\n\t")).await.unwrap_err();
    assert!(matches!(err, JobServiceError::BlankField { field: "prdContent" }));

    assert!(service.list_jobs("p").await.unwrap().is_empty());
}

#[tokio::test]
async fn unsupported_source_type_is_rejected() {
    let service = CompileJobService::new(Repositories::in_memory(), JobServiceConfig::default());
    let err = service
        .create_job(CreateJobRequest {
            source_type: Some("docx".into()),
            ..request("p", ORDERS)
        })
        .await
        .unwrap_err();
    match err {
        JobServiceError::UnsupportedSourceType(e) => {
            assert_eq!(e.code, compiler_codes::UNSUPPORTED_SOURCE_TYPE)
        }
        other => panic!("expected UnsupportedSourceType, got {:?}", other),
    }
}

// ──────────────────────────────────────────────
// Lifecycle
// ──────────────────────────────────────────────

#[tokio::test]
async fn job_compiles_and_stores_the_spec() {
    let service = CompileJobService::new(Repositories::in_memory(), JobServiceConfig::default());
    let mut rx = service.subscribe();

    let queued = service.create_job(request("proj-1", ORDERS)).await.unwrap();
    assert_eq!(queued.status, JobStatus::Queued);
    assert_eq!(queued.project_id, "proj-1");

    let done = next_terminal(&mut rx).await;
    assert_eq!(done.id, queued.id);
    assert_eq!(done.status, JobStatus::Succeeded);
    assert_eq!(done.created_at, queued.created_at);
    let result = done.result.as_ref().unwrap();
    assert!(!result.review.needs_human_review);

    let spec = service.get_spec(&result.spec_id).await.unwrap();
    assert_eq!(spec.meta.project_id, "proj-1");
    assert_eq!(spec.pages[0].title, "订单页");
    assert_eq!(service.get_job(&queued.id).await.unwrap(), done);
}

#[tokio::test]
async fn structural_errors_fail_the_job_with_their_code() {
    let service = CompileJobService::new(Repositories::in_memory(), JobServiceConfig::default());
    let mut rx = service.subscribe();

    service.create_job(request("p", "## 页面 x\n- y")).await.unwrap();
    let done = next_terminal(&mut rx).await;
    assert_eq!(done.status, JobStatus::Failed);
    assert!(done.result.is_none());
    assert_eq!(done.error.unwrap().code, compiler_codes::MISSING_TITLE);
}

#[tokio::test]
async fn jobs_run_in_fifo_order() {
    let service = CompileJobService::new(Repositories::in_memory(), JobServiceConfig::default());
    let mut rx = service.subscribe();

    let mut created = Vec::new();
    for i in 0..4 {
        let job = service
            .create_job(request("p", &format!("# Page {}\n- text", i)))
            .await
            .unwrap();
        created.push(job.id);
    }
    let mut finished = Vec::new();
    for _ in 0..4 {
        finished.push(next_terminal(&mut rx).await.id);
    }
    assert_eq!(finished, created);

    let listed: Vec<String> = service
        .list_jobs("p")
        .await
        .unwrap()
        .into_iter()
        .map(|j| j.id)
        .collect();
    assert_eq!(listed, created);
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let service = CompileJobService::new(Repositories::in_memory(), JobServiceConfig::default());
    assert!(service.get_job("nope").await.unwrap_err().is_not_found());
    assert!(service.get_spec("nope").await.unwrap_err().is_not_found());
}

// ──────────────────────────────────────────────
// Faults
// ──────────────────────────────────────────────

struct PanickingCompiler;

impl PrdCompiler for PanickingCompiler {
    fn compile(&self, _: &PrdSource, _: &CompilerOptions) -> Result<CompileOutput, CompileError> {
        panic!("boom");
    }
}

struct FaultyCompiler;

impl PrdCompiler for FaultyCompiler {
    fn compile(&self, _: &PrdSource, _: &CompilerOptions) -> Result<CompileOutput, CompileError> {
        Err(CompileError::Internal("validator rejected output".into()))
    }
}

struct ReadOnlySpecs;

#[async_trait]
impl ProtoSpecRepository for ReadOnlySpecs {
    async fn create(&self, _: ProtoSpec) -> Result<(), StorageError> {
        Err(StorageError::Backend("read-only".into()))
    }
    async fn get_by_id(&self, id: &str) -> Result<ProtoSpec, StorageError> {
        Err(StorageError::NotFound {
            kind: "spec",
            id: id.to_string(),
        })
    }
    async fn list_by_project(&self, _: &str) -> Result<Vec<ProtoSpec>, StorageError> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn compiler_panic_is_recorded_and_the_queue_keeps_going() {
    let service = CompileJobService::with_compiler(
        Repositories::in_memory(),
        JobServiceConfig::default(),
        Arc::new(PanickingCompiler),
    );
    let mut rx = service.subscribe();

    service.create_job(request("p", ORDERS)).await.unwrap();
    service.create_job(request("p", ORDERS)).await.unwrap();
    for _ in 0..2 {
        let done = next_terminal(&mut rx).await;
        assert_eq!(done.status, JobStatus::Failed);
        assert_eq!(done.error.unwrap().code, codes::UNKNOWN_COMPILER_ERROR);
    }
}

#[tokio::test]
async fn internal_fault_is_unexpected_error() {
    let service = CompileJobService::with_compiler(
        Repositories::in_memory(),
        JobServiceConfig::default(),
        Arc::new(FaultyCompiler),
    );
    let mut rx = service.subscribe();
    service.create_job(request("p", ORDERS)).await.unwrap();
    let error = next_terminal(&mut rx).await.error.unwrap();
    assert_eq!(error.code, codes::UNEXPECTED_COMPILER_ERROR);
    assert!(error.message.contains("validator rejected output"));
}

#[tokio::test]
async fn repository_failure_is_unexpected_error() {
    let repos = Repositories::new(
        Arc::new(ReadOnlySpecs),
        Arc::new(InMemoryCompileJobRepository::new()),
    );
    let service = CompileJobService::new(repos, JobServiceConfig::default());
    let mut rx = service.subscribe();
    service.create_job(request("p", ORDERS)).await.unwrap();
    let done = next_terminal(&mut rx).await;
    assert_eq!(done.status, JobStatus::Failed);
    assert_eq!(done.error.unwrap().code, codes::UNEXPECTED_COMPILER_ERROR);
}

/// Job store whose update number `fail_on` (0-based) reports a backend error.
struct FlakyJobs {
    inner: InMemoryCompileJobRepository,
    updates: AtomicUsize,
    fail_on: usize,
}

impl FlakyJobs {
    fn failing_update(fail_on: usize) -> Self {
        FlakyJobs {
            inner: InMemoryCompileJobRepository::new(),
            updates: AtomicUsize::new(0),
            fail_on,
        }
    }
}

#[async_trait]
impl CompileJobRepository for FlakyJobs {
    async fn create(&self, record: CompileJobRecord) -> Result<(), StorageError> {
        self.inner.create(record).await
    }
    async fn update(&self, record: CompileJobRecord) -> Result<CompileJobRecord, StorageError> {
        if self.updates.fetch_add(1, Ordering::SeqCst) == self.fail_on {
            return Err(StorageError::Backend("transient".into()));
        }
        self.inner.update(record).await
    }
    async fn get_by_id(&self, id: &str) -> Result<CompileJobRecord, StorageError> {
        self.inner.get_by_id(id).await
    }
    async fn list_by_project(
        &self,
        project_id: &str,
    ) -> Result<Vec<CompileJobRecord>, StorageError> {
        self.inner.list_by_project(project_id).await
    }
}

fn flaky_service(fail_on: usize) -> CompileJobService {
    let repos = Repositories::new(
        Arc::new(InMemoryProtoSpecRepository::new()),
        Arc::new(FlakyJobs::failing_update(fail_on)),
    );
    CompileJobService::new(repos, JobServiceConfig::default())
}

#[tokio::test]
async fn job_that_cannot_start_still_fails() {
    let service = flaky_service(0);
    let mut rx = service.subscribe();

    let queued = service.create_job(request("p", ORDERS)).await.unwrap();
    let done = next_terminal(&mut rx).await;
    assert_eq!(done.id, queued.id);
    assert_eq!(done.status, JobStatus::Failed);
    let error = done.error.unwrap();
    assert_eq!(error.code, codes::UNEXPECTED_COMPILER_ERROR);
    assert!(error.message.contains("transient"), "{}", error.message);

    let stored = service.get_job(&queued.id).await.unwrap();
    assert_eq!(stored.status, JobStatus::Failed);
}

#[tokio::test]
async fn unstorable_outcome_falls_back_to_failed() {
    let service = flaky_service(1);
    let mut rx = service.subscribe();

    let queued = service.create_job(request("p", ORDERS)).await.unwrap();
    let done = next_terminal(&mut rx).await;
    assert_eq!(done.status, JobStatus::Failed);
    assert!(done.result.is_none());
    assert_eq!(done.error.unwrap().code, codes::UNEXPECTED_COMPILER_ERROR);
    assert_eq!(
        service.get_job(&queued.id).await.unwrap().status,
        JobStatus::Failed
    );
}
