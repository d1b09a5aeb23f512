//! CompileJobService: a FIFO queue of compile jobs drained by one worker.
//!
//! `create_job` persists a `queued` record and kicks the drain loop. At most
//! one drain loop runs at a time (guarded by `draining`); after clearing the
//! guard it looks at the queue once more so a job enqueued during shutdown
//! of the loop is not stranded. Every outcome, panics included, is written
//! to the job record; nothing escapes the loop.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use protospec_core::{
    compile_prd_to_proto_spec, parse_source_type, CompileError, CompileOutput, CompilerOptions,
};
use protospec_interchange::{PrdSource, ProtoSpec};
use protospec_storage::{
    CompileJobPayload, CompileJobRecord, JobError, JobResult, JobStatus, Repositories,
    StorageError,
};
use serde::Deserialize;
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tokio::sync::{broadcast, Mutex};

use crate::error::{codes, JobServiceError};

/// The compilation step a job runs. Production uses [`MarkdownCompiler`].
pub trait PrdCompiler: Send + Sync + 'static {
    fn compile(
        &self,
        source: &PrdSource,
        options: &CompilerOptions,
    ) -> Result<CompileOutput, CompileError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownCompiler;

impl PrdCompiler for MarkdownCompiler {
    fn compile(
        &self,
        source: &PrdSource,
        options: &CompilerOptions,
    ) -> Result<CompileOutput, CompileError> {
        compile_prd_to_proto_spec(source, options)
    }
}

#[derive(Debug, Clone, Default)]
pub struct JobServiceConfig {
    pub compiler: CompilerOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Defaults to markdown.
    #[serde(default)]
    pub source_type: Option<String>,
    #[serde(default)]
    pub prd_content: String,
}

struct Inner {
    repos: Repositories,
    config: JobServiceConfig,
    compiler: Arc<dyn PrdCompiler>,
    queue: Mutex<VecDeque<String>>,
    draining: AtomicBool,
    terminal_tx: broadcast::Sender<CompileJobRecord>,
}

/// Cheap to clone; clones share one queue.
#[derive(Clone)]
pub struct CompileJobService {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for CompileJobService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompileJobService")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

fn now() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

impl CompileJobService {
    pub fn new(repos: Repositories, config: JobServiceConfig) -> Self {
        Self::with_compiler(repos, config, Arc::new(MarkdownCompiler))
    }

    pub fn with_compiler(
        repos: Repositories,
        config: JobServiceConfig,
        compiler: Arc<dyn PrdCompiler>,
    ) -> Self {
        let (terminal_tx, _) = broadcast::channel(64);
        CompileJobService {
            inner: Arc::new(Inner {
                repos,
                config,
                compiler,
                queue: Mutex::new(VecDeque::new()),
                draining: AtomicBool::new(false),
                terminal_tx,
            }),
        }
    }

    /// Receive every job record that reaches `succeeded` or `failed`.
    pub fn subscribe(&self) -> broadcast::Receiver<CompileJobRecord> {
        self.inner.terminal_tx.subscribe()
    }

    /// Validate, persist and enqueue a job. Returns the `queued` record;
    /// compilation happens in the background.
    pub async fn create_job(
        &self,
        request: CreateJobRequest,
    ) -> Result<CompileJobRecord, JobServiceError> {
        if request.project_id.trim().is_empty() {
            return Err(JobServiceError::BlankField { field: "projectId" });
        }
        if request.prd_content.trim().is_empty() {
            return Err(JobServiceError::BlankField { field: "prdContent" });
        }
        let source_type = match request.source_type.as_deref() {
            Some(name) => {
                parse_source_type(name).map_err(JobServiceError::UnsupportedSourceType)?
            }
            None => Default::default(),
        };

        let record = CompileJobRecord::queued(
            uuid::Uuid::new_v4().to_string(),
            request.project_id,
            CompileJobPayload {
                title: request.title.filter(|t| !t.trim().is_empty()),
                source_type,
                prd_content: request.prd_content,
            },
            now(),
        );
        self.inner.repos.jobs.create(record.clone()).await?;
        tracing::info!(
            trace_id = %record.id,
            project_id = %record.project_id,
            "compile job queued"
        );

        self.inner.queue.lock().await.push_back(record.id.clone());
        self.spawn_drain();
        Ok(record)
    }

    pub async fn get_job(&self, id: &str) -> Result<CompileJobRecord, JobServiceError> {
        Ok(self.inner.repos.jobs.get_by_id(id).await?)
    }

    pub async fn list_jobs(
        &self,
        project_id: &str,
    ) -> Result<Vec<CompileJobRecord>, JobServiceError> {
        Ok(self.inner.repos.jobs.list_by_project(project_id).await?)
    }

    pub async fn get_spec(&self, id: &str) -> Result<ProtoSpec, JobServiceError> {
        Ok(self.inner.repos.specs.get_by_id(id).await?)
    }

    fn spawn_drain(&self) {
        if self
            .inner
            .draining
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            let inner = Arc::clone(&self.inner);
            tokio::spawn(inner.drain());
        }
    }
}

impl Inner {
    async fn drain(self: Arc<Self>) {
        loop {
            loop {
                let next = self.queue.lock().await.pop_front();
                let Some(job_id) = next else { break };
                self.process(&job_id).await;
            }
            self.draining.store(false, Ordering::Release);

            if self.queue.lock().await.is_empty() {
                return;
            }
            // Something arrived after the inner loop ended; take the guard
            // back unless a new drain loop already has it.
            if self
                .draining
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                return;
            }
        }
    }

    async fn process(&self, job_id: &str) {
        let record = match self.repos.jobs.get_by_id(job_id).await {
            Ok(record) => record,
            Err(e) => {
                tracing::error!(trace_id = %job_id, error = %e, "queued job could not be loaded");
                return;
            }
        };

        let running = CompileJobRecord {
            status: JobStatus::Running,
            updated_at: now(),
            ..record.clone()
        };
        let running = match self.repos.jobs.update(running).await {
            Ok(record) => record,
            Err(e) => {
                tracing::error!(trace_id = %job_id, error = %e, "job could not be marked running");
                let error = unexpected(format!("marking job running failed: {}", e));
                self.fail(record, error).await;
                return;
            }
        };
        tracing::info!(trace_id = %job_id, "compile job started");

        let fallback = running.clone();
        let finished = match self.compile(&running).await {
            Ok(result) => {
                tracing::info!(
                    trace_id = %job_id,
                    spec_id = %result.spec_id,
                    warnings = result.warnings.len(),
                    needs_human_review = result.review.needs_human_review,
                    "compile job succeeded"
                );
                CompileJobRecord {
                    status: JobStatus::Succeeded,
                    result: Some(result),
                    updated_at: now(),
                    ..running
                }
            }
            Err(error) => {
                tracing::warn!(
                    trace_id = %job_id,
                    code = %error.code,
                    message = %error.message,
                    "compile job failed"
                );
                CompileJobRecord {
                    status: JobStatus::Failed,
                    error: Some(error),
                    updated_at: now(),
                    ..running
                }
            }
        };

        if let Err(e) = self.store_terminal(finished).await {
            tracing::error!(trace_id = %job_id, error = %e, "job outcome could not be stored");
            let error = unexpected(format!("storing job outcome failed: {}", e));
            self.fail(fallback, error).await;
        }
    }

    /// Persist a terminal record and notify subscribers.
    async fn store_terminal(&self, record: CompileJobRecord) -> Result<(), StorageError> {
        let stored = self.repos.jobs.update(record).await?;
        // No subscribers is fine.
        let _ = self.terminal_tx.send(stored);
        Ok(())
    }

    /// Last-resort move to `failed` after a repository error.
    async fn fail(&self, record: CompileJobRecord, error: JobError) {
        let job_id = record.id.clone();
        let failed = CompileJobRecord {
            status: JobStatus::Failed,
            result: None,
            error: Some(error),
            updated_at: now(),
            ..record
        };
        if let Err(e) = self.store_terminal(failed).await {
            tracing::error!(trace_id = %job_id, error = %e, "job could not be marked failed");
        }
    }

    async fn compile(&self, record: &CompileJobRecord) -> Result<JobResult, JobError> {
        let source = PrdSource {
            project_id: record.project_id.clone(),
            title: record.payload.title.clone(),
            source_type: record.payload.source_type,
            content: record.payload.prd_content.clone(),
        };
        let options = self.config.compiler.clone();
        let compiler = Arc::clone(&self.compiler);

        let joined =
            tokio::task::spawn_blocking(move || compiler.compile(&source, &options)).await;

        let output = match joined {
            Ok(Ok(output)) => output,
            Ok(Err(CompileError::Prd(e))) => {
                return Err(JobError {
                    code: e.code,
                    message: e.message,
                    details: e.details,
                })
            }
            Ok(Err(e)) => return Err(unexpected(e.to_string())),
            Err(join) => {
                let message = if join.is_panic() {
                    "compiler panicked".to_string()
                } else {
                    join.to_string()
                };
                return Err(JobError {
                    code: codes::UNKNOWN_COMPILER_ERROR.to_string(),
                    message,
                    details: BTreeMap::new(),
                });
            }
        };

        let spec_id = output.spec.id.clone();
        self.repos
            .specs
            .create(output.spec)
            .await
            .map_err(|e| unexpected(format!("storing compiled spec failed: {}", e)))?;

        Ok(JobResult {
            spec_id,
            warnings: output.warnings,
            review: output.review,
        })
    }
}

fn unexpected(message: String) -> JobError {
    let mut details = BTreeMap::new();
    details.insert("cause".to_string(), Value::String(message.clone()));
    JobError {
        code: codes::UNEXPECTED_COMPILER_ERROR.to_string(),
        message,
        details,
    }
}
