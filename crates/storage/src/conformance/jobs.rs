use std::future::Future;

use super::{make_job, TestResult};
use crate::record::{JobError, JobStatus};
use crate::{Repositories, StorageError};

pub(super) async fn run_job_tests<F, Fut>(factory: &F) -> Vec<TestResult>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Repositories>,
{
    vec![
        TestResult::from_result(
            "jobs",
            "created_job_is_queued_and_readable",
            created_job_is_queued_and_readable(factory).await,
        ),
        TestResult::from_result(
            "jobs",
            "duplicate_job_is_rejected",
            duplicate_job_is_rejected(factory).await,
        ),
        TestResult::from_result(
            "jobs",
            "update_unknown_job_is_not_found",
            update_unknown_job_is_not_found(factory).await,
        ),
        TestResult::from_result(
            "jobs",
            "forward_transitions_are_persisted",
            forward_transitions_are_persisted(factory).await,
        ),
        TestResult::from_result(
            "jobs",
            "backward_transition_is_rejected",
            backward_transition_is_rejected(factory).await,
        ),
        TestResult::from_result(
            "jobs",
            "terminal_job_is_frozen",
            terminal_job_is_frozen(factory).await,
        ),
        TestResult::from_result(
            "jobs",
            "project_id_is_immutable",
            project_id_is_immutable(factory).await,
        ),
        TestResult::from_result(
            "jobs",
            "list_is_in_creation_order",
            list_is_in_creation_order(factory).await,
        ),
    ]
}

async fn created_job_is_queued_and_readable<F, Fut>(factory: &F) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Repositories>,
{
    let repos = factory().await;
    repos
        .jobs
        .create(make_job("job-1", "proj"))
        .await
        .map_err(|e| format!("create failed: {e}"))?;
    let got = repos
        .jobs
        .get_by_id("job-1")
        .await
        .map_err(|e| format!("get_by_id failed: {e}"))?;
    if got.status != JobStatus::Queued {
        return Err(format!("expected queued, got {}", got.status));
    }
    Ok(())
}

async fn duplicate_job_is_rejected<F, Fut>(factory: &F) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Repositories>,
{
    let repos = factory().await;
    repos
        .jobs
        .create(make_job("job-1", "proj"))
        .await
        .map_err(|e| format!("first create failed: {e}"))?;
    match repos.jobs.create(make_job("job-1", "proj")).await {
        Err(StorageError::Duplicate { .. }) => Ok(()),
        other => Err(format!("expected Duplicate, got {other:?}")),
    }
}

async fn update_unknown_job_is_not_found<F, Fut>(factory: &F) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Repositories>,
{
    let repos = factory().await;
    match repos.jobs.update(make_job("ghost", "proj")).await {
        Err(StorageError::NotFound { .. }) => Ok(()),
        other => Err(format!("expected NotFound, got {other:?}")),
    }
}

async fn forward_transitions_are_persisted<F, Fut>(factory: &F) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Repositories>,
{
    let repos = factory().await;
    let mut job = make_job("job-1", "proj");
    repos
        .jobs
        .create(job.clone())
        .await
        .map_err(|e| format!("create failed: {e}"))?;

    job.status = JobStatus::Running;
    job.updated_at = "2025-01-01T00:00:01Z".to_string();
    repos
        .jobs
        .update(job.clone())
        .await
        .map_err(|e| format!("queued -> running failed: {e}"))?;

    job.status = JobStatus::Failed;
    job.error = Some(JobError {
        code: "EMPTY_SOURCE".to_string(),
        message: "empty".to_string(),
        details: Default::default(),
    });
    let stored = repos
        .jobs
        .update(job.clone())
        .await
        .map_err(|e| format!("running -> failed failed: {e}"))?;
    if stored != job {
        return Err("update did not return the stored record".to_string());
    }
    let got = repos
        .jobs
        .get_by_id("job-1")
        .await
        .map_err(|e| format!("get_by_id failed: {e}"))?;
    if got.status != JobStatus::Failed || got.error.is_none() {
        return Err(format!("expected failed with error, got {got:?}"));
    }
    Ok(())
}

async fn backward_transition_is_rejected<F, Fut>(factory: &F) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Repositories>,
{
    let repos = factory().await;
    let mut job = make_job("job-1", "proj");
    repos
        .jobs
        .create(job.clone())
        .await
        .map_err(|e| format!("create failed: {e}"))?;
    job.status = JobStatus::Running;
    repos
        .jobs
        .update(job.clone())
        .await
        .map_err(|e| format!("queued -> running failed: {e}"))?;
    job.status = JobStatus::Queued;
    match repos.jobs.update(job).await {
        Err(StorageError::InvalidTransition { .. }) => Ok(()),
        other => Err(format!("expected InvalidTransition, got {other:?}")),
    }
}

async fn terminal_job_is_frozen<F, Fut>(factory: &F) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Repositories>,
{
    let repos = factory().await;
    let mut job = make_job("job-1", "proj");
    repos
        .jobs
        .create(job.clone())
        .await
        .map_err(|e| format!("create failed: {e}"))?;
    job.status = JobStatus::Failed;
    repos
        .jobs
        .update(job.clone())
        .await
        .map_err(|e| format!("queued -> failed failed: {e}"))?;
    job.status = JobStatus::Running;
    match repos.jobs.update(job).await {
        Err(StorageError::InvalidTransition { .. }) => Ok(()),
        other => Err(format!("expected InvalidTransition, got {other:?}")),
    }
}

async fn project_id_is_immutable<F, Fut>(factory: &F) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Repositories>,
{
    let repos = factory().await;
    let mut job = make_job("job-1", "proj");
    repos
        .jobs
        .create(job.clone())
        .await
        .map_err(|e| format!("create failed: {e}"))?;
    job.project_id = "other".to_string();
    match repos.jobs.update(job).await {
        Err(StorageError::ImmutableField { field, .. }) if field == "projectId" => Ok(()),
        other => Err(format!("expected ImmutableField(projectId), got {other:?}")),
    }
}

async fn list_is_in_creation_order<F, Fut>(factory: &F) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Repositories>,
{
    let repos = factory().await;
    for (id, project) in [("j3", "p"), ("j1", "p"), ("j2", "q"), ("j0", "p")] {
        repos
            .jobs
            .create(make_job(id, project))
            .await
            .map_err(|e| format!("create {id} failed: {e}"))?;
    }
    let listed = repos
        .jobs
        .list_by_project("p")
        .await
        .map_err(|e| format!("list failed: {e}"))?;
    let ids: Vec<&str> = listed.iter().map(|j| j.id.as_str()).collect();
    if ids != ["j3", "j1", "j0"] {
        return Err(format!("expected [j3, j1, j0], got {ids:?}"));
    }
    Ok(())
}
