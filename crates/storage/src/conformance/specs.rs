use std::future::Future;

use super::{make_spec, TestResult};
use crate::{Repositories, StorageError};

pub(super) async fn run_spec_tests<F, Fut>(factory: &F) -> Vec<TestResult>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Repositories>,
{
    vec![
        TestResult::from_result(
            "specs",
            "created_spec_is_readable",
            created_spec_is_readable(factory).await,
        ),
        TestResult::from_result(
            "specs",
            "missing_spec_is_not_found",
            missing_spec_is_not_found(factory).await,
        ),
        TestResult::from_result(
            "specs",
            "duplicate_spec_is_rejected",
            duplicate_spec_is_rejected(factory).await,
        ),
        TestResult::from_result(
            "specs",
            "list_filters_by_project_in_order",
            list_filters_by_project_in_order(factory).await,
        ),
    ]
}

async fn created_spec_is_readable<F, Fut>(factory: &F) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Repositories>,
{
    let repos = factory().await;
    let spec = make_spec("spec-1", "proj-a");
    repos
        .specs
        .create(spec.clone())
        .await
        .map_err(|e| format!("create failed: {e}"))?;
    let got = repos
        .specs
        .get_by_id("spec-1")
        .await
        .map_err(|e| format!("get_by_id failed: {e}"))?;
    if got != spec {
        return Err("stored spec differs from the created one".to_string());
    }
    Ok(())
}

async fn missing_spec_is_not_found<F, Fut>(factory: &F) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Repositories>,
{
    let repos = factory().await;
    match repos.specs.get_by_id("nope").await {
        Err(StorageError::NotFound { .. }) => Ok(()),
        other => Err(format!("expected NotFound, got {other:?}")),
    }
}

async fn duplicate_spec_is_rejected<F, Fut>(factory: &F) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Repositories>,
{
    let repos = factory().await;
    repos
        .specs
        .create(make_spec("spec-1", "proj-a"))
        .await
        .map_err(|e| format!("first create failed: {e}"))?;
    match repos.specs.create(make_spec("spec-1", "proj-b")).await {
        Err(StorageError::Duplicate { .. }) => Ok(()),
        other => Err(format!("expected Duplicate, got {other:?}")),
    }
}

async fn list_filters_by_project_in_order<F, Fut>(factory: &F) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Repositories>,
{
    let repos = factory().await;
    for (id, project) in [("s1", "a"), ("s2", "b"), ("s3", "a")] {
        repos
            .specs
            .create(make_spec(id, project))
            .await
            .map_err(|e| format!("create {id} failed: {e}"))?;
    }
    let listed = repos
        .specs
        .list_by_project("a")
        .await
        .map_err(|e| format!("list failed: {e}"))?;
    let ids: Vec<&str> = listed.iter().map(|s| s.id.as_str()).collect();
    if ids != ["s1", "s3"] {
        return Err(format!("expected [s1, s3], got {ids:?}"));
    }
    Ok(())
}
