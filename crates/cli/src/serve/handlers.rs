//! HTTP route handlers: health, jobs, specs.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use protospec_jobs::{CreateJobRequest, JobServiceError};

use super::json_error;
use super::state::AppState;

fn service_error(e: JobServiceError) -> Response {
    let status = if e.is_not_found() {
        StatusCode::NOT_FOUND
    } else if e.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        tracing::error!(error = %e, "job service error");
        StatusCode::INTERNAL_SERVER_ERROR
    };
    json_error(status, &e.to_string()).into_response()
}

/// Fallback handler for unmatched routes.
pub(crate) async fn handle_not_found() -> impl IntoResponse {
    json_error(StatusCode::NOT_FOUND, "not found")
}

/// GET /health
pub(crate) async fn handle_health() -> impl IntoResponse {
    let response = serde_json::json!({
        "status": "ok",
        "compilerVersion": protospec_core::COMPILER_VERSION,
    });
    (StatusCode::OK, Json(response))
}

/// POST /jobs
pub(crate) async fn handle_create_job(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateJobRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return json_error(
                StatusCode::BAD_REQUEST,
                &format!("invalid request body: {}", rejection.body_text()),
            )
            .into_response()
        }
    };

    match state.jobs.create_job(request).await {
        Ok(record) => (
            StatusCode::ACCEPTED,
            Json(serde_json::json!({
                "jobId": record.id,
                "status": record.status,
                "createdAt": record.created_at,
            })),
        )
            .into_response(),
        Err(e) => service_error(e),
    }
}

/// GET /jobs/{id}
pub(crate) async fn handle_get_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    match state.jobs.get_job(&id).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => service_error(e),
    }
}

/// GET /projects/{id}/jobs
pub(crate) async fn handle_list_jobs(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
) -> Response {
    match state.jobs.list_jobs(&project_id).await {
        Ok(jobs) => (
            StatusCode::OK,
            Json(serde_json::json!({ "projectId": project_id, "jobs": jobs })),
        )
            .into_response(),
        Err(e) => service_error(e),
    }
}

/// GET /specs/{id}
pub(crate) async fn handle_get_spec(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    match state.jobs.get_spec(&id).await {
        Ok(spec) => (StatusCode::OK, Json(spec)).into_response(),
        Err(e) => service_error(e),
    }
}
