//! `protospec serve` -- HTTP JSON API over the compile job service.
//!
//! Endpoints:
//! - GET  /health                - Server status
//! - POST /jobs                  - Queue a PRD compilation (202)
//! - GET  /jobs/{id}             - One job record
//! - GET  /projects/{id}/jobs    - All jobs of a project
//! - GET  /specs/{id}            - A compiled ProtoSpec
//!
//! All responses use Content-Type: application/json; errors are
//! `{"error": "..."}`.

mod handlers;
mod state;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use protospec_jobs::{CompileJobService, JobServiceConfig};
use protospec_storage::Repositories;
use tower_http::cors::{Any, CorsLayer};

use self::handlers::{
    handle_create_job, handle_get_job, handle_get_spec, handle_health, handle_list_jobs,
    handle_not_found,
};
use self::state::AppState;
use crate::config::Config;

/// Maximum request body size: 2 MB.
const MAX_BODY_SIZE: usize = 2 * 1024 * 1024;

fn json_error(status: StatusCode, message: &str) -> impl IntoResponse {
    (status, Json(serde_json::json!({"error": message})))
}

pub(crate) fn router(jobs: CompileJobService) -> Router {
    let state = Arc::new(AppState { jobs });

    // CORS: permissive, for local prototyping front ends.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/jobs", post(handle_create_job))
        .route("/jobs/{id}", get(handle_get_job))
        .route("/projects/{id}/jobs", get(handle_list_jobs))
        .route("/specs/{id}", get(handle_get_spec))
        .fallback(handle_not_found)
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .with_state(state)
}

/// Start the HTTP server on `port` with fresh in-memory repositories.
pub(crate) async fn start_server(port: u16, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let jobs = CompileJobService::new(
        Repositories::in_memory(),
        JobServiceConfig {
            compiler: config.compiler_options(),
        },
    );
    let app = router(jobs);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "protospec job API listening");
    eprintln!("ProtoSpec job API listening on http://0.0.0.0:{}", port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    eprintln!("\nServer shut down.");
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    eprintln!("\nReceived shutdown signal...");
}
