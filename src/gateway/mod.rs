//! HTTP gateway (Axum) for upload, job polling, and results retrieval.
//!
//! This module is primarily used by the `credlens` server binary.

pub mod error;
pub mod handler;
pub mod state;


use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::upload_handler;
pub use state::HandlerState;

use crate::oracle::OracleClient;
use crate::storage::BlobStore;

pub fn create_router_with_state<O, S>(state: HandlerState<O, S>) -> Router
where
    O: OracleClient + ?Sized + 'static,
    S: BlobStore + ?Sized + 'static,
{
    Router::new()
        .route("/health", get(health_handler))
        // The upload handler enforces `max_upload_bytes` itself while
        // streaming the field, so oversize uploads get the 413 size-limit
        // rejection rather than the framework's generic body cap.
        .route(
            "/api/upload",
            post(handler::upload_handler).layer(DefaultBodyLimit::disable()),
        )
        .route("/api/status/{job_id}", get(handler::status_handler))
        .route("/api/results/{job_id}", get(handler::results_handler))
        .route("/api/cleanup/{job_id}", delete(handler::cleanup_handler))
        .route("/api/jobs", get(handler::jobs_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            service: "credlens",
        }),
    )
        .into_response()
}
