use std::collections::BTreeMap;
use std::io::Write;

use axum::{
    Json,
    extract::{Multipart, Path, State, multipart::Field},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::oracle::OracleClient;
use crate::report::AnalysisMode;
use crate::storage::{BlobStore, has_image_extension};

use super::error::GatewayError;
use super::state::HandlerState;

/// Maps an uploaded filename to its analysis mode by extension.
/// Anything outside the allow-list is rejected before a job exists.
pub(crate) fn analysis_mode_for(filename: &str) -> Option<AnalysisMode> {
    let lower = filename.to_ascii_lowercase();
    if lower.ends_with(".pdf") {
        Some(AnalysisMode::Pdf)
    } else if has_image_extension(&lower) {
        Some(AnalysisMode::Screenshot)
    } else {
        None
    }
}

/// Accepts a multipart upload, stages it to a temp file, registers the job
/// and spawns the analysis pipeline. Validation failures happen before any
/// job state is created.
#[tracing::instrument(skip(state, multipart))]
pub async fn upload_handler<O, S>(
    State(state): State<HandlerState<O, S>>,
    mut multipart: Multipart,
) -> Result<Response, GatewayError>
where
    O: OracleClient + ?Sized + 'static,
    S: BlobStore + ?Sized + 'static,
{
    let mut upload: Option<(String, AnalysisMode, Vec<u8>)> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| GatewayError::InvalidRequest(format!("malformed multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .map(sanitize_filename)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| GatewayError::InvalidRequest("missing filename".to_string()))?;
        let Some(mode) = analysis_mode_for(&filename) else {
            return Err(GatewayError::InvalidRequest(format!(
                "unsupported file type: {}",
                filename
            )));
        };
        let bytes = read_field_capped(&mut field, state.max_upload_bytes).await?;
        upload = Some((filename, mode, bytes));
        break;
    }

    let (filename, mode, bytes) =
        upload.ok_or_else(|| GatewayError::InvalidRequest("no file field in request".to_string()))?;

    if bytes.is_empty() {
        return Err(GatewayError::InvalidRequest("empty file".to_string()));
    }

    let temp_path = stage_to_temp_file(&bytes)?;
    let job_id = Uuid::new_v4().to_string();
    let job = state
        .tracker
        .create(&job_id, &filename, bytes.len() as u64, temp_path);

    info!(job_id, filename, size = bytes.len(), mode = ?mode, "Upload accepted");

    let pipeline = state.pipeline.clone();
    let spawned_filename = filename.clone();
    let spawned_id = job_id.clone();
    tokio::spawn(async move {
        pipeline.run(&spawned_id, &spawned_filename, mode).await;
    });

    Ok((
        StatusCode::OK,
        Json(json!({
            "job_id": job_id,
            "status": job.status,
            "filename": filename,
            "message": job.message,
        })),
    )
        .into_response())
}

/// Progress snapshot for polling clients. Results are deliberately
/// excluded; the results endpoint gates on completion.
#[tracing::instrument(skip(state))]
pub async fn status_handler<O, S>(
    State(state): State<HandlerState<O, S>>,
    Path(job_id): Path<String>,
) -> Result<Response, GatewayError>
where
    O: OracleClient + ?Sized + 'static,
    S: BlobStore + ?Sized + 'static,
{
    let job = state
        .tracker
        .get(&job_id)
        .ok_or_else(|| GatewayError::NotFound(job_id.clone()))?;

    Ok(Json(json!({
        "job_id": job.id,
        "filename": job.filename,
        "status": job.status,
        "progress": job.progress,
        "message": job.message,
        "error": job.error,
        "created_at": job.created_at,
        "updated_at": job.updated_at,
    }))
    .into_response())
}

/// Full analysis results, only once the job has completed.
#[tracing::instrument(skip(state))]
pub async fn results_handler<O, S>(
    State(state): State<HandlerState<O, S>>,
    Path(job_id): Path<String>,
) -> Result<Response, GatewayError>
where
    O: OracleClient + ?Sized + 'static,
    S: BlobStore + ?Sized + 'static,
{
    let job = state
        .tracker
        .get(&job_id)
        .ok_or_else(|| GatewayError::NotFound(job_id.clone()))?;

    match job.results {
        Some(results) => Ok(Json(json!({
            "job_id": job.id,
            "filename": job.filename,
            "results": results,
        }))
        .into_response()),
        None => match job.error {
            Some(error) => Err(GatewayError::NotReady(error)),
            None => Err(GatewayError::NotReady(format!(
                "job is {} at {}%",
                job.status, job.progress
            ))),
        },
    }
}

/// Removes a job and its staged temp file.
#[tracing::instrument(skip(state))]
pub async fn cleanup_handler<O, S>(
    State(state): State<HandlerState<O, S>>,
    Path(job_id): Path<String>,
) -> Result<Response, GatewayError>
where
    O: OracleClient + ?Sized + 'static,
    S: BlobStore + ?Sized + 'static,
{
    let removed = state
        .tracker
        .delete(&job_id)
        .ok_or_else(|| GatewayError::NotFound(job_id.clone()))?;

    if let Some(path) = removed.temp_path {
        if let Err(e) = tokio::fs::remove_file(&path).await {
            warn!(job_id, path = %path.display(), error = %e, "Temp file cleanup failed");
        }
    }

    Ok(Json(json!({
        "job_id": job_id,
        "message": "Job deleted",
    }))
    .into_response())
}

/// All tracked jobs, newest first, without result payloads, plus
/// per-status counts.
#[tracing::instrument(skip(state))]
pub async fn jobs_handler<O, S>(State(state): State<HandlerState<O, S>>) -> Response
where
    O: OracleClient + ?Sized + 'static,
    S: BlobStore + ?Sized + 'static,
{
    let all = state.tracker.list();

    let mut status_counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for job in &all {
        *status_counts.entry(job.status.as_str()).or_insert(0) += 1;
    }

    let jobs: Vec<serde_json::Value> = all
        .into_iter()
        .map(|job| {
            json!({
                "job_id": job.id,
                "filename": job.filename,
                "status": job.status,
                "progress": job.progress,
                "created_at": job.created_at,
            })
        })
        .collect();

    Json(json!({
        "total": jobs.len(),
        "status_counts": status_counts,
        "jobs": jobs,
    }))
    .into_response()
}

/// Buffers an upload field chunk by chunk, rejecting it the moment the
/// accumulated size passes the configured ceiling. Enforcing the limit
/// here, rather than through the router's body cap, keeps the rejection
/// a size-limit response no matter how large the upload is.
async fn read_field_capped(
    field: &mut Field<'_>,
    max: u64,
) -> Result<Vec<u8>, GatewayError> {
    let mut bytes: Vec<u8> = Vec::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| GatewayError::InvalidRequest(format!("upload read failed: {}", e)))?
    {
        let size = bytes.len() as u64 + chunk.len() as u64;
        if size > max {
            return Err(GatewayError::PayloadTooLarge { size, max });
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

/// Strips any path components a client smuggles into the filename.
fn sanitize_filename(raw: &str) -> String {
    raw.rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .to_string()
}

fn stage_to_temp_file(bytes: &[u8]) -> Result<std::path::PathBuf, GatewayError> {
    let mut file = tempfile::NamedTempFile::new()
        .map_err(|e| GatewayError::InternalError(format!("temp file creation: {}", e)))?;
    file.write_all(bytes)
        .map_err(|e| GatewayError::InternalError(format!("temp file write: {}", e)))?;
    file.into_temp_path()
        .keep()
        .map_err(|e| GatewayError::InternalError(format!("temp file persist: {}", e)))
}
