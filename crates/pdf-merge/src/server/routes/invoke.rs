//! Invocation endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde_json::Value;

use crate::dispatch::handle_invocation;
use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{InvocationResponse, MergeJob, MergeSummary};

/// POST /api/invoke - Run an event and return its status envelope
///
/// The HTTP status mirrors the envelope's `statusCode`.
pub async fn invoke(
    State(state): State<AppState>,
    Json(event): Json<Value>,
) -> (StatusCode, Json<InvocationResponse>) {
    let response = handle_invocation(state.pipeline(), event).await;
    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response))
}

/// POST /api/merge - Run one job and return its summary
pub async fn merge_job(
    State(state): State<AppState>,
    Json(job): Json<MergeJob>,
) -> Result<Json<MergeSummary>> {
    let summary = state.pipeline().run(&job).await?;
    Ok(Json(summary))
}
