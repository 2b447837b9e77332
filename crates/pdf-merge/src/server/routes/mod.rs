//! API routes for the merge server

pub mod invoke;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_body_size: usize) -> Router<AppState> {
    Router::new()
        // Raw events, direct or queue batch
        .route("/invoke", post(invoke::invoke))
        // Single typed job
        .route("/merge", post(invoke::merge_job))
        .layer(DefaultBodyLimit::max(max_body_size))
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "pdf-merge",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Merge the PDFs listed in an object-store manifest into one document",
        "endpoints": {
            "POST /api/invoke": "Run a direct or Records-batched event, returns a status envelope",
            "POST /api/merge": "Run a single merge job, returns the merge summary",
        }
    }))
}
