//! Invocation results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::error::Error;

/// Confirmation text returned on success
pub const SUCCESS_MESSAGE: &str = "PDF merge completed successfully";

/// Status/body pair returned by the top-level entry point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// JSON-encoded `{"message": ..}` or `{"error": ..}`
    pub body: String,
}

impl InvocationResponse {
    pub fn success() -> Self {
        Self {
            status_code: 200,
            body: json!({ "message": SUCCESS_MESSAGE }).to_string(),
        }
    }

    pub fn failure(err: &Error) -> Self {
        Self {
            status_code: 500,
            body: json!({ "error": err.to_string() }).to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

/// Outcome of one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeSummary {
    /// Identifier of the run, also used to name its temporary artifact
    pub job_id: Uuid,
    /// Number of keys listed in the manifest
    pub sources: usize,
    /// Sources that were fetched but empty and therefore skipped
    pub skipped_sources: usize,
    /// Pages in the merged output
    pub pages: usize,
    /// Size of the serialized output
    pub bytes_written: u64,
    pub optimized: bool,
    /// `bucket/key` of the published output
    pub destination: String,
    pub completed_at: DateTime<Utc>,
}
