//! Error types for the merge service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for merge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Merge service errors
#[derive(Debug, Error)]
pub enum Error {
    /// Request matched neither the direct nor the batched shape
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// Manifest object could not be read from storage
    #[error("Error retrieving manifest {bucket}/{key}: {message}")]
    ManifestFetch {
        bucket: String,
        key: String,
        message: String,
    },

    /// Manifest object is not valid JSON
    #[error("Error parsing manifest {bucket}/{key}: {message}")]
    ManifestParse {
        bucket: String,
        key: String,
        message: String,
    },

    /// Source PDF could not be read from storage
    #[error("Error downloading PDF {bucket}/{key}: {message}")]
    SourceFetch {
        bucket: String,
        key: String,
        message: String,
    },

    /// Fetch, parse, append or serialize failure while merging
    #[error("Error merging PDFs: {0}")]
    Merge(#[source] Box<Error>),

    /// Merged output could not be written to its destination
    #[error("Error uploading merged PDF to {bucket}/{key}: {message}")]
    Publish {
        bucket: String,
        key: String,
        message: String,
    },

    /// Object does not exist in the store
    #[error("Object not found: {bucket}/{key}")]
    ObjectNotFound { bucket: String, key: String },

    /// Storage backend failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// PDF parse or write error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a malformed request error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRequest(message.into())
    }

    /// Wrap a failure raised while merging
    pub fn merge(cause: Error) -> Self {
        Self::Merge(Box::new(cause))
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create an object-not-found error
    pub fn not_found(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self::ObjectNotFound {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Short machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Error::MalformedRequest(_) => "malformed_request",
            Error::ManifestFetch { .. } => "manifest_fetch_error",
            Error::ManifestParse { .. } => "manifest_parse_error",
            Error::SourceFetch { .. } => "source_fetch_error",
            Error::Merge(_) => "merge_error",
            Error::Publish { .. } => "publish_error",
            Error::ObjectNotFound { .. } => "not_found",
            Error::Storage(_) => "storage_error",
            Error::Config(_) => "config_error",
            Error::Io(_) => "io_error",
            Error::Json(_) => "json_error",
            Error::Pdf(_) => "pdf_error",
            Error::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::MalformedRequest(_) | Error::Json(_) => StatusCode::BAD_REQUEST,
            Error::ObjectNotFound { .. } => StatusCode::NOT_FOUND,
            Error::ManifestParse { .. } | Error::Pdf(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::ManifestFetch { .. } | Error::SourceFetch { .. } | Error::Publish { .. } => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": {
                "type": self.kind(),
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
