//! Manifest resolution
//!
//! A manifest is a JSON object stored next to the sources:
//! `{"pdfs": ["a.pdf", "b.pdf"]}`. A missing or null `pdfs` field means
//! there is nothing to merge, which is not an error.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::providers::ObjectStore;

/// Why manifest bytes could not be parsed
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("manifest is not UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

/// Parsed manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pdfs: Option<Vec<String>>,
}

impl Manifest {
    /// Parse manifest bytes
    pub fn from_bytes(data: &[u8]) -> std::result::Result<Self, ManifestError> {
        let text = std::str::from_utf8(data)?;
        Ok(serde_json::from_str(text)?)
    }

    /// Source keys in merge order
    pub fn into_keys(self) -> Vec<String> {
        self.pdfs.unwrap_or_default()
    }
}

/// Fetch and parse the manifest at `bucket/key`, returning its source keys
pub async fn resolve_manifest(store: &dyn ObjectStore, bucket: &str, key: &str) -> Result<Vec<String>> {
    tracing::info!("Retrieving manifest from {}: {}/{}", store.name(), bucket, key);

    let data = store.get_object(bucket, key).await.map_err(|e| {
        tracing::error!("Error retrieving manifest {}/{}: {}", bucket, key, e);
        Error::ManifestFetch {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message: e.to_string(),
        }
    })?;

    let manifest = Manifest::from_bytes(&data).map_err(|e| {
        tracing::error!("Error parsing manifest {}/{}: {}", bucket, key, e);
        Error::ManifestParse {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message: e.to_string(),
        }
    })?;

    let keys = manifest.into_keys();
    if keys.is_empty() {
        tracing::warn!("No PDF files found in manifest {}/{}", bucket, key);
    } else {
        tracing::info!("Found {} PDFs to process", keys.len());
    }

    Ok(keys)
}
