//! Google Cloud Storage object store
//!
//! Credentials come from the environment (`GOOGLE_APPLICATION_CREDENTIALS` or
//! the metadata server), the same way the GCS client resolves them elsewhere.

use async_trait::async_trait;

use google_cloud_storage::client::{Client as GcsClient, ClientConfig};
use google_cloud_storage::http::objects::download::Range;
use google_cloud_storage::http::objects::get::GetObjectRequest;
use google_cloud_storage::http::objects::upload::{Media, UploadObjectRequest, UploadType};
use google_cloud_storage::http::Error as GcsError;

use crate::error::{Error, Result};
use crate::providers::object_store::ObjectStore;

/// Google Cloud Storage object store
pub struct GcsObjectStore {
    client: GcsClient,
}

impl GcsObjectStore {
    /// Create a new GCS object store
    pub async fn new() -> Result<Self> {
        let config = ClientConfig::default()
            .with_auth()
            .await
            .map_err(|e| Error::Config(format!("Failed to create GCS client: {}", e)))?;

        Ok(Self {
            client: GcsClient::new(config),
        })
    }
}

fn is_not_found(err: &GcsError) -> bool {
    matches!(err, GcsError::Response(resp) if resp.code == 404)
}

#[async_trait]
impl ObjectStore for GcsObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        self.client
            .download_object(
                &GetObjectRequest {
                    bucket: bucket.to_string(),
                    object: key.to_string(),
                    ..Default::default()
                },
                &Range::default(),
            )
            .await
            .map_err(|e| {
                if is_not_found(&e) {
                    Error::not_found(bucket, key)
                } else {
                    Error::storage(format!("Failed to download gs://{}/{}: {}", bucket, key, e))
                }
            })
    }

    async fn put_object(&self, bucket: &str, key: &str, data: Vec<u8>) -> Result<()> {
        let mut media = Media::new(key.to_string());
        media.content_type = mime_guess::from_path(key)
            .first_or_octet_stream()
            .to_string()
            .into();
        media.content_length = Some(data.len() as u64);

        self.client
            .upload_object(
                &UploadObjectRequest {
                    bucket: bucket.to_string(),
                    ..Default::default()
                },
                data,
                &UploadType::Simple(media),
            )
            .await
            .map_err(|e| Error::storage(format!("Failed to upload gs://{}/{}: {}", bucket, key, e)))?;

        Ok(())
    }

    fn name(&self) -> &str {
        "gcs"
    }
}
