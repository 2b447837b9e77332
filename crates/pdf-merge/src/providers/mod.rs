//! Object store abstractions
//!
//! The merge pipeline only needs to read and write whole objects. Backends
//! implement [`ObjectStore`] and are injected into the pipeline, so tests run
//! against memory and deployments pick local disk or GCS.

pub mod local;
pub mod memory;
pub mod object_store;

#[cfg(feature = "gcp")]
pub mod gcp;

pub use local::LocalObjectStore;
pub use memory::MemoryObjectStore;
pub use object_store::ObjectStore;

use std::sync::Arc;

use crate::config::{StorageBackend, StorageConfig};
use crate::error::Result;

/// Build the object store selected by configuration
pub async fn from_config(config: &StorageConfig) -> Result<Arc<dyn ObjectStore>> {
    match config.backend {
        StorageBackend::Local => {
            tracing::info!("Using local object store at {}", config.local_root.display());
            Ok(Arc::new(LocalObjectStore::new(config.local_root.clone())?))
        }
        StorageBackend::Gcp => {
            #[cfg(feature = "gcp")]
            {
                tracing::info!("Using Google Cloud Storage object store");
                Ok(Arc::new(gcp::GcsObjectStore::new().await?))
            }
            #[cfg(not(feature = "gcp"))]
            {
                Err(crate::error::Error::Config(
                    "GCP backend selected but the crate was built without the `gcp` feature"
                        .to_string(),
                ))
            }
        }
    }
}
