//! Google Cloud Platform provider implementations

mod gcs_store;

pub use gcs_store::GcsObjectStore;
