//! pdf-merge: manifest-driven PDF concatenation over object storage
//!
//! A job names a JSON manifest in an object store. The manifest lists PDF keys;
//! each PDF is fetched in order, its pages are appended to a single output
//! document, and the result is written back to the store. Jobs arrive either
//! directly or wrapped in a queue-style `Records` envelope.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod pipeline;
pub mod providers;
pub mod server;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::MergeConfig;
pub use dispatch::{handle, handle_invocation};
pub use error::{Error, Result};
pub use pipeline::MergePipeline;
pub use providers::ObjectStore;
pub use types::{
    job::{Invocation, MergeJob, QueueRecord},
    response::{InvocationResponse, MergeSummary},
};
