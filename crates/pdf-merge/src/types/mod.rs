//! Core types for the merge service

pub mod job;
pub mod response;

pub use job::{Invocation, MergeJob, QueueRecord};
pub use response::{InvocationResponse, MergeSummary};
