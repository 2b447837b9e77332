//! Invocation dispatch
//!
//! [`handle`] classifies an event and runs the pipeline once per job.
//! [`handle_invocation`] wraps it as the top-level entry point: every error is
//! turned into a failure envelope there and nowhere else.
//!
//! Batches are processed in order and stop at the first record that fails,
//! whether it is malformed or its merge fails. Records before it have already
//! been published and are not rolled back; records after it are not run.

use serde_json::Value;

use crate::error::Result;
use crate::pipeline::MergePipeline;
use crate::types::{Invocation, InvocationResponse, MergeSummary};

/// Run every job in `event`, returning one summary per completed job
pub async fn handle(pipeline: &MergePipeline, event: Value) -> Result<Vec<MergeSummary>> {
    let invocation = Invocation::from_value(event).inspect_err(|e| {
        tracing::error!("Error in handle: {}", e);
    })?;

    match invocation {
        Invocation::Direct(job) => {
            tracing::info!("Direct invocation");
            Ok(vec![pipeline.run(&job).await?])
        }
        Invocation::Batch(records) => {
            tracing::info!("Queue batch with {} records", records.len());
            let mut summaries = Vec::with_capacity(records.len());
            for (index, record) in records.iter().enumerate() {
                let job = record.to_job().inspect_err(|e| {
                    tracing::error!("Record {} rejected: {}", index, e);
                })?;
                tracing::info!(
                    "Record {} ({}): optimize_pdf: {}",
                    index,
                    record.message_id().unwrap_or_else(|| "-".to_string()),
                    job.optimize_pdf
                );
                summaries.push(pipeline.run(&job).await?);
            }
            Ok(summaries)
        }
    }
}

/// Top-level entry point: run `event` and report the outcome as an envelope
pub async fn handle_invocation(pipeline: &MergePipeline, event: Value) -> InvocationResponse {
    tracing::info!("Start merge PDF");
    tracing::debug!("Event: {}", event);

    match handle(pipeline, event).await {
        Ok(summaries) => {
            tracing::info!("Invocation complete: {} jobs merged", summaries.len());
            InvocationResponse::success()
        }
        Err(e) => {
            tracing::error!("Error in invocation: {}", e);
            InvocationResponse::failure(&e)
        }
    }
}
