//! Job and invocation types
//!
//! An invocation arrives as loose JSON. It is classified once at the boundary
//! into [`Invocation::Direct`] or [`Invocation::Batch`]; everything past that
//! point works with typed values.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Field whose presence marks the direct invocation form
const DIRECT_MARKER: &str = "input_bucket";

/// Field whose presence marks the queue batch form
const BATCH_MARKER: &str = "Records";

/// Queue record wrapper fields
const MESSAGE_ID: &str = "messageId";
const BODY: &str = "body";

/// One complete merge request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeJob {
    /// Bucket holding the manifest and every source PDF
    pub input_bucket: String,
    /// Key of the JSON manifest
    pub input_file_key: String,
    /// Bucket receiving the merged PDF
    pub output_bucket: String,
    /// Key of the merged PDF
    pub output_file_key: String,
    /// Compact the output during serialization
    #[serde(default)]
    pub optimize_pdf: bool,
}

impl MergeJob {
    /// Build a job from a JSON object carrying the direct-form fields
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| Error::malformed(format!("Invalid merge job: {}", e)))
    }

    /// Display location of the manifest
    pub fn manifest_location(&self) -> String {
        format!("{}/{}", self.input_bucket, self.input_file_key)
    }

    /// Display location of the merged output
    pub fn destination_location(&self) -> String {
        format!("{}/{}", self.output_bucket, self.output_file_key)
    }
}

/// A queue message wrapper carrying one job description as a JSON string
///
/// The wrapper is kept as received. Its shape is only checked by
/// [`QueueRecord::to_job`], when the record's turn comes, so a bad record
/// cannot reject the records queued before it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueueRecord(Value);

impl QueueRecord {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    /// Message id for logging; any JSON scalar is accepted
    pub fn message_id(&self) -> Option<String> {
        match self.0.get(MESSAGE_ID)? {
            Value::String(id) => Some(id.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Decode the wrapped job
    ///
    /// Fails with `MalformedRequest` when the wrapper is not an object or has
    /// no message id, the body is missing, not a string or not JSON, or the
    /// body lacks the job fields.
    pub fn to_job(&self) -> Result<MergeJob> {
        if self.0.get(MESSAGE_ID).is_none() {
            return Err(Error::malformed(
                "Records JSON has an unrecognized format. Missing messageId.",
            ));
        }
        let message_id = self.message_id().unwrap_or_else(|| "-".to_string());

        let body = match self.0.get(BODY) {
            Some(Value::String(body)) => body,
            Some(other) => {
                return Err(Error::malformed(format!(
                    "Record {} body must be a JSON string, got {}",
                    message_id, other
                )))
            }
            None => return Err(Error::malformed(format!("Record {} has no body", message_id))),
        };

        let message: Value = serde_json::from_str(body).map_err(|e| {
            Error::malformed(format!("Record {} body is not valid JSON: {}", message_id, e))
        })?;

        if message.get(DIRECT_MARKER).is_none() {
            return Err(Error::malformed(format!(
                "Record {} has an unrecognized format. Missing key for input_bucket.",
                message_id
            )));
        }

        MergeJob::from_value(message)
    }
}

/// A classified invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// A single job passed directly
    Direct(MergeJob),
    /// Queue records, decoded one at a time as they are processed
    Batch(Vec<QueueRecord>),
}

impl Invocation {
    /// Classify a raw event
    pub fn from_value(event: Value) -> Result<Self> {
        if !event.is_object() {
            return Err(Error::malformed("Request must be a JSON object"));
        }

        if event.get(DIRECT_MARKER).is_some() {
            return MergeJob::from_value(event).map(Invocation::Direct);
        }

        if let Some(records) = event.get(BATCH_MARKER) {
            let Value::Array(records) = records else {
                return Err(Error::malformed("Records must be a list"));
            };
            return Ok(Invocation::Batch(
                records.iter().cloned().map(QueueRecord::new).collect(),
            ));
        }

        Err(Error::malformed(
            "JSON has an unrecognized format. NOT a direct invocation or queue batch.",
        ))
    }
}
