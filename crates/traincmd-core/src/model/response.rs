//! Response document attached to an executed command

use super::Document;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use traincmd_core_types::ProgressSnapshot;

/// Outcome of an executed command, as stored under `response`
///
/// Progress fields are copied from the snapshot the caller passed in when
/// the response was attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResponse {
    /// ISO-8601 timestamp of execution
    pub executed_at: String,
    pub epoch: u64,
    pub iteration: u64,
    /// Seconds since run start at execution time
    pub elapsed_time: f64,
    pub status: Value,
    /// Executor output; null when it could not be represented as JSON
    pub body: Value,
}

impl CommandResponse {
    /// Build a response from a progress snapshot
    ///
    /// A body that fails to serialize is stored as null.
    pub fn build<B>(
        progress: &ProgressSnapshot,
        status: Value,
        body: &B,
        executed_at: DateTime<Utc>,
    ) -> Self
    where
        B: Serialize + ?Sized,
    {
        let body = match serde_json::to_value(body) {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(error = %err, "response body is not JSON-representable, storing null");
                Value::Null
            }
        };

        Self {
            executed_at: executed_at.to_rfc3339_opts(SecondsFormat::Micros, true),
            epoch: progress.epoch,
            iteration: progress.iteration,
            elapsed_time: finite_elapsed(progress.elapsed_time),
            status,
            body,
        }
    }

    /// Convert into the stored document form
    pub fn into_document(self) -> Document {
        let mut doc = Document::new();
        doc.insert("executed_at".to_string(), Value::String(self.executed_at));
        doc.insert("epoch".to_string(), Value::from(self.epoch));
        doc.insert("iteration".to_string(), Value::from(self.iteration));
        doc.insert("elapsed_time".to_string(), Value::from(self.elapsed_time));
        doc.insert("status".to_string(), self.status);
        doc.insert("body".to_string(), self.body);
        doc
    }

    /// Typed view of a stored response document
    ///
    /// Returns `None` when the document lacks one of the required fields,
    /// e.g. when it was written by hand.
    pub fn from_document(doc: &Document) -> Option<Self> {
        serde_json::from_value(Value::Object(doc.clone())).ok()
    }

    /// Execution time parsed back into a timestamp
    pub fn executed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.executed_at)
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }
}

/// JSON has no NaN or infinity; such clocks are recorded as zero seconds
fn finite_elapsed(elapsed_time: f64) -> f64 {
    if elapsed_time.is_finite() {
        elapsed_time
    } else {
        tracing::debug!(elapsed_time, "non-finite elapsed time, recording 0");
        0.0
    }
}
