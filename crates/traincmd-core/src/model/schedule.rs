//! Scheduling descriptor carried inside a command request
//!
//! A request may hold `"schedule": {"key": "epoch" | "iteration", "value": N}`.
//! Matching is exact: a command scheduled for epoch 5 is due only while the
//! trainer reports epoch 5, never "at or after".

use super::Document;
use serde_json::{json, Value};
use traincmd_core_types::ProgressSnapshot;

pub const SCHEDULE_FIELD: &str = "schedule";
pub const KEY_EPOCH: &str = "epoch";
pub const KEY_ITERATION: &str = "iteration";

/// Typed view of a request's `schedule` sub-document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// No schedule: due the first time it is checked
    Unconditional,
    AtEpoch(u64),
    AtIteration(u64),
    /// Unknown key or malformed descriptor: never due
    Invalid,
}

impl Schedule {
    /// Interpret the `schedule` entry of a request
    ///
    /// A request that is not an object is `Invalid`. Inside an object,
    /// anything other than a descriptor with a known `key` and a
    /// non-negative integral `value` is `Invalid`, including an explicit
    /// `null`.
    pub fn from_request(request: &Value) -> Self {
        match request {
            Value::Object(document) => Self::from_document(document),
            _ => Schedule::Invalid,
        }
    }

    /// Interpret the `schedule` entry of a request document
    pub fn from_document(request: &Document) -> Self {
        match request.get(SCHEDULE_FIELD) {
            None => Schedule::Unconditional,
            Some(Value::Object(descriptor)) => Self::from_descriptor(descriptor),
            Some(_) => Schedule::Invalid,
        }
    }

    fn from_descriptor(descriptor: &Document) -> Self {
        let Some(value) = descriptor.get("value").and_then(counter_value) else {
            return Schedule::Invalid;
        };
        match descriptor.get("key").and_then(Value::as_str) {
            Some(KEY_EPOCH) => Schedule::AtEpoch(value),
            Some(KEY_ITERATION) => Schedule::AtIteration(value),
            _ => Schedule::Invalid,
        }
    }

    /// Exact-match check against the current progress
    pub fn matches(&self, progress: &ProgressSnapshot) -> bool {
        match *self {
            Schedule::Unconditional => true,
            Schedule::AtEpoch(epoch) => progress.epoch == epoch,
            Schedule::AtIteration(iteration) => progress.iteration == iteration,
            Schedule::Invalid => false,
        }
    }

    /// The descriptor to store under a request's `schedule` key
    ///
    /// `None` for schedules that have no stored form.
    pub fn to_descriptor(&self) -> Option<Value> {
        match *self {
            Schedule::AtEpoch(value) => Some(json!({ "key": KEY_EPOCH, "value": value })),
            Schedule::AtIteration(value) => Some(json!({ "key": KEY_ITERATION, "value": value })),
            Schedule::Unconditional | Schedule::Invalid => None,
        }
    }
}

impl std::fmt::Display for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Schedule::Unconditional => write!(f, "next check"),
            Schedule::AtEpoch(epoch) => write!(f, "epoch == {}", epoch),
            Schedule::AtIteration(iteration) => write!(f, "iteration == {}", iteration),
            Schedule::Invalid => write!(f, "invalid"),
        }
    }
}

/// Counters are compared as integers; `5.0` written by a float-only
/// producer still means epoch 5.
fn counter_value(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}
