//! Command record: one operator-injected command and its outcome
//!
//! A record is *pending* while `response` is absent and *executed* once a
//! response has been attached. The transition is one-way: `request` never
//! changes after construction and a response can be attached only once.

use super::response::CommandResponse;
use super::schedule::Schedule;
use super::Document;
use crate::errors::{CommandError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use traincmd_core_types::ProgressSnapshot;

/// Key holding the payload inside request and response documents
pub const BODY_FIELD: &str = "body";

/// A single deferred command
///
/// Serializes to `{"name": .., "request": .., "response": ..}` with `null`
/// for absent parts. Unknown keys are ignored on load.
///
/// The three parts are kept as raw JSON so that a record written by another
/// producer survives a load and persist unchanged, whatever its shape. The
/// typed accessors only see well-formed parts: a `name` that is not a string
/// reads as `None`, and a request that is not an object schedules as
/// [`Schedule::Invalid`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CommandRecord {
    #[serde(default)]
    name: Value,
    #[serde(default)]
    request: Value,
    #[serde(default)]
    response: Value,
}

impl CommandRecord {
    /// Create a pending command
    pub fn new(name: impl Into<String>, request: Document) -> Self {
        Self {
            name: Value::String(name.into()),
            request: Value::Object(request),
            response: Value::Null,
        }
    }

    /// Create a record from typed parts without validation
    ///
    /// A malformed request is only noticed when the record is scheduled.
    pub fn from_parts(
        name: Option<String>,
        request: Option<Document>,
        response: Option<Document>,
    ) -> Self {
        Self {
            name: name.map(Value::String).unwrap_or(Value::Null),
            request: request.map(Value::Object).unwrap_or(Value::Null),
            response: response.map(Value::Object).unwrap_or(Value::Null),
        }
    }

    /// Create a record from arbitrary JSON parts
    pub fn from_raw(name: Value, request: Value, response: Value) -> Self {
        Self {
            name,
            request,
            response,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_str()
    }

    /// The stored `name` exactly as loaded
    pub fn raw_name(&self) -> &Value {
        &self.name
    }

    pub fn request(&self) -> Option<&Document> {
        self.request.as_object()
    }

    /// The stored `request` exactly as loaded
    pub fn raw_request(&self) -> &Value {
        &self.request
    }

    pub fn response(&self) -> Option<&Document> {
        self.response.as_object()
    }

    /// The stored `response` exactly as loaded
    pub fn raw_response(&self) -> &Value {
        &self.response
    }

    /// The request's `body`, if there is a request and it has one
    pub fn request_body(&self) -> Option<&Value> {
        self.request()?.get(BODY_FIELD)
    }

    /// The response's `body`, if the command has executed
    pub fn response_body(&self) -> Option<&Value> {
        self.response()?.get(BODY_FIELD)
    }

    /// Any non-null response marks the command as executed
    pub fn is_executed(&self) -> bool {
        !self.response.is_null()
    }

    /// Scheduling descriptor of the request, `None` when there is no request
    pub fn schedule(&self) -> Option<Schedule> {
        match &self.request {
            Value::Null => None,
            request => Some(Schedule::from_request(request)),
        }
    }

    /// Whether the command should run at the given progress
    ///
    /// Executed records and records without a request are never due.
    /// Otherwise the request's schedule decides, by exact match.
    pub fn is_due(&self, progress: &ProgressSnapshot) -> bool {
        if self.is_executed() {
            return false;
        }
        match self.schedule() {
            Some(schedule) => schedule.matches(progress),
            None => false,
        }
    }

    /// Record the outcome of executing this command, timestamped now
    ///
    /// # Errors
    ///
    /// Returns `CommandError::AlreadyExecuted` if a response is already
    /// attached; the existing response is left as is.
    pub fn attach_response<B>(
        &mut self,
        progress: &ProgressSnapshot,
        status: impl Into<Value>,
        body: &B,
    ) -> Result<CommandResponse>
    where
        B: Serialize + ?Sized,
    {
        self.attach_response_at(progress, status, body, Utc::now())
    }

    /// Same as [`attach_response`](Self::attach_response) with an explicit
    /// execution time
    ///
    /// # Errors
    ///
    /// Returns `CommandError::AlreadyExecuted` if a response is already
    /// attached.
    pub fn attach_response_at<B>(
        &mut self,
        progress: &ProgressSnapshot,
        status: impl Into<Value>,
        body: &B,
        executed_at: DateTime<Utc>,
    ) -> Result<CommandResponse>
    where
        B: Serialize + ?Sized,
    {
        if self.is_executed() {
            return Err(CommandError::AlreadyExecuted {
                name: self.name().map(str::to_string),
            });
        }

        let response = CommandResponse::build(progress, status.into(), body, executed_at);
        self.response = Value::Object(response.clone().into_document());
        Ok(response)
    }
}
