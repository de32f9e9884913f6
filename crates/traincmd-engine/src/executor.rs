//! Collaborator seams for the command cycle
//!
//! The engine neither measures progress nor performs command effects.
//! Both come from the host training loop through these traits.

use serde_json::Value;
use traincmd_core::{CommandRecord, ProgressSnapshot, TcError};

/// Supplies the trainer's current progress on demand
pub trait ProgressSource {
    fn snapshot(&self) -> ProgressSnapshot;
}

impl ProgressSource for ProgressSnapshot {
    fn snapshot(&self) -> ProgressSnapshot {
        *self
    }
}

/// Outcome reported by an executor for one command
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    pub status: Value,
    pub body: Value,
}

impl Execution {
    pub fn new(status: impl Into<Value>, body: Value) -> Self {
        Self {
            status: status.into(),
            body,
        }
    }

    /// `status = "success"` with the given body
    pub fn success(body: Value) -> Self {
        Self::new("success", body)
    }
}

/// Performs the effect of a due command
///
/// An `Err` is recorded on the command as `status = "error"` with the
/// error text as body; it does not abort the cycle.
pub trait CommandExecutor {
    /// # Errors
    ///
    /// Returns an error when the command's effect could not be applied.
    fn execute(
        &mut self,
        record: &CommandRecord,
        progress: &ProgressSnapshot,
    ) -> Result<Execution, TcError>;
}

impl<F> CommandExecutor for F
where
    F: FnMut(&CommandRecord, &ProgressSnapshot) -> Result<Execution, TcError>,
{
    fn execute(
        &mut self,
        record: &CommandRecord,
        progress: &ProgressSnapshot,
    ) -> Result<Execution, TcError> {
        self(record, progress)
    }
}
