//! Command cycle with boundary logging.
//!
//! One cycle is: load → check each record against the progress snapshot →
//! execute due records → attach responses → persist.
//!
//! ## Logging Ownership
//!
//! The engine layer owns lifecycle logging for the cycle:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Lower layers (store, core) use only `tracing::debug!()` for internal
//! details, plus the store's `corrupt_store` warning.

use crate::executor::{CommandExecutor, ProgressSource};
use serde_json::Value;
use traincmd_core::{log_op_end, log_op_error, log_op_start};
use traincmd_core::{CommandRecord, ProgressSnapshot, TcError};
use traincmd_store::{CommandStore, LoadDiagnostics, Result};

/// Status recorded when the executor fails
pub const STATUS_ERROR: &str = "error";

/// Summary of one command cycle
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    /// Progress the cycle ran against
    pub progress: ProgressSnapshot,
    /// Records in the loaded list
    pub total: usize,
    /// Records that were due and executed
    pub due: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Whether the list was written back
    pub persisted: bool,
}

/// Run every due command once and persist the outcomes
///
/// The store is only written when at least one command ran.
///
/// ## Errors
///
/// - `Io` / `Serialization`: persisting the updated list failed. The
///   responses recorded in this cycle are lost; the backing file keeps its
///   previous content.
pub fn run_command_cycle<D, P, E>(
    store: &CommandStore<D>,
    progress: &P,
    executor: &mut E,
) -> Result<CycleReport>
where
    D: LoadDiagnostics,
    P: ProgressSource + ?Sized,
    E: CommandExecutor + ?Sized,
{
    let snapshot = progress.snapshot();
    log_op_start!(
        "command_cycle",
        epoch = snapshot.epoch,
        iteration = snapshot.iteration
    );
    let start = std::time::Instant::now();

    let result = run_command_cycle_impl(store, snapshot, executor);
    let duration_ms = start.elapsed().as_millis() as u64;

    match &result {
        Ok(report) => {
            log_op_end!(
                "command_cycle",
                duration_ms = duration_ms,
                record_count = report.total,
                due_count = report.due,
                failed = report.failed
            );
        }
        Err(err) => {
            log_op_error!("command_cycle", err.clone(), duration_ms = duration_ms);
        }
    }

    result
}

fn run_command_cycle_impl<D, E>(
    store: &CommandStore<D>,
    snapshot: ProgressSnapshot,
    executor: &mut E,
) -> Result<CycleReport>
where
    D: LoadDiagnostics,
    E: CommandExecutor + ?Sized,
{
    let mut records = store.load();
    let mut report = CycleReport {
        progress: snapshot,
        total: records.len(),
        due: 0,
        succeeded: 0,
        failed: 0,
        persisted: false,
    };

    for record in records.iter_mut().filter(|r| r.is_due(&snapshot)) {
        report.due += 1;
        let (status, body) = match executor.execute(record, &snapshot) {
            Ok(execution) => {
                report.succeeded += 1;
                (execution.status, execution.body)
            }
            Err(err) => {
                report.failed += 1;
                tracing::warn!(
                    command_name = record.name().unwrap_or_default(),
                    err.code = err.code(),
                    "command execution failed"
                );
                (Value::from(STATUS_ERROR), Value::from(err.to_string()))
            }
        };
        attach(record, &snapshot, status, &body)?;
    }

    if report.due > 0 {
        store.persist(&records)?;
        report.persisted = true;
    }

    Ok(report)
}

fn attach(
    record: &mut CommandRecord,
    snapshot: &ProgressSnapshot,
    status: Value,
    body: &Value,
) -> Result<()> {
    record
        .attach_response(snapshot, status, body)
        .map(|_| ())
        .map_err(TcError::from)
}
