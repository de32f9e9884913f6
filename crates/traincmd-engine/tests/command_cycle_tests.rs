#![allow(clippy::unwrap_used, clippy::expect_used)]

// Integration tests for the load → execute → record → persist cycle

use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;
use traincmd_core::errors::{TcError, TcErrorKind};
use traincmd_core::logging_facility::test_capture::init_test_capture;
use traincmd_core::{CommandRecord, CommandResponse, Document, ProgressSnapshot};
use traincmd_core_types::schema::{
    EVENT_END, EVENT_START, FIELD_COMMAND_NAME, FIELD_DUE_COUNT, FIELD_EPOCH, FIELD_ERR_CODE,
    FIELD_ITERATION, FIELD_RECORD_COUNT,
};
use traincmd_engine::{run_command_cycle, CommandExecutor, Execution, ProgressSource};
use traincmd_store::CommandStore;

fn doc(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

fn seed(store: &CommandStore) {
    store
        .persist(&[
            CommandRecord::new("now", doc(json!({ "body": { "a": 1 } }))),
            CommandRecord::new(
                "at_epoch_2",
                doc(json!({ "schedule": { "key": "epoch", "value": 2 }, "body": "e2" })),
            ),
            CommandRecord::new(
                "at_iter_50",
                doc(json!({ "schedule": { "key": "iteration", "value": 50 }, "body": "i50" })),
            ),
            CommandRecord::new(
                "broken",
                doc(json!({ "schedule": { "key": "bogus", "value": 1 } })),
            ),
        ])
        .unwrap();
}

/// Echoes the request body and remembers which commands ran
#[derive(Default)]
struct EchoExecutor {
    ran: Vec<String>,
}

impl CommandExecutor for EchoExecutor {
    fn execute(
        &mut self,
        record: &CommandRecord,
        _progress: &ProgressSnapshot,
    ) -> Result<Execution, TcError> {
        self.ran.push(record.name().unwrap_or_default().to_string());
        Ok(Execution::success(
            record.request_body().cloned().unwrap_or(Value::Null),
        ))
    }
}

/// Trainer stand-in that advances one iteration per call site
struct FakeTrainer {
    epoch: u64,
    iteration: u64,
}

impl ProgressSource for FakeTrainer {
    fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot::new(self.epoch, self.iteration, self.iteration as f64 * 0.5)
    }
}

#[test]
fn test_cycle_runs_due_commands_and_persists() {
    let dir = TempDir::new().unwrap();
    let store = CommandStore::open(dir.path());
    seed(&store);
    let mut executor = EchoExecutor::default();

    let report = run_command_cycle(
        &store,
        &FakeTrainer {
            epoch: 0,
            iteration: 50,
        },
        &mut executor,
    )
    .unwrap();

    assert_eq!(report.total, 4);
    assert_eq!(report.due, 2);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 0);
    assert!(report.persisted);
    assert_eq!(executor.ran, vec!["now", "at_iter_50"]);

    let records = store.load();
    assert!(records[0].is_executed());
    assert!(!records[1].is_executed());
    assert!(records[2].is_executed());
    assert!(!records[3].is_executed());

    let response = CommandResponse::from_document(records[2].response().unwrap()).unwrap();
    assert_eq!(response.iteration, 50);
    assert_eq!(response.elapsed_time, 25.0);
    assert_eq!(response.status, json!("success"));
    assert_eq!(response.body, json!("i50"));
}

#[test]
fn test_cycle_does_not_rerun_executed_commands() {
    let dir = TempDir::new().unwrap();
    let store = CommandStore::open(dir.path());
    seed(&store);
    let mut executor = EchoExecutor::default();
    let progress = ProgressSnapshot::at(2, 100);

    run_command_cycle(&store, &progress, &mut executor).unwrap();
    let second = run_command_cycle(&store, &progress, &mut executor).unwrap();

    assert_eq!(executor.ran, vec!["now", "at_epoch_2"]);
    assert_eq!(second.due, 0);
    assert!(!second.persisted);
}

#[test]
fn test_cycle_without_due_commands_leaves_file_untouched() {
    let dir = TempDir::new().unwrap();
    let store = CommandStore::open(dir.path());
    store
        .persist(&[CommandRecord::new(
            "later",
            doc(json!({ "schedule": { "key": "epoch", "value": 9 } })),
        )])
        .unwrap();
    let before = fs::read(store.path().unwrap()).unwrap();
    let mut executor = EchoExecutor::default();

    let report = run_command_cycle(&store, &ProgressSnapshot::at(1, 1), &mut executor).unwrap();

    assert_eq!(report.due, 0);
    assert_eq!(fs::read(store.path().unwrap()).unwrap(), before);
}

#[test]
fn test_cycle_on_empty_store_does_not_create_file() {
    let dir = TempDir::new().unwrap();
    let store = CommandStore::open(dir.path());
    let mut executor = EchoExecutor::default();

    let report = run_command_cycle(&store, &ProgressSnapshot::at(0, 0), &mut executor).unwrap();

    assert_eq!(report.total, 0);
    assert!(!store.path().unwrap().exists());
}

#[test]
fn test_executor_failure_is_recorded_as_error() {
    let dir = TempDir::new().unwrap();
    let store = CommandStore::open(dir.path());
    store
        .persist(&[CommandRecord::new("explode", Document::new())])
        .unwrap();

    let mut failing = |_: &CommandRecord, _: &ProgressSnapshot| -> Result<Execution, TcError> {
        Err(TcError::new(TcErrorKind::Executor).with_message("optimizer missing"))
    };
    let report = run_command_cycle(&store, &ProgressSnapshot::at(0, 0), &mut failing).unwrap();

    assert_eq!(report.failed, 1);
    assert_eq!(report.succeeded, 0);

    let records = store.load();
    let response = records[0].response().unwrap();
    assert_eq!(response["status"], json!("error"));
    let body = response["body"].as_str().unwrap();
    assert!(body.contains("ERR_EXECUTOR"));
    assert!(body.contains("optimizer missing"));
}

#[test]
fn test_persist_failure_is_propagated() {
    let dir = TempDir::new().unwrap();
    let store = CommandStore::open(dir.path());
    seed(&store);
    let mut executor = EchoExecutor::default();

    // Directory vanishes between load and persist
    let mut removing =
        |record: &CommandRecord, progress: &ProgressSnapshot| -> Result<Execution, TcError> {
            if dir.path().exists() {
                fs::remove_dir_all(dir.path()).unwrap();
            }
            executor.execute(record, progress)
        };
    let err = run_command_cycle(&store, &ProgressSnapshot::at(0, 0), &mut removing).unwrap_err();

    assert_eq!(err.kind(), TcErrorKind::Io);
}

#[test]
fn test_cycle_emits_boundary_events() {
    let capture = init_test_capture();
    let dir = TempDir::new().unwrap();
    let store = CommandStore::open(dir.path());
    seed(&store);
    let mut executor = EchoExecutor::default();

    run_command_cycle(&store, &ProgressSnapshot::at(777, 0), &mut executor).unwrap();

    let for_this_run = |event: &str| {
        capture.count_events(|e| {
            e.op.as_deref() == Some("command_cycle") && e.event.as_deref() == Some(event)
        })
    };
    assert!(for_this_run(EVENT_START) >= 1);
    assert!(for_this_run(EVENT_END) >= 1);
    assert_eq!(
        capture.count_events(|e| {
            e.op.as_deref() == Some("command_cycle")
                && e.event.as_deref() == Some(EVENT_START)
                && e.field(FIELD_EPOCH) == Some("777")
                && e.field(FIELD_ITERATION) == Some("0")
        }),
        1
    );
}

#[test]
fn test_cycle_end_event_carries_counts() {
    let capture = init_test_capture();
    let dir = TempDir::new().unwrap();
    let store = CommandStore::open(dir.path());
    seed(&store);
    let mut executor = EchoExecutor::default();

    // Iteration 4242 keeps this run's events apart from parallel tests
    run_command_cycle(&store, &ProgressSnapshot::at(2, 4242), &mut executor).unwrap();

    let starts = capture.count_events(|e| {
        e.op.as_deref() == Some("command_cycle")
            && e.event.as_deref() == Some(EVENT_START)
            && e.field(FIELD_ITERATION) == Some("4242")
    });
    assert_eq!(starts, 1);
    let ends_with_counts = capture.count_events(|e| {
        e.op.as_deref() == Some("command_cycle")
            && e.event.as_deref() == Some(EVENT_END)
            && e.field(FIELD_RECORD_COUNT) == Some("4")
            && e.field(FIELD_DUE_COUNT) == Some("2")
    });
    assert!(ends_with_counts >= 1);
}

#[test]
fn test_executor_failure_is_logged_with_command_name() {
    let capture = init_test_capture();
    let dir = TempDir::new().unwrap();
    let store = CommandStore::open(dir.path());
    store
        .persist(&[CommandRecord::new("cycle_log_failure_unique", Document::new())])
        .unwrap();

    let mut failing = |_: &CommandRecord, _: &ProgressSnapshot| -> Result<Execution, TcError> {
        Err(TcError::new(TcErrorKind::Executor).with_message("no such hook"))
    };
    run_command_cycle(&store, &ProgressSnapshot::at(0, 0), &mut failing).unwrap();

    let warnings = capture.count_events(|e| {
        e.level == tracing::Level::WARN
            && e.field(FIELD_COMMAND_NAME) == Some("cycle_log_failure_unique")
            && e.field(FIELD_ERR_CODE) == Some("ERR_EXECUTOR")
    });
    assert_eq!(warnings, 1);
}
