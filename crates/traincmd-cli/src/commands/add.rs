//! Add command
//!
//! Usage: traincmd add <NAME> [--body <JSON>] [--epoch <N> | --iteration <N>]
//!
//! The existing list is rewritten with the new command appended, so a file
//! that loads with failures is left alone and the command is not queued.

use super::CliResult;
use clap::Args;
use serde_json::Value;
use traincmd_core::errors::{CommandError, TcError, TcErrorKind};
use traincmd_core::model::command::BODY_FIELD;
use traincmd_core::model::schedule::SCHEDULE_FIELD;
use traincmd_core::{CommandRecord, Document, Schedule};
use traincmd_store::{CommandStore, CountingDiagnostics, StoreConfig, TracingDiagnostics};

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Command name
    pub name: String,

    /// Request body as JSON
    #[arg(long)]
    pub body: Option<String>,

    /// Run when the trainer reports exactly this epoch
    #[arg(long, conflicts_with = "iteration")]
    pub epoch: Option<u64>,

    /// Run when the trainer reports exactly this iteration
    #[arg(long, conflicts_with = "epoch")]
    pub iteration: Option<u64>,
}

pub fn execute(args: AddArgs, config: StoreConfig) -> CliResult {
    let record = build_record(&args)?;
    let schedule = record.schedule().unwrap_or(Schedule::Unconditional);

    let store =
        CommandStore::new(config).with_diagnostics(CountingDiagnostics::new(TracingDiagnostics));
    let mut records = store.load();
    if !store.diagnostics().is_clean() {
        let path = store.path()?;
        return Err(TcError::new(TcErrorKind::CorruptStore)
            .with_op("add")
            .with_path(path.display().to_string())
            .with_message("command file did not load cleanly; refusing to overwrite it")
            .into());
    }
    records.push(record);
    store.persist(&records)?;

    println!(
        "Queued '{}' as #{} (runs at {})",
        args.name,
        records.len() - 1,
        schedule
    );
    Ok(())
}

/// Build the pending record described by the arguments
pub fn build_record(args: &AddArgs) -> Result<CommandRecord, CommandError> {
    let mut request = Document::new();

    let schedule = match (args.epoch, args.iteration) {
        (Some(epoch), _) => Schedule::AtEpoch(epoch),
        (None, Some(iteration)) => Schedule::AtIteration(iteration),
        (None, None) => Schedule::Unconditional,
    };
    if let Some(descriptor) = schedule.to_descriptor() {
        request.insert(SCHEDULE_FIELD.to_string(), descriptor);
    }

    let body = match &args.body {
        Some(text) => serde_json::from_str(text).map_err(|e| CommandError::InvalidInput {
            reason: format!("--body is not valid JSON: {}", e),
        })?,
        None => Value::Null,
    };
    request.insert(BODY_FIELD.to_string(), body);

    Ok(CommandRecord::new(args.name.clone(), request))
}
