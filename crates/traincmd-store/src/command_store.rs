//! Command list persistence
//!
//! The backing file is a single JSON array of `{name, request, response}`
//! objects, written with 4-space indentation. The whole list is read and
//! written at once; record order is file order.
//!
//! Each load returns a fresh, independent `Vec`. Nothing is cached between
//! calls and no locking is done: callers serialize their own
//! load → mutate → persist cycles.

use crate::atomic::{stage_write, StagedWrite};
use crate::config::StoreConfig;
use crate::diagnostics::{LoadDiagnostics, LoadFailure, TracingDiagnostics};
use crate::errors::{io_error, serialization_error, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::path::{Path, PathBuf};
use traincmd_core::CommandRecord;

const INDENT: &[u8] = b"    ";

/// Command store bound to one backing file
#[derive(Debug, Clone)]
pub struct CommandStore<D = TracingDiagnostics> {
    config: StoreConfig,
    diagnostics: D,
}

impl CommandStore<TracingDiagnostics> {
    /// Store reporting load failures through `tracing`
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            diagnostics: TracingDiagnostics,
        }
    }

    /// Store for the default file name inside `directory`
    pub fn open(directory: impl Into<PathBuf>) -> Self {
        Self::new(StoreConfig::new(directory))
    }
}

impl<D: LoadDiagnostics> CommandStore<D> {
    /// Replace the load-failure receiver
    pub fn with_diagnostics<E: LoadDiagnostics>(self, diagnostics: E) -> CommandStore<E> {
        CommandStore {
            config: self.config,
            diagnostics,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    /// Absolute path of the backing file
    ///
    /// # Errors
    ///
    /// Returns an `Io` error if the directory cannot be made absolute.
    pub fn path(&self) -> Result<PathBuf> {
        resolve(&self.config.directory, &self.config.file_name)
    }

    /// Load all records; never fails
    ///
    /// A missing file yields an empty list. An unreadable or malformed
    /// file also yields an empty list and is reported to the diagnostics.
    /// Elements that are not objects are skipped and reported one by one;
    /// their siblings still load.
    pub fn load(&self) -> Vec<CommandRecord> {
        load_with(
            &self.config.directory,
            &self.config.file_name,
            &self.diagnostics,
        )
    }

    /// Atomically replace the backing file with `records`
    ///
    /// # Errors
    ///
    /// Returns `Io` for filesystem failures (missing directory, permission
    /// denied, disk full) and `Serialization` if a record cannot be encoded.
    /// The previous file content is intact on error.
    pub fn persist(&self, records: &[CommandRecord]) -> Result<()> {
        persist_commands(records, &self.config.directory, &self.config.file_name)
    }

    /// Write `records` to a temp file without replacing the backing file
    ///
    /// The returned [`StagedWrite`] must be committed to take effect.
    ///
    /// # Errors
    ///
    /// Same as [`persist`](Self::persist), minus the final rename.
    pub fn stage(&self, records: &[CommandRecord]) -> Result<StagedWrite> {
        stage_commands(records, &self.config.directory, &self.config.file_name)
    }
}

/// Load records from `file_name` under `directory`
///
/// Load failures are reported as `warn` events.
pub fn load_commands(directory: &Path, file_name: &str) -> Vec<CommandRecord> {
    load_with(directory, file_name, &TracingDiagnostics)
}

/// Persist records to `file_name` under `directory` via atomic replace
///
/// # Errors
///
/// Returns `Io` or `Serialization` errors; nothing is retried.
pub fn persist_commands(
    records: &[CommandRecord],
    directory: &Path,
    file_name: &str,
) -> Result<()> {
    stage_commands(records, directory, file_name)?.commit()?;
    tracing::debug!(
        record_count = records.len(),
        file_name,
        "persisted command list"
    );
    Ok(())
}

fn stage_commands(
    records: &[CommandRecord],
    directory: &Path,
    file_name: &str,
) -> Result<StagedWrite> {
    let path = resolve(directory, file_name)?;
    let content = render(records)?;
    stage_write(&path, &content)
}

fn load_with<D: LoadDiagnostics + ?Sized>(
    directory: &Path,
    file_name: &str,
    diagnostics: &D,
) -> Vec<CommandRecord> {
    let path = match resolve(directory, file_name) {
        Ok(path) => path,
        Err(err) => {
            tracing::debug!(error = %err, "cannot resolve command store directory");
            return Vec::new();
        }
    };

    match std::fs::metadata(&path) {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => {
            tracing::debug!(path = %path.display(), "command path is not a regular file");
            return Vec::new();
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no command file");
            return Vec::new();
        }
        Err(err) => {
            diagnostics.unreadable_store(&path, &LoadFailure::Read(err));
            return Vec::new();
        }
    }

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) => {
            diagnostics.unreadable_store(&path, &LoadFailure::Read(err));
            return Vec::new();
        }
    };

    let elements = match serde_json::from_str::<Vec<Value>>(&content) {
        Ok(elements) => elements,
        Err(err) => {
            diagnostics.unreadable_store(&path, &LoadFailure::Parse(err));
            return Vec::new();
        }
    };

    let mut records = Vec::with_capacity(elements.len());
    for (index, element) in elements.into_iter().enumerate() {
        match decode_element(element) {
            Ok(record) => records.push(record),
            Err(found) => {
                diagnostics.unreadable_store(&path, &LoadFailure::Element { index, found });
            }
        }
    }
    tracing::debug!(
        path = %path.display(),
        record_count = records.len(),
        "loaded command list"
    );
    records
}

/// One array element as a record; only objects qualify
fn decode_element(element: Value) -> std::result::Result<CommandRecord, &'static str> {
    match element {
        Value::Object(map) => {
            serde_json::from_value(Value::Object(map)).map_err(|_| "an unreadable object")
        }
        Value::Null => Err("null"),
        Value::Bool(_) => Err("a boolean"),
        Value::Number(_) => Err("a number"),
        Value::String(_) => Err("a string"),
        Value::Array(_) => Err("an array"),
    }
}

fn resolve(directory: &Path, file_name: &str) -> Result<PathBuf> {
    let directory =
        std::path::absolute(directory).map_err(|e| io_error("resolve_dir", directory, e))?;
    Ok(directory.join(file_name))
}

fn render(records: &[CommandRecord]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(INDENT));
    records
        .serialize(&mut serializer)
        .map_err(|e| serialization_error("persist_commands", e))?;
    Ok(out)
}
