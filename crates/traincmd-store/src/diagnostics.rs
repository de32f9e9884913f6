//! Diagnostics for unreadable backing files
//!
//! Loading never fails: an unreadable or corrupt file is treated as an
//! empty command list, and an element that is not an object is skipped.
//! Each failure is handed to a `LoadDiagnostics` implementation so that
//! dropped commands stay visible to operators.

use std::cell::Cell;
use std::path::Path;
use traincmd_core_types::schema::EVENT_CORRUPT_STORE;

/// Why a present backing file produced fewer commands than it holds
#[derive(Debug)]
pub enum LoadFailure {
    /// The file exists but could not be inspected or read
    Read(std::io::Error),
    /// The content is not a JSON array
    Parse(serde_json::Error),
    /// One array element is not a command object and was skipped
    Element { index: usize, found: &'static str },
}

impl std::fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadFailure::Read(err) => write!(f, "read failed: {}", err),
            LoadFailure::Parse(err) => write!(f, "parse failed: {}", err),
            LoadFailure::Element { index, found } => {
                write!(f, "element {} is {}, not an object", index, found)
            }
        }
    }
}

/// Receiver for load failures that were recovered by dropping commands
pub trait LoadDiagnostics {
    fn unreadable_store(&self, path: &Path, failure: &LoadFailure);
}

/// Reports load failures as `warn` events with `event = "corrupt_store"`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl LoadDiagnostics for TracingDiagnostics {
    fn unreadable_store(&self, path: &Path, failure: &LoadFailure) {
        tracing::warn!(
            component = module_path!(),
            op = "load_commands",
            event = EVENT_CORRUPT_STORE,
            path = %path.display(),
            reason = %failure,
            "backing file did not load cleanly; commands were dropped"
        );
    }
}

/// Forwards load failures and counts them
///
/// Lets a caller that is about to rewrite the backing file find out whether
/// the load it starts from lost anything.
#[derive(Debug, Default)]
pub struct CountingDiagnostics<D = TracingDiagnostics> {
    inner: D,
    failures: Cell<usize>,
}

impl<D: LoadDiagnostics> CountingDiagnostics<D> {
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            failures: Cell::new(0),
        }
    }

    /// Failures reported since construction
    pub fn failure_count(&self) -> usize {
        self.failures.get()
    }

    pub fn is_clean(&self) -> bool {
        self.failure_count() == 0
    }
}

impl<D: LoadDiagnostics> LoadDiagnostics for CountingDiagnostics<D> {
    fn unreadable_store(&self, path: &Path, failure: &LoadFailure) {
        self.failures.set(self.failures.get() + 1);
        self.inner.unreadable_store(path, failure);
    }
}

impl<T: LoadDiagnostics + ?Sized> LoadDiagnostics for &T {
    fn unreadable_store(&self, path: &Path, failure: &LoadFailure) {
        (**self).unreadable_store(path, failure)
    }
}
