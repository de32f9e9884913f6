//! traincmd Core - Deferred command model for iterative training runs
//!
//! This crate provides the in-memory side of operator-injected commands:
//! - CommandRecord with its pending → executed lifecycle
//! - Exact-match scheduling against a caller-supplied progress snapshot
//! - Structured error facility with stable error codes
//! - Logging facility shared by the store, engine and CLI crates

pub mod errors;
pub mod logging_facility;
pub mod model;

#[doc(hidden)]
pub use traincmd_core_types as core_types;

// Re-export commonly used types
pub use errors::{CommandError, Result, TcError, TcErrorKind};
pub use model::{CommandRecord, CommandResponse, Document, Schedule};
pub use traincmd_core_types::ProgressSnapshot;
