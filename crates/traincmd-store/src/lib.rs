//! traincmd Store - JSON persistence for command records
//!
//! Provides:
//! - Whole-list load/persist of the `commands` backing file
//! - Atomic replace through a same-directory temp file
//! - Lenient loading with injectable diagnostics for unreadable files
//! - Store configuration with TOML support

pub mod atomic;
pub mod command_store;
pub mod config;
pub mod diagnostics;
pub mod errors;

// Re-export key types
pub use atomic::StagedWrite;
pub use command_store::{load_commands, persist_commands, CommandStore};
pub use config::{StoreConfig, DEFAULT_FILE_NAME};
pub use diagnostics::{
    CountingDiagnostics, LoadDiagnostics, LoadFailure, TracingDiagnostics,
};
pub use errors::Result;
