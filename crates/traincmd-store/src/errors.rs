//! Error handling for traincmd-store
//!
//! Wraps traincmd-core TcError with store-specific helpers

use std::path::Path;
use traincmd_core::errors::{TcError, TcErrorKind};

/// Result type alias using TcError
pub type Result<T> = std::result::Result<T, TcError>;

/// Create an IO error for a filesystem operation on `path`
pub fn io_error(operation: &str, path: &Path, err: std::io::Error) -> TcError {
    TcError::new(TcErrorKind::Io)
        .with_op(operation)
        .with_path(path.display().to_string())
        .with_message(err.to_string())
}

/// Create a serialization error
pub fn serialization_error(operation: &str, err: serde_json::Error) -> TcError {
    TcError::new(TcErrorKind::Serialization)
        .with_op(operation)
        .with_message(err.to_string())
}

/// Create a configuration error
pub fn invalid_config(reason: impl Into<String>) -> TcError {
    TcError::new(TcErrorKind::InvalidConfig)
        .with_op("store_config")
        .with_message(reason)
}
