//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Command identifiers
pub const FIELD_COMMAND_NAME: &str = "command_name";
pub const FIELD_PATH: &str = "path";

// Progress fields
pub const FIELD_EPOCH: &str = "epoch";
pub const FIELD_ITERATION: &str = "iteration";

// Collection sizes
pub const FIELD_RECORD_COUNT: &str = "record_count";
pub const FIELD_DUE_COUNT: &str = "due_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

/// Emitted when a backing file exists but cannot be parsed
pub const EVENT_CORRUPT_STORE: &str = "corrupt_store";
