use thiserror::Error;

/// Result type alias using CommandError
pub type Result<T> = std::result::Result<T, CommandError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers can match on
/// programmatically and that appears in logs as `err.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TcErrorKind {
    // Lifecycle
    /// A response was attached to a record that already had one
    AlreadyExecuted,

    // Validation
    InvalidInput,
    InvalidConfig,

    // Integration/IO
    Io,
    Serialization,
    /// The external command executor reported a failure
    Executor,
    /// The backing file did not load cleanly and must not be overwritten
    CorruptStore,
}

impl TcErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            TcErrorKind::AlreadyExecuted => "ERR_ALREADY_EXECUTED",
            TcErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            TcErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            TcErrorKind::Io => "ERR_IO",
            TcErrorKind::Serialization => "ERR_SERIALIZATION",
            TcErrorKind::Executor => "ERR_EXECUTOR",
            TcErrorKind::CorruptStore => "ERR_CORRUPT_STORE",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind for programmatic handling plus
/// optional context (operation, command name, path) for debugging.
#[derive(Debug, Clone, PartialEq)]
pub struct TcError {
    kind: TcErrorKind,
    op: Option<String>,
    command_name: Option<String>,
    path: Option<String>,
    message: String,
}

impl TcError {
    /// Create a new error with the specified kind
    pub fn new(kind: TcErrorKind) -> Self {
        Self {
            kind,
            op: None,
            command_name: None,
            path: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add command name context
    pub fn with_command_name(mut self, name: impl Into<String>) -> Self {
        self.command_name = Some(name.into());
        self
    }

    /// Add filesystem path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> TcErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn command_name(&self) -> Option<&str> {
        self.command_name.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for TcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(name) = &self.command_name {
            write!(f, " (command: {})", name)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        Ok(())
    }
}

impl std::error::Error for TcError {}

// ========== End Error Facility ==========

/// Errors raised by the command model itself
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    /// The record already carries a response; responses are write-once
    #[error("Command already executed: {}", display_name(.name))]
    AlreadyExecuted { name: Option<String> },

    /// Caller-supplied input could not be turned into a command
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },
}

fn display_name(name: &Option<String>) -> &str {
    name.as_deref().unwrap_or("<unnamed>")
}

impl From<CommandError> for TcError {
    fn from(err: CommandError) -> Self {
        let message = err.to_string();
        match err {
            CommandError::AlreadyExecuted { name } => {
                let tc = TcError::new(TcErrorKind::AlreadyExecuted)
                    .with_op("attach_response")
                    .with_message(message);
                match name {
                    Some(name) => tc.with_command_name(name),
                    None => tc,
                }
            }
            CommandError::InvalidInput { .. } => {
                TcError::new(TcErrorKind::InvalidInput).with_message(message)
            }
        }
    }
}
