use std::fmt;
use thiserror::Error;

/// Why a command invocation could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    MissingRequired,
    MismatchedConfirmation,
    AbortedByCallback,
    UnknownToken,
    InvalidValue,
}

impl FailureKind {
    /// Usage mistakes exit with 2, aborts with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            FailureKind::AbortedByCallback => 1,
            _ => 2,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureKind::MissingRequired => "missing required value",
            FailureKind::MismatchedConfirmation => "mismatched confirmation",
            FailureKind::AbortedByCallback => "aborted by callback",
            FailureKind::UnknownToken => "unknown token",
            FailureKind::InvalidValue => "invalid value",
        };
        f.write_str(label)
    }
}

/// A structured resolution failure, shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct Failure {
    pub kind: FailureKind,
    /// The parameter (or token) the failure is about, if any.
    pub parameter: Option<String>,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, parameter: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            kind,
            parameter: parameter.map(str::to_string),
            message: message.into(),
        }
    }

    pub fn missing(parameter: &str, message: impl Into<String>) -> Self {
        Self::new(FailureKind::MissingRequired, Some(parameter), message)
    }

    pub fn mismatched(parameter: &str) -> Self {
        Self::new(
            FailureKind::MismatchedConfirmation,
            Some(parameter),
            "The two entered values do not match.",
        )
    }

    pub fn aborted(parameter: Option<&str>, message: impl Into<String>) -> Self {
        Self::new(FailureKind::AbortedByCallback, parameter, message)
    }

    pub fn unknown(token: &str, message: impl Into<String>) -> Self {
        Self::new(FailureKind::UnknownToken, Some(token), message)
    }

    pub fn invalid(parameter: &str, message: impl Into<String>) -> Self {
        Self::new(FailureKind::InvalidValue, Some(parameter), message)
    }
}

/// Raised by callbacks and command bodies to stop with a non-zero status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct Abort {
    pub message: String,
}

impl Abort {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for Abort {
    fn default() -> Self {
        Self::new("Aborted!")
    }
}

/// A declaration that breaks one of the parameter-list rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    #[error("command '{command}': parameter '{name}' is declared twice")]
    DuplicateName { command: String, name: String },

    #[error("command '{command}': flag '{flag}' is used by more than one parameter")]
    DuplicateFlag { command: String, flag: String },

    #[error("command '{command}': positional '{name}' has no default but follows one that does")]
    PositionalOrder { command: String, name: String },

    #[error("command '{command}': variadic positional '{name}' must be the last positional")]
    VariadicNotLast { command: String, name: String },

    #[error("command '{command}': eager parameter '{name}' must be a named option with a callback")]
    InvalidEager { command: String, name: String },

    #[error("command '{command}': positional '{name}' cannot be a boolean flag")]
    BoolPositional { command: String, name: String },

    #[error("command '{0}' is registered twice")]
    DuplicateCommand(String),
}

#[derive(Error, Debug)]
pub enum SaludosError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid command declaration: {0}")]
    Spec(#[from] SpecError),

    #[error(transparent)]
    Failure(#[from] Failure),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Render error: {0}")]
    Render(#[from] minijinja::Error),
}

pub type Result<T> = std::result::Result<T, SaludosError>;
