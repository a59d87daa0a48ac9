use std::path::PathBuf;

use thiserror::Error;

/// Errors from the identity registration call. Always fatal to the run.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("registration request failed: {0}")]
    Transport(String),

    #[error("registration request timed out after {0}s")]
    Timeout(u64),

    #[error("registration endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to parse registration response: {0}")]
    Parse(String),

    #[error("registration endpoint returned an empty body")]
    EmptyBody,
}

/// Errors from the parity-based artifact selector.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("no digits found in registration identifier '{identifier}'")]
    NoDigits { identifier: String },
}

/// Errors loading the selected artifact from its source path.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read artifact '{}': {message}", path.display())]
    Read { path: PathBuf, message: String },
}

/// Errors persisting the selected artifact to the output path.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write '{}': {message}", path.display())]
    Write { path: PathBuf, message: String },
}

/// Failures of the final submission call.
///
/// These are reported and logged but never abort the run.
#[derive(Debug, Error)]
pub enum SubmissionWarning {
    #[error("submission request failed: {0}")]
    Transport(String),

    #[error("submission request timed out after {0}s")]
    Timeout(u64),

    #[error("submission endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// Errors assembling the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read config file '{}': {message}", path.display())]
    Read { path: PathBuf, message: String },

    #[error("failed to parse config file '{}': {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("missing required config value '{0}'")]
    MissingField(&'static str),

    #[error("invalid config value '{field}': {reason}")]
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
}

/// Fatal outcomes of a flow run.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Selection(#[from] SelectorError),

    #[error(transparent)]
    ArtifactLoad(#[from] ArtifactError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
