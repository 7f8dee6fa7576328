use std::fmt;
use std::io;
use std::path::Path;

use leia_client::TransformationError;
use leia_refresher::RefreshError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(path: &Path, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => USAGE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("read {} failed: {err}", path.display()))
}

pub fn json_error(context: &str, err: serde_json::Error) -> CliError {
    CliError::new(DATA_INVALID, format!("{context}: {err}"))
}

pub fn transformation_error(context: &str, err: TransformationError) -> CliError {
    let code = match &err {
        TransformationError::InvalidPayload(_) | TransformationError::ValidationFailed { .. } => {
            DATA_INVALID
        }
        TransformationError::NoMessageProcessor => USAGE,
        TransformationError::NoSchemaFound(_)
        | TransformationError::TargetSchemaNotFound { .. }
        | TransformationError::InvalidTargetSchema { .. }
        | TransformationError::PathCompileFailed { .. }
        | TransformationError::Dispatch(_) => FAILURE,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn refresh_error(context: &str, err: RefreshError) -> CliError {
    CliError::new(INTERNAL, format!("{context}: {err}"))
}
