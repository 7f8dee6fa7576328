use std::fmt;

use leia_models::{SchemaEvent, SchemaKey, SchemaState};

/// Stable registry error codes, as exposed to callers of the registry API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeiaErrorCode {
    ProcessorNotFound,
    SchemaAlreadyExists,
    NoSchemaFound,
    SchemaApprovalUnauthorized,
    InvalidStateTransition,
    RepositoryFailure,
}

impl LeiaErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            LeiaErrorCode::ProcessorNotFound => "PROCESSOR_NOT_FOUND",
            LeiaErrorCode::SchemaAlreadyExists => "SCHEMA_ALREADY_EXISTS",
            LeiaErrorCode::NoSchemaFound => "NO_SCHEMA_FOUND",
            LeiaErrorCode::SchemaApprovalUnauthorized => "SCHEMA_APPROVAL_UNAUTHORIZED",
            LeiaErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            LeiaErrorCode::RepositoryFailure => "REPOSITORY_FAILURE",
        }
    }

    /// HTTP-style status a front end should answer with.
    pub fn status(self) -> u16 {
        match self {
            LeiaErrorCode::RepositoryFailure => 500,
            _ => 400,
        }
    }
}

impl fmt::Display for LeiaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by the schema lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum LeiaError {
    /// No processor is registered for the event.
    #[error("no processor registered for event {0}")]
    ProcessorNotFound(SchemaEvent),

    /// A CREATED record already exists for the namespace and schema name.
    #[error("schema {namespace}.{schema_name} already has a version in CREATED state")]
    SchemaAlreadyExists {
        namespace: String,
        schema_name: String,
    },

    /// The referenced record does not exist.
    #[error("no schema found for {0}")]
    NoSchemaFound(SchemaKey),

    /// The approver made the last change to the record.
    #[error("schema {0} cannot be approved by its last updater")]
    ApprovalUnauthorized(SchemaKey),

    /// The event is not allowed from the record's current state.
    #[error("cannot apply {event} to schema {schema_key} in state {state}")]
    InvalidStateTransition {
        schema_key: SchemaKey,
        state: SchemaState,
        event: SchemaEvent,
    },

    /// The repository failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl LeiaError {
    pub fn code(&self) -> LeiaErrorCode {
        match self {
            LeiaError::ProcessorNotFound(_) => LeiaErrorCode::ProcessorNotFound,
            LeiaError::SchemaAlreadyExists { .. } => LeiaErrorCode::SchemaAlreadyExists,
            LeiaError::NoSchemaFound(_) => LeiaErrorCode::NoSchemaFound,
            LeiaError::ApprovalUnauthorized(_) => LeiaErrorCode::SchemaApprovalUnauthorized,
            LeiaError::InvalidStateTransition { .. } => LeiaErrorCode::InvalidStateTransition,
            LeiaError::Repository(_) => LeiaErrorCode::RepositoryFailure,
        }
    }
}

pub type Result<T> = std::result::Result<T, LeiaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_and_statuses() {
        let err = LeiaError::ProcessorNotFound(SchemaEvent::ApproveSchema);
        assert_eq!(err.code(), LeiaErrorCode::ProcessorNotFound);
        assert_eq!(err.code().status(), 400);
        assert_eq!(err.to_string(), "no processor registered for event APPROVE_SCHEMA");

        let err = LeiaError::Repository("disk full".into());
        assert_eq!(err.code().to_string(), "REPOSITORY_FAILURE");
        assert_eq!(err.code().status(), 500);
    }
}
