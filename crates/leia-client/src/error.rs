use leia_models::SchemaKey;
use leia_processor::ExecutorError;
use leia_validator::LeiaMessageViolation;

/// Errors that can occur while multiplexing or dispatching a message.
#[derive(Debug, thiserror::Error)]
pub enum TransformationError {
    /// The request's source schema is not in the current snapshot.
    #[error("no schema found for {0}")]
    NoSchemaFound(SchemaKey),

    /// A transformation target points at a schema that is not registered.
    #[error("target schema {target} of source {source_key} is not registered")]
    TargetSchemaNotFound {
        source_key: SchemaKey,
        target: SchemaKey,
    },

    /// A transformation target failed the schema validity check.
    #[error("transformation target {target} of source {source_key} is not a valid schema")]
    InvalidTargetSchema {
        source_key: SchemaKey,
        target: SchemaKey,
    },

    /// A transformer or criteria path did not compile.
    #[error("invalid path {expression:?} for {schema_key}: {message}")]
    PathCompileFailed {
        schema_key: SchemaKey,
        expression: String,
        message: String,
    },

    /// The raw source payload is not JSON.
    #[error("source payload is not valid JSON: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// A derived message does not match its target schema.
    #[error("message for {schema_key} failed validation with {} violation(s)", .violations.len())]
    ValidationFailed {
        schema_key: SchemaKey,
        violations: Vec<LeiaMessageViolation>,
    },

    /// Neither the call nor the client supplies a message processor.
    #[error("no message processor configured")]
    NoMessageProcessor,

    /// Dispatch of the produced messages failed.
    #[error("dispatch failed: {0}")]
    Dispatch(#[from] ExecutorError),
}

pub type Result<T> = std::result::Result<T, TransformationError>;
