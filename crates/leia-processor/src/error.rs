use std::fmt;

/// Classification of an [`ExecutorError`], used for drop-set membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExecutorErrorKind {
    Endpoint,
    Serialization,
    Transport,
    Status,
    Rejected,
}

impl fmt::Display for ExecutorErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExecutorErrorKind::Endpoint => "endpoint",
            ExecutorErrorKind::Serialization => "serialization",
            ExecutorErrorKind::Transport => "transport",
            ExecutorErrorKind::Status => "status",
            ExecutorErrorKind::Rejected => "rejected",
        })
    }
}

/// Errors that can occur while delivering messages to a backend.
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    /// No usable endpoint for the backend.
    #[error("invalid endpoint for backend {backend}: {message}")]
    Endpoint { backend: String, message: String },

    /// The batch could not be encoded.
    #[error("failed to encode messages for backend {backend}: {source}")]
    Serialization {
        backend: String,
        #[source]
        source: serde_json::Error,
    },

    /// The transport call failed before a response arrived.
    #[error("transport to backend {backend} failed: {message}")]
    Transport { backend: String, message: String },

    /// The backend answered with a non-success status.
    #[error("backend {backend} answered with status {status}")]
    Status {
        backend: String,
        status: u16,
        body: String,
    },

    /// The backend or a handler refused the batch.
    #[error("backend {backend} rejected the batch: {message}")]
    Rejected { backend: String, message: String },
}

impl ExecutorError {
    pub fn kind(&self) -> ExecutorErrorKind {
        match self {
            ExecutorError::Endpoint { .. } => ExecutorErrorKind::Endpoint,
            ExecutorError::Serialization { .. } => ExecutorErrorKind::Serialization,
            ExecutorError::Transport { .. } => ExecutorErrorKind::Transport,
            ExecutorError::Status { .. } => ExecutorErrorKind::Status,
            ExecutorError::Rejected { .. } => ExecutorErrorKind::Rejected,
        }
    }

    /// Name of the backend the failure belongs to.
    pub fn backend(&self) -> &str {
        match self {
            ExecutorError::Endpoint { backend, .. }
            | ExecutorError::Serialization { backend, .. }
            | ExecutorError::Transport { backend, .. }
            | ExecutorError::Status { backend, .. }
            | ExecutorError::Rejected { backend, .. } => backend,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExecutorError>;
