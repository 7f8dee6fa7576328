/// Boxed failure returned by a refresh supplier.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while refreshing a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    /// The supplier failed; the previous value stays visible.
    #[error("refresh supplier for {name} failed: {source}")]
    Supplier {
        name: String,
        #[source]
        source: BoxError,
    },

    /// The background worker thread could not be started.
    #[error("failed to spawn refresher worker {name}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, RefreshError>;
