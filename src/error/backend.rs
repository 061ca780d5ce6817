use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("failed to open '{dsn}': {source}")]
    Open {
        dsn: String,
        #[source]
        source: tokio_rusqlite::Error,
    },
    #[error("{source}")]
    Query {
        #[source]
        source: tokio_rusqlite::Error,
    },
    #[error("connection pool is closed")]
    PoolClosed,
    #[error("{message}")]
    Failed { message: String },
}

impl BackendError {
    /// Wraps a plain failure text from a backend that has no structured error.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        BackendError::Failed {
            message: message.into(),
        }
    }
}
