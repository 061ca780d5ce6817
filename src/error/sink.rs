use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to write result record: {source}")]
    Write {
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize result record: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to format result record: {source}")]
    Format {
        #[source]
        source: std::fmt::Error,
    },
    #[error("Histogram error during {context}: {message}")]
    Histogram {
        context: &'static str,
        message: String,
    },
}
