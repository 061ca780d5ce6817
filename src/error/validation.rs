use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("rate must be bigger than zero")]
    ZeroRate,
    #[error("duration must be bigger than zero")]
    ZeroDuration,
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("--lazy needs a targets file; it cannot re-read stdin.")]
    LazyRequiresFile,
    #[error("--lazy cannot be combined with --body.")]
    LazyWithBody,
    #[error("Failed to open {path}: {source}")]
    OpenFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to build runtime: {source}")]
    RuntimeBuildFailed {
        #[source]
        source: std::io::Error,
    },
}
