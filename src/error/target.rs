use thiserror::Error;

#[derive(Debug, Error)]
pub enum TargetError {
    #[error("no targets to attack")]
    NoTargets,
    #[error("targets exhausted")]
    Exhausted,
    #[error("failed to read targets from '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
