use thiserror::Error;

use super::BackendError;

#[derive(Debug, Error)]
pub enum AttackError {
    #[error("rate must be bigger than zero")]
    ZeroRate,
    #[error("duration must be bigger than zero")]
    ZeroDuration,
    #[error("attack was already stopped")]
    AlreadyStopped,
    #[error("failed to set up backend: {source}")]
    Backend {
        #[from]
        source: BackendError,
    },
}
