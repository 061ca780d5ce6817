mod app;
mod attack;
mod backend;
mod config;
mod sink;
mod target;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use attack::AttackError;
pub use backend::BackendError;
pub use config::ConfigError;
pub use sink::SinkError;
pub use target::TargetError;
pub use validation::ValidationError;
