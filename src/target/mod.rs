//! Target generation: the stimuli an attack executes.
//!
//! A [`Targeter`] hands out the next [`Target`] on demand. Every worker of an
//! attack calls the same targeter concurrently, so implementations keep their
//! cursor state behind atomics or queues.
mod fixed;
mod lazy;
mod lines;
mod round_robin;

#[cfg(test)]
mod tests;

use async_trait::async_trait;

use crate::error::TargetError;

pub use fixed::FixedTargeter;
pub use lazy::{LAZY_QUEUE_CAPACITY, LazyTargeter};
pub use lines::{parse_targets, read_targets};
pub use round_robin::StaticTargeter;

/// A query blueprint. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub body: String,
}

impl Target {
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    /// Derives the statement sent to the backend.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.body
    }
}

/// Produces the next [`Target`] or fails.
///
/// Implementations must be safe for concurrent use.
#[async_trait]
pub trait Targeter: Send + Sync {
    /// Returns the next target.
    ///
    /// # Errors
    ///
    /// Returns [`TargetError::Exhausted`] once the supply has ended, or another
    /// [`TargetError`] when the supply failed.
    async fn next_target(&self) -> Result<Target, TargetError>;
}
