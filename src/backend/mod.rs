//! The shared resource an attack executes its queries against.
mod sqlite;


use async_trait::async_trait;

use crate::error::BackendError;

pub use sqlite::{PoolLimits, SqlitePool};

/// A query executor shared by every worker of an attack.
///
/// Implementations own their synchronization; the attacker calls
/// [`Backend::execute`] from many tasks at once without holding any lock.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Executes one statement, draining any rows it produces.
    ///
    /// # Errors
    ///
    /// Returns the backend failure; its display text becomes the hit's error.
    async fn execute(&self, query: &str) -> Result<(), BackendError>;

    /// Releases pooled resources. Later calls to `execute` may fail.
    async fn close(&self) {}
}
