use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{Target, Targeter};
use crate::error::TargetError;

/// Round-robins over a preloaded, non-empty list of targets.
#[derive(Debug)]
pub struct StaticTargeter {
    targets: Vec<Target>,
    cursor: AtomicUsize,
}

impl StaticTargeter {
    /// # Errors
    ///
    /// Returns [`TargetError::NoTargets`] when `targets` is empty.
    pub fn new(targets: Vec<Target>) -> Result<Self, TargetError> {
        if targets.is_empty() {
            return Err(TargetError::NoTargets);
        }
        Ok(Self {
            targets,
            cursor: AtomicUsize::new(0),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[async_trait]
impl Targeter for StaticTargeter {
    async fn next_target(&self) -> Result<Target, TargetError> {
        // Each call claims a unique index; wrapping at usize::MAX only shifts
        // the phase of the rotation.
        let idx = self
            .cursor
            .fetch_add(1, Ordering::Relaxed)
            .checked_rem(self.targets.len())
            .unwrap_or(0);
        self.targets
            .get(idx)
            .cloned()
            .ok_or(TargetError::NoTargets)
    }
}
