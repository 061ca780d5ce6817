use async_trait::async_trait;

use super::{Target, Targeter};
use crate::error::TargetError;

/// Always returns the same target. Never fails and never runs dry.
#[derive(Debug, Clone)]
pub struct FixedTargeter {
    target: Target,
}

impl FixedTargeter {
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            target: Target::new(body),
        }
    }
}

#[async_trait]
impl Targeter for FixedTargeter {
    async fn next_target(&self) -> Result<Target, TargetError> {
        Ok(self.target.clone())
    }
}
