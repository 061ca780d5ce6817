use tokio::time::Instant;

use super::result::{HitResult, STATUS_FAILED, STATUS_OK, Tick};
use crate::backend::Backend;
use crate::target::Targeter;

/// Failure text a follow-limited client reports when it gave up following.
pub const FOLLOW_LIMIT_MARKER: &str = "stopped after";

/// Whether the backend is expected to follow redirections.
///
/// Under [`RedirectPolicy::NoFollow`], failures whose text contains
/// [`FOLLOW_LIMIT_MARKER`] are recorded as successes. The rule only means
/// something for backends that follow redirections; with the default
/// [`RedirectPolicy::Follow`] it never applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RedirectPolicy {
    #[default]
    Follow,
    NoFollow,
}

/// Per-hit classification rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HitPolicy {
    pub redirects: RedirectPolicy,
}

impl HitPolicy {
    #[must_use]
    pub fn suppresses(&self, error: &str) -> bool {
        self.redirects == RedirectPolicy::NoFollow && error.contains(FOLLOW_LIMIT_MARKER)
    }
}

/// Executes one hit for `tick`. Never fails: every failure is recorded in
/// the returned result, and latency always runs from the tick's fire time so
/// it includes any wait for a free worker.
pub(crate) async fn hit(
    targeter: &dyn Targeter,
    backend: &dyn Backend,
    policy: HitPolicy,
    tick: Tick,
) -> HitResult {
    let mut result = HitResult::scheduled(tick);

    match targeter.next_target().await {
        Ok(target) => match backend.execute(target.query()).await {
            Ok(()) => result.code = STATUS_OK,
            Err(err) => {
                let message = err.to_string();
                if policy.suppresses(&message) {
                    result.code = STATUS_OK;
                } else {
                    result.code = STATUS_FAILED;
                    result.error = message;
                }
            }
        },
        Err(err) => result.error = err.to_string(),
    }

    result.latency = Instant::now().saturating_duration_since(tick.at);
    result
}
