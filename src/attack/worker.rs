use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use super::hit::{HitPolicy, hit};
use super::intake::{TickIntake, TickSlot};
use super::result::HitResult;
use crate::backend::Backend;
use crate::target::Targeter;

/// Everything a worker shares with its pool.
#[derive(Clone)]
pub(crate) struct WorkerContext {
    pub(crate) intake: Arc<TickIntake>,
    pub(crate) targeter: Arc<dyn Targeter>,
    pub(crate) backend: Arc<dyn Backend>,
    pub(crate) policy: HitPolicy,
    pub(crate) results: mpsc::Sender<HitResult>,
}

/// Runs until the intake closes. `slot` is the worker's first registration,
/// taken by the scheduler before the task was spawned.
pub(crate) async fn run_worker(id: u64, ctx: WorkerContext, slot: TickSlot) {
    let mut next = Some(slot);
    let mut hits: u64 = 0;
    let mut consumer_gone = false;

    while let Some(slot) = next.take().or_else(|| ctx.intake.ready()) {
        let Some(tick) = slot.recv().await else {
            break;
        };
        let result = hit(ctx.targeter.as_ref(), ctx.backend.as_ref(), ctx.policy, tick).await;
        hits = hits.saturating_add(1);
        if ctx.results.send(result).await.is_err() && !consumer_gone {
            consumer_gone = true;
            debug!("Worker {} discarding results: the result stream was dropped.", id);
        }
    }

    debug!("Worker {} exiting after {} hits.", id, hits);
}
