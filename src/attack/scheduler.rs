use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, error, info};

use super::result::Tick;
use super::stop::StopListener;
use super::worker::{WorkerContext, run_worker};
use crate::error::AttackError;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Pacing derived from a rate and a duration.
///
/// The hit count uses whole seconds only: `rate * floor(duration)`. A
/// 2.5s run at 10/s issues 20 hits, and a run shorter than one second
/// issues none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulePlan {
    pub rate: u64,
    pub interval: Duration,
    pub hits: u64,
}

impl SchedulePlan {
    /// # Errors
    ///
    /// Returns [`AttackError::ZeroRate`] or [`AttackError::ZeroDuration`].
    pub fn new(rate: u64, duration: Duration) -> Result<Self, AttackError> {
        if rate == 0 {
            return Err(AttackError::ZeroRate);
        }
        if duration.is_zero() {
            return Err(AttackError::ZeroDuration);
        }
        Ok(Self {
            rate,
            interval: Duration::from_nanos(NANOS_PER_SEC.checked_div(rate).unwrap_or(0)),
            hits: rate.saturating_mul(duration.as_secs()),
        })
    }

    /// Nominal fire time of tick `index`.
    #[must_use]
    pub fn fire_time(&self, began: Instant, index: u64) -> Instant {
        let nanos = u64::try_from(self.interval.as_nanos())
            .unwrap_or(u64::MAX)
            .saturating_mul(index);
        began
            .checked_add(Duration::from_nanos(nanos))
            .unwrap_or(began)
    }
}

/// How a schedule ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScheduleOutcome {
    Completed,
    Cancelled,
}

/// The growing set of workers behind one attack.
pub(crate) struct WorkerPool {
    ctx: WorkerContext,
    handles: Vec<JoinHandle<()>>,
    spawned: Arc<AtomicU64>,
}

impl WorkerPool {
    /// Starts a fresh count in `spawned`, which the attacker reports through
    /// `Attacker::workers`.
    pub(crate) fn new(ctx: WorkerContext, spawned: Arc<AtomicU64>) -> Self {
        spawned.store(0, Ordering::Release);
        Self {
            ctx,
            handles: Vec::new(),
            spawned,
        }
    }

    /// Spawns one worker that is already registered as ready, so the next
    /// offer is guaranteed to find it. Returns `false` once the intake is
    /// closed.
    pub(crate) fn grow(&mut self) -> bool {
        let Some(slot) = self.ctx.intake.ready() else {
            return false;
        };
        let id = u64::try_from(self.handles.len()).unwrap_or(u64::MAX);
        self.handles
            .push(tokio::spawn(run_worker(id, self.ctx.clone(), slot)));
        self.spawned.fetch_add(1, Ordering::AcqRel);
        true
    }

    fn size(&self) -> usize {
        self.handles.len()
    }

    /// Closes the intake and waits for every worker to exit. The result
    /// stream closes when the pool is dropped afterwards.
    async fn drain(self) {
        self.ctx.intake.close();
        for handle in self.handles {
            if let Err(err) = handle.await {
                error!("Worker task failed: {}", err);
            }
        }
    }
}

pub(crate) async fn run_schedule(
    plan: SchedulePlan,
    mut pool: WorkerPool,
    mut stop: StopListener,
) -> ScheduleOutcome {
    let began = Instant::now();
    let began_wall = Utc::now();
    let initial = pool.size();
    let mut done: u64 = 0;

    info!(
        "Attacking at {}/s: {} hits, {} initial workers.",
        plan.rate, plan.hits, initial
    );

    let outcome = loop {
        if done >= plan.hits {
            break ScheduleOutcome::Completed;
        }
        let now = Instant::now();
        let next = plan.fire_time(began, done);
        if next > now {
            tokio::select! {
                () = sleep_until(next) => {}
                () = stop.stopped() => {}
            }
        }
        if stop.is_stopped() {
            break ScheduleOutcome::Cancelled;
        }

        let at = next.max(now);
        let tick = Tick {
            at,
            timestamp: wall_clock(began_wall, began, at),
        };
        if pool.ctx.intake.try_offer(tick).is_ok() {
            done = done.saturating_add(1);
            continue;
        }

        // Every worker is busy: add one and retry the same tick.
        if !pool.grow() {
            break ScheduleOutcome::Cancelled;
        }
        debug!("No idle worker for hit {}; pool grew to {}.", done, pool.size());
    };

    let workers = pool.size();
    pool.drain().await;
    match outcome {
        ScheduleOutcome::Completed => info!(
            "Attack completed: {} hits issued, {} workers ({} added).",
            done,
            workers,
            workers.saturating_sub(initial)
        ),
        ScheduleOutcome::Cancelled => info!(
            "Attack stopped after {} of {} hits, {} workers.",
            done, plan.hits, workers
        ),
    }
    outcome
}

fn wall_clock(began_wall: DateTime<Utc>, began: Instant, at: Instant) -> DateTime<Utc> {
    TimeDelta::from_std(at.saturating_duration_since(began))
        .ok()
        .and_then(|offset| began_wall.checked_add_signed(offset))
        .unwrap_or(began_wall)
}
