//! The attack scheduler and executor.
//!
//! An [`Attacker`] paces hits against a shared [`Backend`] at a fixed rate
//! for a fixed duration. One scheduler task offers ticks to a pool of worker
//! tasks; when no worker is free at a scheduled instant the pool grows by one
//! and the same tick is offered again, so slow hits inflate latency instead
//! of lowering the achieved rate. Each tick yields exactly one [`HitResult`]
//! on the returned stream, which closes after every worker has exited.
mod hit;
mod intake;
mod result;
mod scheduler;
mod stop;
mod worker;


use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::warn;

use crate::backend::{Backend, PoolLimits, SqlitePool};
use crate::error::AttackError;
use crate::target::Targeter;

pub use hit::{FOLLOW_LIMIT_MARKER, HitPolicy, RedirectPolicy};
pub use result::{HitResult, STATUS_FAILED, STATUS_OK, Tick};
pub use scheduler::SchedulePlan;

use intake::TickIntake;
use scheduler::{WorkerPool, run_schedule};
use stop::StopSignal;
use worker::WorkerContext;

/// Default time the backend waits on a locked database.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default max idle and max open connections.
pub const DEFAULT_CONNECTIONS: usize = 10_000;
/// Default initial number of workers.
pub const DEFAULT_WORKERS: u64 = 10;
/// Default data source: a private in-memory SQLite database per connection.
pub const DEFAULT_DSN: &str = ":memory:";
/// Results buffered between the workers and the consumer.
pub const RESULTS_CAPACITY: usize = 1;

/// Construction options for an [`Attacker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackerOptions {
    pub workers: u64,
    pub dsn: String,
    pub max_idle_conns: usize,
    pub max_open_conns: usize,
    pub redirects: RedirectPolicy,
    pub timeout: Duration,
}

impl Default for AttackerOptions {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            dsn: DEFAULT_DSN.to_owned(),
            max_idle_conns: DEFAULT_CONNECTIONS,
            max_open_conns: DEFAULT_CONNECTIONS,
            redirects: RedirectPolicy::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl AttackerOptions {
    /// Initial number of workers. More are spawned on demand to hold the
    /// rate when hits are slow.
    #[must_use]
    pub const fn workers(mut self, workers: u64) -> Self {
        self.workers = workers;
        self
    }

    #[must_use]
    pub fn dsn(mut self, dsn: impl Into<String>) -> Self {
        self.dsn = dsn.into();
        self
    }

    #[must_use]
    pub const fn max_idle_conns(mut self, max_idle: usize) -> Self {
        self.max_idle_conns = max_idle;
        self
    }

    #[must_use]
    pub const fn max_open_conns(mut self, max_open: usize) -> Self {
        self.max_open_conns = max_open;
        self
    }

    #[must_use]
    pub const fn redirects(mut self, redirects: RedirectPolicy) -> Self {
        self.redirects = redirects;
        self
    }

    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn pool_limits(&self) -> PoolLimits {
        PoolLimits {
            max_idle: self.max_idle_conns,
            max_open: self.max_open_conns,
            busy_timeout: self.timeout,
        }
    }
}

/// Owns the shared backend and the one-shot stop signal.
pub struct Attacker {
    backend: Arc<dyn Backend>,
    stop: StopSignal,
    spawned: Arc<AtomicU64>,
    initial_workers: u64,
    policy: HitPolicy,
}

impl Attacker {
    /// Opens the SQLite pool described by `options`.
    ///
    /// # Errors
    ///
    /// Returns [`AttackError::Backend`] when the pool cannot be opened.
    pub async fn connect(options: AttackerOptions) -> Result<Self, AttackError> {
        let pool = SqlitePool::open(&options.dsn, options.pool_limits()).await?;
        Ok(Self::with_backend(&options, Arc::new(pool)))
    }

    /// Builds an attacker around an already constructed backend.
    #[must_use]
    pub fn with_backend(options: &AttackerOptions, backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            stop: StopSignal::new(),
            spawned: Arc::new(AtomicU64::new(0)),
            initial_workers: options.workers,
            policy: HitPolicy {
                redirects: options.redirects,
            },
        }
    }

    /// Starts an attack and returns its result stream.
    ///
    /// Hits are issued at `rate` per second for the whole seconds of
    /// `duration`. Must be called inside a tokio runtime. One attack runs
    /// at a time: starting another resets the count behind
    /// [`Attacker::workers`].
    ///
    /// # Errors
    ///
    /// Returns [`AttackError::ZeroRate`] or [`AttackError::ZeroDuration`];
    /// nothing is scheduled in that case.
    pub fn attack(
        &self,
        targeter: Arc<dyn Targeter>,
        rate: u64,
        duration: Duration,
    ) -> Result<mpsc::Receiver<HitResult>, AttackError> {
        let plan = SchedulePlan::new(rate, duration)?;
        let (results_tx, results_rx) = mpsc::channel(RESULTS_CAPACITY);
        let ctx = WorkerContext {
            intake: Arc::new(TickIntake::default()),
            targeter,
            backend: Arc::clone(&self.backend),
            policy: self.policy,
            results: results_tx,
        };

        let mut pool = WorkerPool::new(ctx, Arc::clone(&self.spawned));
        for _ in 0..self.initial_workers {
            pool.grow();
        }
        tokio::spawn(run_schedule(plan, pool, self.stop.subscribe()));

        Ok(results_rx)
    }

    /// Stops the current attack. The scheduler notices at its next handoff;
    /// hits already running complete and are reported.
    ///
    /// # Errors
    ///
    /// Returns [`AttackError::AlreadyStopped`] when called a second time.
    pub fn stop(&self) -> Result<(), AttackError> {
        self.stop.trigger().inspect_err(|_already| {
            warn!("Stop requested more than once; ignoring.");
        })
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }

    /// Workers spawned for the current attack. Never decreases during one
    /// attack.
    #[must_use]
    pub fn workers(&self) -> u64 {
        self.spawned.load(Ordering::Acquire)
    }

    /// Releases the shared backend.
    pub async fn close(self) {
        self.backend.close().await;
    }
}
