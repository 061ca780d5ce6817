use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;

/// Status recorded for a hit the backend accepted.
pub const STATUS_OK: u16 = 200;
/// Status recorded for a hit the backend rejected.
pub const STATUS_FAILED: u16 = 500;

/// A scheduled fire time handed from the scheduler to a worker.
#[derive(Debug, Clone, Copy)]
pub struct Tick {
    /// Monotonic fire time; latency is measured from here.
    pub at: Instant,
    /// Wall-clock rendering of `at`, for result records.
    pub timestamp: DateTime<Utc>,
}

/// The recorded effect of one hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitResult {
    pub timestamp: DateTime<Utc>,
    pub latency: Duration,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub code: u16,
    /// Empty on success.
    pub error: String,
}

impl HitResult {
    #[must_use]
    pub fn scheduled(tick: Tick) -> Self {
        Self {
            timestamp: tick.timestamp,
            latency: Duration::ZERO,
            bytes_in: 0,
            bytes_out: 0,
            code: 0,
            error: String::new(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error.is_empty()
    }
}
