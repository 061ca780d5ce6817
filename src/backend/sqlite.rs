use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_rusqlite::Connection;
use tracing::{debug, warn};

use super::Backend;
use crate::error::BackendError;

/// Connection limits for [`SqlitePool`].
///
/// `max_open == 0` leaves the number of open connections unbounded;
/// `max_idle == 0` closes every connection after use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolLimits {
    pub max_idle: usize,
    pub max_open: usize,
    pub busy_timeout: Duration,
}

/// A pool of SQLite connections, each driven on its own thread by
/// `tokio-rusqlite`.
pub struct SqlitePool {
    dsn: String,
    limits: PoolLimits,
    idle: Mutex<Vec<Connection>>,
    open: Option<Arc<Semaphore>>,
    closed: AtomicBool,
}

impl SqlitePool {
    /// Opens the pool and validates the DSN with one connection, which is
    /// kept idle when the limits allow it.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Open`] when the first connection cannot be
    /// established.
    pub async fn open(dsn: &str, limits: PoolLimits) -> Result<Self, BackendError> {
        let open = (limits.max_open > 0).then(|| Arc::new(Semaphore::new(limits.max_open)));
        let pool = Self {
            dsn: dsn.to_owned(),
            limits,
            idle: Mutex::new(Vec::new()),
            open,
            closed: AtomicBool::new(false),
        };
        let conn = pool.connect().await?;
        pool.release(conn).await;
        debug!(
            "Opened sqlite pool '{}' (max idle {}, max open {}).",
            pool.dsn, limits.max_idle, limits.max_open
        );
        Ok(pool)
    }

    #[must_use]
    pub fn dsn(&self) -> &str {
        &self.dsn
    }

    #[must_use]
    pub fn idle_connections(&self) -> usize {
        self.idle.lock().len()
    }

    async fn connect(&self) -> Result<Connection, BackendError> {
        let open_error = |err| BackendError::Open {
            dsn: self.dsn.clone(),
            source: err,
        };
        let conn = Connection::open(&self.dsn).await.map_err(open_error)?;
        let busy_timeout = self.limits.busy_timeout;
        conn.call(move |conn| {
            conn.busy_timeout(busy_timeout)?;
            Ok(())
        })
        .await
        .map_err(open_error)?;
        Ok(conn)
    }

    async fn acquire(&self) -> Result<(Connection, Option<OwnedSemaphorePermit>), BackendError> {
        let permit = match self.open.as_ref() {
            Some(open) => Some(
                Arc::clone(open)
                    .acquire_owned()
                    .await
                    .map_err(|_closed| BackendError::PoolClosed)?,
            ),
            None => None,
        };
        if self.closed.load(Ordering::Acquire) {
            return Err(BackendError::PoolClosed);
        }
        let reused = self.idle.lock().pop();
        let conn = match reused {
            Some(conn) => conn,
            None => self.connect().await?,
        };
        Ok((conn, permit))
    }

    async fn release(&self, conn: Connection) {
        let surplus = {
            let mut idle = self.idle.lock();
            if self.closed.load(Ordering::Acquire) || idle.len() >= self.limits.max_idle {
                Some(conn)
            } else {
                idle.push(conn);
                None
            }
        };
        if let Some(conn) = surplus
            && let Err(err) = conn.close().await
        {
            warn!("Failed to close surplus sqlite connection: {}", err);
        }
    }
}

#[async_trait]
impl Backend for SqlitePool {
    async fn execute(&self, query: &str) -> Result<(), BackendError> {
        let (conn, _permit) = self.acquire().await?;
        let statement = query.to_owned();
        let outcome = conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&statement)?;
                let mut rows = stmt.query([])?;
                while rows.next()?.is_some() {}
                Ok(())
            })
            .await;
        match outcome {
            Ok(()) => {
                self.release(conn).await;
                Ok(())
            }
            Err(err @ tokio_rusqlite::Error::ConnectionClosed) => {
                Err(BackendError::Query { source: err })
            }
            Err(err) => {
                self.release(conn).await;
                Err(BackendError::Query { source: err })
            }
        }
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::Release);
        if let Some(open) = self.open.as_ref() {
            open.close();
        }
        let idle = std::mem::take(&mut *self.idle.lock());
        let count = idle.len();
        for conn in idle {
            if let Err(err) = conn.close().await {
                warn!("Failed to close sqlite connection: {}", err);
            }
        }
        debug!("Closed sqlite pool '{}' ({} idle connections).", self.dsn, count);
    }
}
