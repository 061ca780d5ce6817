use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{Target, Targeter};
use crate::error::TargetError;

/// Targets buffered ahead of the workers.
pub const LAZY_QUEUE_CAPACITY: usize = 100;

type Feed = Result<Target, TargetError>;

/// Streams targets from a file without loading it into memory.
///
/// A background task re-reads the file from the start every time it reaches
/// the end, so the supply behaves as an endless round-robin over the file's
/// lines. Each queued target is served to exactly one caller. Callers wait
/// while the queue is empty.
///
/// The supply ends when a full pass yields no targets or the file cannot be
/// read; a read failure is reported once, then every call returns
/// [`TargetError::Exhausted`].
#[derive(Debug)]
pub struct LazyTargeter {
    queue: Mutex<mpsc::Receiver<Feed>>,
    feeder: JoinHandle<()>,
}

impl LazyTargeter {
    /// Starts the background reader. Must be called inside a tokio runtime.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let (tx, rx) = mpsc::channel(LAZY_QUEUE_CAPACITY);
        let feeder = tokio::spawn(feed_targets(path.into(), tx));
        Self {
            queue: Mutex::new(rx),
            feeder,
        }
    }
}

impl Drop for LazyTargeter {
    fn drop(&mut self) {
        self.feeder.abort();
    }
}

#[async_trait]
impl Targeter for LazyTargeter {
    async fn next_target(&self) -> Result<Target, TargetError> {
        let mut queue = self.queue.lock().await;
        match queue.recv().await {
            Some(feed) => feed,
            None => Err(TargetError::Exhausted),
        }
    }
}

async fn feed_targets(path: PathBuf, tx: mpsc::Sender<Feed>) {
    let shown = path.display().to_string();
    let mut passes: u64 = 0;
    loop {
        let sent = match feed_pass(&path, &shown, &tx).await {
            Ok(Some(sent)) => sent,
            Ok(None) => return,
            Err(err) => {
                warn!("Lazy targets reader stopped: {}", err);
                drop(tx.send(Err(err)).await);
                return;
            }
        };
        if sent == 0 {
            warn!("Targets file '{}' yielded no targets; supply ended.", shown);
            return;
        }
        passes = passes.saturating_add(1);
        debug!("Finished pass {} over '{}', rewinding.", passes, shown);
    }
}

/// Sends one pass over the file. `Ok(None)` means the consumer went away.
async fn feed_pass(
    path: &Path,
    display: &str,
    tx: &mpsc::Sender<Feed>,
) -> Result<Option<u64>, TargetError> {
    let read_error = |err| TargetError::Read {
        path: display.to_owned(),
        source: err,
    };
    let file = File::open(path).await.map_err(read_error)?;
    let mut lines = BufReader::new(file).lines();
    let mut sent: u64 = 0;
    while let Some(line) = lines.next_line().await.map_err(read_error)? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if tx.send(Ok(Target::new(line))).await.is_err() {
            return Ok(None);
        }
        sent = sent.saturating_add(1);
    }
    Ok(Some(sent))
}
