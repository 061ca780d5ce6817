use tokio::sync::watch;

use crate::error::AttackError;

/// One-shot cancellation signal shared by an attacker and its schedulers.
#[derive(Debug)]
pub(crate) struct StopSignal {
    tx: watch::Sender<bool>,
}

impl StopSignal {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Fires the signal. It can fire only once.
    pub(crate) fn trigger(&self) -> Result<(), AttackError> {
        if self.tx.send_replace(true) {
            return Err(AttackError::AlreadyStopped);
        }
        Ok(())
    }

    pub(crate) fn is_stopped(&self) -> bool {
        *self.tx.borrow()
    }

    pub(crate) fn subscribe(&self) -> StopListener {
        StopListener {
            rx: self.tx.subscribe(),
        }
    }
}

/// Scheduler-side view of a [`StopSignal`].
#[derive(Debug, Clone)]
pub(crate) struct StopListener {
    rx: watch::Receiver<bool>,
}

impl StopListener {
    pub(crate) fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the signal has fired.
    pub(crate) async fn stopped(&mut self) {
        if self.rx.wait_for(|stopped| *stopped).await.is_err() {
            // The attacker is gone, so nothing can stop this run any more.
            std::future::pending::<()>().await;
        }
    }
}
