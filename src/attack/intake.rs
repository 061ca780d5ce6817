use std::collections::VecDeque;

use parking_lot::Mutex;
use tokio::sync::oneshot;

use super::result::Tick;

/// Rendezvous point between the scheduler and the workers.
///
/// A worker that is ready for work registers a slot; an offer succeeds only
/// if a slot is waiting, so a failed offer means every worker is busy.
#[derive(Debug, Default)]
pub(crate) struct TickIntake {
    state: Mutex<IntakeState>,
}

#[derive(Debug, Default)]
struct IntakeState {
    waiting: VecDeque<oneshot::Sender<Tick>>,
    closed: bool,
}

/// A worker's registration for the next tick. Resolves to `None` once the
/// intake is closed.
#[derive(Debug)]
pub(crate) struct TickSlot {
    rx: oneshot::Receiver<Tick>,
}

impl TickSlot {
    pub(crate) async fn recv(self) -> Option<Tick> {
        self.rx.await.ok()
    }
}

impl TickIntake {
    /// Registers a ready worker. Returns `None` when the intake is closed.
    pub(crate) fn ready(&self) -> Option<TickSlot> {
        let mut state = self.state.lock();
        if state.closed {
            return None;
        }
        let (tx, rx) = oneshot::channel();
        state.waiting.push_back(tx);
        Some(TickSlot { rx })
    }

    /// Hands `tick` to the longest-waiting worker without blocking, or gives
    /// it back when no worker is waiting.
    pub(crate) fn try_offer(&self, tick: Tick) -> Result<(), Tick> {
        let mut state = self.state.lock();
        let mut tick = tick;
        while let Some(slot) = state.waiting.pop_front() {
            match slot.send(tick) {
                Ok(()) => return Ok(()),
                Err(returned) => tick = returned,
            }
        }
        Err(tick)
    }

    /// Stops accepting registrations and releases every waiting worker.
    pub(crate) fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        state.waiting.clear();
    }

    #[cfg(test)]
    pub(crate) fn waiting(&self) -> usize {
        self.state.lock().waiting.len()
    }
}
