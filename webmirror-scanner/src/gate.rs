//! Join barrier for the recursive fan-out.
//!
//! A [`GateTicket`] is taken before a task is spawned and released when the
//! task is dropped, whichever way it ends. [`CompletionGate::wait`] resolves
//! once every ticket has been released.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct GateState {
    pending: AtomicUsize,
    drained: Notify,
}

#[derive(Debug, Clone, Default)]
pub struct CompletionGate {
    state: Arc<GateState>,
}

impl CompletionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one more outstanding task.
    pub fn ticket(&self) -> GateTicket {
        self.state.pending.fetch_add(1, Ordering::AcqRel);
        GateTicket {
            state: self.state.clone(),
        }
    }

    pub fn pending(&self) -> usize {
        self.state.pending.load(Ordering::Acquire)
    }

    /// Wait until no tickets are outstanding.
    pub async fn wait(&self) {
        loop {
            let drained = self.state.drained.notified();
            tokio::pin!(drained);
            // register before checking so a release in between is not missed
            drained.as_mut().enable();

            if self.pending() == 0 {
                return;
            }
            drained.await;
        }
    }
}

#[derive(Debug)]
pub struct GateTicket {
    state: Arc<GateState>,
}

impl Drop for GateTicket {
    fn drop(&mut self) {
        if self.state.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.state.drained.notify_waiters();
        }
    }
}
