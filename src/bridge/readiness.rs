use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

/// When the host considers the UI ready for its first push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyStrategy {
    /// The UI announces itself by pulling state (`GetTodoItems`).
    Handshake,
    /// The host waits this long after the surface has loaded, then pushes.
    Delay(Duration),
}

/// One-way latch shared by everything that may push to the UI.
#[derive(Debug, Clone)]
pub struct Readiness {
    state: Arc<watch::Sender<bool>>,
}

impl Default for Readiness {
    fn default() -> Self {
        Self::new()
    }
}

impl Readiness {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            state: Arc::new(tx),
        }
    }

    /// Open the latch. Returns `true` only for the call that flipped it.
    pub fn mark_ready(&self) -> bool {
        !self.state.send_replace(true)
    }

    pub fn is_ready(&self) -> bool {
        *self.state.borrow()
    }
}
