//! Cancellation signalling between the caller and a running export

use tokio::sync::watch;

/// Shared cancellation flag.
///
/// Cloneable and safe to trigger from any context, any number of times,
/// including before the export starts or after it finished (both no-ops for
/// the runner). Runners observe it at the next safe point: the next output
/// line read or the next job boundary.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Request cancellation; idempotent
    pub fn request(&self) {
        self.tx.send_replace(true);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Wait until cancellation is requested
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        while !*rx.borrow_and_update() {
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}
