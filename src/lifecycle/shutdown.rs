//! Shutdown coordination for the proxy.

use tokio::sync::broadcast;

/// Broadcast handle stopping the HTTP server.
///
/// The server holds a receiver; tests and the binary keep the handle and
/// call [`Shutdown::trigger`].
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Notify every subscriber and return how many were reached.
    pub fn trigger(&self) -> usize {
        let reached = self.tx.send(()).unwrap_or(0);
        tracing::info!(subscribers = reached, "Shutdown triggered");
        reached
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
