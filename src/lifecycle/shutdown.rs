//! Shutdown coordination for both services.
//!
//! Each binary owns one [`Shutdown`]. `HttpServer::run` and
//! `OriginServer::run` take a receiver from it and stop accepting
//! connections once [`wait_for`] resolves; in-flight requests finish first.

use tokio::sync::broadcast;

/// One-shot stop signal fanned out to every server task of a process.
///
/// Triggered by `signals::forward_signals` on SIGINT/SIGTERM, or directly
/// by tests that start a gateway and origin side by side.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver to hand to a server's `run`.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Ask every subscribed server to drain and stop.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Servers still holding a receiver.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve once shutdown is triggered or the coordinator is dropped.
pub async fn wait_for(mut rx: broadcast::Receiver<()>) {
    // Closed and Lagged both mean a signal was sent or can no longer arrive.
    let _ = rx.recv().await;
    tracing::debug!("Shutdown signal observed");
}
