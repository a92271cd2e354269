//! Shutdown coordination.

use std::time::Duration;

use thiserror::Error;
use tokio::sync::broadcast;

/// Error type for the drain phase of shutdown.
#[derive(Debug, Error)]
pub enum ShutdownError {
    /// In-flight requests did not finish before the grace period elapsed.
    #[error("drain timed out after {after:?} with {in_flight} request(s) still in flight")]
    Timeout { after: Duration, in_flight: usize },
}

/// Coordinator for graceful shutdown.
///
/// Provides a broadcast channel the serve loop subscribes to; triggering it
/// stops the accept loop and closes idle connections.
#[derive(Debug)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
