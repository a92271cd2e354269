//! Process-wide service state.
//!
//! # Responsibilities
//! - Track the number of requests currently in flight
//! - Record whether the service is draining for shutdown
//! - Let the shutdown path wait until all in-flight work has finished
//!
//! # Design Decisions
//! - The counter is the only shared mutable state; atomics are enough
//! - Decrement happens in a drop guard so error paths cannot leak a count
//! - Once draining is set it is never cleared; a node restarts to recover

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// How often the drain wait re-checks the in-flight counter.
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Shared state for one server instance.
///
/// Owned by the server handle and shared with the request path via `Arc`.
#[derive(Debug, Default)]
pub struct ServiceState {
    /// Requests currently being handled. Arc'd so guards can outlive the
    /// borrow they were created from.
    in_flight: Arc<AtomicUsize>,
    /// True once shutdown has been initiated.
    draining: AtomicBool,
}

impl ServiceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the start of a request. The returned guard decrements the
    /// counter when dropped, including on panic or timeout.
    pub fn begin_request(&self) -> RequestGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        RequestGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    /// Current number of in-flight requests.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Mark the service as draining. Health checks fail from this point on.
    pub fn begin_drain(&self) {
        self.draining.store(true, Ordering::SeqCst);
    }

    /// Whether shutdown has been initiated.
    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::SeqCst)
    }

    /// Wait until the in-flight count reaches zero.
    ///
    /// Callers bound this with a timeout; on its own it waits indefinitely.
    pub async fn drained(&self) {
        while self.in_flight.load(Ordering::SeqCst) > 0 {
            tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
        }
    }
}

/// Guard tracking one request's lifetime.
#[derive(Debug)]
pub struct RequestGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_counts_up_and_down() {
        let state = Arc::new(ServiceState::new());
        assert_eq!(state.in_flight(), 0);

        let guard1 = state.begin_request();
        assert_eq!(state.in_flight(), 1);

        let guard2 = state.begin_request();
        assert_eq!(state.in_flight(), 2);

        drop(guard1);
        assert_eq!(state.in_flight(), 1);

        drop(guard2);
        assert_eq!(state.in_flight(), 0);
    }

    #[test]
    fn drain_flag_is_sticky() {
        let state = ServiceState::new();
        assert!(!state.is_draining());
        state.begin_drain();
        assert!(state.is_draining());
        state.begin_drain();
        assert!(state.is_draining());
    }

    #[tokio::test]
    async fn drained_completes_when_guards_drop() {
        let state = Arc::new(ServiceState::new());
        let guard = state.begin_request();

        let waiter = {
            let state = Arc::clone(&state);
            tokio::spawn(async move { state.drained().await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("drain should finish once the last guard drops")
            .unwrap();
    }

    #[tokio::test]
    async fn drained_returns_immediately_when_idle() {
        let state = Arc::new(ServiceState::new());
        tokio::time::timeout(Duration::from_millis(100), state.drained())
            .await
            .expect("no in-flight requests, drain should not wait");
    }
}
