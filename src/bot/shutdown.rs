//! Process shutdown coordination.
//!
//! Shutdown drains: once triggered, new interactions are refused, and the
//! dispatches already running get a grace period to finish before the
//! process exits.

use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tokio_util::task::task_tracker::TrackedFuture;
use tokio_util::task::TaskTracker;
use tracing::{info, warn};

#[derive(Clone, Default)]
pub struct Shutdown {
    token: CancellationToken,
    tracker: TaskTracker,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        if !self.token.is_cancelled() {
            info!(in_flight = self.tracker.len(), "Shutdown requested");
        }
        self.token.cancel();
    }

    pub fn is_triggered(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once `trigger` has been called.
    pub async fn triggered(&self) {
        self.token.cancelled().await;
    }

    /// Count `future` as in flight until it completes.
    pub fn track<F: Future>(&self, future: F) -> TrackedFuture<F> {
        self.tracker.track_future(future)
    }

    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Wait for tracked work to finish, up to `grace`. Returns false if work
    /// was still running when the grace period ran out.
    pub async fn drain(&self, grace: Duration) -> bool {
        self.tracker.close();
        match tokio::time::timeout(grace, self.tracker.wait()).await {
            Ok(()) => true,
            Err(_) => {
                warn!(
                    in_flight = self.tracker.len(),
                    grace_ms = grace.as_millis() as u64,
                    "Abandoning interactions still running after grace period"
                );
                false
            }
        }
    }
}
