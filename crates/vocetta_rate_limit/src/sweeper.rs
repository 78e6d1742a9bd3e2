//! Periodic cleanup of lapsed windows.

use crate::RateLimiter;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Handle to a background sweep task.
///
/// Dropping the sweeper aborts the task, so tests and shutdown paths
/// never leak it.
#[derive(Debug)]
pub struct Sweeper {
    handle: tokio::task::JoinHandle<()>,
}

impl Sweeper {
    /// Spawn a task that sweeps `limiter` every `every` interval.
    pub fn spawn(limiter: Arc<RateLimiter>, every: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let removed = limiter.sweep();
                if removed > 0 {
                    debug!(removed, tracked = limiter.len(), "swept lapsed rate windows");
                }
            }
        });
        Self { handle }
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
