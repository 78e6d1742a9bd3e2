//! Periodic cleanup of lapsed ledgers.

use crate::QuotaTracker;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Handle to a background sweep task.
///
/// Dropping the sweeper aborts the task. Sweeping is purely a memory
/// reclaim: an expired ledger that has not been swept yet is rebuilt on
/// its next touch anyway, so the interval can be generous.
#[derive(Debug)]
pub struct Sweeper {
    handle: tokio::task::JoinHandle<()>,
}

impl Sweeper {
    /// Spawn a task that sweeps `tracker` every `every` interval.
    pub fn spawn(tracker: Arc<QuotaTracker>, every: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let removed = tracker.sweep();
                if removed > 0 {
                    debug!(removed, tracked = tracker.len(), "swept lapsed quota ledgers");
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
