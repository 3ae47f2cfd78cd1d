//! Host-facing abort handle.

use std::sync::Arc;

use crate::pool::WorkerPool;
use crate::progress::ProgressReporter;

/// Cloneable handle that stops an acquisition run.
///
/// Obtain it from `DownloadCoordinator::cancellation` before starting the
/// run; `acquire` consumes the coordinator.
#[derive(Debug, Clone)]
pub struct CancellationController {
    pool: WorkerPool,
    reporter: Arc<ProgressReporter>,
}

impl CancellationController {
    pub(crate) const fn new(pool: WorkerPool, reporter: Arc<ProgressReporter>) -> Self {
        Self { pool, reporter }
    }

    /// Abort the run.
    ///
    /// Queued fetches are dropped; fetches already on the network finish
    /// naturally and this waits for them. Once it returns no worker is
    /// running and the host receives no further progress ticks. Calling it
    /// again is harmless.
    pub async fn abort(&self) {
        let first = !self.pool.is_cancelled();
        self.reporter.seal();
        self.pool.shutdown().await;
        if first {
            tracing::info!(target: "ultim.download", "Acquisition aborted");
        }
    }

    /// Whether `abort` has been requested.
    pub fn is_aborted(&self) -> bool {
        self.pool.is_cancelled()
    }
}
