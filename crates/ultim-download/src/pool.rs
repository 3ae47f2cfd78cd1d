//! Bounded worker pool for the fan-out phase.
//!
//! Tasks are spawned eagerly onto a `TaskTracker` and wait for one of
//! `capacity` permits before doing any work. A queued task that observes the
//! cancellation token exits without running its work; a task already holding
//! a permit always runs to completion.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Fixed-capacity executor shared by one acquisition run.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    capacity: usize,
    tracker: TaskTracker,
    cancel: CancellationToken,
}

impl WorkerPool {
    /// Create a pool running at most `capacity` submitted tasks at once.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
            tracker: TaskTracker::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Maximum number of concurrently running submitted tasks.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Tasks spawned or tracked and not yet finished (queued included).
    pub fn outstanding(&self) -> usize {
        self.tracker.len()
    }

    /// Queue `work` behind the concurrency limit.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit<F>(&self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let permits = Arc::clone(&self.permits);
        let cancel = self.cancel.clone();
        self.tracker.spawn(async move {
            let permit = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    tracing::debug!("Dropping queued fetch after cancellation");
                    return;
                }
                permit = permits.acquire_owned() => permit,
            };
            let Ok(_permit) = permit else {
                return;
            };
            work.await;
        });
    }

    /// Run `work` on the caller's task, outside the concurrency limit, while
    /// still counting it as outstanding.
    ///
    /// Returns `None` without polling `work` if the pool was already
    /// cancelled.
    pub async fn run_inline<F>(&self, work: F) -> Option<F::Output>
    where
        F: Future,
    {
        let cancel = self.cancel.clone();
        self.tracker
            .track_future(async move {
                if cancel.is_cancelled() {
                    return None;
                }
                Some(work.await)
            })
            .await
    }

    /// Drop queued work and wait for running work to finish.
    ///
    /// After this returns the pool holds nothing and accepts no new work
    /// (anything submitted later exits immediately).
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        self.tracker.close();
        self.tracker.wait().await;
    }

    /// Whether `shutdown` has started.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
