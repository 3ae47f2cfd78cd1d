//! Acquisition run orchestration.
//!
//! The coordinator walks candidate cycles newest first. For each one it
//! fetches the lead-0 probe on its own task; only a cycle whose probe
//! succeeds gets its remaining files fanned out to the worker pool.
//!
//! # Serialization
//!
//! Workers never touch the progress counter or the dataset. They send their
//! `FetchOutcome` over a channel, and the coordinator alone receives from it,
//! ticks progress and merges. Completion order is whatever the network
//! produces; state mutation is strictly one outcome at a time.
//!
//! # Cancellation
//!
//! Between steps the coordinator checks the pool's cancellation flag. An
//! abort is terminal and yields whatever has been merged so far. Outcomes
//! that arrive after an abort are recorded but neither ticked nor merged.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use ultim_core::{
    AcquisitionError, AcquisitionEvent, AcquisitionEventEmitterPort, AcquisitionOutcome, AcquisitionStatus,
    CycleAttemptResult, FetchOutcome, ForecastCycle, HttpTransport, SliceDecoder,
    ensure_directory,
};

use crate::aggregator::DatasetAggregator;
use crate::cache::CacheLayout;
use crate::cancel::CancellationController;
use crate::clock::CycleClock;
use crate::config::AcquisitionConfig;
use crate::planner::FileSetPlanner;
use crate::pool::WorkerPool;
use crate::progress::{ProgressReporter, ProgressSnapshot};
use crate::worker::FetchWorker;

/// How one cycle attempt ended.
enum CycleRun {
    /// Probe passed and the fan-out drained.
    Completed(CycleAttemptResult),
    /// Probe failed; fall back to the previous cycle.
    Unavailable(CycleAttemptResult),
    /// Abort observed mid-attempt.
    Aborted(CycleAttemptResult),
}

/// Drives one acquisition run from cycle selection to the merged dataset.
///
/// A coordinator is single-use: `acquire` consumes it along with its pool.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use ultim_core::NoopAcquisitionEmitter;
/// use ultim_download::{
///     AcquisitionConfig, DownloadCoordinator, FileSliceDecoder, ReqwestTransport,
/// };
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let config = AcquisitionConfig::from_env()?;
/// let transport = Arc::new(ReqwestTransport::new(&config)?);
/// let coordinator = DownloadCoordinator::new(
///     config,
///     transport,
///     FileSliceDecoder,
///     Box::new(NoopAcquisitionEmitter::new()),
/// );
/// let abort = coordinator.cancellation();
/// let outcome = coordinator.acquire(chrono::Utc::now()).await;
/// # drop(abort);
/// let (cycle, dataset) = outcome.into_result()?;
/// println!("{cycle}: {} slices", dataset.len());
/// # Ok(())
/// # }
/// ```
pub struct DownloadCoordinator<D: SliceDecoder> {
    config: AcquisitionConfig,
    clock: CycleClock,
    planner: FileSetPlanner,
    worker: FetchWorker,
    aggregator: DatasetAggregator<D>,
    reporter: Arc<ProgressReporter>,
    pool: WorkerPool,
}

impl<D: SliceDecoder> std::fmt::Debug for DownloadCoordinator<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadCoordinator")
            .field("config", &self.config)
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

impl<D: SliceDecoder> DownloadCoordinator<D> {
    /// Wire a coordinator from its collaborators.
    pub fn new(
        config: AcquisitionConfig,
        transport: Arc<dyn HttpTransport>,
        decoder: D,
        emitter: Box<dyn AcquisitionEventEmitterPort>,
    ) -> Self {
        let planner = FileSetPlanner::new(CacheLayout::new(config.cache_root()));
        let worker = FetchWorker::from_config(transport, &config);
        let pool = WorkerPool::new(config.pool_capacity());

        Self {
            clock: CycleClock::new(),
            planner,
            worker,
            aggregator: DatasetAggregator::new(decoder),
            reporter: Arc::new(ProgressReporter::new(emitter)),
            pool,
            config,
        }
    }

    /// Handle for aborting the run from another task.
    pub fn cancellation(&self) -> CancellationController {
        CancellationController::new(self.pool.clone(), Arc::clone(&self.reporter))
    }

    /// Current progress counter.
    pub fn progress(&self) -> ProgressSnapshot {
        self.reporter.snapshot()
    }

    /// Find the newest usable cycle at `now` and assemble its dataset.
    ///
    /// Never fails outright: exhaustion and abort are reported through the
    /// outcome's status, together with any partial dataset.
    pub async fn acquire(mut self, now: DateTime<Utc>) -> AcquisitionOutcome<D::Slice> {
        tracing::info!(
            target: "ultim.download",
            now = %now,
            resolution = self.config.profile().resolution_tag(),
            max_cycles = self.config.max_cycle_attempts(),
            "Starting forecast acquisition"
        );

        let mut attempts = Vec::new();
        let mut status = AcquisitionStatus::Exhausted;

        for cycle in self.clock.candidates(now, self.config.max_cycle_attempts()) {
            if self.pool.is_cancelled() {
                status = AcquisitionStatus::Aborted;
                break;
            }

            match self.attempt_cycle(cycle).await {
                CycleRun::Completed(result) => {
                    attempts.push(result);
                    status = AcquisitionStatus::Completed { cycle };
                    break;
                }
                CycleRun::Unavailable(result) => attempts.push(result),
                CycleRun::Aborted(result) => {
                    attempts.push(result);
                    status = AcquisitionStatus::Aborted;
                    break;
                }
            }
        }

        if let AcquisitionStatus::Completed { cycle } = status {
            self.sweep_stale(&cycle).await;
        }

        self.reporter.reset();
        let dataset = self.aggregator.into_dataset();

        match status {
            AcquisitionStatus::Completed { cycle } => tracing::info!(
                target: "ultim.download",
                cycle = %cycle,
                slices = dataset.len(),
                "Forecast acquisition complete"
            ),
            AcquisitionStatus::Exhausted => tracing::warn!(
                target: "ultim.download",
                cycles_tried = attempts.len(),
                "No usable forecast cycle found"
            ),
            AcquisitionStatus::Aborted => tracing::info!(
                target: "ultim.download",
                cycles_tried = attempts.len(),
                slices = dataset.len(),
                "Forecast acquisition stopped by abort"
            ),
        }

        self.reporter.emit(AcquisitionEvent::AcquisitionComplete {
            status,
            slices: dataset.len(),
        });

        AcquisitionOutcome {
            status,
            attempts,
            dataset,
        }
    }

    async fn attempt_cycle(&mut self, cycle: ForecastCycle) -> CycleRun {
        let specs = self.planner.plan(&cycle, self.config.profile());
        let cycle_dir = self
            .planner
            .layout()
            .cycle_dir(self.config.profile().resolution_tag(), &cycle);
        let total = u32::try_from(specs.len()).unwrap_or(u32::MAX);
        let mut outcomes = Vec::with_capacity(specs.len());

        tracing::info!(
            target: "ultim.download",
            cycle = %cycle,
            files = total,
            "Trying forecast cycle"
        );
        self.reporter
            .emit(AcquisitionEvent::CycleStarted { cycle });
        self.reporter.init(total);

        if let Err(e) = ensure_directory(&cycle_dir).await {
            return self.unavailable(cycle, e.to_string(), outcomes);
        }

        let mut specs = specs.into_iter();
        let Some(probe) = specs.next() else {
            return self.unavailable(cycle, "profile lists no files".to_string(), outcomes);
        };

        // Probe: fetched on this task, outside the pool, to gate fan-out.
        let worker = self.worker.clone();
        let Some(probe_outcome) = self.pool.run_inline(worker.fetch(probe)).await else {
            return CycleRun::Aborted(aborted_result(cycle, false, outcomes));
        };
        if self.pool.is_cancelled() {
            tracing::debug!(cycle = %cycle, "Discarding probe outcome after abort");
            outcomes.push(probe_outcome);
            return CycleRun::Aborted(aborted_result(cycle, false, outcomes));
        }

        self.reporter.tick();
        if let Some(e) = probe_outcome.error() {
            let reason = e.to_string();
            outcomes.push(probe_outcome);
            return self.unavailable(cycle, reason, outcomes);
        }
        outcomes.push(self.settle(probe_outcome).await);

        // Fan-out.
        let (tx, mut rx) = mpsc::unbounded_channel::<FetchOutcome>();
        for spec in specs {
            if self.pool.is_cancelled() {
                break;
            }
            let worker = self.worker.clone();
            let tx = tx.clone();
            self.pool.submit(async move {
                let outcome = worker.fetch(spec).await;
                // The receiver outlives every sender; a send error only means
                // the run was dropped.
                let _ = tx.send(outcome);
            });
        }
        drop(tx);

        while let Some(outcome) = rx.recv().await {
            if self.pool.is_cancelled() {
                tracing::debug!(
                    cycle = %cycle,
                    lead_hour = outcome.spec.lead_hour,
                    "Discarding fetch outcome after abort"
                );
                outcomes.push(outcome);
                continue;
            }
            self.reporter.tick();
            outcomes.push(self.settle(outcome).await);
        }

        if self.pool.is_cancelled() {
            return CycleRun::Aborted(aborted_result(cycle, true, outcomes));
        }

        let result = CycleAttemptResult {
            cycle,
            succeeded: true,
            error: None,
            fetch_outcomes: outcomes,
        };
        tracing::info!(
            target: "ultim.download",
            cycle = %cycle,
            succeeded = result.succeeded_count(),
            failed = result.failed_count(),
            "Forecast cycle fetched"
        );
        CycleRun::Completed(result)
    }

    /// Merge a fetched file, or report a failed one. Returns the outcome as
    /// it should be recorded (a decode failure turns success into failure).
    async fn settle(&mut self, outcome: FetchOutcome) -> FetchOutcome {
        let cycle = outcome.spec.cycle;
        let lead_hour = outcome.spec.lead_hour;

        if outcome.succeeded() {
            return match self.aggregator.merge_file(&outcome.spec).await {
                Ok(()) => outcome,
                Err(e) => {
                    self.reporter
                        .emit(AcquisitionEvent::file_failed(cycle, lead_hour, e.to_string()));
                    FetchOutcome::failure(outcome.spec, e)
                }
            };
        }

        if let Some(e) = outcome.error() {
            tracing::warn!(
                cycle = %cycle,
                lead_hour,
                error = %e,
                "Forecast file failed after retries"
            );
            self.reporter
                .emit(AcquisitionEvent::file_failed(cycle, lead_hour, e.to_string()));
        }
        outcome
    }

    fn unavailable(
        &self,
        cycle: ForecastCycle,
        reason: String,
        outcomes: Vec<FetchOutcome>,
    ) -> CycleRun {
        tracing::warn!(
            target: "ultim.download",
            cycle = %cycle,
            error = %reason,
            "Forecast cycle unavailable, falling back"
        );
        self.reporter.emit(AcquisitionEvent::CycleUnavailable {
            cycle,
            error: reason,
        });
        CycleRun::Unavailable(CycleAttemptResult {
            cycle,
            succeeded: false,
            error: Some(AcquisitionError::CycleUnavailable { cycle }),
            fetch_outcomes: outcomes,
        })
    }

    async fn sweep_stale(&self, cycle: &ForecastCycle) {
        let layout = self.planner.layout();
        let keep = layout.cycle_dir(self.config.profile().resolution_tag(), cycle);
        match layout
            .sweep_stale(&keep, self.config.evict_stale_cycles)
            .await
        {
            Ok(stale) if !stale.is_empty() => tracing::debug!(
                count = stale.len(),
                evicted = self.config.evict_stale_cycles,
                "Stale cycle sweep finished"
            ),
            Ok(_) => {}
            Err(e) => tracing::warn!(
                root = %layout.root().display(),
                error = %e,
                "Failed to scan cache for stale cycles"
            ),
        }
    }
}

const fn aborted_result(
    cycle: ForecastCycle,
    succeeded: bool,
    fetch_outcomes: Vec<FetchOutcome>,
) -> CycleAttemptResult {
    CycleAttemptResult {
        cycle,
        succeeded,
        error: Some(AcquisitionError::Cancelled),
        fetch_outcomes,
    }
}
