//! Counter behind the host progress indicator.

use std::sync::{Mutex, MutexGuard, PoisonError};

use ultim_core::{AcquisitionEvent, AcquisitionEventEmitterPort};

/// Point-in-time view of the counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// Files finished since the last init.
    pub count: u32,
    /// Files expected, or `None` when indeterminate.
    pub total: Option<u32>,
}

#[derive(Debug, Default)]
struct State {
    snapshot: ProgressSnapshot,
    sealed: bool,
}

/// Monotonic progress counter that forwards every change to the host.
///
/// Once sealed the reporter ignores further ticks and inits with a known
/// total; this is how an aborted run guarantees the host sees no progress
/// after `abort` returns. Resets and other events still go through so the
/// host can hide its indicator and receive the final outcome.
pub struct ProgressReporter {
    emitter: Box<dyn AcquisitionEventEmitterPort>,
    state: Mutex<State>,
}

impl std::fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("state", &*self.lock())
            .finish_non_exhaustive()
    }
}

impl ProgressReporter {
    /// Create a reporter forwarding to `emitter`.
    pub fn new(emitter: Box<dyn AcquisitionEventEmitterPort>) -> Self {
        Self {
            emitter,
            state: Mutex::new(State::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reset the counter to zero with a known total.
    pub fn init(&self, total: u32) {
        let mut state = self.lock();
        if state.sealed {
            return;
        }
        state.snapshot = ProgressSnapshot {
            count: 0,
            total: Some(total),
        };
        self.emitter.emit(AcquisitionEvent::progress_init(total));
    }

    /// Reset the counter to zero and mark the total indeterminate.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.snapshot = ProgressSnapshot::default();
        self.emitter.emit(AcquisitionEvent::progress_reset());
    }

    /// Count one finished file.
    ///
    /// Returns the new count, or `None` if the tick was ignored (sealed, or
    /// no known total).
    pub fn tick(&self) -> Option<u32> {
        let mut state = self.lock();
        if state.sealed {
            return None;
        }
        let total = state.snapshot.total?;
        debug_assert!(
            state.snapshot.count < total,
            "more ticks than files: {} of {total}",
            state.snapshot.count + 1
        );
        // Release builds clamp rather than report more than 100%.
        let count = (state.snapshot.count + 1).min(total);
        state.snapshot.count = count;
        self.emitter
            .emit(AcquisitionEvent::ProgressTick { count, total });
        Some(count)
    }

    /// Current counter value.
    pub fn snapshot(&self) -> ProgressSnapshot {
        self.lock().snapshot
    }

    /// Stop forwarding progress. Irreversible.
    ///
    /// Holding the lock while sealing means a tick racing with the seal
    /// either lands entirely before it or not at all.
    pub fn seal(&self) {
        self.lock().sealed = true;
    }

    /// Whether `seal` has been called.
    pub fn is_sealed(&self) -> bool {
        self.lock().sealed
    }

    /// Forward a non-progress event.
    ///
    /// Goes through the same lock as ticks so the host observes one total
    /// order of events.
    pub fn emit(&self, event: AcquisitionEvent) {
        let _state = self.lock();
        self.emitter.emit(event);
    }
}
