//! Acquisition event emitter port.
//!
//! This port abstracts how progress and completion reach the host, so the
//! engine never depends on a UI toolkit or event loop.

use tokio::sync::mpsc;

use crate::acquisition::AcquisitionEvent;

/// Port for emitting acquisition events.
///
/// Implementations must not block; the engine calls `emit` from the code path
/// that serializes progress updates.
pub trait AcquisitionEventEmitterPort: Send + Sync {
    /// Emit an acquisition event.
    fn emit(&self, event: AcquisitionEvent);

    /// Clone this emitter into a boxed trait object.
    fn clone_box(&self) -> Box<dyn AcquisitionEventEmitterPort>;
}

/// A no-op emitter for tests and headless contexts.
#[derive(Debug, Clone, Default)]
pub struct NoopAcquisitionEmitter;

impl NoopAcquisitionEmitter {
    /// Create a new no-op emitter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl AcquisitionEventEmitterPort for NoopAcquisitionEmitter {
    fn emit(&self, _event: AcquisitionEvent) {
        // Intentionally do nothing
    }

    fn clone_box(&self) -> Box<dyn AcquisitionEventEmitterPort> {
        Box::new(self.clone())
    }
}

/// Emitter that forwards events into an unbounded tokio channel.
///
/// The host drains the receiver on its own schedule. Events sent after the
/// receiver is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelEmitter {
    tx: mpsc::UnboundedSender<AcquisitionEvent>,
}

impl ChannelEmitter {
    /// Create an emitter and the receiver the host should drain.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<AcquisitionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl AcquisitionEventEmitterPort for ChannelEmitter {
    fn emit(&self, event: AcquisitionEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("acquisition event receiver dropped");
        }
    }

    fn clone_box(&self) -> Box<dyn AcquisitionEventEmitterPort> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_emitter() {
        let emitter = NoopAcquisitionEmitter::new();
        emitter.emit(AcquisitionEvent::progress_reset());
        let _boxed: Box<dyn AcquisitionEventEmitterPort> = emitter.clone_box();
    }

    #[test]
    fn test_channel_emitter_preserves_order() {
        let (emitter, mut rx) = ChannelEmitter::new();
        emitter.emit(AcquisitionEvent::progress_init(3));
        emitter.clone_box().emit(AcquisitionEvent::ProgressTick { count: 1, total: 3 });

        assert_eq!(rx.try_recv().unwrap(), AcquisitionEvent::progress_init(3));
        assert_eq!(
            rx.try_recv().unwrap(),
            AcquisitionEvent::ProgressTick { count: 1, total: 3 }
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_channel_emitter_survives_dropped_receiver() {
        let (emitter, rx) = ChannelEmitter::new();
        drop(rx);
        emitter.emit(AcquisitionEvent::progress_reset());
    }
}
