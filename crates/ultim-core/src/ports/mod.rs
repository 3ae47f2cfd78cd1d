//! Port definitions (trait abstractions) for external collaborators.
//!
//! Ports define the interfaces that the acquisition engine expects from
//! infrastructure. They contain no implementation details and use only
//! domain types.
//!
//! # Design Rules
//!
//! - No `reqwest` types in any signature
//! - No decoder or file-format details
//! - The host UI is reached only through events

pub mod decoder;
pub mod event_emitter;
pub mod http_transport;

pub use decoder::{DecodeError, SliceDecoder};
pub use event_emitter::{AcquisitionEventEmitterPort, ChannelEmitter, NoopAcquisitionEmitter};
pub use http_transport::{HttpResponse, HttpTransport, TransportError};
