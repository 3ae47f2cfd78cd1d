//! Decoder port.
//!
//! Turns a downloaded forecast file into a slice that can be merged into the
//! running dataset. The binary format itself is opaque to the engine.

use async_trait::async_trait;
use thiserror::Error;

use crate::dataset::TimeIndexed;
use crate::forecast::FetchSpec;

/// Decoder failure for one file.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("cannot decode {path}: {message}")]
pub struct DecodeError {
    /// File that was being decoded.
    pub path: String,
    /// What went wrong.
    pub message: String,
}

impl DecodeError {
    /// Create a decode error.
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Port for decoding a cached file (`spec.local_path`) into a dataset slice.
///
/// Called from the coordinator task, so implementations should do their file
/// access through `tokio::fs` or `spawn_blocking`.
#[async_trait]
pub trait SliceDecoder: Send + Sync + 'static {
    /// The decoded slice type.
    type Slice: TimeIndexed + Send + 'static;

    /// Decode the file described by `spec`.
    async fn decode(&self, spec: &FetchSpec) -> Result<Self::Slice, DecodeError>;
}
