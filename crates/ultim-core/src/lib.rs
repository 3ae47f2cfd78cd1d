#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod acquisition;
pub mod dataset;
pub mod forecast;
pub mod paths;
pub mod ports;

// Re-export commonly used types for convenience
pub use acquisition::{
    AcquisitionError, AcquisitionEvent, AcquisitionOutcome, AcquisitionResult, AcquisitionStatus,
};
pub use dataset::{AggregateDataset, TimeIndexed};
pub use forecast::{
    CYCLE_HOURS, CycleAttemptResult, CycleError, FetchOutcome, FetchSource, FetchSpec,
    FileSetProfile, ForecastCycle, HOURS_BETWEEN_CYCLES, ProfileError, Resolution,
};
pub use ports::{
    AcquisitionEventEmitterPort, ChannelEmitter, DecodeError, HttpResponse, HttpTransport,
    NoopAcquisitionEmitter, SliceDecoder, TransportError,
};

// Re-export path utilities
pub use paths::{
    CACHE_DIR_ENV, CacheRootResolution, CacheRootSource, PathError, default_cache_root,
    ensure_directory, resolve_cache_root,
};
