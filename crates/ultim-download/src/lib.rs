#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), deny(unused_crate_dependencies))]

mod aggregator;
mod cache;
mod cancel;
mod clock;
mod config;
mod coordinator;
mod decode;
mod planner;
mod pool;
mod progress;
mod transport;
mod worker;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Public API
pub use aggregator::DatasetAggregator;
pub use cache::CacheLayout;
pub use cancel::CancellationController;
pub use clock::CycleClock;
pub use config::{
    AcquisitionConfig, DEFAULT_MAX_CYCLE_ATTEMPTS, DEFAULT_MAX_FETCH_ATTEMPTS,
    DEFAULT_POOL_CAPACITY, DEFAULT_REQUEST_TIMEOUT, DEFAULT_RETRY_DELAY,
};
pub use coordinator::DownloadCoordinator;
pub use decode::{FileSliceDecoder, GribFileSlice};
pub use planner::FileSetPlanner;
pub use pool::WorkerPool;
pub use progress::{ProgressReporter, ProgressSnapshot};
pub use transport::ReqwestTransport;
pub use worker::FetchWorker;
