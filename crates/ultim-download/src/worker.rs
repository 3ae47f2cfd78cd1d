//! Single-file fetch with bounded retry.
//!
//! The worker owns exactly one cache path per call and touches no other
//! shared state. It never fails: every error is folded into the returned
//! `FetchOutcome` for the coordinator to account for.

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use ultim_core::{AcquisitionError, FetchOutcome, FetchSource, FetchSpec, HttpTransport};

use crate::config::AcquisitionConfig;

/// Downloads one `FetchSpec` into the cache.
#[derive(Clone)]
pub struct FetchWorker {
    transport: Arc<dyn HttpTransport>,
    max_attempts: u32,
    retry_delay: Duration,
}

impl std::fmt::Debug for FetchWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchWorker")
            .field("max_attempts", &self.max_attempts)
            .field("retry_delay", &self.retry_delay)
            .finish_non_exhaustive()
    }
}

impl FetchWorker {
    /// Create a worker with explicit retry settings.
    pub fn new(transport: Arc<dyn HttpTransport>, max_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            transport,
            max_attempts: max_attempts.max(1),
            retry_delay,
        }
    }

    /// Create a worker using the retry settings of `config`.
    pub fn from_config(transport: Arc<dyn HttpTransport>, config: &AcquisitionConfig) -> Self {
        Self::new(transport, config.max_fetch_attempts, config.retry_delay)
    }

    /// Fetch `spec`, short-circuiting on a cached file.
    ///
    /// Makes up to `max_attempts` requests with a fixed delay between them.
    /// After the last failure any partially written file is removed.
    pub async fn fetch(&self, spec: FetchSpec) -> FetchOutcome {
        if is_cached(&spec.local_path).await {
            tracing::debug!(
                cycle = %spec.cycle,
                lead_hour = spec.lead_hour,
                "Cache hit, skipping download"
            );
            return FetchOutcome::success(spec, FetchSource::CacheHit);
        }

        let mut last_error = None;
        for attempt in 1..=self.max_attempts {
            if attempt > 1 {
                tokio::time::sleep(self.retry_delay).await;
            }

            match self.attempt(&spec).await {
                Ok(bytes) => {
                    tracing::debug!(
                        cycle = %spec.cycle,
                        lead_hour = spec.lead_hour,
                        attempt,
                        bytes,
                        "Downloaded forecast file"
                    );
                    return FetchOutcome::success(spec, FetchSource::Downloaded { bytes, attempt });
                }
                Err(e) => {
                    tracing::debug!(
                        cycle = %spec.cycle,
                        lead_hour = spec.lead_hour,
                        attempt,
                        error = %e,
                        "Fetch attempt failed"
                    );
                    last_error = Some(e);
                }
            }
        }

        remove_partial(&spec.local_path).await;
        let error = last_error.unwrap_or_else(|| AcquisitionError::transport("no attempt was made"));
        FetchOutcome::failure(spec, error)
    }

    /// One request; on success the body is written verbatim to the cache path.
    async fn attempt(&self, spec: &FetchSpec) -> Result<u64, AcquisitionError> {
        let response = self
            .transport
            .get(&spec.remote_url)
            .await
            .map_err(|e| AcquisitionError::transport(e.to_string()))?;

        if !response.is_success() {
            return Err(AcquisitionError::http_status(
                response.status,
                &spec.remote_url,
            ));
        }
        if response.body.is_empty() {
            return Err(AcquisitionError::empty_body(&spec.remote_url));
        }

        tokio::fs::write(&spec.local_path, &response.body).await?;
        Ok(response.body.len() as u64)
    }
}

/// A regular file at the cache path counts as already fetched.
async fn is_cached(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|meta| meta.is_file())
}

async fn remove_partial(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => tracing::debug!(path = %path.display(), "Removed partial download"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "Failed to remove partial download"),
    }
}
