//! Configuration for an acquisition run.

use std::path::PathBuf;
use std::time::Duration;

use ultim_core::{FileSetProfile, PathError, Resolution, resolve_cache_root};

/// Most cycles tried before giving up (first candidate plus four fallbacks).
pub const DEFAULT_MAX_CYCLE_ATTEMPTS: u32 = 5;

/// Concurrent fetches during the fan-out phase.
pub const DEFAULT_POOL_CAPACITY: usize = 16;

/// Attempts per file before it is a terminal failure.
pub const DEFAULT_MAX_FETCH_ATTEMPTS: u32 = 3;

/// Fixed delay between failed attempts of the same file.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Per-request timeout applied by the HTTP transport.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration for the acquisition engine.
///
/// Use the builder methods to customize the defaults.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use ultim_core::Resolution;
/// use ultim_download::AcquisitionConfig;
///
/// let config = AcquisitionConfig::new("/tmp/gribs")
///     .with_resolution(Resolution::Quarter)
///     .with_pool_capacity(8)
///     .with_retry_delay(Duration::from_millis(250));
/// ```
#[derive(Debug, Clone)]
pub struct AcquisitionConfig {
    /// Root directory holding one subdirectory per cycle.
    pub(crate) cache_root: PathBuf,
    /// Which lead times to fetch and from where.
    pub(crate) profile: FileSetProfile,
    /// Cycles tried before the run is exhausted.
    pub(crate) max_cycle_attempts: u32,
    /// Concurrent fetches in the fan-out phase.
    pub(crate) pool_capacity: usize,
    /// Attempts per file.
    pub(crate) max_fetch_attempts: u32,
    /// Fixed delay between attempts.
    pub(crate) retry_delay: Duration,
    /// Per-request timeout.
    pub(crate) request_timeout: Duration,
    /// User agent sent with archive requests.
    pub(crate) user_agent: String,
    /// Remove other cycle directories after a successful run.
    pub(crate) evict_stale_cycles: bool,
}

impl AcquisitionConfig {
    /// Create a configuration caching under `cache_root`.
    pub fn new(cache_root: impl Into<PathBuf>) -> Self {
        Self {
            cache_root: cache_root.into(),
            profile: FileSetProfile::for_resolution(Resolution::default()),
            max_cycle_attempts: DEFAULT_MAX_CYCLE_ATTEMPTS,
            pool_capacity: DEFAULT_POOL_CAPACITY,
            max_fetch_attempts: DEFAULT_MAX_FETCH_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: concat!("ultim-download/", env!("CARGO_PKG_VERSION")).to_string(),
            evict_stale_cycles: false,
        }
    }

    /// Create a configuration using the resolved cache root
    /// (`ULTIM_CACHE_DIR` or the platform data directory).
    pub fn from_env() -> Result<Self, PathError> {
        let resolved = resolve_cache_root(None)?;
        tracing::debug!(
            path = %resolved.path.display(),
            source = ?resolved.source,
            "Resolved forecast cache root"
        );
        Ok(Self::new(resolved.path))
    }

    /// Use the built-in profile for `resolution`.
    #[must_use]
    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.profile = FileSetProfile::for_resolution(resolution);
        self
    }

    /// Use a custom profile.
    #[must_use]
    pub fn with_profile(mut self, profile: FileSetProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Set how many cycles are tried before giving up (at least 1).
    #[must_use]
    pub fn with_max_cycle_attempts(mut self, attempts: u32) -> Self {
        self.max_cycle_attempts = attempts.max(1);
        self
    }

    /// Set the fan-out concurrency (at least 1).
    #[must_use]
    pub fn with_pool_capacity(mut self, capacity: usize) -> Self {
        self.pool_capacity = capacity.max(1);
        self
    }

    /// Set attempts per file (at least 1).
    #[must_use]
    pub fn with_max_fetch_attempts(mut self, attempts: u32) -> Self {
        self.max_fetch_attempts = attempts.max(1);
        self
    }

    /// Set the fixed delay between attempts.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Enable deletion of other cycle directories after a successful run.
    #[must_use]
    pub const fn with_stale_cycle_eviction(mut self, evict: bool) -> Self {
        self.evict_stale_cycles = evict;
        self
    }

    /// Cache root.
    pub fn cache_root(&self) -> &std::path::Path {
        &self.cache_root
    }

    /// Active profile.
    pub const fn profile(&self) -> &FileSetProfile {
        &self.profile
    }

    /// Cycles tried before giving up.
    pub const fn max_cycle_attempts(&self) -> u32 {
        self.max_cycle_attempts
    }

    /// Fan-out concurrency.
    pub const fn pool_capacity(&self) -> usize {
        self.pool_capacity
    }

    /// Per-request timeout.
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// User agent string.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}
