//! Cache root resolution.
//!
//! The cache root holds one directory per downloaded cycle. It is resolved
//! from an explicit path, the `ULTIM_CACHE_DIR` environment variable, or the
//! platform data directory.

use std::env;
use std::path::{Path, PathBuf};

use super::error::PathError;

/// Environment variable overriding the cache root.
pub const CACHE_DIR_ENV: &str = "ULTIM_CACHE_DIR";

/// Directory name under the platform data directory.
pub const APP_DIR_NAME: &str = "ultimrouter";

/// How the cache root was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheRootSource {
    /// The caller passed an explicit path.
    Explicit,
    /// The path came from `ULTIM_CACHE_DIR`.
    EnvVar,
    /// Platform data directory fallback.
    Default,
}

/// Resolution result for the cache root.
#[derive(Debug, Clone)]
pub struct CacheRootResolution {
    /// The resolved cache root.
    pub path: PathBuf,
    /// How the path was determined.
    pub source: CacheRootSource,
}

/// Return the platform default cache root (e.g. `~/.local/share/ultimrouter`).
pub fn default_cache_root() -> Result<PathBuf, PathError> {
    let data = dirs::data_dir().ok_or(PathError::NoDataDir)?;
    Ok(data.join(APP_DIR_NAME))
}

/// Resolve the cache root.
///
/// Resolution order:
/// 1. Explicit path provided by caller (highest priority)
/// 2. `ULTIM_CACHE_DIR` environment variable
/// 3. Platform data directory
pub fn resolve_cache_root(explicit: Option<&Path>) -> Result<CacheRootResolution, PathError> {
    if let Some(path) = explicit {
        if path.as_os_str().is_empty() {
            return Err(PathError::EmptyPath);
        }
        return Ok(CacheRootResolution {
            path: path.to_path_buf(),
            source: CacheRootSource::Explicit,
        });
    }

    if let Ok(env_path) = env::var(CACHE_DIR_ENV) {
        if !env_path.trim().is_empty() {
            return Ok(CacheRootResolution {
                path: PathBuf::from(env_path.trim()),
                source: CacheRootSource::EnvVar,
            });
        }
    }

    Ok(CacheRootResolution {
        path: default_cache_root()?,
        source: CacheRootSource::Default,
    })
}

/// Create `path` (and parents) if missing; fail if it exists as a file.
pub async fn ensure_directory(path: &Path) -> Result<(), PathError> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => return Ok(()),
        Ok(_) => return Err(PathError::NotADirectory(path.to_path_buf())),
        Err(_) => {}
    }

    tokio::fs::create_dir_all(path)
        .await
        .map_err(|e| PathError::CreateFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    tracing::debug!(path = %path.display(), "Created cache directory");
    Ok(())
}
