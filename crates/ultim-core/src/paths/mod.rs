//! Path utilities for the forecast cache.
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - No interactive/terminal I/O - hosts handle user prompts separately

mod cache;
mod error;

pub use cache::{
    APP_DIR_NAME, CACHE_DIR_ENV, CacheRootResolution, CacheRootSource, default_cache_root,
    ensure_directory, resolve_cache_root,
};
pub use error::PathError;
