//! Cache path utilities and constants

use std::path::PathBuf;

use crate::error::{Result, cache};

/// Default cache directory name under user's cache directory
const CACHE_DIR: &str = "edge-bundler";

/// Subdirectory holding the downloaded runtime
pub const RUNTIME_DIR: &str = "deno-cli";

/// Marker file recording the version of the cached binary
pub const VERSION_FILE: &str = "version.txt";

/// Environment variable overriding the cache root
pub const CACHE_DIR_ENV: &str = "EDGE_BUNDLER_CACHE_DIR";

/// Name of the runtime executable
pub const RUNTIME_NAME: &str = "deno";

/// Get the default cache directory path
///
/// Uses the platform's standard cache location (e.g. XDG on Linux, Library/Caches on macOS)
/// with an `edge-bundler` subdirectory. Can be overridden with the `EDGE_BUNDLER_CACHE_DIR`
/// environment variable.
pub fn cache_dir() -> Result<PathBuf> {
    if let Ok(cache_dir) = std::env::var(CACHE_DIR_ENV) {
        return Ok(PathBuf::from(cache_dir));
    }

    let base = dirs::cache_dir()
        .ok_or_else(|| cache::operation_failed("Could not determine cache directory"))?;

    Ok(base.join(CACHE_DIR))
}

/// Get the directory the runtime binary is cached in
pub fn runtime_cache_dir() -> Result<PathBuf> {
    Ok(cache_dir()?.join(RUNTIME_DIR))
}

/// Platform-specific file name of the runtime executable
pub fn binary_name() -> String {
    format!("{RUNTIME_NAME}{}", std::env::consts::EXE_SUFFIX)
}
