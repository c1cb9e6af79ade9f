//! Runtime binary cache
//!
//! Holds a downloaded runtime binary together with a marker recording its
//! version, so later builds can reuse it without probing or downloading.
//!
//! ## Cache Structure
//!
//! ```text
//! ~/.cache/edge-bundler/
//! └── deno-cli/
//!     ├── version.txt     recorded version, e.g. "1.20.3"
//!     └── deno            executable (deno.exe on Windows)
//! ```
//!
//! Stale binaries are never removed automatically. A cached binary whose
//! recorded version is outside the configured range is only reported as
//! unusable; the next successful download overwrites it.
//!
//! No lock is taken around the marker. Two build processes sharing a cache
//! directory can race a download, and a reader may see a partially written
//! marker.

pub mod paths;

use std::fs;
use std::path::{Path, PathBuf};

use semver::Version;
use walkdir::WalkDir;

use crate::error::{Result, cache, fs as fs_error};
use crate::version::{VersionRange, parse_version};

pub use paths::{VERSION_FILE, binary_name, cache_dir, runtime_cache_dir};

/// A cached runtime binary and the version recorded for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedRuntimeRecord {
    pub binary_path: PathBuf,
    pub recorded_version: Version,
}

/// Filesystem-backed store for the runtime binary
#[derive(Debug, Clone)]
pub struct BinaryCache {
    directory: PathBuf,
}

impl BinaryCache {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path the runtime binary is stored at inside the cache
    pub fn binary_path(&self) -> PathBuf {
        self.directory.join(binary_name())
    }

    fn version_file(&self) -> PathBuf {
        self.directory.join(VERSION_FILE)
    }

    /// Read the cached record
    ///
    /// A missing or unreadable marker, an unparseable version, or a marker
    /// without its binary are all cache misses, never errors.
    pub fn read(&self) -> Option<CachedRuntimeRecord> {
        let contents = fs::read_to_string(self.version_file()).ok()?;
        let recorded_version = parse_version(&contents)?;
        let binary_path = self.binary_path();

        if !binary_path.is_file() {
            tracing::debug!(
                path = %binary_path.display(),
                "version marker present but binary is missing"
            );
            return None;
        }

        Some(CachedRuntimeRecord {
            binary_path,
            recorded_version,
        })
    }

    /// Whether a cached record satisfies `range`
    pub fn is_usable(record: &CachedRuntimeRecord, range: &VersionRange) -> bool {
        range.satisfies(&record.recorded_version)
    }

    /// Persist the version marker, creating the cache directory if needed
    ///
    /// Only call this once a downloaded binary has been confirmed runnable.
    pub fn write(&self, version: &Version) -> Result<()> {
        fs::create_dir_all(&self.directory)
            .map_err(|e| fs_error::write_failed(&self.directory, e))?;

        let version_file = self.version_file();
        fs::write(&version_file, version.to_string())
            .map_err(|e| fs_error::write_failed(&version_file, e))
    }

    /// Remove the cache directory and everything in it
    pub fn clear(&self) -> Result<()> {
        if !self.directory.exists() {
            return Ok(());
        }

        fs::remove_dir_all(&self.directory).map_err(|e| {
            cache::operation_failed(format!(
                "Failed to remove {}: {e}",
                self.directory.display()
            ))
        })
    }

    /// Total size in bytes of the files in the cache directory
    pub fn size(&self) -> u64 {
        WalkDir::new(&self.directory)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| e.metadata().ok())
            .map(|m| m.len())
            .sum()
    }
}

/// Format a byte count as human-readable string
pub fn format_size(size: u64) -> String {
    let size_f = size as f64;
    if size_f < 1024.0 {
        format!("{size} B")
    } else if size_f < 1024.0 * 1024.0 {
        format!("{:.1} KB", size_f / 1024.0)
    } else if size_f < 1024.0 * 1024.0 * 1024.0 {
        format!("{:.1} MB", size_f / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", size_f / (1024.0 * 1024.0 * 1024.0))
    }
}
