//! Runtime binary discovery and execution
//!
//! The bridge resolves a runtime binary in three tiers, first success wins:
//!
//! 1. a global binary on `PATH`, when enabled and its live version query
//!    satisfies the configured range
//! 2. the cached binary, when its recorded version satisfies the range
//! 3. a fresh download into the cache directory
//!
//! Failures in the first two tiers are logged and fall through. Only a
//! failed download is reported to the caller.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use semver::Version;

use crate::cache::{BinaryCache, paths::RUNTIME_NAME, runtime_cache_dir};
use crate::download::{Downloader, ReleaseDownloader};
use crate::error::{Result, runtime};
use crate::process::{self, CommandOutput};
use crate::version::{VersionRange, parse_version};

/// Side effect run around a runtime download
pub type DownloadHook = Arc<dyn Fn() + Send + Sync>;

/// Configuration for a [`RuntimeBridge`]
#[derive(Clone)]
pub struct BridgeConfig {
    pub cache_directory: PathBuf,
    pub version_range: VersionRange,
    /// Whether a runtime found on `PATH` may be used
    pub use_global: bool,
    /// Name or path of the global runtime binary
    pub global_binary: PathBuf,
    /// Limit for every subprocess the bridge runs
    pub timeout: Option<Duration>,
    pub on_before_download: Option<DownloadHook>,
    pub on_after_download: Option<DownloadHook>,
}

impl BridgeConfig {
    pub fn new(cache_directory: impl Into<PathBuf>) -> Self {
        Self {
            cache_directory: cache_directory.into(),
            version_range: VersionRange::default(),
            use_global: true,
            global_binary: PathBuf::from(RUNTIME_NAME),
            timeout: None,
            on_before_download: None,
            on_after_download: None,
        }
    }

    /// Configuration using the default runtime cache directory
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(runtime_cache_dir()?))
    }

    #[must_use]
    pub fn with_version_range(mut self, range: VersionRange) -> Self {
        self.version_range = range;
        self
    }

    #[must_use]
    pub fn with_use_global(mut self, use_global: bool) -> Self {
        self.use_global = use_global;
        self
    }

    #[must_use]
    pub fn with_global_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.global_binary = binary.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn on_before_download(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_before_download = Some(Arc::new(hook));
        self
    }

    #[must_use]
    pub fn on_after_download(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_after_download = Some(Arc::new(hook));
        self
    }
}

impl fmt::Debug for BridgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeConfig")
            .field("cache_directory", &self.cache_directory)
            .field("version_range", &self.version_range)
            .field("use_global", &self.use_global)
            .field("global_binary", &self.global_binary)
            .field("timeout", &self.timeout)
            .field("on_before_download", &self.on_before_download.is_some())
            .field("on_after_download", &self.on_after_download.is_some())
            .finish()
    }
}

type Probe = fn(&RuntimeBridge) -> Option<PathBuf>;

/// Locates, caches and runs the runtime binary
pub struct RuntimeBridge {
    config: BridgeConfig,
    cache: BinaryCache,
    downloader: Box<dyn Downloader>,
}

impl RuntimeBridge {
    /// Tiers tried before falling back to a download, in order
    const PROBES: [(&'static str, Probe); 2] = [
        ("global", Self::global_binary),
        ("cached", Self::cached_binary),
    ];

    pub fn new(config: BridgeConfig) -> Self {
        Self::with_downloader(config, ReleaseDownloader::new())
    }

    pub fn with_downloader(config: BridgeConfig, downloader: impl Downloader + 'static) -> Self {
        let cache = BinaryCache::new(&config.cache_directory);
        Self {
            config,
            cache,
            downloader: Box::new(downloader),
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn cache(&self) -> &BinaryCache {
        &self.cache
    }

    /// Query the version a binary reports for `--version`
    ///
    /// Any failure (missing binary, non-zero exit, unexpected output) yields
    /// `None`.
    pub fn binary_version(&self, binary: &Path) -> Option<Version> {
        let output = match process::run(binary, &["--version"], self.config.timeout) {
            Ok(output) => output,
            Err(e) => {
                tracing::debug!(binary = %binary.display(), error = %e, "version query failed");
                return None;
            }
        };

        if !output.status.success() {
            tracing::debug!(
                binary = %binary.display(),
                status = %output.status,
                "version query exited unsuccessfully"
            );
            return None;
        }

        parse_version_output(&output.stdout)
    }

    fn global_binary(&self) -> Option<PathBuf> {
        if !self.config.use_global {
            return None;
        }

        let binary = &self.config.global_binary;
        let version = self.binary_version(binary)?;

        if !self.config.version_range.satisfies(&version) {
            tracing::debug!(
                %version,
                range = %self.config.version_range,
                "global runtime outside range"
            );
            return None;
        }

        Some(binary.clone())
    }

    fn cached_binary(&self) -> Option<PathBuf> {
        let record = self.cache.read()?;

        if !BinaryCache::is_usable(&record, &self.config.version_range) {
            tracing::debug!(
                version = %record.recorded_version,
                range = %self.config.version_range,
                "cached runtime outside range"
            );
            return None;
        }

        Some(record.binary_path)
    }

    fn remote_binary(&self) -> Result<PathBuf> {
        if let Some(hook) = &self.config.on_before_download {
            hook();
        }

        let binary_path = self
            .downloader
            .download(self.cache.directory(), &self.config.version_range)?;

        let version = self
            .binary_version(&binary_path)
            .ok_or_else(|| runtime::download_verification(binary_path.display().to_string()))?;

        self.cache.write(&version)?;

        if let Some(hook) = &self.config.on_after_download {
            hook();
        }

        tracing::info!(%version, path = %binary_path.display(), "runtime downloaded");
        Ok(binary_path)
    }

    /// Resolve a runtime binary whose version satisfies the configured range
    pub fn resolve_binary(&self) -> Result<PathBuf> {
        for (tier, probe) in Self::PROBES {
            if let Some(path) = probe(self) {
                tracing::debug!(tier, path = %path.display(), "using runtime binary");
                return Ok(path);
            }
            tracing::debug!(tier, "runtime tier unavailable");
        }

        self.remote_binary()
    }

    /// Resolve the binary and run it with `args`
    ///
    /// The binary is resolved again on every call. A non-zero exit is
    /// returned as an error carrying the captured output.
    pub fn execute<S: AsRef<OsStr>>(&self, args: &[S]) -> Result<CommandOutput> {
        let binary = self.resolve_binary()?;
        let command = process::describe(&binary, args);

        process::run(&binary, args, self.config.timeout)?.into_success(&command)
    }
}

/// Read the version from `--version` output such as `deno 1.20.3 (release, ...)`
fn parse_version_output(stdout: &str) -> Option<Version> {
    let rest = stdout
        .lines()
        .next()?
        .strip_prefix(RUNTIME_NAME)?
        .strip_prefix(' ')?;

    let end = rest
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(rest.len());

    parse_version(&rest[..end])
}
