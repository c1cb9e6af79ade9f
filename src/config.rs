//! Settings file (edge-bundler.yaml) handling
//!
//! Every field is optional. Values given on the command line are layered on
//! top with [`Settings::merge`], then [`Settings::bridge_config`] turns the
//! result into a runtime configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::bridge::BridgeConfig;
use crate::bundler::BundlerPaths;
use crate::cache::runtime_cache_dir;
use crate::error::{Result, config};
use crate::feature_flags::FeatureFlags;
use crate::version::VersionRange;

/// Settings file looked up in the working directory
pub const SETTINGS_FILE: &str = "edge-bundler.yaml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Accepted runtime versions, e.g. `^1.17.2`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_range: Option<String>,

    /// Directory the runtime binary is cached in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_global: Option<bool>,

    /// Directory holding `bundle.ts` and `vendor/import_map.json`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundler_dir: Option<PathBuf>,

    /// Limit for each runtime invocation, in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,

    #[serde(skip_serializing_if = "FeatureFlags::is_empty")]
    pub feature_flags: FeatureFlags,
}

impl Settings {
    /// Parse settings from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let settings: Self = serde_yaml::from_str(yaml)?;
        Ok(settings)
    }

    /// Serialize settings to a YAML string
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Load settings from `path`
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(config::not_found(path.display().to_string()));
        }

        let yaml = fs::read_to_string(path)
            .map_err(|e| config::parse_failed(path.display().to_string(), e))?;
        let settings: Self = serde_yaml::from_str(&yaml)
            .map_err(|e| config::parse_failed(path.display().to_string(), e))?;

        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Load the settings for a run
    ///
    /// An explicit path must exist. Without one, [`SETTINGS_FILE`] in `dir`
    /// is used when present and defaults otherwise.
    pub fn discover(dir: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let default_path = dir.join(SETTINGS_FILE);
        if default_path.is_file() {
            Self::load(&default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Overlay `overrides` on these settings; set fields in `overrides` win
    #[must_use]
    pub fn merge(mut self, overrides: Settings) -> Self {
        self.version_range = overrides.version_range.or(self.version_range);
        self.cache_dir = overrides.cache_dir.or(self.cache_dir);
        self.use_global = overrides.use_global.or(self.use_global);
        self.bundler_dir = overrides.bundler_dir.or(self.bundler_dir);
        self.timeout_secs = overrides.timeout_secs.or(self.timeout_secs);
        self.debug = overrides.debug.or(self.debug);
        self.feature_flags.merge(&overrides.feature_flags);
        self
    }

    pub fn version_range(&self) -> Result<VersionRange> {
        self.version_range
            .as_deref()
            .map_or_else(|| Ok(VersionRange::default()), VersionRange::parse)
    }

    pub fn timeout(&self) -> Result<Option<Duration>> {
        match self.timeout_secs {
            Some(0) => Err(config::invalid("timeout_secs must be greater than zero")),
            Some(secs) => Ok(Some(Duration::from_secs(secs))),
            None => Ok(None),
        }
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        match &self.cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => runtime_cache_dir(),
        }
    }

    pub fn bundler_paths(&self) -> BundlerPaths {
        self.bundler_dir
            .as_ref()
            .map(BundlerPaths::new)
            .unwrap_or_default()
    }

    pub fn debug(&self) -> bool {
        self.debug.unwrap_or(false)
    }

    /// Runtime configuration described by these settings
    pub fn bridge_config(&self) -> Result<BridgeConfig> {
        Ok(BridgeConfig::new(self.cache_dir()?)
            .with_version_range(self.version_range()?)
            .with_use_global(self.use_global.unwrap_or(true))
            .with_timeout(self.timeout()?))
    }
}
