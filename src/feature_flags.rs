//! Feature flags supplied by the caller
//!
//! Flags are an opaque mapping from name to boolean. Unknown names are kept
//! and simply never consulted. Every flag may also be given under its older
//! `zisi_` prefixed name; the plain name wins when both are set.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EdgeBundlerError, Result, config};

/// Treat every `.mjs` source as ESM
pub const FLAG_PURE_ESM_MJS: &str = "pure_esm_mjs";

/// Detect ESM from the nearest `package.json`
pub const FLAG_PURE_ESM: &str = "pure_esm";

/// Prefix of the older flag names
pub const LEGACY_FLAG_PREFIX: &str = "zisi_";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureFlags(BTreeMap<String, bool>);

impl FeatureFlags {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, enabled: bool) -> Self {
        self.set(name, enabled);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, enabled: bool) {
        self.0.insert(name.into(), enabled);
    }

    /// Whether `name`, or its legacy prefixed form, is set and true
    pub fn is_enabled(&self, name: &str) -> bool {
        self.0
            .get(name)
            .or_else(|| self.0.get(&format!("{LEGACY_FLAG_PREFIX}{name}")))
            .copied()
            .unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Overlay `other` on top of these flags
    pub fn merge(&mut self, other: &FeatureFlags) {
        self.0
            .extend(other.0.iter().map(|(name, enabled)| (name.clone(), *enabled)));
    }
}

impl FromIterator<(String, bool)> for FeatureFlags {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FromIterator<FlagAssignment> for FeatureFlags {
    fn from_iter<I: IntoIterator<Item = FlagAssignment>>(iter: I) -> Self {
        iter.into_iter()
            .map(|assignment| (assignment.name, assignment.enabled))
            .collect()
    }
}

/// A single `name` or `name=true|false` flag assignment, as given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagAssignment {
    pub name: String,
    pub enabled: bool,
}

impl FromStr for FlagAssignment {
    type Err = EdgeBundlerError;

    fn from_str(s: &str) -> Result<Self> {
        let (name, enabled) = match s.split_once('=') {
            Some((name, "true" | "1")) => (name, true),
            Some((name, "false" | "0")) => (name, false),
            Some((_, value)) => {
                return Err(config::invalid(format!(
                    "feature flag value must be true or false, got '{value}'"
                )));
            }
            None => (s, true),
        };

        let name = name.trim();
        if name.is_empty() {
            return Err(config::invalid("feature flag name is empty"));
        }

        Ok(Self {
            name: name.to_string(),
            enabled,
        })
    }
}
