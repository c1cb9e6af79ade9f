//! Runtime version parsing and range checks
//!
//! Ranges follow compatible-release rules: `^1.17.2` accepts any version with
//! the same major version that is greater than or equal to `1.17.2`. A range
//! written as `=1.17.2` or a bare `1.17.2` accepts exactly that version.

use std::fmt;
use std::str::FromStr;

use semver::Version;

use crate::error::{EdgeBundlerError, Result, config};

/// Version range used when none is configured
pub const DEFAULT_VERSION_RANGE: &str = "^1.17.2";

/// Parse a dotted numeric version, ignoring pre-release and build metadata
///
/// Accepts an optional leading `v` and missing minor/patch components
/// (`1.17` is read as `1.17.0`). Returns `None` when the text does not start
/// with a number.
pub fn parse_version(text: &str) -> Option<Version> {
    let text = text.trim();
    let text = text.strip_prefix('v').unwrap_or(text);

    let numeric_end = text
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(text.len());
    let numeric = text[..numeric_end].trim_end_matches('.');

    if numeric.is_empty() {
        return None;
    }

    let mut parts = numeric.split('.');
    let mut next = || -> Option<u64> {
        match parts.next() {
            Some(part) => part.parse().ok(),
            None => Some(0),
        }
    };

    let major = next()?;
    let minor = next()?;
    let patch = next()?;

    Some(Version::new(major, minor, patch))
}

/// An immutable version constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionRange {
    /// Same major version, greater than or equal to the base
    Compatible(Version),
    /// Exactly this version
    Exact(Version),
}

impl VersionRange {
    /// Parse a range expression such as `^1.17.2`, `=1.17.2` or `1.17.2`
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();

        let (constructor, rest): (fn(Version) -> Self, &str) =
            if let Some(rest) = trimmed.strip_prefix('^') {
                (Self::Compatible, rest)
            } else if let Some(rest) = trimmed.strip_prefix('=') {
                (Self::Exact, rest)
            } else {
                (Self::Exact, trimmed)
            };

        let rest = rest.trim();
        if rest.is_empty() || !rest.starts_with(|c: char| c.is_ascii_digit() || c == 'v') {
            return Err(config::invalid_version_range(
                text,
                "expected a version after the operator",
            ));
        }

        parse_version(rest)
            .map(constructor)
            .ok_or_else(|| config::invalid_version_range(text, "not a dotted numeric version"))
    }

    /// Test whether `version` is inside this range
    pub fn satisfies(&self, version: &Version) -> bool {
        match self {
            Self::Compatible(base) => version.major == base.major && version >= base,
            Self::Exact(base) => version == base,
        }
    }

    /// Parse `text` tolerantly and test it against this range
    ///
    /// Unparseable text never satisfies a range.
    pub fn satisfies_str(&self, text: &str) -> bool {
        parse_version(text).is_some_and(|version| self.satisfies(&version))
    }

    /// Lowest version accepted by this range
    pub fn min_version(&self) -> &Version {
        match self {
            Self::Compatible(base) | Self::Exact(base) => base,
        }
    }
}

impl Default for VersionRange {
    fn default() -> Self {
        Self::Compatible(Version::new(1, 17, 2))
    }
}

impl FromStr for VersionRange {
    type Err = EdgeBundlerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compatible(base) => write!(f, "^{base}"),
            Self::Exact(base) => write!(f, "={base}"),
        }
    }
}
