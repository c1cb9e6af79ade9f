//! Nearest `package.json` lookup

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, manifest};

pub const PACKAGE_JSON: &str = "package.json";

/// Fields of a package manifest the resolver cares about
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageJsonContents {
    pub name: Option<String>,
    /// `"module"` or `"commonjs"`
    #[serde(rename = "type")]
    pub module_type: Option<String>,
}

impl PackageJsonContents {
    pub fn is_module(&self) -> bool {
        self.module_type.as_deref() == Some("module")
    }
}

#[derive(Debug, Clone)]
pub struct PackageJson {
    pub path: PathBuf,
    pub contents: PackageJsonContents,
}

/// Find the `package.json` closest to `start`, walking up the directory tree
///
/// Returns `Ok(None)` when no manifest exists. A manifest that exists but
/// cannot be read or parsed is an error.
pub fn find_closest_package_json(start: &Path) -> Result<Option<PackageJson>> {
    let start = dunce::canonicalize(start).unwrap_or_else(|_| start.to_path_buf());

    for dir in start.ancestors() {
        let candidate = dir.join(PACKAGE_JSON);
        if !candidate.is_file() {
            continue;
        }

        let raw = fs::read_to_string(&candidate)
            .map_err(|e| manifest::read_failed(candidate.display().to_string(), e))?;
        let contents: PackageJsonContents = serde_json::from_str(&raw)
            .map_err(|e| manifest::parse_failed(candidate.display().to_string(), e))?;

        return Ok(Some(PackageJson {
            path: candidate,
            contents,
        }));
    }

    Ok(None)
}
