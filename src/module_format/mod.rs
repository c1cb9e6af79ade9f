//! Module system selection for function output
//!
//! Decides whether a function is emitted as ES modules or CommonJS. Rules are
//! evaluated top to bottom and the first one that matches wins:
//!
//! | # | Rule                   | Condition                                                     | Result                   |
//! |---|------------------------|---------------------------------------------------------------|--------------------------|
//! | 1 | `esm-by-extension`     | `pure_esm_mjs` flag and a `.mjs` source                       | ESM                      |
//! | 2 | `package-type-module`  | `pure_esm` flag, nearest `package.json` has `"type": "module"`, Node version supports ESM | ESM + the `package.json` |
//! | - | fallback               | anything else                                                 | CommonJS                 |
//!
//! Both flags are also accepted with a `zisi_` prefix.
//!
//! When rule 2 matches, the manifest is returned as an included file: it has
//! to ship with the function so the target runtime reads the same module type.

pub mod node_version;
pub mod package_json;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Result;
use crate::feature_flags::{FLAG_PURE_ESM, FLAG_PURE_ESM_MJS, FeatureFlags};

pub use node_version::{DEFAULT_NODE_VERSION, bundler_target, node_support, parse_node_version};
pub use package_json::{PackageJson, find_closest_package_json};

/// File extension of sources that are always ES modules under `pure_esm_mjs`
pub const MJS_EXTENSION: &str = ".mjs";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ModuleFormat {
    #[serde(rename = "esm")]
    Esm,
    #[serde(rename = "cjs")]
    CommonJs,
}

impl ModuleFormat {
    /// Extension of emitted files in this format
    pub fn extension(self) -> &'static str {
        match self {
            Self::Esm => MJS_EXTENSION,
            Self::CommonJs => ".js",
        }
    }
}

impl fmt::Display for ModuleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Esm => f.write_str("esm"),
            Self::CommonJs => f.write_str("cjs"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleFormatDecision {
    pub module_format: ModuleFormat,
    /// Files that must ship with the output for the decision to hold
    pub included_files: Vec<PathBuf>,
}

impl ModuleFormatDecision {
    fn esm(included_files: Vec<PathBuf>) -> Self {
        Self {
            module_format: ModuleFormat::Esm,
            included_files,
        }
    }

    fn commonjs() -> Self {
        Self {
            module_format: ModuleFormat::CommonJs,
            included_files: Vec::new(),
        }
    }
}

/// Inputs shared by every rule
#[derive(Debug, Clone, Copy)]
pub struct ModuleFormatInput<'a> {
    pub src_dir: &'a Path,
    pub feature_flags: &'a FeatureFlags,
    /// Source file extension including the dot, e.g. `.mjs`
    pub extension: &'a str,
    /// Node.js version declared for the function, if any
    pub declared_version: Option<&'a str>,
}

type Rule = fn(&ModuleFormatInput<'_>) -> Result<Option<ModuleFormatDecision>>;

const RULES: [(&str, Rule); 2] = [
    ("esm-by-extension", esm_by_extension),
    ("package-type-module", esm_from_package_type),
];

fn esm_by_extension(input: &ModuleFormatInput<'_>) -> Result<Option<ModuleFormatDecision>> {
    let matches = input.feature_flags.is_enabled(FLAG_PURE_ESM_MJS)
        && input.extension == MJS_EXTENSION;

    Ok(matches.then(|| ModuleFormatDecision::esm(Vec::new())))
}

fn esm_from_package_type(input: &ModuleFormatInput<'_>) -> Result<Option<ModuleFormatDecision>> {
    if !input.feature_flags.is_enabled(FLAG_PURE_ESM) {
        return Ok(None);
    }

    let Some(package_json) = find_closest_package_json(input.src_dir)? else {
        return Ok(None);
    };

    if package_json.contents.is_module() && node_support(input.declared_version).esm {
        return Ok(Some(ModuleFormatDecision::esm(vec![package_json.path])));
    }

    Ok(None)
}

/// Decide the module format for a function
pub fn decide(input: &ModuleFormatInput<'_>) -> Result<ModuleFormatDecision> {
    for (name, rule) in RULES {
        if let Some(decision) = rule(input)? {
            tracing::debug!(rule = name, format = %decision.module_format, "module format decided");
            return Ok(decision);
        }
    }

    Ok(ModuleFormatDecision::commonjs())
}

/// Decide the module format for a function in `src_dir`
pub fn get_module_format(
    src_dir: &Path,
    feature_flags: &FeatureFlags,
    extension: &str,
    declared_version: Option<&str>,
) -> Result<ModuleFormatDecision> {
    decide(&ModuleFormatInput {
        src_dir,
        feature_flags,
        extension,
        declared_version,
    })
}
