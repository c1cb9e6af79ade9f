//! Error types and handling for the edge bundler
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Constructor helpers are grouped by the stage that raises them:
//! - [`runtime`]: Runtime acquisition and subprocess errors
//! - [`bundle`]: Bundling errors
//! - [`manifest`]: Package manifest errors
//! - [`config`]: Configuration errors
//! - [`fs`]: File system errors
//! - [`cache`]: Cache errors

pub mod bundle;
pub mod cache;
pub mod config;
pub mod fs;
pub mod manifest;
pub mod runtime;

use miette::Diagnostic;
use thiserror::Error;

use crate::bundler::BundleFormat;

/// Main error type for edge bundler operations
#[derive(Error, Diagnostic, Debug)]
pub enum EdgeBundlerError {
    // Runtime acquisition errors
    #[error("Could not read downloaded binary at {path}")]
    #[diagnostic(
        code(edge_bundler::runtime::download_verification),
        help(
            "The downloaded runtime did not report a version. Run 'edge-bundler cache clear' and try again"
        )
    )]
    DownloadVerification { path: String },

    #[error("Failed to download runtime from {url}: {reason}")]
    #[diagnostic(
        code(edge_bundler::runtime::download_failed),
        help("Check your network connection, or install the runtime globally")
    )]
    DownloadFailed { url: String, reason: String },

    #[error("No runtime release available for {os}/{arch}")]
    #[diagnostic(
        code(edge_bundler::runtime::unsupported_platform),
        help("Install the runtime manually and make sure it is on your PATH")
    )]
    UnsupportedPlatform { os: String, arch: String },

    #[error("Failed to start '{command}': {reason}")]
    #[diagnostic(code(edge_bundler::runtime::spawn_failed))]
    RuntimeSpawnFailed { command: String, reason: String },

    #[error("Command '{command}' failed with {status}: {stderr}")]
    #[diagnostic(code(edge_bundler::runtime::command_failed))]
    RuntimeCommandFailed {
        command: String,
        status: String,
        stdout: String,
        stderr: String,
    },

    #[error("Command '{command}' timed out after {seconds}s")]
    #[diagnostic(code(edge_bundler::runtime::timed_out))]
    RuntimeCommandTimedOut { command: String, seconds: u64 },

    // Bundling errors
    #[error("Could not create {format} bundle")]
    #[diagnostic(code(edge_bundler::bundle::failed))]
    BundleFailed {
        format: BundleFormat,
        #[source]
        source: Box<EdgeBundlerError>,
        #[help]
        help: Option<String>,
    },

    #[error("Invalid import map {path}: {reason}")]
    #[diagnostic(code(edge_bundler::bundle::invalid_import_map))]
    ImportMapInvalid { path: String, reason: String },

    // Manifest errors
    #[error("Failed to read package manifest {path}: {reason}")]
    #[diagnostic(
        code(edge_bundler::manifest::read_failed),
        help("Check the permissions of the file")
    )]
    ManifestReadFailed { path: String, reason: String },

    #[error("Failed to parse package manifest {path}: {reason}")]
    #[diagnostic(code(edge_bundler::manifest::parse_failed))]
    ManifestParseFailed { path: String, reason: String },

    // Configuration errors
    #[error("Invalid version range '{range}': {reason}")]
    #[diagnostic(
        code(edge_bundler::config::invalid_version_range),
        help("Use a caret range such as ^1.17.2 or an exact version such as 1.17.2")
    )]
    InvalidVersionRange { range: String, reason: String },

    #[error("Configuration file not found: {path}")]
    #[diagnostic(code(edge_bundler::config::not_found))]
    ConfigNotFound { path: String },

    #[error("Failed to parse configuration file: {path}")]
    #[diagnostic(code(edge_bundler::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(edge_bundler::config::invalid))]
    ConfigInvalid { message: String },

    // File system errors
    #[error("File not found: {path}")]
    #[diagnostic(code(edge_bundler::fs::not_found))]
    FileNotFound { path: String },

    #[error("Failed to read file: {path}")]
    #[diagnostic(code(edge_bundler::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}")]
    #[diagnostic(code(edge_bundler::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(edge_bundler::fs::io_error))]
    IoError { message: String },

    // Cache errors
    #[error("Cache operation failed: {message}")]
    #[diagnostic(code(edge_bundler::cache::operation_failed))]
    CacheOperationFailed { message: String },
}

impl EdgeBundlerError {
    /// Captured standard error of a failed subprocess, if this error carries one
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::RuntimeCommandFailed { stderr, .. } => Some(stderr),
            Self::BundleFailed { source, .. } => source.stderr(),
            _ => None,
        }
    }
}

impl From<std::io::Error> for EdgeBundlerError {
    fn from(err: std::io::Error) -> Self {
        EdgeBundlerError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for EdgeBundlerError {
    fn from(err: serde_yaml::Error) -> Self {
        EdgeBundlerError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for EdgeBundlerError {
    fn from(err: serde_json::Error) -> Self {
        EdgeBundlerError::IoError {
            message: format!("JSON serialization failed: {err}"),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, EdgeBundlerError>;
