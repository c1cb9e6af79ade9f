//! Configuration errors

use super::EdgeBundlerError;

/// Creates an invalid version range error
pub fn invalid_version_range(range: impl Into<String>, reason: impl ToString) -> EdgeBundlerError {
    EdgeBundlerError::InvalidVersionRange {
        range: range.into(),
        reason: reason.to_string(),
    }
}

/// Creates a configuration not found error
pub fn not_found(path: impl Into<String>) -> EdgeBundlerError {
    EdgeBundlerError::ConfigNotFound { path: path.into() }
}

/// Creates a configuration parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl ToString) -> EdgeBundlerError {
    EdgeBundlerError::ConfigParseFailed {
        path: path.into(),
        reason: reason.to_string(),
    }
}

/// Creates an invalid configuration error
pub fn invalid(message: impl Into<String>) -> EdgeBundlerError {
    EdgeBundlerError::ConfigInvalid {
        message: message.into(),
    }
}
