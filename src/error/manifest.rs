//! Package manifest errors

use super::EdgeBundlerError;

/// Creates a manifest read failed error
pub fn read_failed(path: impl Into<String>, reason: impl ToString) -> EdgeBundlerError {
    EdgeBundlerError::ManifestReadFailed {
        path: path.into(),
        reason: reason.to_string(),
    }
}

/// Creates a manifest parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl ToString) -> EdgeBundlerError {
    EdgeBundlerError::ManifestParseFailed {
        path: path.into(),
        reason: reason.to_string(),
    }
}
