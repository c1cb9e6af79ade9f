//! File system errors

use std::path::Path;

use super::EdgeBundlerError;

/// Creates a file not found error
pub fn not_found(path: impl AsRef<Path>) -> EdgeBundlerError {
    EdgeBundlerError::FileNotFound {
        path: path.as_ref().display().to_string(),
    }
}

/// Creates a file read failed error
pub fn read_failed(path: impl AsRef<Path>, reason: impl ToString) -> EdgeBundlerError {
    EdgeBundlerError::FileReadFailed {
        path: path.as_ref().display().to_string(),
        reason: reason.to_string(),
    }
}

/// Creates a file write failed error
pub fn write_failed(path: impl AsRef<Path>, reason: impl ToString) -> EdgeBundlerError {
    EdgeBundlerError::FileWriteFailed {
        path: path.as_ref().display().to_string(),
        reason: reason.to_string(),
    }
}

/// Creates an IO error
pub fn io_error(message: impl Into<String>) -> EdgeBundlerError {
    EdgeBundlerError::IoError {
        message: message.into(),
    }
}
