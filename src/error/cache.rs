//! Cache errors

use super::EdgeBundlerError;

/// Creates a cache operation failed error
pub fn operation_failed(message: impl Into<String>) -> EdgeBundlerError {
    EdgeBundlerError::CacheOperationFailed {
        message: message.into(),
    }
}
