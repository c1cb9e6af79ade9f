//! Bundling errors

use super::EdgeBundlerError;
use crate::bundler::BundleFormat;

const NPM_IMPORT_HINT: &str = "npm: specifiers are not supported by the bundler. \
     Import the module from a URL such as https://esm.sh/<package> instead";

/// Wraps a failure that happened while producing a bundle of `format`
///
/// The original error is kept as the source. When the captured output points
/// at an `npm:` import, a hint is attached.
pub fn failed(format: BundleFormat, cause: EdgeBundlerError) -> EdgeBundlerError {
    let help = cause
        .stderr()
        .filter(|stderr| stderr.contains("npm:"))
        .map(|_| NPM_IMPORT_HINT.to_string());

    EdgeBundlerError::BundleFailed {
        format,
        source: Box::new(cause),
        help,
    }
}

/// Creates an invalid import map error
pub fn invalid_import_map(path: impl Into<String>, reason: impl ToString) -> EdgeBundlerError {
    EdgeBundlerError::ImportMapInvalid {
        path: path.into(),
        reason: reason.to_string(),
    }
}
