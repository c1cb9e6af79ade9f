//! Runtime acquisition and subprocess errors

use super::EdgeBundlerError;

/// Creates an error for a downloaded binary that reports no version
pub fn download_verification(path: impl Into<String>) -> EdgeBundlerError {
    EdgeBundlerError::DownloadVerification { path: path.into() }
}

/// Creates a download failed error
pub fn download_failed(url: impl Into<String>, reason: impl ToString) -> EdgeBundlerError {
    EdgeBundlerError::DownloadFailed {
        url: url.into(),
        reason: reason.to_string(),
    }
}

/// Creates an unsupported platform error for the host
pub fn unsupported_platform() -> EdgeBundlerError {
    EdgeBundlerError::UnsupportedPlatform {
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
    }
}

/// Creates an error for a subprocess that could not be started
pub fn spawn_failed(command: impl Into<String>, reason: impl ToString) -> EdgeBundlerError {
    EdgeBundlerError::RuntimeSpawnFailed {
        command: command.into(),
        reason: reason.to_string(),
    }
}

/// Creates an error for a subprocess that exited unsuccessfully
pub fn command_failed(
    command: impl Into<String>,
    status: impl Into<String>,
    stdout: impl Into<String>,
    stderr: impl Into<String>,
) -> EdgeBundlerError {
    EdgeBundlerError::RuntimeCommandFailed {
        command: command.into(),
        status: status.into(),
        stdout: stdout.into(),
        stderr: stderr.into(),
    }
}

/// Creates an error for a subprocess killed after exceeding its timeout
pub fn timed_out(command: impl Into<String>, seconds: u64) -> EdgeBundlerError {
    EdgeBundlerError::RuntimeCommandTimedOut {
        command: command.into(),
        seconds,
    }
}
