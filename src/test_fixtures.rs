//! Test fixtures shared by unit tests.
//!
//! Fake runtimes are small shell scripts that answer `--version` like the
//! real binary and run an arbitrary script body for every other invocation,
//! so they only exist on Unix.

use std::path::PathBuf;

use tempfile::TempDir;

/// Create a temp directory in the system temp location.
///
/// Never uses a relative `TMPDIR`, so temp dirs are never created under the
/// current working directory.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    let base = std::env::temp_dir();
    let base = if base.is_absolute() {
        base
    } else {
        PathBuf::from("/tmp")
    };
    TempDir::new_in(base).expect("Failed to create temp directory")
}

#[cfg(unix)]
pub use self::unix::{FakeDownloader, write_fake_runtime};

#[cfg(unix)]
mod unix {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::cache::binary_name;
    use crate::download::Downloader;
    use crate::error::Result;
    use crate::version::VersionRange;

    /// Write an executable script at `dir/name` reporting `version`
    ///
    /// `body` runs for any invocation other than `--version`. An empty
    /// `version` produces a binary whose version query prints nothing.
    ///
    /// # Panics
    ///
    /// Panics if the script cannot be written.
    pub fn write_fake_runtime(dir: &Path, name: &str, version: &str, body: &str) -> PathBuf {
        fs::create_dir_all(dir).expect("Failed to create fake runtime directory");

        let version_line = if version.is_empty() {
            String::new()
        } else {
            format!("  echo \"deno {version} (release, x86_64-unknown-linux-gnu)\"\n")
        };
        let script = format!(
            "#!/bin/sh\nif [ \"$1\" = \"--version\" ]; then\n{version_line}  exit 0\nfi\n{body}\n"
        );

        // Write then rename so no writer is open when the script is executed
        let path = dir.join(name);
        let staging = dir.join(format!(".{name}.tmp"));
        fs::write(&staging, script).expect("Failed to write fake runtime");
        fs::set_permissions(&staging, fs::Permissions::from_mode(0o755))
            .expect("Failed to make fake runtime executable");
        fs::rename(&staging, &path).expect("Failed to move fake runtime into place");
        path
    }

    /// Downloader that installs a fake runtime and counts its calls
    #[derive(Debug, Clone)]
    pub struct FakeDownloader {
        version: String,
        calls: Arc<AtomicUsize>,
    }

    impl FakeDownloader {
        pub fn new(version: &str) -> Self {
            Self {
                version: version.to_string(),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        /// A downloader whose binary reports no version
        pub fn broken() -> Self {
            Self::new("")
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Downloader for FakeDownloader {
        fn download(&self, target_dir: &Path, _range: &VersionRange) -> Result<PathBuf> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(write_fake_runtime(
                target_dir,
                &binary_name(),
                &self.version,
                "exit 0",
            ))
        }
    }
}
