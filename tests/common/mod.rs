//! Common test utilities for edge bundler integration tests

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// A project directory for integration tests
pub struct TestWorkspace {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to workspace root
    pub path: PathBuf,
}

impl TestWorkspace {
    /// Create a new test workspace
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Write a file in workspace
    #[allow(dead_code)]
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from workspace
    #[allow(dead_code)]
    pub fn read_file(&self, path: &str) -> String {
        let file_path = self.path.join(path);
        std::fs::read_to_string(&file_path).expect("Failed to read file")
    }

    /// Check if a file exists in workspace
    #[allow(dead_code)]
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Runtime cache directory private to this workspace
    pub fn cache_dir(&self) -> PathBuf {
        self.path.join(".cache")
    }

    /// Command running the edge-bundler binary inside this workspace
    ///
    /// The cache root points into the workspace and ambient configuration
    /// from the environment is removed.
    pub fn cmd(&self) -> Command {
        let mut cmd = edge_bundler_cmd();
        cmd.current_dir(&self.path)
            .env("EDGE_BUNDLER_CACHE_DIR", self.cache_dir())
            .env_remove("EDGE_BUNDLER_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

// Temporary fix for deprecated cargo_bin - will be updated when build-dir issues are resolved
#[allow(deprecated)]
pub fn edge_bundler_cmd() -> Command {
    Command::cargo_bin("edge-bundler").expect("edge-bundler binary should be built")
}

/// Write an executable fake runtime at `dir/deno`
///
/// It answers `--version` with `version` and runs `body` for anything else.
#[cfg(unix)]
#[allow(dead_code)]
pub fn write_fake_runtime(dir: &Path, version: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    std::fs::create_dir_all(dir).expect("Failed to create runtime directory");
    let script = format!(
        "#!/bin/sh\nif [ \"$1\" = \"--version\" ]; then\n  echo \"deno {version} (release, x86_64-unknown-linux-gnu)\"\n  exit 0\nfi\n{body}\n"
    );

    let path = dir.join("deno");
    let staging = dir.join(".deno.tmp");
    std::fs::write(&staging, script).expect("Failed to write fake runtime");
    std::fs::set_permissions(&staging, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to make fake runtime executable");
    std::fs::rename(&staging, &path).expect("Failed to move fake runtime into place");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_file_operations() {
        let workspace = TestWorkspace::new();
        workspace.write_file("test/file.txt", "hello");
        assert!(workspace.file_exists("test/file.txt"));
        assert_eq!(workspace.read_file("test/file.txt"), "hello");
    }
}
