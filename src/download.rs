//! Runtime release download
//!
//! Fetches the runtime release archive for the host target and extracts the
//! executable into the cache directory.

use std::fs;
use std::io::{self, Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use std::time::Duration;

use semver::Version;
use tempfile::NamedTempFile;

use crate::cache::binary_name;
use crate::error::{Result, fs as fs_error, runtime};
use crate::version::{VersionRange, parse_version};

/// Default host serving runtime releases
pub const DEFAULT_RELEASE_URL: &str = "https://dl.deno.land";

const LATEST_VERSION_PATH: &str = "release-latest.txt";

const HTTP_TIMEOUT: Duration = Duration::from_secs(300);

/// Fetches a runtime binary into a directory
pub trait Downloader {
    /// Download a binary satisfying `range` into `target_dir` and return its path
    fn download(&self, target_dir: &Path, range: &VersionRange) -> Result<PathBuf>;
}

/// Downloads official release archives over HTTPS
#[derive(Debug, Clone)]
pub struct ReleaseDownloader {
    agent: ureq::Agent,
    base_url: String,
}

impl ReleaseDownloader {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_RELEASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(HTTP_TIMEOUT).build(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn latest_version(&self) -> Result<Version> {
        let url = format!("{}/{LATEST_VERSION_PATH}", self.base_url);
        let body = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| runtime::download_failed(&url, e))?
            .into_string()
            .map_err(|e| runtime::download_failed(&url, e))?;

        parse_version(&body).ok_or_else(|| {
            runtime::download_failed(&url, format!("unexpected response '{}'", body.trim()))
        })
    }

    /// Pick the version to download: the latest release when it is inside
    /// `range`, otherwise the lowest version the range accepts
    pub fn version_for_range(&self, range: &VersionRange) -> Version {
        match self.latest_version() {
            Ok(latest) if range.satisfies(&latest) => latest,
            Ok(latest) => {
                tracing::debug!(%latest, %range, "latest release is outside range");
                range.min_version().clone()
            }
            Err(e) => {
                tracing::debug!(error = %e, "could not determine latest release");
                range.min_version().clone()
            }
        }
    }

    fn release_url(&self, version: &Version, target: &str) -> String {
        format!("{}/release/v{version}/deno-{target}.zip", self.base_url)
    }
}

impl Default for ReleaseDownloader {
    fn default() -> Self {
        Self::new()
    }
}

impl Downloader for ReleaseDownloader {
    fn download(&self, target_dir: &Path, range: &VersionRange) -> Result<PathBuf> {
        let target = target_triple()?;
        let version = self.version_for_range(range);
        let url = self.release_url(&version, target);

        tracing::info!(%version, %url, "downloading runtime");

        let mut archive = Vec::new();
        self.agent
            .get(&url)
            .call()
            .map_err(|e| runtime::download_failed(&url, e))?
            .into_reader()
            .read_to_end(&mut archive)
            .map_err(|e| runtime::download_failed(&url, e))?;

        extract_binary(Cursor::new(archive), target_dir)
    }
}

/// Release target triple for the host
pub fn target_triple() -> Result<&'static str> {
    match (std::env::consts::OS, std::env::consts::ARCH) {
        ("linux", "x86_64") => Ok("x86_64-unknown-linux-gnu"),
        ("linux", "aarch64") => Ok("aarch64-unknown-linux-gnu"),
        ("macos", "x86_64") => Ok("x86_64-apple-darwin"),
        ("macos", "aarch64") => Ok("aarch64-apple-darwin"),
        ("windows", "x86_64") => Ok("x86_64-pc-windows-msvc"),
        _ => Err(runtime::unsupported_platform()),
    }
}

/// Extract the runtime executable from a release archive into `target_dir`
///
/// The binary is written to a temporary file first and renamed into place,
/// so an interrupted extraction never leaves a truncated executable behind.
pub fn extract_binary<R: Read + Seek>(archive: R, target_dir: &Path) -> Result<PathBuf> {
    let name = binary_name();
    let mut archive = zip::ZipArchive::new(archive)
        .map_err(|e| runtime::download_failed(&name, format!("invalid archive: {e}")))?;
    let mut entry = archive
        .by_name(&name)
        .map_err(|e| runtime::download_failed(&name, format!("archive has no {name}: {e}")))?;

    fs::create_dir_all(target_dir).map_err(|e| fs_error::write_failed(target_dir, e))?;

    let binary_path = target_dir.join(&name);
    let mut temp =
        NamedTempFile::new_in(target_dir).map_err(|e| fs_error::write_failed(target_dir, e))?;
    io::copy(&mut entry, &mut temp).map_err(|e| fs_error::write_failed(temp.path(), e))?;

    set_executable(temp.path())?;

    temp.persist(&binary_path)
        .map_err(|e| fs_error::write_failed(&binary_path, e.error))?;

    Ok(binary_path)
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .map_err(|e| fs_error::write_failed(path, e))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::create_temp_dir;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn archive_with(entries: &[(&str, &[u8])]) -> Cursor<Vec<u8>> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, contents) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(contents).unwrap();
        }
        let mut cursor = writer.finish().unwrap();
        cursor.set_position(0);
        cursor
    }

    #[test]
    fn test_extract_binary() {
        let temp = create_temp_dir();
        let name = binary_name();
        let archive = archive_with(&[(name.as_str(), b"#!/bin/sh\necho hi\n")]);

        let path = extract_binary(archive, &temp.path().join("deno-cli")).unwrap();

        assert_eq!(path, temp.path().join("deno-cli").join(&name));
        assert_eq!(fs::read(&path).unwrap(), b"#!/bin/sh\necho hi\n");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o755);
        }
    }

    #[test]
    fn test_extract_binary_missing_entry() {
        let temp = create_temp_dir();
        let archive = archive_with(&[("README.md", b"hello")]);

        let err = extract_binary(archive, temp.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to download runtime"));
        // Nothing left behind
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_extract_binary_not_an_archive() {
        let temp = create_temp_dir();
        let result = extract_binary(Cursor::new(b"not a zip".to_vec()), temp.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_release_url() {
        let downloader = ReleaseDownloader::with_base_url("https://example.test/");
        assert_eq!(
            downloader.release_url(&Version::new(1, 20, 3), "x86_64-unknown-linux-gnu"),
            "https://example.test/release/v1.20.3/deno-x86_64-unknown-linux-gnu.zip"
        );
    }

    #[test]
    fn test_version_for_range_falls_back_to_minimum() {
        // Nothing listens on this port, so the latest-version lookup fails
        let downloader = ReleaseDownloader::with_base_url("http://127.0.0.1:9");
        let range = VersionRange::parse("^1.17.2").unwrap();
        assert_eq!(downloader.version_for_range(&range), Version::new(1, 17, 2));
    }

    #[test]
    fn test_target_triple_for_host() {
        if cfg!(all(target_os = "linux", target_arch = "x86_64")) {
            assert_eq!(target_triple().unwrap(), "x86_64-unknown-linux-gnu");
        }
    }
}
