//! ESZIP bundle production
//!
//! Bundling is delegated to a bundler program run by the runtime. This module
//! prepares its inputs (the user import map and a JSON payload), runs it
//! through the [`RuntimeBridge`] and fingerprints the file it writes.

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::bridge::RuntimeBridge;
use crate::error::{Result, bundle as bundle_error, fs as fs_error};
use crate::functions::EdgeFunction;
use crate::hash::{hash_file, verify_hash};
use crate::import_map::{IMPORT_MAP_FILE, ImportMap, virtual_url};

/// Bundler directory used when none is configured
pub const DEFAULT_BUNDLER_DIR: &str = "deno";

/// Bundler entry point inside the bundler directory
pub const BUNDLER_PROGRAM: &str = "bundle.ts";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BundleFormat {
    #[serde(rename = "eszip2")]
    Eszip2,
}

impl BundleFormat {
    /// Extension of bundle files in this format
    pub fn extension(self) -> &'static str {
        match self {
            Self::Eszip2 => ".eszip",
        }
    }
}

impl fmt::Display for BundleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eszip2 => f.write_str("eszip2"),
        }
    }
}

/// Descriptor of a produced bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub extension: String,
    pub format: BundleFormat,
    /// Content hash of the bundle file
    pub hash: String,
    #[serde(rename = "importMapURL")]
    pub import_map_url: String,
}

/// Location of the bundler program and its own import map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundlerPaths {
    dir: PathBuf,
}

impl BundlerPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn program(&self) -> PathBuf {
        self.dir.join(BUNDLER_PROGRAM)
    }

    pub fn import_map(&self) -> PathBuf {
        self.dir.join("vendor").join(IMPORT_MAP_FILE)
    }
}

impl Default for BundlerPaths {
    fn default() -> Self {
        Self::new(DEFAULT_BUNDLER_DIR)
    }
}

/// Everything needed to produce one bundle
#[derive(Debug, Clone)]
pub struct BundleOptions {
    /// Project root; import map URLs are relative to it
    pub base_path: PathBuf,
    pub build_id: String,
    pub dist_directory: PathBuf,
    /// Specifiers left unresolved in the bundle
    pub externals: BTreeSet<String>,
    pub functions: Vec<EdgeFunction>,
    pub import_map: ImportMap,
    pub bundler: BundlerPaths,
    /// Keep the bundler's own output
    pub debug: bool,
}

impl BundleOptions {
    pub fn new(
        base_path: impl Into<PathBuf>,
        build_id: impl Into<String>,
        dist_directory: impl Into<PathBuf>,
    ) -> Self {
        Self {
            base_path: base_path.into(),
            build_id: build_id.into(),
            dist_directory: dist_directory.into(),
            externals: BTreeSet::new(),
            functions: Vec::new(),
            import_map: ImportMap::new(),
            bundler: BundlerPaths::default(),
            debug: false,
        }
    }

    /// Path of the bundle file for this build
    pub fn dest_path(&self, format: BundleFormat) -> PathBuf {
        self.dist_directory
            .join(format!("{}{}", self.build_id, format.extension()))
    }
}

/// JSON document handed to the bundler program
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Payload<'a> {
    base_path: &'a Path,
    dest_path: &'a Path,
    externals: &'a BTreeSet<String>,
    functions: &'a [EdgeFunction],
    #[serde(rename = "importMapURL")]
    import_map_url: &'a str,
}

/// Write the user import map into `dist_directory` and return its URL
/// under the virtual root
fn write_user_import_map(options: &BundleOptions) -> Result<String> {
    let path = options.dist_directory.join(IMPORT_MAP_FILE);
    options.import_map.write_to_file(&path)?;

    virtual_url(&options.base_path, &path)
}

fn bundler_args(options: &BundleOptions, payload: String) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "run".into(),
        "--allow-all".into(),
        "--no-config".into(),
        format!("--import-map={}", options.bundler.import_map().display()).into(),
    ];

    if !options.debug {
        args.push("--quiet".into());
    }

    args.push(options.bundler.program().into_os_string());
    args.push(payload.into());
    args
}

/// Produce an ESZIP bundle of `options.functions`
///
/// The runtime is resolved through `bridge`, so a download may happen
/// before bundling starts. Any failure after the import map is written is
/// reported as a bundling failure of [`BundleFormat::Eszip2`] wrapping the
/// underlying error.
pub fn bundle(bridge: &RuntimeBridge, options: &BundleOptions) -> Result<Bundle> {
    let format = BundleFormat::Eszip2;
    let dest_path = options.dest_path(format);
    let import_map_url = write_user_import_map(options)?;

    let payload = Payload {
        base_path: &options.base_path,
        dest_path: &dest_path,
        externals: &options.externals,
        functions: &options.functions,
        import_map_url: &import_map_url,
    };
    let payload =
        serde_json::to_string(&payload).map_err(|e| {
            bundle_error::failed(format, fs_error::io_error(format!("bundler payload: {e}")))
        })?;

    tracing::debug!(
        functions = options.functions.len(),
        dest = %dest_path.display(),
        "running bundler"
    );

    bridge
        .execute(&bundler_args(options, payload))
        .map_err(|e| bundle_error::failed(format, e))?;

    let hash = hash_file(&dest_path).map_err(|e| bundle_error::failed(format, e))?;
    tracing::info!(%hash, path = %dest_path.display(), "bundle written");

    Ok(Bundle {
        extension: format.extension().to_string(),
        format,
        hash,
        import_map_url,
    })
}

/// Check that the file at `path` still matches `bundle`'s hash
pub fn verify_bundle(bundle: &Bundle, path: &Path) -> Result<bool> {
    Ok(verify_hash(&bundle.hash, &hash_file(path)?))
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_tag_and_extension() {
        assert_eq!(BundleFormat::Eszip2.to_string(), "eszip2");
        assert_eq!(BundleFormat::Eszip2.extension(), ".eszip");
        assert_eq!(
            serde_json::to_string(&BundleFormat::Eszip2).expect("json"),
            "\"eszip2\""
        );
    }

    #[test]
    fn test_bundler_paths() {
        let paths = BundlerPaths::new("/opt/bundler");
        assert_eq!(paths.program(), Path::new("/opt/bundler/bundle.ts"));
        assert_eq!(
            paths.import_map(),
            Path::new("/opt/bundler/vendor/import_map.json")
        );
    }

    #[test]
    fn test_args_quiet_unless_debug() {
        let mut options = BundleOptions::new("/site", "build", "/site/dist");
        options.bundler = BundlerPaths::new("/b");

        let args = bundler_args(&options, "{}".to_string());
        assert_eq!(
            args,
            vec![
                OsString::from("run"),
                "--allow-all".into(),
                "--no-config".into(),
                "--import-map=/b/vendor/import_map.json".into(),
                "--quiet".into(),
                "/b/bundle.ts".into(),
                "{}".into(),
            ]
        );

        options.debug = true;
        let args = bundler_args(&options, "{}".to_string());
        assert!(!args.contains(&OsString::from("--quiet")));
    }

    #[test]
    fn test_bundle_serializes_camel_case() {
        let bundle = Bundle {
            extension: ".eszip".to_string(),
            format: BundleFormat::Eszip2,
            hash: "00".to_string(),
            import_map_url: "file:///root/dist/import_map.json".to_string(),
        };
        let json = serde_json::to_value(&bundle).expect("json");
        assert_eq!(json["format"], "eszip2");
        assert_eq!(json["importMapURL"], "file:///root/dist/import_map.json");
    }

    #[cfg(unix)]
    mod with_runtime {
        use super::*;
        use crate::bridge::BridgeConfig;
        use crate::error::EdgeBundlerError;
        use crate::test_fixtures::{FakeDownloader, create_temp_dir, write_fake_runtime};
        use std::fs;

        /// A runtime whose `run` writes the payload (its last argument) to `dest`
        /// and records its arguments next to it
        fn payload_writer(bin_dir: &Path, dest: &Path) -> PathBuf {
            let body = format!(
                "printf '%s\\n' \"$@\" > '{args}'\nfor last; do :; done\nprintf '%s' \"$last\" > '{dest}'",
                args = dest.with_extension("args").display(),
                dest = dest.display(),
            );
            write_fake_runtime(bin_dir, "deno", "1.20.3", &body)
        }

        fn bridge_for(global: &Path, cache: &Path) -> RuntimeBridge {
            let config = BridgeConfig::new(cache).with_global_binary(global);
            RuntimeBridge::with_downloader(config, FakeDownloader::new("1.22.0"))
        }

        fn options(base: &Path) -> BundleOptions {
            let mut options = BundleOptions::new(base, "123", base.join("dist"));
            options.functions = vec![EdgeFunction {
                name: "hello".to_string(),
                path: base.join("functions/hello.ts"),
            }];
            options.externals.insert("node:fs".to_string());
            options
                .import_map
                .add_import("std/", "https://deno.land/std@0.170.0/");
            options.bundler = BundlerPaths::new(base.join("bundler"));
            options
        }

        #[test]
        fn test_bundle_writes_import_map_and_hashes_output() {
            let temp = create_temp_dir();
            let base = temp.path();
            let options = options(base);
            let dest = options.dest_path(BundleFormat::Eszip2);
            let global = payload_writer(&base.join("bin"), &dest);
            let bridge = bridge_for(&global, &base.join("cache"));

            let bundle = bundle(&bridge, &options).expect("bundle");

            assert_eq!(bundle.format, BundleFormat::Eszip2);
            assert_eq!(bundle.extension, ".eszip");
            assert_eq!(bundle.import_map_url, "file:///root/dist/import_map.json");
            assert!(base.join("dist/import_map.json").is_file());
            assert!(verify_bundle(&bundle, &dest).expect("verify"));

            let payload: serde_json::Value =
                serde_json::from_str(&fs::read_to_string(&dest).expect("read")).expect("json");
            assert_eq!(payload["destPath"], dest.display().to_string());
            assert_eq!(payload["importMapURL"], "file:///root/dist/import_map.json");
            assert_eq!(payload["externals"][0], "node:fs");
            assert_eq!(payload["functions"][0]["name"], "hello");

            let args = fs::read_to_string(dest.with_extension("args")).expect("args");
            assert!(args.starts_with("run\n--allow-all\n--no-config\n--import-map="));
            assert!(args.contains("--quiet\n"));
        }

        #[test]
        fn test_identical_inputs_give_identical_hashes() {
            let temp = create_temp_dir();
            let base = temp.path();
            let options = options(base);
            let dest = options.dest_path(BundleFormat::Eszip2);
            let global = payload_writer(&base.join("bin"), &dest);
            let bridge = bridge_for(&global, &base.join("cache"));

            let first = bundle(&bridge, &options).expect("first bundle");
            let second = bundle(&bridge, &options).expect("second bundle");

            assert_eq!(first.hash, second.hash);
            assert_eq!(first, second);
        }

        #[test]
        fn test_debug_keeps_bundler_output() {
            let temp = create_temp_dir();
            let base = temp.path();
            let mut options = options(base);
            options.debug = true;
            let dest = options.dest_path(BundleFormat::Eszip2);
            let global = payload_writer(&base.join("bin"), &dest);
            let bridge = bridge_for(&global, &base.join("cache"));

            bundle(&bridge, &options).expect("bundle");

            let args = fs::read_to_string(dest.with_extension("args")).expect("args");
            assert!(!args.contains("--quiet"));
        }

        #[test]
        fn test_failing_bundler_names_format() {
            let temp = create_temp_dir();
            let base = temp.path();
            let global = write_fake_runtime(
                &base.join("bin"),
                "deno",
                "1.20.3",
                "echo 'error: Module not found' >&2; exit 1",
            );
            let bridge = bridge_for(&global, &base.join("cache"));

            let err = bundle(&bridge, &options(base)).expect_err("bundling should fail");

            assert!(matches!(err, EdgeBundlerError::BundleFailed { .. }));
            assert!(err.to_string().contains("eszip2"));
            assert_eq!(err.stderr(), Some("error: Module not found\n"));
        }

        #[test]
        fn test_unserializable_payload_is_bundle_failure() {
            use std::os::unix::ffi::OsStrExt;

            let temp = create_temp_dir();
            let base = temp.path();
            let global = write_fake_runtime(&base.join("bin"), "deno", "1.20.3", "exit 0");
            let bridge = bridge_for(&global, &base.join("cache"));
            let mut options = options(base);
            options.functions[0].path = base.join(std::ffi::OsStr::from_bytes(b"bad\xff.ts"));

            let err = bundle(&bridge, &options).expect_err("payload should not serialize");

            assert!(matches!(err, EdgeBundlerError::BundleFailed { .. }));
            let source = std::error::Error::source(&err).expect("cause");
            assert!(source.to_string().contains("bundler payload"));
            assert!(!source.to_string().contains("configuration"));
        }

        #[test]
        fn test_missing_output_is_bundle_failure() {
            let temp = create_temp_dir();
            let base = temp.path();
            let global = write_fake_runtime(&base.join("bin"), "deno", "1.20.3", "exit 0");
            let bridge = bridge_for(&global, &base.join("cache"));

            let err = bundle(&bridge, &options(base)).expect_err("no bundle file");
            assert!(err.to_string().contains("eszip2"));
        }
    }
}
