//! Import maps handed to the bundler
//!
//! Paths inside an import map are expressed relative to the project base
//! path under a fixed virtual root URL, so the produced bundle does not
//! depend on where the project lives on the build machine.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use normpath::{BasePathBuf, PathExt};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, bundle, fs as fs_error};

/// URL prefix standing in for the project base path
pub const VIRTUAL_ROOT: &str = "file:///root/";

/// File name of the import map written next to the bundle
pub const IMPORT_MAP_FILE: &str = "import_map.json";

type Imports = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportMap {
    #[serde(default)]
    pub imports: Imports,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub scopes: BTreeMap<String, Imports>,
}

impl ImportMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `specifier` to `target`, replacing any previous mapping
    pub fn add_import(&mut self, specifier: impl Into<String>, target: impl Into<String>) {
        self.imports.insert(specifier.into(), target.into());
    }

    /// Load an import map file
    ///
    /// Relative targets and scope keys (`./x`, `../x`) are resolved against
    /// the file's directory and rewritten as virtual root URLs relative to
    /// `base_path`.
    pub fn load(path: &Path, base_path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| fs_error::read_failed(path, e))?;
        let parsed: ImportMap = serde_json::from_str(&raw)
            .map_err(|e| bundle::invalid_import_map(path.display().to_string(), e))?;

        let map_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let resolve = |value: &str| resolve_target(value, map_dir, base_path);

        let imports = resolve_imports(&parsed.imports, &resolve)?;
        let mut scopes = BTreeMap::new();
        for (scope, scoped_imports) in &parsed.scopes {
            scopes.insert(resolve(scope.as_str())?, resolve_imports(scoped_imports, &resolve)?);
        }

        Ok(Self { imports, scopes })
    }

    /// Overlay `other` on this map; entries from `other` win
    pub fn merge(&mut self, other: ImportMap) {
        self.imports.extend(other.imports);
        for (scope, imports) in other.scopes {
            self.scopes.entry(scope).or_default().extend(imports);
        }
    }

    /// Write the map as pretty JSON, creating parent directories
    ///
    /// Keys are sorted, so equal maps always produce identical files.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| fs_error::write_failed(parent, e))?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| bundle::invalid_import_map(path.display().to_string(), e))?;
        fs::write(path, json).map_err(|e| fs_error::write_failed(path, e))
    }
}

fn resolve_imports(
    imports: &Imports,
    resolve: &impl Fn(&str) -> Result<String>,
) -> Result<Imports> {
    imports
        .iter()
        .map(|(specifier, target)| Ok((specifier.clone(), resolve(target.as_str())?)))
        .collect()
}

fn resolve_target(value: &str, map_dir: &Path, base_path: &Path) -> Result<String> {
    if !(value.starts_with("./") || value.starts_with("../")) {
        return Ok(value.to_string());
    }

    let mut url = virtual_url(base_path, &map_dir.join(value))?;
    if value.ends_with('/') && !url.ends_with('/') {
        url.push('/');
    }
    Ok(url)
}

/// URL of `path` under the virtual root, relative to `base_path`
pub fn virtual_url(base_path: &Path, path: &Path) -> Result<String> {
    let relative = relative_path(&normalize(base_path)?, &normalize(path)?);
    let relative = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    let root = Url::parse(VIRTUAL_ROOT)
        .map_err(|e| bundle::invalid_import_map(VIRTUAL_ROOT, e))?;
    root.join(&relative)
        .map(String::from)
        .map_err(|e| bundle::invalid_import_map(path.display().to_string(), e))
}

/// Absolute, symlink-resolved form of `path`
///
/// Paths that do not exist yet (an output directory, an import map target
/// created later) are resolved through their longest existing ancestor and
/// the missing components appended back.
fn normalize(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path).map_err(|e| fs_error::read_failed(path, e))?;

    if let Ok(normalized) = absolute.normalize() {
        return Ok(normalized.into_path_buf());
    }

    let mut current = absolute.as_path();
    let mut missing = Vec::new();
    while !current.exists() {
        match (current.file_name(), current.parent()) {
            (Some(name), Some(parent)) => {
                missing.push(name);
                current = parent;
            }
            _ => return Ok(absolute.clone()),
        }
    }

    let mut normalized = current
        .normalize()
        .map(BasePathBuf::into_path_buf)
        .unwrap_or_else(|_| current.to_path_buf());
    for name in missing.iter().rev() {
        normalized.push(name);
    }
    Ok(normalized)
}

/// Path from `from` to `to`, both absolute and normalized
fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from: Vec<_> = from.components().collect();
    let to: Vec<_> = to.components().collect();

    let common = from
        .iter()
        .zip(&to)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..from.len() {
        relative.push("..");
    }
    for component in &to[common..] {
        relative.push(component.as_os_str());
    }
    relative
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::test_fixtures::create_temp_dir;

    #[test]
    fn test_virtual_url_inside_base() {
        let url = virtual_url(Path::new("/site"), Path::new("/site/.netlify/edge/import_map.json"))
            .expect("url");
        assert_eq!(url, "file:///root/.netlify/edge/import_map.json");
    }

    #[test]
    fn test_virtual_url_outside_base() {
        let url = virtual_url(Path::new("/site/app"), Path::new("/site/dist/import_map.json"))
            .expect("url");
        assert_eq!(url, "file:///dist/import_map.json");
    }

    #[test]
    fn test_virtual_url_normalizes_dots() {
        let temp = create_temp_dir();
        fs::create_dir_all(temp.path().join("app")).expect("mkdir");
        fs::create_dir_all(temp.path().join("dist")).expect("mkdir");

        let url = virtual_url(
            &temp.path().join("./app/.."),
            &temp.path().join("dist/../x.ts"),
        )
        .expect("url");
        assert_eq!(url, "file:///root/x.ts");
    }

    #[test]
    fn test_virtual_url_missing_target() {
        let temp = create_temp_dir();
        let url = virtual_url(temp.path(), &temp.path().join("dist/edge/import_map.json"))
            .expect("url");
        assert_eq!(url, "file:///root/dist/edge/import_map.json");
    }

    #[cfg(unix)]
    #[test]
    fn test_virtual_url_through_symlinked_base() {
        let temp = create_temp_dir();
        let real = temp.path().join("real");
        fs::create_dir_all(real.join("lib")).expect("mkdir");
        std::os::unix::fs::symlink(&real, temp.path().join("link")).expect("symlink");

        let url = virtual_url(&temp.path().join("link"), &real.join("lib/mod.ts"))
            .expect("url");
        assert_eq!(url, "file:///root/lib/mod.ts");
    }

    #[test]
    fn test_write_is_deterministic() {
        let temp = create_temp_dir();
        let mut first = ImportMap::new();
        first.add_import("b", "https://b.test/");
        first.add_import("a", "https://a.test/mod.ts");
        let mut second = ImportMap::new();
        second.add_import("a", "https://a.test/mod.ts");
        second.add_import("b", "https://b.test/");

        let first_path = temp.path().join("one/import_map.json");
        let second_path = temp.path().join("two/import_map.json");
        first.write_to_file(&first_path).expect("write");
        second.write_to_file(&second_path).expect("write");

        assert_eq!(
            fs::read(&first_path).expect("read"),
            fs::read(&second_path).expect("read")
        );
        let written: serde_json::Value =
            serde_json::from_slice(&fs::read(&first_path).expect("read")).expect("json");
        assert!(written.get("scopes").is_none());
    }

    #[test]
    fn test_load_resolves_relative_targets() {
        let temp = create_temp_dir();
        let base = temp.path();
        let map_path = base.join("config/import_map.json");
        fs::create_dir_all(map_path.parent().expect("parent")).expect("mkdir");
        fs::write(
            &map_path,
            r#"{
                "imports": {
                    "utils/": "../lib/utils/",
                    "helper": "./helper.ts",
                    "remote": "https://deno.land/std/mod.ts"
                },
                "scopes": {
                    "./scoped/": { "helper": "./other-helper.ts" }
                }
            }"#,
        )
        .expect("write");

        let map = ImportMap::load(&map_path, base).expect("load");

        assert_eq!(map.imports["utils/"], "file:///root/lib/utils/");
        assert_eq!(map.imports["helper"], "file:///root/config/helper.ts");
        assert_eq!(map.imports["remote"], "https://deno.land/std/mod.ts");
        assert_eq!(
            map.scopes["file:///root/config/scoped/"]["helper"],
            "file:///root/config/other-helper.ts"
        );
    }

    #[test]
    fn test_load_invalid_json() {
        let temp = create_temp_dir();
        let map_path = temp.path().join("import_map.json");
        fs::write(&map_path, "{ nope").expect("write");

        let err = ImportMap::load(&map_path, temp.path()).expect_err("should fail");
        assert!(matches!(
            err,
            crate::error::EdgeBundlerError::ImportMapInvalid { .. }
        ));
    }

    #[test]
    fn test_merge_later_wins() {
        let mut map = ImportMap::new();
        map.add_import("a", "https://one.test/");
        map.add_import("b", "https://b.test/");

        let mut other = ImportMap::new();
        other.add_import("a", "https://two.test/");

        map.merge(other);
        assert_eq!(map.imports["a"], "https://two.test/");
        assert_eq!(map.imports["b"], "https://b.test/");
    }
}
