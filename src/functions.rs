//! Edge function discovery
//!
//! A functions directory is scanned one level deep. Every entry is either a
//! function file (`hello.ts` is the function `hello`) or a function
//! directory (`hello/hello.ts` or `hello/index.ts`).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::error::{Result, fs as fs_error};

/// Extensions recognised as function entry points, in lookup order
pub const FUNCTION_EXTENSIONS: [&str; 5] = ["js", "jsx", "mjs", "ts", "tsx"];

/// A function and the entry point it is bundled from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeFunction {
    pub name: String,
    pub path: PathBuf,
}

fn has_function_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| FUNCTION_EXTENSIONS.contains(&ext))
}

fn function_from_file(path: &Path) -> Option<EdgeFunction> {
    if !has_function_extension(path) {
        return None;
    }

    let name = path.file_stem()?.to_str()?;
    Some(EdgeFunction {
        name: name.to_string(),
        path: path.to_path_buf(),
    })
}

fn function_from_dir(dir: &Path) -> Option<EdgeFunction> {
    let name = dir.file_name()?.to_str()?;

    [name, "index"]
        .iter()
        .flat_map(|stem| {
            FUNCTION_EXTENSIONS
                .iter()
                .map(move |ext| dir.join(format!("{stem}.{ext}")))
        })
        .find(|candidate| candidate.is_file())
        .map(|path| EdgeFunction {
            name: name.to_string(),
            path,
        })
}

fn functions_in_dir(dir: &Path) -> Result<Vec<EdgeFunction>> {
    let mut functions = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| fs_error::read_failed(dir, e))?;
        let path = entry.path();

        let function = if path.is_dir() {
            function_from_dir(path)
        } else {
            function_from_file(path)
        };

        if let Some(function) = function {
            functions.push(function);
        }
    }

    Ok(functions)
}

/// Find the functions in `directories`
///
/// Directories that do not exist are skipped. When two directories define a
/// function with the same name, the later directory wins. The result is
/// sorted by name.
pub fn find_functions<P: AsRef<Path>>(directories: &[P]) -> Result<Vec<EdgeFunction>> {
    let mut functions = BTreeMap::new();

    for dir in directories {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            tracing::debug!(dir = %dir.display(), "functions directory missing, skipping");
            continue;
        }

        for function in functions_in_dir(dir)? {
            functions.insert(function.name.clone(), function);
        }
    }

    Ok(functions.into_values().collect())
}
