//! Command implementations for the edge bundler CLI

pub mod bundle;
pub mod cache;
pub mod completions;
pub mod module_format;
pub mod runtime;
pub mod version;

use std::path::Path;

use edge_bundler::Result;
use edge_bundler::config::Settings;

/// Settings file contents with command line values layered on top
pub fn load_settings(config: Option<&Path>, overrides: Settings) -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    Ok(Settings::discover(&cwd, config)?.merge(overrides))
}
