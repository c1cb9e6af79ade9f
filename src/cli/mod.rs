//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - bundle: Bundle command arguments
//! - runtime: Runtime command arguments
//! - module_format: Module format command arguments
//! - cache: Cache command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use edge_bundler::config::Settings;

pub mod bundle;
pub mod cache;
pub mod completions;
pub mod module_format;
pub mod runtime;

pub use bundle::BundleArgs;
pub use cache::{CacheArgs, CacheSubcommand};
pub use completions::CompletionsArgs;
pub use module_format::ModuleFormatArgs;
pub use runtime::{RuntimeArgs, RuntimeSubcommand};

/// Edge bundler - runtime acquisition and ESZIP bundling
#[derive(Parser, Debug)]
#[command(
    name = "edge-bundler",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Bundle edge functions into ESZIP archives",
    long_about = "Edge bundler finds or downloads a runtime whose version satisfies a range, \
                  uses it to bundle edge functions into an ESZIP archive, and reports the \
                  module system functions should be emitted in.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  edge-bundler bundle functions --dist dist        \x1b[90m# Bundle every function\x1b[0m\n   \
                  edge-bundler runtime path                        \x1b[90m# Show the runtime in use\x1b[0m\n   \
                  edge-bundler runtime exec -- --version           \x1b[90m# Run the runtime directly\x1b[0m\n   \
                  edge-bundler module-format src --feature pure_esm \x1b[90m# Decide ESM or CommonJS\x1b[0m\n   \
                  edge-bundler cache clear                         \x1b[90m# Remove the cached runtime\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Settings file (defaults to edge-bundler.yaml in the current directory)
    #[arg(long, short = 'c', global = true, env = "EDGE_BUNDLER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub runtime: RuntimeOptions,

    #[command(subcommand)]
    pub command: Commands,
}

/// Runtime selection flags shared by every command
#[derive(Args, Debug, Default, Clone)]
pub struct RuntimeOptions {
    /// Accepted runtime versions (e.g. ^1.17.2 or =1.20.3)
    #[arg(long, global = true, value_name = "RANGE")]
    pub version_range: Option<String>,

    /// Directory the runtime binary is cached in
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Never use a runtime found on PATH
    #[arg(long, global = true)]
    pub no_global: bool,

    /// Kill runtime invocations after this many seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl RuntimeOptions {
    /// Settings set by these flags, for layering over the settings file
    pub fn to_settings(&self) -> Settings {
        Settings {
            version_range: self.version_range.clone(),
            cache_dir: self.cache_dir.clone(),
            use_global: self.no_global.then_some(false),
            timeout_secs: self.timeout,
            ..Settings::default()
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Bundle edge functions into an ESZIP archive
    Bundle(BundleArgs),

    /// Resolve or run the runtime binary
    Runtime(RuntimeArgs),

    /// Decide the module format of a function
    #[command(name = "module-format")]
    ModuleFormat(ModuleFormatArgs),

    /// Manage the runtime cache
    #[command(name = "cache")]
    Cache(CacheArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
