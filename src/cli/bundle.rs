use clap::Parser;
use std::path::PathBuf;

/// Arguments for bundle command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Bundle functions from one directory:\n    edge-bundler bundle netlify/edge-functions --dist dist\n\n\
                  Combine internal and user functions (later directories win):\n    edge-bundler bundle .netlify/edge-functions netlify/edge-functions --dist dist\n\n\
                  Use an import map and keep a module external:\n    edge-bundler bundle functions --dist dist --import-map import_map.json --external node:fs")]
pub struct BundleArgs {
    /// Directories to discover functions in
    #[arg(required = true, value_name = "DIR")]
    pub src_dirs: Vec<PathBuf>,

    /// Directory the bundle and its import map are written to
    #[arg(long, short = 'o')]
    pub dist: PathBuf,

    /// Project root that import map URLs are relative to (defaults to current directory)
    #[arg(long)]
    pub base_path: Option<PathBuf>,

    /// Name of the bundle file, without extension
    #[arg(long, default_value = "bundle")]
    pub build_id: String,

    /// Import map to apply; later maps override earlier ones
    #[arg(long = "import-map", value_name = "FILE")]
    pub import_maps: Vec<PathBuf>,

    /// Module specifier to leave out of the bundle
    #[arg(long = "external", value_name = "SPECIFIER")]
    pub externals: Vec<String>,

    /// Directory holding bundle.ts and vendor/import_map.json
    #[arg(long, value_name = "DIR")]
    pub bundler_dir: Option<PathBuf>,

    /// Show the bundler's own output
    #[arg(long)]
    pub debug: bool,
}
