use clap::Parser;
use std::path::PathBuf;

use edge_bundler::feature_flags::FlagAssignment;

/// Arguments for module-format command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Decide from the nearest package.json:\n    edge-bundler module-format functions/hello --feature pure_esm\n\n\
                  Treat .mjs sources as ES modules:\n    edge-bundler module-format functions/hello --extension mjs --feature pure_esm_mjs")]
pub struct ModuleFormatArgs {
    /// Source directory of the function
    pub src_dir: PathBuf,

    /// Extension of the function's entry point
    #[arg(long, default_value = ".js")]
    pub extension: String,

    /// Node.js version declared for the function (e.g. 18.x)
    #[arg(long, value_name = "VERSION")]
    pub node_version: Option<String>,

    /// Feature flag to set, as NAME or NAME=true|false
    #[arg(long = "feature", value_name = "FLAG")]
    pub features: Vec<FlagAssignment>,
}

impl ModuleFormatArgs {
    /// Extension with a leading dot
    pub fn extension(&self) -> String {
        if self.extension.starts_with('.') {
            self.extension.clone()
        } else {
            format!(".{}", self.extension)
        }
    }
}
