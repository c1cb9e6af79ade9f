use clap::{Parser, Subcommand};

/// Arguments for cache command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show the cached runtime:\n    edge-bundler cache\n\n\
                  Remove the cached runtime:\n    edge-bundler cache clear\n\n\
                  Inspect a different cache directory:\n    edge-bundler cache --cache-dir /tmp/deno-cli")]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: Option<CacheSubcommand>,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheSubcommand {
    /// Remove the cached runtime and its version marker
    Clear,
}
