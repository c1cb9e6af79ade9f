//! Edge bundler - runtime acquisition and ESZIP bundling
//!
//! Command line front end over the `edge_bundler` library: finds or downloads
//! a runtime, bundles edge functions with it and reports module formats.

use clap::Parser;
use miette::Diagnostic;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

mod cli;
mod commands;
mod progress;

use cli::{Cli, Commands};

/// Log filter used when `RUST_LOG` is not set
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "edge_bundler=debug"
    } else {
        "edge_bundler=warn"
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Bundle(args) => commands::bundle::run(config, &cli.runtime, args),
        Commands::Runtime(args) => commands::runtime::run(config, &cli.runtime, args),
        Commands::ModuleFormat(args) => commands::module_format::run(config, args),
        Commands::Cache(args) => commands::cache::run(config, &cli.runtime, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let mut cause = std::error::Error::source(&e);
        while let Some(err) = cause {
            eprintln!("  caused by: {}", err);
            cause = err.source();
        }
        if let Some(help) = e.help() {
            eprintln!("  help: {}", help);
        }
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(true), "edge_bundler=debug");
        assert_eq!(default_filter(false), "edge_bundler=warn");
        assert!(EnvFilter::try_new(default_filter(true)).is_ok());
    }
}
