//! Bundle command implementation

use std::path::Path;

use console::style;

use edge_bundler::config::Settings;
use edge_bundler::functions::find_functions;
use edge_bundler::import_map::ImportMap;
use edge_bundler::{BundleOptions, Result, RuntimeBridge};

use crate::cli::{BundleArgs, RuntimeOptions};
use crate::commands::load_settings;
use crate::progress::DownloadSpinner;

pub fn run(config: Option<&Path>, runtime: &RuntimeOptions, args: BundleArgs) -> Result<()> {
    let overrides = Settings {
        bundler_dir: args.bundler_dir,
        debug: args.debug.then_some(true),
        ..runtime.to_settings()
    };
    let settings = load_settings(config, overrides)?;

    let base_path = match args.base_path {
        Some(path) => path,
        None => std::env::current_dir()?,
    };

    let functions = find_functions(&args.src_dirs)?;
    if functions.is_empty() {
        tracing::warn!("no edge functions found");
    }

    let mut import_map = ImportMap::new();
    for path in &args.import_maps {
        import_map.merge(ImportMap::load(path, &base_path)?);
    }

    let mut options = BundleOptions::new(&base_path, args.build_id, &args.dist);
    options.externals = args.externals.into_iter().collect();
    options.functions = functions;
    options.import_map = import_map;
    options.bundler = settings.bundler_paths();
    options.debug = settings.debug();

    let spinner = DownloadSpinner::new();
    let bridge = RuntimeBridge::new(spinner.clone().attach(settings.bridge_config()?));
    let bundle = edge_bundler::bundle(&bridge, &options).inspect_err(|_| spinner.clear())?;

    eprintln!(
        "{} Bundled {} function{} into {}",
        style("✓").green().bold(),
        options.functions.len(),
        if options.functions.len() == 1 { "" } else { "s" },
        options.dest_path(bundle.format).display()
    );
    println!("{}", serde_json::to_string_pretty(&bundle)?);

    Ok(())
}
