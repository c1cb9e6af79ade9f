//! Cache command implementation

use std::path::Path;

use console::style;

use edge_bundler::Result;
use edge_bundler::VersionRange;
use edge_bundler::cache::{BinaryCache, format_size};

use crate::cli::{CacheArgs, CacheSubcommand, RuntimeOptions};
use crate::commands::load_settings;

pub fn run(config: Option<&Path>, runtime: &RuntimeOptions, args: CacheArgs) -> Result<()> {
    let settings = load_settings(config, runtime.to_settings())?;
    let cache = BinaryCache::new(settings.cache_dir()?);

    match args.command {
        Some(CacheSubcommand::Clear) => clear_cache(&cache),
        None => show_cache_stats(&cache, &settings.version_range()?),
    }
}

fn show_cache_stats(cache: &BinaryCache, range: &VersionRange) -> Result<()> {
    println!("Cache Statistics:");
    println!("  Location: {}", cache.directory().display());

    let record = cache.read();
    match &record {
        Some(record) => {
            let usable = if BinaryCache::is_usable(record, range) {
                style("yes").green()
            } else {
                style("no").yellow()
            };
            println!("  Runtime: {}", record.recorded_version);
            println!("  Binary: {}", record.binary_path.display());
            println!("  Satisfies {range}: {usable}");
        }
        None => println!("  Runtime: none"),
    }
    println!("  Size: {}", format_size(cache.size()));

    if record.is_none() {
        println!("\nCache is empty.");
    } else {
        println!("\nRun 'edge-bundler cache clear' to remove the cached runtime.");
    }

    Ok(())
}

fn clear_cache(cache: &BinaryCache) -> Result<()> {
    cache.clear()?;
    println!("Cache cleared successfully.");
    Ok(())
}
