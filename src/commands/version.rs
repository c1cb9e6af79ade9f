//! Version command implementation

use edge_bundler::Result;
use edge_bundler::version::DEFAULT_VERSION_RANGE;

/// Run version command
pub fn run() -> Result<()> {
    println!("edge-bundler {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Build info:");
    println!("  Rust version: {}", rustc_version());
    println!("  Profile: {}", build_profile());
    println!("  Default runtime range: {DEFAULT_VERSION_RANGE}");

    Ok(())
}

fn rustc_version() -> &'static str {
    env!("CARGO_PKG_RUST_VERSION")
}

fn build_profile() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}
