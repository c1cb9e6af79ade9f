//! Runtime command implementation

use std::path::Path;

use edge_bundler::{Result, RuntimeBridge};

use crate::cli::{RuntimeArgs, RuntimeOptions, RuntimeSubcommand};
use crate::commands::load_settings;
use crate::progress::DownloadSpinner;

pub fn run(config: Option<&Path>, runtime: &RuntimeOptions, args: RuntimeArgs) -> Result<()> {
    let settings = load_settings(config, runtime.to_settings())?;
    let spinner = DownloadSpinner::new();
    let bridge = RuntimeBridge::new(spinner.clone().attach(settings.bridge_config()?));

    match args.command {
        RuntimeSubcommand::Path => {
            let binary = bridge.resolve_binary().inspect_err(|_| spinner.clear())?;
            println!("{}", binary.display());
        }
        RuntimeSubcommand::Exec(exec) => {
            let output = bridge.execute(&exec.args).inspect_err(|_| spinner.clear())?;
            print!("{}", output.stdout);
            eprint!("{}", output.stderr);
        }
    }

    Ok(())
}
