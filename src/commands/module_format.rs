//! Module format command implementation

use std::path::Path;

use serde::Serialize;

use edge_bundler::config::Settings;
use edge_bundler::module_format::bundler_target;
use edge_bundler::{ModuleFormatDecision, Result, get_module_format};

use crate::cli::ModuleFormatArgs;
use crate::commands::load_settings;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    #[serde(flatten)]
    decision: &'a ModuleFormatDecision,
    bundler_target: &'static str,
}

pub fn run(config: Option<&Path>, args: ModuleFormatArgs) -> Result<()> {
    let extension = args.extension();
    let overrides = Settings {
        feature_flags: args.features.into_iter().collect(),
        ..Settings::default()
    };
    let settings = load_settings(config, overrides)?;

    let node_version = args.node_version.as_deref();
    let decision = get_module_format(
        &args.src_dir,
        &settings.feature_flags,
        &extension,
        node_version,
    )?;

    let report = Report {
        decision: &decision,
        bundler_target: bundler_target(node_version),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
