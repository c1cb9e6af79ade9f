//! Edge bundler - runtime acquisition and ESZIP bundling for edge functions
//!
//! The crate finds or downloads a runtime binary whose version satisfies a
//! range ([`bridge`]), uses it to run a bundler program that writes an ESZIP
//! archive ([`bundler`]), and decides the module system of emitted functions
//! ([`module_format`]).

pub mod bridge;
pub mod bundler;
pub mod cache;
pub mod config;
pub mod download;
pub mod error;
pub mod feature_flags;
pub mod functions;
pub mod hash;
pub mod import_map;
pub mod module_format;
pub mod process;
pub mod version;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use bridge::{BridgeConfig, RuntimeBridge};
pub use bundler::{Bundle, BundleFormat, BundleOptions, bundle, verify_bundle};
pub use error::{EdgeBundlerError, Result};
pub use module_format::{ModuleFormat, ModuleFormatDecision, get_module_format};
pub use version::VersionRange;
