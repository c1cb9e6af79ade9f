//! Node.js version support matrix

/// Major version assumed when none is declared or it cannot be read
pub const DEFAULT_NODE_VERSION: u64 = 16;

/// First major version with native ES module support
const ESM_MIN_VERSION: u64 = 14;

/// Bundler targets for the majors we know about
const BUNDLER_TARGETS: [(u64, &str); 3] = [(14, "node14"), (16, "node16"), (18, "node18")];

/// Features available in a Node.js version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeSupport {
    pub esm: bool,
}

/// Read the major version from `16`, `16.x`, `v16.13.0` or `nodejs16.x`
pub fn parse_node_version(text: &str) -> Option<u64> {
    let text = text.trim();
    let text = text.strip_prefix("nodejs").unwrap_or(text);
    let text = text.strip_prefix('v').unwrap_or(text);

    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());

    text[..end].parse().ok()
}

fn major_or_default(declared: Option<&str>) -> u64 {
    declared
        .and_then(parse_node_version)
        .unwrap_or(DEFAULT_NODE_VERSION)
}

/// Support matrix for the declared version, or the default version
pub fn node_support(declared: Option<&str>) -> NodeSupport {
    NodeSupport {
        esm: major_or_default(declared) >= ESM_MIN_VERSION,
    }
}

/// Bundler target name for the declared version
///
/// Unknown versions get the target of [`DEFAULT_NODE_VERSION`].
pub fn bundler_target(declared: Option<&str>) -> &'static str {
    let major = major_or_default(declared);
    let lookup = |major: u64| {
        BUNDLER_TARGETS
            .iter()
            .find(|(version, _)| *version == major)
            .map(|(_, target)| *target)
    };

    lookup(major)
        .or_else(|| lookup(DEFAULT_NODE_VERSION))
        .unwrap_or("node16")
}
