//! External tool detection and availability checking.
//!
//! Building and validating a package needs the macOS installer tooling. The
//! lookups are cached so repeated checks do not hit `PATH` again.

use std::sync::LazyLock;

/// Host tools the default [`HostTools`](crate::bundler::HostTools) invoke.
pub const HOST_TOOLS: [&str; 5] = ["pkgbuild", "productbuild", "pkgutil", "tar", "xattr"];

fn detect(tool: &str) -> bool {
    match which::which(tool) {
        Ok(path) => {
            log::debug!("Found {} at: {}", tool, path.display());
            true
        }
        Err(e) => {
            log::debug!("{} not found in PATH: {}", tool, e);
            false
        }
    }
}

/// Availability of each entry in [`HOST_TOOLS`], in the same order.
static AVAILABLE: LazyLock<Vec<bool>> =
    LazyLock::new(|| HOST_TOOLS.iter().map(|tool| detect(tool)).collect());

/// Host tools that are not installed.
pub fn missing_host_tools() -> Vec<&'static str> {
    HOST_TOOLS
        .iter()
        .zip(AVAILABLE.iter())
        .filter(|(_, available)| !**available)
        .map(|(tool, _)| *tool)
        .collect()
}

/// Logs a warning when the installer tooling is incomplete.
pub fn warn_missing_host_tools() {
    let missing = missing_host_tools();
    if !missing.is_empty() {
        log::warn!(
            "Missing host tools: {}. Package generation and validation need macOS installer tooling.",
            missing.join(", ")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tools_are_a_subset_of_host_tools() {
        for tool in missing_host_tools() {
            assert!(HOST_TOOLS.contains(&tool));
        }
    }
}
