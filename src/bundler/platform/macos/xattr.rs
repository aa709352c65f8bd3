//! Extended attribute cleanup.
//!
//! Files downloaded by a browser or `curl` carry quarantine metadata. Left in
//! the payload, it makes Gatekeeper prompt on first run of the installed
//! agent.

use crate::bundler::{AttributeStripper, Result, utils::process};
use async_trait::async_trait;
use std::path::Path;

/// Attributes removed from the staging tree before packaging.
pub const QUARANTINE_ATTRIBUTES: [&str; 3] = [
    "com.apple.quarantine",
    "com.apple.metadata:kMDItemDownloadedDate",
    "com.apple.metadata:kMDItemWhereFroms",
];

/// [`AttributeStripper`] backed by `xattr -dr`.
#[derive(Debug, Default, Clone, Copy)]
pub struct XattrStripper;

#[async_trait]
impl AttributeStripper for XattrStripper {
    async fn strip(&self, root: &Path, attribute: &str) -> Result<()> {
        let output =
            process::output("xattr", ["-dr".as_ref(), attribute.as_ref(), root.as_os_str()])
                .await?;

        // xattr exits non-zero when no file carried the attribute.
        if !output.status.success() {
            log::debug!(
                "xattr -dr {} reported: {}",
                attribute,
                process::stderr(&output)
            );
        }
        Ok(())
    }
}

/// Strips every quarantine attribute from `root`.
///
/// Best effort: failures are logged and never abort the build.
pub async fn clear_quarantine_attributes(stripper: &dyn AttributeStripper, root: &Path) {
    for attribute in QUARANTINE_ATTRIBUTES {
        if let Err(e) = stripper.strip(root, attribute).await {
            log::warn!("Unable to clear {} from {}: {}", attribute, root.display(), e);
        }
    }
}
