//! Unpacking a finished installer.

use crate::bundler::{ArchiveExtractor, Error, Result, error::ErrorExt};
use std::path::{Path, PathBuf};

/// Expands `package` under `workspace` and extracts its payload.
///
/// Product archives (those with a `Distribution` file) hold the payload in
/// an embedded component package; component packages hold it at the top
/// level. Returns the directory the payload was extracted into, which
/// mirrors the install layout (`usr/local/Baseline/...`).
pub async fn expand_installer(
    extractor: &dyn ArchiveExtractor,
    package: &Path,
    workspace: &Path,
) -> Result<PathBuf> {
    log::info!("Expanding {}...", package.display());

    let expanded = workspace.join("expanded");
    extractor.expand_package(package, &expanded).await?;

    let container = if expanded.join("Distribution").is_file() {
        find_component(&expanded, package).await?
    } else {
        expanded.clone()
    };

    let payload = container.join("Payload");
    if !payload.exists() {
        return Err(Error::MissingFile {
            what: "Payload in pkg".into(),
            path: package.to_path_buf(),
        });
    }

    let root = workspace.join("payload");
    tokio::fs::create_dir_all(&root)
        .await
        .fs_context("creating payload directory", &root)?;
    extractor.extract_payload(&payload, &root).await?;
    Ok(root)
}

/// Locates the component package inside an expanded product archive.
async fn find_component(expanded: &Path, package: &Path) -> Result<PathBuf> {
    let mut components = Vec::new();
    let mut entries = tokio::fs::read_dir(expanded)
        .await
        .fs_context("reading expanded package", expanded)?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .fs_context("reading expanded package", expanded)?
    {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("pkg") {
            components.push(path);
        }
    }
    components.sort();

    if components.len() > 1 {
        log::warn!(
            "{} embeds {} component packages, validating {}",
            package.display(),
            components.len(),
            components[0].display()
        );
    }

    components.into_iter().next().ok_or_else(|| Error::MissingFile {
        what: "component package in distribution".into(),
        path: package.to_path_buf(),
    })
}
