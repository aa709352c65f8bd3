//! Execute permissions for staged scripts.

use crate::bundler::{Result, error::ErrorExt, utils::fs};
use std::path::Path;

/// Marks the Baseline agent script and every file in `scripts_dir` executable.
///
/// Either path may be missing: a build without a `Scripts` category never
/// creates the directory.
pub async fn set_file_permissions(core_script: &Path, scripts_dir: &Path) -> Result<()> {
    log::info!("Setting file permissions...");

    if core_script.is_file() {
        fs::set_executable(core_script).await?;
    }

    if !scripts_dir.is_dir() {
        return Ok(());
    }

    let mut entries = tokio::fs::read_dir(scripts_dir)
        .await
        .fs_context("reading scripts directory", scripts_dir)?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .fs_context("reading scripts directory", scripts_dir)?
    {
        let path = entry.path();
        if path.is_file() {
            log::debug!("  chmod +x {}", path.display());
            fs::set_executable(&path).await?;
        }
    }

    Ok(())
}
