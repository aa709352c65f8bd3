//! Download cache lookups.
//!
//! Artifacts are looked for in the session cache first, then in the source
//! root, so a build can be run offline by dropping `Baseline.zip` or a
//! helper `.pkg` next to the configuration.

use crate::bundler::{Result, utils::fs, utils::http::HttpClient};
use std::path::{Path, PathBuf};

/// First existing copy of `name` in the cache or the source root.
pub fn find_cached(name: &str, cache_dir: &Path, source_root: &Path) -> Option<PathBuf> {
    [cache_dir.join(name), source_root.join(name)]
        .into_iter()
        .find(|candidate| candidate.is_file())
}

/// Copies a cached `name` to `destination`, returning whether one was found.
pub async fn restore(
    name: &str,
    cache_dir: &Path,
    source_root: &Path,
    destination: &Path,
) -> Result<bool> {
    let Some(cached) = find_cached(name, cache_dir, source_root) else {
        return Ok(false);
    };
    log::info!("  Using existing {}: {}", name, cached.display());
    fs::copy_file(&cached, destination).await?;
    Ok(true)
}

/// Downloads `url` into the cache as `name`, then copies it to `destination`.
pub async fn download(
    http: &HttpClient,
    url: &str,
    name: &str,
    cache_dir: &Path,
    destination: &Path,
) -> Result<()> {
    let cached = cache_dir.join(name);
    http.download(url, &cached).await?;
    fs::copy_file(&cached, destination).await
}
