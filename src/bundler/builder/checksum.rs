//! Artifact checksum calculation.
//!
//! Baseline verifies every script and package against the MD5 recorded in
//! its configuration before running it, so the builder records the same
//! digest over the staged bytes.

use crate::bundler::{ContentHasher, Result, error::ErrorExt};
use async_trait::async_trait;
use std::path::Path;

/// Calculates the MD5 checksum of a file.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded MD5 digest (32 characters)
/// * `Err` - If the file cannot be read
pub async fn calculate_md5(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .fs_context("reading file for hash calculation", path)?;
    Ok(format!("{:x}", md5::compute(&bytes)))
}

/// In-process [`ContentHasher`] producing MD5 digests.
#[derive(Debug, Default, Clone, Copy)]
pub struct Md5Hasher;

#[async_trait]
impl ContentHasher for Md5Hasher {
    async fn hash(&self, path: &Path) -> Result<String> {
        log::info!(
            "    Calculating MD5 for: {}...",
            path.file_name().unwrap_or_default().to_string_lossy()
        );
        calculate_md5(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn matches_known_digest() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("setup.sh");
        std::fs::write(&file, b"hello world").unwrap();

        let digest = Md5Hasher.hash(&file).await.unwrap();
        assert_eq!(digest, "5eb63bbbe01eeed093cb22bb8f5acdc3");
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(calculate_md5(&dir.path().join("nope")).await.is_err());
    }
}
