//! Archive, installer and payload extraction.

use crate::bundler::{ArchiveExtractor, Error, Result, utils::process};
use async_trait::async_trait;
use std::path::Path;

/// [`ArchiveExtractor`] using the zip crate for source archives and the
/// system `pkgutil`/`tar` for installers.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostArchiveExtractor;

fn extraction_error(target: &Path, detail: impl Into<String>) -> Error {
    Error::Extraction {
        target: target.to_path_buf(),
        source_url: None,
        detail: detail.into(),
    }
}

#[async_trait]
impl ArchiveExtractor for HostArchiveExtractor {
    async fn unzip(&self, archive: &Path, destination: &Path) -> Result<()> {
        let archive = archive.to_path_buf();
        let destination = destination.to_path_buf();

        tokio::task::spawn_blocking(move || {
            let file = std::fs::File::open(&archive)
                .map_err(|e| extraction_error(&archive, e.to_string()))?;
            let mut zip = zip::ZipArchive::new(file)
                .map_err(|e| extraction_error(&archive, e.to_string()))?;
            zip.extract(&destination)
                .map_err(|e| extraction_error(&archive, e.to_string()))
        })
        .await
        .map_err(|e| Error::GenericError(format!("Unzip task panicked: {}", e)))?
    }

    async fn expand_package(&self, package: &Path, destination: &Path) -> Result<()> {
        let output = process::output("pkgutil", [
            "--expand".as_ref(),
            package.as_os_str(),
            destination.as_os_str(),
        ])
        .await?;

        if !output.status.success() {
            return Err(extraction_error(package, process::stderr(&output)));
        }
        Ok(())
    }

    async fn extract_payload(&self, payload: &Path, destination: &Path) -> Result<()> {
        let output = process::output("tar", [
            "--extract".as_ref(),
            "--file".as_ref(),
            payload.as_os_str(),
            "--directory".as_ref(),
            destination.as_os_str(),
        ])
        .await?;

        if !output.status.success() {
            return Err(extraction_error(payload, process::stderr(&output)));
        }
        Ok(())
    }
}
