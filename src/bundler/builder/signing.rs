//! Package signature inspection.
//!
//! Baseline refuses to install a package whose signing team differs from the
//! `TeamID` recorded in its configuration, so the builder records the team
//! of every Developer ID Installer signed package it stages.

use crate::bundler::{Result, SignatureInspector, utils::process};
use async_trait::async_trait;
use std::path::Path;

const DEVELOPER_ID_INSTALLER: &str = "Developer ID Installer: ";

/// Extracts the team ID from `pkgutil --check-signature` output.
///
/// The certificate chain lists the leaf as
/// `1. Developer ID Installer: Example Corp (ABCDE12345)`; the parenthesized
/// suffix is the team ID. Any other signer yields `None`.
pub fn parse_team_id(check_signature_output: &str) -> Option<String> {
    check_signature_output
        .lines()
        .filter(|line| line.contains(DEVELOPER_ID_INSTALLER))
        .find_map(|line| {
            let open = line.rfind('(')?;
            let close = open + line[open..].find(')')?;
            let team = line[open + 1..close].trim();
            (!team.is_empty()).then(|| team.to_string())
        })
}

/// [`SignatureInspector`] backed by `pkgutil --check-signature`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PkgutilSignatureInspector;

#[async_trait]
impl SignatureInspector for PkgutilSignatureInspector {
    async fn team_id(&self, package: &Path) -> Result<Option<String>> {
        log::info!(
            "    Determining Team ID for: {}...",
            package.file_name().unwrap_or_default().to_string_lossy()
        );

        if package.extension().and_then(|e| e.to_str()) != Some("pkg") {
            return Ok(None);
        }

        // Unsigned packages exit non-zero; the output is still what we parse.
        let output = process::output("pkgutil", [
            std::ffi::OsStr::new("--check-signature"),
            package.as_os_str(),
        ])
        .await?;
        Ok(parse_team_id(&String::from_utf8_lossy(&output.stdout)))
    }
}
