//! Process-wide build state.

use crate::bundler::{
    Result, VersionSelector, utils::http::HttpClient, validate::labels::LabelCatalog,
};
use std::collections::BTreeSet;
use std::path::Path;
use tempfile::TempDir;

/// State shared by every build and validation in one process.
///
/// Owns the download cache, so a second build in the same run reuses the
/// Baseline archive and helper packages fetched by the first, and the
/// Installomator label list, which is fetched at most once.
#[derive(Debug)]
pub struct Session {
    cache: TempDir,
    http: HttpClient,
    labels: LabelCatalog,
}

impl Session {
    /// Creates a session whose GitHub API calls carry `github_token`.
    pub fn new(github_token: Option<String>) -> Result<Self> {
        Self::with_http(HttpClient::new(github_token)?)
    }

    /// Creates a session around an existing HTTP client.
    pub fn with_http(http: HttpClient) -> Result<Self> {
        let cache = tempfile::Builder::new()
            .prefix("baseline-cache-")
            .tempdir()?;
        log::debug!("Download cache: {}", cache.path().display());

        Ok(Self {
            cache,
            http,
            labels: LabelCatalog::new(),
        })
    }

    /// Replaces the label catalog with a fixed set of labels.
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = LabelCatalog::preloaded(labels);
        self
    }

    /// Directory holding downloaded artifacts for the life of the session.
    pub fn cache_dir(&self) -> &Path {
        self.cache.path()
    }

    /// Client for release lookups and downloads.
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Installomator labels supported by `version`.
    pub async fn supported_labels(&self, version: &VersionSelector) -> Result<&BTreeSet<String>> {
        self.labels.get(&self.http, version, self.cache.path()).await
    }
}
