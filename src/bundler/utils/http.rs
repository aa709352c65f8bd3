//! HTTP utilities for talking to the release host.

use crate::bundler::error::{Error, ErrorExt, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::path::Path;

/// User agent sent with every request; the GitHub API rejects anonymous agents.
const USER_AGENT: &str = concat!("baseline-builder/", env!("CARGO_PKG_VERSION"));

/// HTTP client that authenticates GitHub API calls when a token is available.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    token: Option<String>,
}

impl HttpClient {
    /// Creates a client, optionally carrying a GitHub token.
    pub fn new(token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client, token })
    }

    /// Whether the URL is a GitHub API endpoint that should carry the token.
    fn is_api(url: &str) -> bool {
        url.contains("api.github.com")
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.client.get(url);
        match &self.token {
            Some(token) if Self::is_api(url) => {
                request.header(reqwest::header::AUTHORIZATION, format!("token {token}"))
            }
            _ => request,
        }
    }

    /// Fetches and decodes a JSON document, failing on any non-200 status.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        log::debug!("GET {}", url);
        let response = self.get(url).send().await?;
        if response.status() != StatusCode::OK {
            return Err(Error::ApiStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(response.json().await?)
    }

    /// Fetches a text document, failing on any non-200 status.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        log::debug!("GET {}", url);
        let response = self.get(url).send().await?;
        if response.status() != StatusCode::OK {
            return Err(Error::ApiStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(response.text().await?)
    }

    /// Downloads a file, following redirects, and writes it to `destination`.
    pub async fn download(&self, url: &str, destination: &Path) -> Result<()> {
        log::info!("  Downloading {}", url);

        let response = self.get(url).send().await?;
        if !response.status().is_success() {
            return Err(Error::ApiStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        tokio::fs::write(destination, &bytes)
            .await
            .fs_context("writing download", destination)?;
        Ok(())
    }
}
