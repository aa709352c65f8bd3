//! Installomator label catalog.
//!
//! Installomator has no machine-readable label list. Its own argument check
//! greps the `case` arms of the script, so we do the same: a line consisting
//! only of a label followed by `)`, `|` or `\` opens a label block.

use crate::bundler::{Error, Result, VersionSelector, error::ErrorExt, utils::http::HttpClient};
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use tokio::sync::OnceCell;

const LABEL_LINE: &str = r"^[a-z0-9_-]*(\)|\||\\)$";

/// Arms of the label `case` that are not installable labels.
const RESERVED: [&str; 2] = ["longversion", "version"];

/// Where `Installomator.sh` is downloaded from for a version selector.
pub fn label_script_url(version: &VersionSelector) -> String {
    let reference = match version {
        VersionSelector::Latest => "main",
        VersionSelector::Tag(tag) => tag,
        VersionSelector::Branch(branch) => branch,
    };
    format!("https://raw.githubusercontent.com/Installomator/Installomator/{reference}/Installomator.sh")
}

/// Extracts the supported labels from the text of `Installomator.sh`.
pub fn parse_labels(script: &str) -> Result<BTreeSet<String>> {
    let pattern = Regex::new(LABEL_LINE)
        .map_err(|e| Error::GenericError(format!("Invalid label pattern: {e}")))?;

    Ok(script
        .lines()
        .filter(|line| pattern.is_match(line))
        .map(|line| line.replace([')', '|', '\\'], ""))
        .filter(|label| !label.is_empty())
        .filter(|label| !RESERVED.contains(&label.as_str()))
        .filter(|label| !label.starts_with("broken"))
        .collect())
}

/// Supported labels, fetched at most once per session.
#[derive(Debug, Default)]
pub struct LabelCatalog {
    labels: OnceCell<BTreeSet<String>>,
}

impl LabelCatalog {
    /// Creates an empty catalog that fetches on first use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog that never fetches.
    pub fn preloaded<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: OnceCell::new_with(Some(labels.into_iter().map(Into::into).collect())),
        }
    }

    /// Returns the label set, downloading `Installomator.sh` into `cache_dir`
    /// on first call.
    ///
    /// The first successful fetch wins; later calls with another version
    /// reuse it.
    pub async fn get(
        &self,
        http: &HttpClient,
        version: &VersionSelector,
        cache_dir: &Path,
    ) -> Result<&BTreeSet<String>> {
        self.labels
            .get_or_try_init(|| async {
                let url = label_script_url(version);
                log::info!("    Fetching Installomator labels: {}...", version);

                let script = http.get_text(&url).await?;
                let cached = cache_dir.join("Installomator.sh");
                tokio::fs::write(&cached, &script)
                    .await
                    .fs_context("writing Installomator.sh", &cached)?;

                let labels = parse_labels(&script)?;
                log::debug!("    {} Installomator labels available", labels.len());
                Ok(labels)
            })
            .await
    }
}
