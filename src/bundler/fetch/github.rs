//! GitHub release lookup.

use crate::bundler::{Error, Result, VersionSelector, utils::http::HttpClient};
use serde::Deserialize;

/// A GitHub repository publishing releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Repository {
    /// Account or organization.
    pub owner: &'static str,
    /// Repository name.
    pub name: &'static str,
}

/// The Baseline agent.
pub const BASELINE: Repository = Repository {
    owner: "secondsonconsulting",
    name: "Baseline",
};

/// swiftDialog, the UI Baseline drives.
pub const SWIFT_DIALOG: Repository = Repository {
    owner: "swiftDialog",
    name: "swiftDialog",
};

/// Installomator, the installer Baseline runs for `Installomator` items.
pub const INSTALLOMATOR: Repository = Repository {
    owner: "Installomator",
    name: "Installomator",
};

/// Which download a release lookup returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// The source zipball GitHub generates for the tag.
    SourceArchive,
    /// The first uploaded asset, e.g. a signed `.pkg`.
    FirstAsset,
}

/// Where to download a release from, and what version that is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// Direct download URL.
    pub download_url: String,
    /// Release tag, when it came from the releases API.
    pub tag: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReleaseResponse {
    tag_name: Option<String>,
    zipball_url: Option<String>,
    #[serde(default)]
    assets: Vec<AssetResponse>,
}

#[derive(Debug, Deserialize)]
struct AssetResponse {
    browser_download_url: Option<String>,
}

impl Repository {
    /// Releases API endpoint for a version selector.
    pub fn release_api_url(&self, version: &VersionSelector) -> Result<String> {
        let base = format!(
            "https://api.github.com/repos/{}/{}/releases",
            self.owner, self.name
        );
        match version {
            VersionSelector::Latest => Ok(format!("{base}/latest")),
            VersionSelector::Tag(tag) => Ok(format!("{base}/tags/{tag}")),
            VersionSelector::Branch(branch) => Err(Error::GenericError(format!(
                "{} has no release for branch '{}'; pin a tag or use latest",
                self.name, branch
            ))),
        }
    }

    /// Source archive of a branch head.
    pub fn branch_archive_url(&self, branch: &str) -> String {
        format!(
            "https://github.com/{}/{}/archive/refs/heads/{}.zip",
            self.owner, self.name, branch
        )
    }
}

impl Release {
    fn from_response(url: &str, response: ReleaseResponse, kind: AssetKind) -> Result<Self> {
        let missing = |field| Error::MissingField {
            url: url.to_string(),
            field,
        };

        let download_url = match kind {
            AssetKind::SourceArchive => response.zipball_url.ok_or_else(|| missing("zipball_url"))?,
            AssetKind::FirstAsset => response
                .assets
                .into_iter()
                .next()
                .ok_or_else(|| missing("assets"))?
                .browser_download_url
                .ok_or_else(|| missing("browser_download_url"))?,
        };

        Ok(Self {
            download_url,
            tag: response.tag_name,
        })
    }
}

/// Resolves the download for `version` of `repository`.
///
/// Branch selectors on source archives skip the API entirely and carry no
/// tag.
pub async fn lookup_release(
    http: &HttpClient,
    repository: Repository,
    version: &VersionSelector,
    kind: AssetKind,
) -> Result<Release> {
    if let (VersionSelector::Branch(branch), AssetKind::SourceArchive) = (version, kind) {
        return Ok(Release {
            download_url: repository.branch_archive_url(branch),
            tag: None,
        });
    }

    let url = repository.release_api_url(version)?;
    let response: ReleaseResponse = http.get_json(&url).await?;
    Release::from_response(&url, response, kind)
}
