//! Version selectors for fetched dependencies.

use std::fmt;
use std::str::FromStr;

/// Which release of an upstream dependency to fetch.
///
/// Parsed from the strings accepted on the command line:
///
/// - `latest` - newest published release
/// - `branch: <name>` - source archive of a branch head (Baseline only)
/// - anything else - an explicit release tag
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VersionSelector {
    /// Newest published release.
    #[default]
    Latest,
    /// Explicit release tag, e.g. `v2.0`.
    Tag(String),
    /// Head of a branch, e.g. `main`.
    Branch(String),
}

impl VersionSelector {
    /// Version known before any network lookup.
    ///
    /// `latest` is only known once the release API answers.
    pub fn pinned(&self) -> Option<String> {
        match self {
            Self::Latest => None,
            other => Some(other.to_string()),
        }
    }
}

impl FromStr for VersionSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("version selector cannot be empty".to_string());
        }
        if s == "latest" {
            return Ok(Self::Latest);
        }
        if let Some(branch) = s.strip_prefix("branch:") {
            let branch = branch.trim();
            if branch.is_empty() {
                return Err(format!("missing branch name in '{s}'"));
            }
            return Ok(Self::Branch(branch.to_string()));
        }
        Ok(Self::Tag(s.to_string()))
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str("latest"),
            Self::Tag(tag) => f.write_str(tag),
            Self::Branch(branch) => write!(f, "branch: {branch}"),
        }
    }
}
