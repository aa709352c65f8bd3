//! Manifest items and the categories holding them.

use crate::bundler::{Error, Result};
use plist::{Dictionary, Value};
use std::fmt;

/// Top-level manifest keys holding lists of [`Item`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Scripts run before anything else.
    InitialScripts,
    /// Installomator labels to install.
    Installomator,
    /// Installer packages to install.
    Packages,
    /// Scripts to run.
    Scripts,
}

impl Category {
    /// Every category, in processing order.
    pub const ALL: [Category; 4] = [
        Category::InitialScripts,
        Category::Installomator,
        Category::Packages,
        Category::Scripts,
    ];

    /// Manifest key for this category.
    pub fn key(self) -> &'static str {
        match self {
            Self::InitialScripts => "InitialScripts",
            Self::Installomator => "Installomator",
            Self::Packages => "Packages",
            Self::Scripts => "Scripts",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Top-level argument strings passed to swiftDialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOption {
    /// Options for the progress list dialog.
    List,
    /// Options for the success dialog.
    Success,
    /// Options for the failure dialog.
    Failure,
}

impl DialogOption {
    /// Every dialog option, in processing order.
    pub const ALL: [DialogOption; 3] = [
        DialogOption::List,
        DialogOption::Success,
        DialogOption::Failure,
    ];

    /// Manifest key for this option string.
    pub fn key(self) -> &'static str {
        match self {
            Self::List => "DialogListOptions",
            Self::Success => "DialogSuccessOptions",
            Self::Failure => "DialogFailureOptions",
        }
    }
}

const DISPLAY_NAME: &str = "DisplayName";
const ICON: &str = "Icon";
const SCRIPT_PATH: &str = "ScriptPath";
const PACKAGE_PATH: &str = "PackagePath";
const ARGUMENTS: &str = "Arguments";
const LABEL: &str = "Label";
const MD5: &str = "MD5";
const TEAM_ID: &str = "TeamID";

/// One installable unit within a manifest category.
///
/// Keys this crate does not interpret are kept verbatim and written back in
/// their original order.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Label shown to the user and used in log and error messages.
    pub display_name: String,
    /// Icon shown next to the item.
    pub icon: Option<String>,
    /// Script to run.
    pub script_path: Option<String>,
    /// Installer package to install.
    pub package_path: Option<String>,
    /// Shell-style argument string.
    pub arguments: Option<String>,
    /// Installomator label.
    pub label: Option<String>,
    /// MD5 of the staged script or package.
    pub md5: Option<String>,
    /// Developer ID team of the staged package.
    pub team_id: Option<String>,
    raw: Dictionary,
}

impl Item {
    /// Creates an item with only a display name.
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            icon: None,
            script_path: None,
            package_path: None,
            arguments: None,
            label: None,
            md5: None,
            team_id: None,
            raw: Dictionary::new(),
        }
    }

    /// Parses an item, rejecting it if `DisplayName` is absent.
    pub fn from_value(category: Category, value: &Value) -> Result<Self> {
        let dict = value.as_dictionary().ok_or_else(|| {
            Error::MalformedManifest(format!("{category} entries must be dictionaries"))
        })?;

        let display_name = match dict.get(DISPLAY_NAME) {
            Some(Value::String(name)) => name.clone(),
            Some(_) => {
                return Err(Error::MalformedManifest(format!(
                    "DisplayName in {category} item must be a string"
                )));
            }
            None => {
                return Err(Error::MissingDisplayName {
                    category: category.to_string(),
                });
            }
        };

        let field = |key: &str| -> Result<Option<String>> {
            match dict.get(key) {
                None => Ok(None),
                Some(Value::String(s)) => Ok(Some(s.clone())),
                Some(_) => Err(Error::MalformedManifest(format!(
                    "{key} of {category} item '{display_name}' must be a string"
                ))),
            }
        };

        Ok(Self {
            icon: field(ICON)?,
            script_path: field(SCRIPT_PATH)?,
            package_path: field(PACKAGE_PATH)?,
            arguments: field(ARGUMENTS)?,
            label: field(LABEL)?,
            md5: field(MD5)?,
            team_id: field(TEAM_ID)?,
            raw: dict.clone(),
            display_name,
        })
    }

    /// Serializes the item back into a dictionary.
    pub fn to_dictionary(&self) -> Dictionary {
        let mut dict = self.raw.clone();
        dict.insert(DISPLAY_NAME.to_string(), Value::String(self.display_name.clone()));

        for (key, value) in [
            (ICON, &self.icon),
            (SCRIPT_PATH, &self.script_path),
            (PACKAGE_PATH, &self.package_path),
            (ARGUMENTS, &self.arguments),
            (LABEL, &self.label),
            (MD5, &self.md5),
            (TEAM_ID, &self.team_id),
        ] {
            match value {
                Some(v) => {
                    dict.insert(key.to_string(), Value::String(v.clone()));
                }
                None => {
                    dict.remove(key);
                }
            }
        }

        dict
    }

    /// The script or package this item points at, with its manifest key.
    pub fn artifacts(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            (SCRIPT_PATH, self.script_path.as_deref()),
            (PACKAGE_PATH, self.package_path.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, path)| path.map(|p| (key, p)))
    }
}
