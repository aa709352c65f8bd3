//! Manifest documents: flat property lists and mobileconfig wrappers.

use super::{Category, DialogOption, Item};
use crate::bundler::{Error, Result, error::ErrorExt};
use plist::{Dictionary, Value};
use std::io::Cursor;
use std::path::Path;

/// Top-level key of the version stamp dictionary.
pub const STAMP_KEY: &str = "Baseline-Builder";

/// On-disk shape of a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    /// Baseline configuration keys at the top level.
    PropertyList,
    /// Configuration profile; the keys live in `PayloadContent[0]`.
    MobileConfig,
}

impl ManifestFormat {
    /// Detects the format from the file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("mobileconfig") => Self::MobileConfig,
            _ => Self::PropertyList,
        }
    }
}

/// The Baseline configuration keys, wherever they live in the document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ManifestBody {
    initial_scripts: Vec<Item>,
    installomator: Vec<Item>,
    packages: Vec<Item>,
    scripts: Vec<Item>,
    dialog_list_options: Option<String>,
    dialog_success_options: Option<String>,
    dialog_failure_options: Option<String>,
    raw: Dictionary,
}

impl ManifestBody {
    /// Parses the configuration keys, validating every item.
    pub fn from_dictionary(dict: &Dictionary) -> Result<Self> {
        let mut body = Self {
            raw: dict.clone(),
            ..Default::default()
        };

        for category in Category::ALL {
            let Some(value) = dict.get(category.key()) else {
                continue;
            };
            let entries = value.as_array().ok_or_else(|| {
                Error::MalformedManifest(format!("{category} must be an array"))
            })?;
            *body.items_mut(category) = entries
                .iter()
                .map(|entry| Item::from_value(category, entry))
                .collect::<Result<_>>()?;
        }

        for option in DialogOption::ALL {
            match dict.get(option.key()) {
                None => {}
                Some(Value::String(s)) => body.set_dialog(option, Some(s.clone())),
                Some(_) => {
                    return Err(Error::MalformedManifest(format!(
                        "{} must be a string",
                        option.key()
                    )));
                }
            }
        }

        Ok(body)
    }

    /// Serializes the body, keeping uninterpreted keys in place.
    pub fn to_dictionary(&self) -> Dictionary {
        let mut dict = self.raw.clone();

        for category in Category::ALL {
            let items = self.items(category);
            if items.is_empty() && !dict.contains_key(category.key()) {
                continue;
            }
            let values = items
                .iter()
                .map(|item| Value::Dictionary(item.to_dictionary()))
                .collect();
            dict.insert(category.key().to_string(), Value::Array(values));
        }

        for option in DialogOption::ALL {
            match self.dialog(option) {
                Some(s) => {
                    dict.insert(option.key().to_string(), Value::String(s.to_string()));
                }
                None => {
                    dict.remove(option.key());
                }
            }
        }

        dict
    }

    /// Items declared under a category.
    pub fn items(&self, category: Category) -> &[Item] {
        match category {
            Category::InitialScripts => &self.initial_scripts,
            Category::Installomator => &self.installomator,
            Category::Packages => &self.packages,
            Category::Scripts => &self.scripts,
        }
    }

    /// Mutable access to the items of a category.
    pub fn items_mut(&mut self, category: Category) -> &mut Vec<Item> {
        match category {
            Category::InitialScripts => &mut self.initial_scripts,
            Category::Installomator => &mut self.installomator,
            Category::Packages => &mut self.packages,
            Category::Scripts => &mut self.scripts,
        }
    }

    /// A dialog option string.
    pub fn dialog(&self, option: DialogOption) -> Option<&str> {
        match option {
            DialogOption::List => self.dialog_list_options.as_deref(),
            DialogOption::Success => self.dialog_success_options.as_deref(),
            DialogOption::Failure => self.dialog_failure_options.as_deref(),
        }
    }

    /// Replaces a dialog option string.
    pub fn set_dialog(&mut self, option: DialogOption, value: Option<String>) {
        let slot = match option {
            DialogOption::List => &mut self.dialog_list_options,
            DialogOption::Success => &mut self.dialog_success_options,
            DialogOption::Failure => &mut self.dialog_failure_options,
        };
        *slot = value;
    }

    fn set_raw(&mut self, key: &str, value: Value) {
        self.raw.insert(key.to_string(), value);
    }
}

/// A parsed manifest document.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    format: ManifestFormat,
    body: ManifestBody,
    // Profile wrapper for mobileconfig documents; empty for property lists.
    envelope: Dictionary,
}

impl Manifest {
    /// Parses a document already decoded into a plist value.
    pub fn from_value(format: ManifestFormat, value: Value) -> Result<Self> {
        let Value::Dictionary(top) = value else {
            return Err(Error::MalformedManifest(
                "top level must be a dictionary".into(),
            ));
        };

        match format {
            ManifestFormat::PropertyList => Ok(Self {
                format,
                body: ManifestBody::from_dictionary(&top)?,
                envelope: Dictionary::new(),
            }),
            ManifestFormat::MobileConfig => {
                let payload = top
                    .get("PayloadContent")
                    .and_then(Value::as_array)
                    .and_then(|content| content.first())
                    .and_then(Value::as_dictionary)
                    .ok_or_else(|| {
                        Error::MalformedManifest(
                            "mobileconfig has no dictionary at PayloadContent[0]".into(),
                        )
                    })?;
                Ok(Self {
                    format,
                    body: ManifestBody::from_dictionary(payload)?,
                    envelope: top,
                })
            }
        }
    }

    /// Parses raw property-list bytes (XML or binary).
    pub fn from_bytes(format: ManifestFormat, bytes: &[u8]) -> Result<Self> {
        let value = Value::from_reader(Cursor::new(bytes))?;
        Self::from_value(format, value)
    }

    /// Reads a manifest from disk, detecting the format from its extension.
    pub async fn load(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .fs_context("reading configuration file", path)?;
        Self::from_bytes(ManifestFormat::from_path(path), &bytes)
    }

    /// Writes the manifest as an XML property list.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let mut buffer = Vec::new();
        self.to_value().to_writer_xml(&mut buffer)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .fs_context("creating configuration directory", parent)?;
        }
        tokio::fs::write(path, buffer)
            .await
            .fs_context("writing configuration file", path)?;
        Ok(())
    }

    /// Rebuilds the full document.
    pub fn to_value(&self) -> Value {
        let body = Value::Dictionary(self.body.to_dictionary());
        match self.format {
            ManifestFormat::PropertyList => body,
            ManifestFormat::MobileConfig => {
                let mut top = self.envelope.clone();
                let mut content = top
                    .get("PayloadContent")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();
                if content.is_empty() {
                    content.push(body);
                } else {
                    content[0] = body;
                }
                top.insert("PayloadContent".to_string(), Value::Array(content));
                Value::Dictionary(top)
            }
        }
    }

    /// Document shape.
    pub fn format(&self) -> ManifestFormat {
        self.format
    }

    /// Baseline configuration keys.
    pub fn body(&self) -> &ManifestBody {
        &self.body
    }

    /// Mutable Baseline configuration keys.
    pub fn body_mut(&mut self) -> &mut ManifestBody {
        &mut self.body
    }

    /// Writes a top-level `Baseline-Builder` dictionary.
    ///
    /// For mobileconfig documents the stamp sits beside `PayloadContent`,
    /// outside the payload Baseline reads.
    pub fn set_stamp(&mut self, stamp: Dictionary) {
        let value = Value::Dictionary(stamp);
        match self.format {
            ManifestFormat::PropertyList => self.body.set_raw(STAMP_KEY, value),
            ManifestFormat::MobileConfig => {
                self.envelope.insert(STAMP_KEY.to_string(), value);
            }
        }
    }

    /// The `Baseline-Builder` dictionary, if present.
    pub fn stamp(&self) -> Option<&Dictionary> {
        let top = match self.format {
            ManifestFormat::PropertyList => &self.body.raw,
            ManifestFormat::MobileConfig => &self.envelope,
        };
        top.get(STAMP_KEY).and_then(Value::as_dictionary)
    }
}
