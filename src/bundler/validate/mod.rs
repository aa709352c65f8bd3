//! Manifest and installer validation.
//!
//! The same checks run twice: once against the staging tree before the
//! package is built, and once against the payload of the finished installer.
//! [`PathLayout`] is the only difference between the two.

pub mod labels;

use crate::bundler::{
    CONFIGURATION_PATH, CORE_SCRIPT_PATH, Category, Error, HostTools, Item, LAUNCH_DAEMON_PATH,
    Manifest, PRODUCTION_ROOT, Result, Session, VersionSelector,
    platform::macos::expand_installer,
};
use std::path::{Path, PathBuf};

/// How production paths in a manifest map onto a directory on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathLayout {
    /// The root is the staging tree, i.e. `/usr/local/Baseline` itself.
    Staged,
    /// The root is an extracted payload mirroring the install layout.
    Installed,
}

impl PathLayout {
    /// Where `reference` lives under `root`.
    pub fn locate(self, root: &Path, reference: &str) -> PathBuf {
        let relative = match self {
            Self::Staged => reference.strip_prefix(PRODUCTION_ROOT).unwrap_or(reference),
            Self::Installed => reference,
        };
        root.join(relative.trim_start_matches('/'))
    }
}

/// Re-checks every claim a resolved manifest makes.
pub struct Validator<'a> {
    tools: &'a HostTools,
    session: &'a Session,
    installomator_version: &'a VersionSelector,
}

impl<'a> Validator<'a> {
    /// Creates a validator. `installomator_version` selects the label list
    /// Installomator items are checked against.
    pub fn new(
        tools: &'a HostTools,
        session: &'a Session,
        installomator_version: &'a VersionSelector,
    ) -> Self {
        Self {
            tools,
            session,
            installomator_version,
        }
    }

    /// Checks every item of `manifest` against the files under `root`.
    ///
    /// Stops at the first failure.
    pub async fn validate_manifest(
        &self,
        manifest: &Manifest,
        root: &Path,
        layout: PathLayout,
    ) -> Result<()> {
        log::info!("Validating configuration file...");

        for category in Category::ALL {
            for item in manifest.body().items(category) {
                self.validate_item(category, item, root, layout).await?;
            }
        }

        log::info!("Configuration file is valid.");
        Ok(())
    }

    async fn validate_item(
        &self,
        category: Category,
        item: &Item,
        root: &Path,
        layout: PathLayout,
    ) -> Result<()> {
        if item.display_name.is_empty() {
            return Err(Error::MissingDisplayName {
                category: category.to_string(),
            });
        }

        for (key, reference) in item.artifacts() {
            log::info!("    Validating {}: {}...", key, file_name(reference));

            let path = layout.locate(root, reference);
            if !path.exists() {
                return Err(Error::MissingFile {
                    what: key.to_string(),
                    path,
                });
            }

            let actual = self.tools.hasher.hash(&path).await?;
            if item.md5.as_deref() != Some(actual.as_str()) {
                return Err(Error::HashMismatch {
                    category: category.to_string(),
                    item: item.display_name.clone(),
                    path,
                    expected: item.md5.clone().unwrap_or_default(),
                    actual,
                });
            }

            if let Some(expected) = &item.team_id {
                let actual = self.tools.signatures.team_id(&path).await?;
                if actual.as_ref() != Some(expected) {
                    return Err(Error::TeamIdMismatch {
                        category: category.to_string(),
                        item: item.display_name.clone(),
                        path,
                        expected: expected.clone(),
                        actual,
                    });
                }
            }
        }

        if let Some(icon) = &item.icon {
            log::info!("    Validating Icon: {}...", file_name(icon));
            let path = layout.locate(root, icon);
            if !path.exists() {
                return Err(Error::MissingFile {
                    what: "Icon".into(),
                    path,
                });
            }
        }

        if category != Category::Installomator {
            return Ok(());
        }
        if let Some(label) = &item.label {
            log::info!("    Validating Installomator label: {}...", label);
            let labels = self
                .session
                .supported_labels(self.installomator_version)
                .await?;
            if !labels.contains(label) {
                return Err(Error::InvalidLabel {
                    item: item.display_name.clone(),
                    label: label.clone(),
                });
            }
        }

        Ok(())
    }

    /// Expands a finished installer and validates it.
    ///
    /// With `manifest` set (mobileconfig builds) the items are read from that
    /// file; otherwise the manifest embedded in the package is used and must
    /// exist.
    pub async fn validate_package(&self, package: &Path, manifest: Option<&Path>) -> Result<()> {
        log::info!("Performing post-build validation...");

        if !package.is_file() {
            return Err(Error::MissingFile {
                what: "pkg".into(),
                path: package.to_path_buf(),
            });
        }

        let workspace = tempfile::Builder::new()
            .prefix("baseline-validate-")
            .tempdir()?;
        let root = expand_installer(self.tools.extractor.as_ref(), package, workspace.path()).await?;

        let mut required = vec![LAUNCH_DAEMON_PATH, CORE_SCRIPT_PATH];
        if manifest.is_none() {
            required.push(CONFIGURATION_PATH);
        }
        for file in required {
            let path = PathLayout::Installed.locate(&root, file);
            if !path.exists() {
                return Err(Error::MissingFile {
                    what: "file in pkg".into(),
                    path,
                });
            }
            if file.ends_with(".plist") {
                plist::Value::from_file(&path).map_err(|e| {
                    Error::MalformedManifest(format!("{}: {}", path.display(), e))
                })?;
            }
        }

        let manifest_path = match manifest {
            Some(path) => path.to_path_buf(),
            None => PathLayout::Installed.locate(&root, CONFIGURATION_PATH),
        };
        let manifest = Manifest::load(&manifest_path).await?;
        self.validate_manifest(&manifest, &root, PathLayout::Installed)
            .await?;

        log::info!("Post-build validation complete.");
        Ok(())
    }
}

fn file_name(reference: &str) -> String {
    Path::new(reference)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| reference.to_string())
}
