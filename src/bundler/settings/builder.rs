//! Builder for constructing Settings.

use super::{Settings, VersionSelector, core};
use std::path::{Path, PathBuf};

/// Builder for constructing [`Settings`].
///
/// # Examples
///
/// ```no_run
/// use baseline_builder::bundler::{SettingsBuilder, VersionSelector};
///
/// # fn example() -> baseline_builder::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .configuration_file("ripeda.mobileconfig")
///     .baseline_version(VersionSelector::Branch("main".into()))
///     .cache_swift_dialog(true)
///     .distribution(true)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    configuration_file: Option<PathBuf>,
    identifier: Option<String>,
    version: Option<String>,
    output: Option<PathBuf>,
    cache_swift_dialog: bool,
    cache_installomator: bool,
    baseline_version: VersionSelector,
    swiftdialog_version: VersionSelector,
    installomator_version: VersionSelector,
    signing_identity: Option<String>,
    distribution: bool,
    github_token: Option<String>,
    simple_mdm_icon: Option<PathBuf>,
    skip_versioning: bool,
    source_root: Option<PathBuf>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the manifest to build from.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn configuration_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.configuration_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the package bundle identifier.
    ///
    /// Default: `com.example.baseline`
    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Sets the package version.
    ///
    /// Default: `1.0.0`
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the installer output path.
    ///
    /// Default: `Baseline.pkg`
    pub fn output<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output = Some(path.as_ref().to_path_buf());
        self
    }

    /// Bundles swiftDialog's installer into the package.
    pub fn cache_swift_dialog(mut self, enabled: bool) -> Self {
        self.cache_swift_dialog = enabled;
        self
    }

    /// Bundles Installomator's installer into the package.
    pub fn cache_installomator(mut self, enabled: bool) -> Self {
        self.cache_installomator = enabled;
        self
    }

    /// Selects the Baseline release.
    pub fn baseline_version(mut self, selector: VersionSelector) -> Self {
        self.baseline_version = selector;
        self
    }

    /// Selects the swiftDialog release.
    pub fn swiftdialog_version(mut self, selector: VersionSelector) -> Self {
        self.swiftdialog_version = selector;
        self
    }

    /// Selects the Installomator release.
    pub fn installomator_version(mut self, selector: VersionSelector) -> Self {
        self.installomator_version = selector;
        self
    }

    /// Signs the package with the given Developer ID Installer identity.
    pub fn signing_identity(mut self, identity: Option<String>) -> Self {
        self.signing_identity = identity.filter(|i| !i.is_empty());
        self
    }

    /// Wraps the component package into a product archive.
    pub fn distribution(mut self, enabled: bool) -> Self {
        self.distribution = enabled;
        self
    }

    /// Sets the GitHub API token.
    ///
    /// Default: the `GITHUB_TOKEN` environment variable, if set.
    pub fn github_token(mut self, token: Option<String>) -> Self {
        self.github_token = token.filter(|t| !t.is_empty());
        self
    }

    /// Staples a placeholder app bundle carrying this icon into the package.
    pub fn simple_mdm_icon(mut self, icon: Option<PathBuf>) -> Self {
        self.simple_mdm_icon = icon;
        self
    }

    /// Controls the `Baseline-Builder` version stamp.
    ///
    /// Default: enabled
    pub fn embed_versioning(mut self, enabled: bool) -> Self {
        self.skip_versioning = !enabled;
        self
    }

    /// Sets the directory relative references are resolved against.
    ///
    /// Default: current working directory
    pub fn source_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.source_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `configuration_file` is missing or the current
    /// directory cannot be determined.
    pub fn build(self) -> crate::bundler::Result<Settings> {
        use crate::bundler::error::Context;

        let source_root = match self.source_root {
            Some(root) => root,
            None => std::env::current_dir()?,
        };

        let github_token = self
            .github_token
            .or_else(|| std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()));

        Ok(Settings::new(
            self.configuration_file
                .context("configuration_file is required")?,
            self.identifier
                .filter(|i| !i.is_empty())
                .unwrap_or_else(|| core::DEFAULT_IDENTIFIER.to_string()),
            self.version
                .unwrap_or_else(|| core::DEFAULT_VERSION.to_string()),
            self.output
                .unwrap_or_else(|| PathBuf::from(core::DEFAULT_OUTPUT)),
            self.cache_swift_dialog,
            self.cache_installomator,
            self.baseline_version,
            self.swiftdialog_version,
            self.installomator_version,
            self.signing_identity,
            self.distribution,
            github_token,
            self.simple_mdm_icon,
            !self.skip_versioning,
            source_root,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_command_line() {
        let settings = SettingsBuilder::new()
            .configuration_file("ripeda.plist")
            .source_root("/tmp")
            .build()
            .unwrap();

        assert_eq!(settings.identifier(), "com.example.baseline");
        assert_eq!(settings.version(), "1.0.0");
        assert_eq!(settings.output(), Path::new("Baseline.pkg"));
        assert_eq!(settings.baseline_version(), &VersionSelector::Latest);
        assert!(settings.embed_versioning());
        assert!(!settings.distribution());
        assert!(settings.signing_identity().is_none());
    }

    #[test]
    fn empty_identifier_falls_back_to_default() {
        let settings = SettingsBuilder::new()
            .configuration_file("ripeda.plist")
            .identifier("")
            .signing_identity(Some(String::new()))
            .source_root("/tmp")
            .build()
            .unwrap();

        assert_eq!(settings.identifier(), "com.example.baseline");
        assert!(settings.signing_identity().is_none());
    }

    #[test]
    fn configuration_file_is_required() {
        assert!(SettingsBuilder::new().source_root("/tmp").build().is_err());
    }
}
