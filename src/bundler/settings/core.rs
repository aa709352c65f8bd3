//! Core Settings struct and implementations.

use super::VersionSelector;
use std::path::{Path, PathBuf};

/// Default bundle identifier when none is given.
pub const DEFAULT_IDENTIFIER: &str = "com.example.baseline";

/// Default package version.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Default installer output path.
pub const DEFAULT_OUTPUT: &str = "Baseline.pkg";

/// Main settings for a Baseline build.
///
/// Constructed via [`SettingsBuilder`](super::SettingsBuilder). Only the
/// configuration file is required; every other field has the defaults the
/// command line advertises.
///
/// # Examples
///
/// ```no_run
/// use baseline_builder::bundler::SettingsBuilder;
///
/// # fn example() -> baseline_builder::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .configuration_file("ripeda.plist")
///     .identifier("com.ripeda.baseline.engineering")
///     .output("RIPEDA Baseline.pkg")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    configuration_file: PathBuf,
    identifier: String,
    version: String,
    output: PathBuf,
    cache_swift_dialog: bool,
    cache_installomator: bool,
    baseline_version: VersionSelector,
    swiftdialog_version: VersionSelector,
    installomator_version: VersionSelector,
    signing_identity: Option<String>,
    distribution: bool,
    github_token: Option<String>,
    simple_mdm_icon: Option<PathBuf>,
    embed_versioning: bool,
    source_root: PathBuf,
}

impl Settings {
    /// Manifest the build starts from.
    pub fn configuration_file(&self) -> &Path {
        &self.configuration_file
    }

    /// Package bundle identifier.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Package version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Where the finished installer is written.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Whether swiftDialog's installer is bundled into `Packages/`.
    pub fn cache_swift_dialog(&self) -> bool {
        self.cache_swift_dialog
    }

    /// Whether Installomator's installer is bundled into `Packages/`.
    pub fn cache_installomator(&self) -> bool {
        self.cache_installomator
    }

    /// Baseline release to fetch.
    pub fn baseline_version(&self) -> &VersionSelector {
        &self.baseline_version
    }

    /// swiftDialog release to fetch.
    pub fn swiftdialog_version(&self) -> &VersionSelector {
        &self.swiftdialog_version
    }

    /// Installomator release to fetch and validate labels against.
    pub fn installomator_version(&self) -> &VersionSelector {
        &self.installomator_version
    }

    /// Developer ID Installer identity used to sign the package.
    pub fn signing_identity(&self) -> Option<&str> {
        self.signing_identity.as_deref()
    }

    /// Whether the component package is wrapped in a product archive.
    pub fn distribution(&self) -> bool {
        self.distribution
    }

    /// GitHub API token.
    pub fn github_token(&self) -> Option<&str> {
        self.github_token.as_deref()
    }

    /// Icon stapled into a placeholder app bundle for SimpleMDM.
    pub fn simple_mdm_icon(&self) -> Option<&Path> {
        self.simple_mdm_icon.as_deref()
    }

    /// Whether the `Baseline-Builder` version stamp is written.
    pub fn embed_versioning(&self) -> bool {
        self.embed_versioning
    }

    /// Directory relative manifest references are resolved against.
    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        configuration_file: PathBuf,
        identifier: String,
        version: String,
        output: PathBuf,
        cache_swift_dialog: bool,
        cache_installomator: bool,
        baseline_version: VersionSelector,
        swiftdialog_version: VersionSelector,
        installomator_version: VersionSelector,
        signing_identity: Option<String>,
        distribution: bool,
        github_token: Option<String>,
        simple_mdm_icon: Option<PathBuf>,
        embed_versioning: bool,
        source_root: PathBuf,
    ) -> Self {
        Self {
            configuration_file,
            identifier,
            version,
            output,
            cache_swift_dialog,
            cache_installomator,
            baseline_version,
            swiftdialog_version,
            installomator_version,
            signing_identity,
            distribution,
            github_token,
            simple_mdm_icon,
            embed_versioning,
            source_root,
        }
    }
}
