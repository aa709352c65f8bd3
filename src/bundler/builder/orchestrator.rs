//! Main build orchestration.
//!
//! This module provides the [`Builder`] that runs the pipeline from a
//! configuration file to a validated installer package.

use crate::bundler::{
    CONFIGURATION_PATH, CORE_SCRIPT_PATH, Error, HostTools, LAUNCH_DAEMON_PATH, Manifest,
    ManifestFormat, PRODUCTION_ROOT, PackageRequest, Result, Session, Settings,
    fetch::{Fetcher, github},
    platform::macos,
    resolve::{Resolver, Staging, StagingKind, VersionStamp},
    validate::{PathLayout, Validator},
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use super::tool_detection::warn_missing_host_tools;

/// What a successful build produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    /// The installer package.
    pub package: PathBuf,
    /// The resolved manifest as written.
    pub manifest: PathBuf,
    /// Format of the input configuration.
    pub format: ManifestFormat,
}

impl BuildOutcome {
    /// Manifest that validation must read instead of the one embedded in the
    /// package. Mobileconfig builds ship the profile separately.
    pub fn external_manifest(&self) -> Option<&Path> {
        match self.format {
            ManifestFormat::MobileConfig => Some(&self.manifest),
            ManifestFormat::PropertyList => None,
        }
    }
}

/// Builds one Baseline installer.
///
/// Owns its staging directory, which is removed when the builder is dropped
/// whether or not the build succeeded.
///
/// # Examples
///
/// ```no_run
/// use baseline_builder::bundler::{Builder, HostTools, Session, SettingsBuilder};
/// use std::sync::Arc;
///
/// # async fn example() -> baseline_builder::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .configuration_file("BaselineConfig.plist")
///     .identifier("com.example.baseline")
///     .build()?;
///
/// let session = Arc::new(Session::new(settings.github_token().map(String::from))?);
/// let builder = Builder::new(settings, session, HostTools::system())?;
/// let outcome = builder.build().await?;
/// builder
///     .validate_package(&outcome.package, outcome.external_manifest())
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct Builder {
    settings: Settings,
    session: Arc<Session>,
    tools: HostTools,
    build_dir: TempDir,
}

impl std::fmt::Debug for Builder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder")
            .field("settings", &self.settings)
            .field("build_dir", &self.build_dir.path())
            .finish_non_exhaustive()
    }
}

impl Builder {
    /// Creates a builder with a fresh staging directory.
    pub fn new(settings: Settings, session: Arc<Session>, tools: HostTools) -> Result<Self> {
        warn_missing_host_tools();

        let build_dir = tempfile::Builder::new()
            .prefix("baseline-build-")
            .tempdir()?;
        log::debug!("Staging directory: {}", build_dir.path().display());

        Ok(Self {
            settings,
            session,
            tools,
            build_dir,
        })
    }

    /// Staging directory standing in for `/usr/local/Baseline`.
    pub fn build_dir(&self) -> &Path {
        self.build_dir.path()
    }

    /// Runs the full pipeline and writes the package to the configured
    /// output path.
    pub async fn build(&self) -> Result<BuildOutcome> {
        let settings = &self.settings;
        let build_dir = self.build_dir.path();
        let source_root = settings.source_root();

        let manifest = Manifest::load(settings.configuration_file()).await?;

        let fetcher = Fetcher::new(&self.session, self.tools.extractor.as_ref(), source_root);
        let (baseline, baseline_version) = fetcher
            .fetch_baseline(settings.baseline_version(), build_dir)
            .await?;

        let staging = Staging::new(build_dir, source_root);
        let packages_dir = staging.dir(StagingKind::Packages);

        let swift_dialog_version = if settings.cache_swift_dialog() {
            fetcher
                .fetch_package(github::SWIFT_DIALOG, settings.swiftdialog_version(), &packages_dir)
                .await?
        } else {
            None
        };
        let installomator_version = if settings.cache_installomator() {
            fetcher
                .fetch_package(
                    github::INSTALLOMATOR,
                    settings.installomator_version(),
                    &packages_dir,
                )
                .await?
        } else {
            None
        };

        let mut resolved = Resolver::new(&staging, &self.tools).resolve(&manifest).await?;
        if settings.embed_versioning() {
            resolved.set_stamp(
                VersionStamp {
                    project_version: settings.version().to_string(),
                    project_identifier: settings.identifier().to_string(),
                    baseline: baseline_version,
                    swift_dialog: swift_dialog_version,
                    installomator: installomator_version,
                }
                .to_dictionary(),
            );
        }

        let manifest_path = match resolved.format() {
            ManifestFormat::PropertyList => baseline.configuration(),
            ManifestFormat::MobileConfig => {
                resolved_profile_path(settings.output(), settings.configuration_file())
            }
        };
        resolved.save(&manifest_path).await?;
        log::info!("Resolved configuration written to: {}", manifest_path.display());

        macos::set_file_permissions(&baseline.core_script(), &staging.dir(StagingKind::Scripts))
            .await?;
        macos::clear_quarantine_attributes(self.tools.attributes.as_ref(), build_dir).await;

        // Validate what was written, not what is in memory.
        let written = Manifest::load(&manifest_path).await?;
        self.validator()
            .validate_manifest(&written, build_dir, PathLayout::Staged)
            .await?;

        let mut file_structure = BTreeMap::new();
        file_structure.insert(baseline.launch_daemon(), PathBuf::from(LAUNCH_DAEMON_PATH));
        file_structure.insert(baseline.core_script(), PathBuf::from(CORE_SCRIPT_PATH));
        if resolved.format() == ManifestFormat::PropertyList {
            file_structure.insert(manifest_path.clone(), PathBuf::from(CONFIGURATION_PATH));
        }
        for kind in StagingKind::ALL {
            let dir = staging.dir(kind);
            if dir.is_dir() {
                file_structure.insert(
                    dir,
                    Path::new(PRODUCTION_ROOT).join(kind.dir_name()),
                );
            }
        }

        if let Some(icon) = settings.simple_mdm_icon() {
            let app = macos::create_icon_app(build_dir, &source_root.join(icon)).await?;
            file_structure.insert(
                app,
                Path::new(PRODUCTION_ROOT).join(macos::icon::ICON_APP_NAME),
            );
        }

        let request = PackageRequest {
            file_structure,
            preinstall_script: baseline.preinstall_script(),
            postinstall_script: baseline.postinstall_script(),
            identifier: settings.identifier().to_string(),
            version: settings.version().to_string(),
            output: settings.output().to_path_buf(),
            signing_identity: settings.signing_identity().map(String::from),
            distribution: settings.distribution(),
        };

        log::info!("Generating pkg: {}...", request.output.display());
        if !self.tools.packager.build(&request).await? {
            return Err(Error::PackageGeneration(request.output.display().to_string()));
        }
        log::info!("Package generated: {}", request.output.display());

        Ok(BuildOutcome {
            package: request.output,
            manifest: manifest_path,
            format: resolved.format(),
        })
    }

    /// Expands a package and re-checks it, reading items from `manifest`
    /// when given and from the embedded configuration otherwise.
    pub async fn validate_package(&self, package: &Path, manifest: Option<&Path>) -> Result<()> {
        self.validator().validate_package(package, manifest).await
    }

    fn validator(&self) -> Validator<'_> {
        Validator::new(
            &self.tools,
            &self.session,
            self.settings.installomator_version(),
        )
    }
}

/// `<output dir>/<configuration stem>-resolved.mobileconfig`
fn resolved_profile_path(output: &Path, configuration: &Path) -> PathBuf {
    let stem = configuration
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Baseline".to_string());
    output
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(format!("{stem}-resolved.mobileconfig"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_lands_beside_output() {
        assert_eq!(
            resolved_profile_path(Path::new("out/Baseline.pkg"), Path::new("conf/Acme.mobileconfig")),
            PathBuf::from("out/Acme-resolved.mobileconfig")
        );
        assert_eq!(
            resolved_profile_path(Path::new("Baseline.pkg"), Path::new("Acme.mobileconfig")),
            PathBuf::from("Acme-resolved.mobileconfig")
        );
    }

    #[test]
    fn only_profiles_are_external() {
        let outcome = BuildOutcome {
            package: "Baseline.pkg".into(),
            manifest: "/tmp/BaselineConfig.plist".into(),
            format: ManifestFormat::PropertyList,
        };
        assert_eq!(outcome.external_manifest(), None);

        let outcome = BuildOutcome {
            format: ManifestFormat::MobileConfig,
            manifest: "Acme-resolved.mobileconfig".into(),
            ..outcome
        };
        assert_eq!(
            outcome.external_manifest(),
            Some(Path::new("Acme-resolved.mobileconfig"))
        );
    }
}
