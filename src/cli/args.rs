//! Command line argument parsing and validation.

use crate::bundler::{Settings, SettingsBuilder, VersionSelector};
use crate::error::{CliError, Result};
use clap::{ArgGroup, Parser};
use std::path::{Path, PathBuf};

/// Builds and validates Baseline installer packages
#[derive(Parser, Debug)]
#[command(
    name = "baseline",
    version,
    // `--version` sets the package version.
    disable_version_flag = true,
    about = "Build a Baseline pkg from a configuration file or validate an existing pkg.",
    long_about = "Builds a macOS installer that deploys Baseline with the scripts, packages and icons its configuration references.

Usage:
  baseline --build ripeda.plist
  baseline --validate ripeda.mobileconfig RIPEDA.pkg
     (pkg and mobileconfig positions can be swapped)
  baseline --validate RIPEDA.pkg
     (validates against the embedded configuration)

Exit code 0 = package built (or validated) and every check passed.",
    group(ArgGroup::new("mode").required(true).args(["build", "validate"]))
)]
pub struct Args {
    /// Configuration (.plist or .mobileconfig) to build a package from
    #[arg(short = 'b', long, value_name = "CONFIGURATION")]
    pub build: Option<PathBuf>,

    /// Package to validate, optionally with the mobileconfig it was built from
    #[arg(short = 'v', long, value_name = "PATH", num_args = 1..=2)]
    pub validate: Option<Vec<PathBuf>>,

    /// Package identifier
    #[arg(long, value_name = "ID", default_value = "com.example.baseline")]
    pub identifier: String,

    /// Package version
    #[arg(long = "version", value_name = "VERSION", default_value = "1.0.0")]
    pub pkg_version: String,

    /// Where to write the package
    #[arg(short = 'o', long, value_name = "PATH", default_value = "Baseline.pkg")]
    pub output: PathBuf,

    /// Bundle the swiftDialog package
    #[arg(long)]
    pub cache_swift_dialog: bool,

    /// Bundle the Installomator package
    #[arg(long)]
    pub cache_installomator: bool,

    /// Baseline release: latest, a tag, or "branch: <name>"
    #[arg(long, value_name = "VERSION", default_value = "latest")]
    pub baseline_version: VersionSelector,

    /// swiftDialog release: latest or a tag
    #[arg(long, value_name = "VERSION", default_value = "latest")]
    pub swiftdialog_version: VersionSelector,

    /// Installomator release: latest or a tag. Also selects the label list
    /// Installomator items are validated against.
    #[arg(long, value_name = "VERSION", default_value = "latest")]
    pub installomator_version: VersionSelector,

    /// Developer ID Installer identity to sign the package with
    #[arg(long, value_name = "IDENTITY")]
    pub signing_identity: Option<String>,

    /// Wrap the package in a distribution (product archive)
    #[arg(long)]
    pub distribution: bool,

    /// GitHub token for release API calls
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Icon to show in SimpleMDM
    #[arg(long, value_name = "PATH")]
    pub simple_mdm_icon: Option<PathBuf>,

    /// Do not record builder and dependency versions in the configuration
    #[arg(long)]
    pub no_embed_versioning: bool,
}

/// What the invocation asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Build from a configuration, then validate the result.
    Build(PathBuf),
    /// Validate an existing package.
    Validate {
        /// The installer.
        package: PathBuf,
        /// Mobileconfig to read items from instead of the embedded plist.
        manifest: Option<PathBuf>,
    },
}

impl Args {
    /// The requested mode, with `--validate` paths put in order.
    pub fn mode(&self) -> Result<Mode> {
        if let Some(configuration) = &self.build {
            return Ok(Mode::Build(configuration.clone()));
        }
        match self.validate.as_deref() {
            Some(paths) => {
                let (package, manifest) = order_validate_paths(paths)?;
                Ok(Mode::Validate { package, manifest })
            }
            None => Err(CliError::InvalidArguments {
                reason: "one of --build or --validate is required".into(),
            }
            .into()),
        }
    }

    /// Build settings for `configuration`.
    pub fn settings(&self, configuration: &Path) -> Result<Settings> {
        Ok(SettingsBuilder::new()
            .configuration_file(configuration)
            .identifier(self.identifier.clone())
            .version(self.pkg_version.clone())
            .output(&self.output)
            .cache_swift_dialog(self.cache_swift_dialog)
            .cache_installomator(self.cache_installomator)
            .baseline_version(self.baseline_version.clone())
            .swiftdialog_version(self.swiftdialog_version.clone())
            .installomator_version(self.installomator_version.clone())
            .signing_identity(self.signing_identity.clone())
            .distribution(self.distribution)
            .github_token(self.github_token.clone())
            .simple_mdm_icon(self.simple_mdm_icon.clone())
            .embed_versioning(!self.no_embed_versioning)
            .build()?)
    }
}

fn is_package(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("pkg")
}

/// Splits `--validate` paths into the package and an optional manifest.
///
/// With two paths either order is accepted; exactly one must be a `.pkg`.
pub fn order_validate_paths(paths: &[PathBuf]) -> Result<(PathBuf, Option<PathBuf>)> {
    match paths {
        [package] => Ok((package.clone(), None)),
        [first, second] => match (is_package(first), is_package(second)) {
            (true, false) => Ok((first.clone(), Some(second.clone()))),
            (false, true) => Ok((second.clone(), Some(first.clone()))),
            _ => Err(CliError::InvalidArguments {
                reason: "--validate takes one .pkg and one configuration".into(),
            }
            .into()),
        },
        _ => Err(CliError::InvalidArguments {
            reason: "--validate takes one or two paths".into(),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("baseline").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn build_defaults() {
        let args = parse(&["--build", "ripeda.plist"]);
        assert_eq!(args.mode().unwrap(), Mode::Build("ripeda.plist".into()));

        let settings = args.settings(Path::new("ripeda.plist")).unwrap();
        assert_eq!(settings.identifier(), "com.example.baseline");
        assert_eq!(settings.version(), "1.0.0");
        assert_eq!(settings.output(), Path::new("Baseline.pkg"));
        assert!(settings.embed_versioning());
        assert_eq!(settings.baseline_version(), &VersionSelector::Latest);
    }

    #[test]
    fn build_options() {
        let args = parse(&[
            "--build",
            "ripeda.mobileconfig",
            "--identifier",
            "com.ripeda.baseline",
            "--version",
            "2.0.0",
            "--baseline-version",
            "branch: main",
            "--cache-installomator",
            "--no-embed-versioning",
        ]);
        let settings = args.settings(Path::new("ripeda.mobileconfig")).unwrap();
        assert_eq!(settings.identifier(), "com.ripeda.baseline");
        assert_eq!(settings.version(), "2.0.0");
        assert_eq!(
            settings.baseline_version(),
            &VersionSelector::Branch("main".into())
        );
        assert!(settings.cache_installomator());
        assert!(!settings.embed_versioning());
    }

    #[test]
    fn validate_paths_in_either_order() {
        let pkg = PathBuf::from("RIPEDA.pkg");
        let config = PathBuf::from("ripeda.mobileconfig");

        assert_eq!(
            order_validate_paths(&[config.clone(), pkg.clone()]).unwrap(),
            (pkg.clone(), Some(config.clone()))
        );
        assert_eq!(
            order_validate_paths(&[pkg.clone(), config.clone()]).unwrap(),
            (pkg.clone(), Some(config))
        );
        assert_eq!(order_validate_paths(&[pkg.clone()]).unwrap(), (pkg, None));
    }

    #[test]
    fn validate_needs_a_package() {
        assert!(order_validate_paths(&["a.plist".into(), "b.mobileconfig".into()]).is_err());
    }

    #[test]
    fn mode_is_required() {
        assert!(Args::try_parse_from(["baseline"]).is_err());
        assert!(Args::try_parse_from(["baseline", "--build", "a.plist", "--validate", "b.pkg"]).is_err());
    }

    #[test]
    fn validate_mode() {
        let args = parse(&["--validate", "ripeda.mobileconfig", "RIPEDA.pkg"]);
        assert_eq!(
            args.mode().unwrap(),
            Mode::Validate {
                package: "RIPEDA.pkg".into(),
                manifest: Some("ripeda.mobileconfig".into()),
            }
        );
    }
}
