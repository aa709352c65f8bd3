//! Baseline package building.
//!
//! The pipeline runs strictly in order:
//!
//! 1. [`fetch`] - download Baseline (and optional helper packages) into the staging tree
//! 2. [`resolve`] - rewrite the manifest to production paths, staging each referenced file
//! 3. [`platform::macos`] - mark scripts executable and strip quarantine attributes
//! 4. [`validate`] - pre-build check of the staged manifest
//! 5. [`platform::macos`] - hand the staged tree to the package builder
//! 6. [`validate`] - expand the finished installer and re-check every claim
//!
//! [`Builder`] drives the whole sequence. Process-wide state such as the
//! download cache lives in a [`Session`] shared between builders.

pub mod builder;
pub mod error;
pub mod fetch;
pub mod host;
pub mod manifest;
pub mod platform;
pub mod resolve;
pub mod settings;
pub mod utils;
pub mod validate;

pub use builder::{BuildOutcome, Builder, Session};
pub use error::{Error, Result};
pub use host::{
    ArchiveExtractor, AttributeStripper, ContentHasher, HostTools, PackageBuilder, PackageRequest,
    SignatureInspector,
};
pub use manifest::{Category, DialogOption, Item, Manifest, ManifestBody, ManifestFormat};
pub use settings::{Settings, SettingsBuilder, VersionSelector};

/// Install location of Baseline and everything it deploys.
pub const PRODUCTION_ROOT: &str = "/usr/local/Baseline";

/// Install location of the Baseline launch daemon.
pub const LAUNCH_DAEMON_PATH: &str =
    "/Library/LaunchDaemons/com.secondsonconsulting.baseline.plist";

/// Install location of the Baseline agent script.
pub const CORE_SCRIPT_PATH: &str = "/usr/local/Baseline/Baseline.sh";

/// Install location of the embedded property-list manifest.
pub const CONFIGURATION_PATH: &str = "/usr/local/Baseline/BaselineConfig.plist";
