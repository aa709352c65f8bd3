//! macOS installer tooling.
//!
//! - [`archive`] - zip, flat package and payload extraction
//! - [`expand`] - unpacking a finished installer for validation
//! - [`icon`] - placeholder app bundle carrying the SimpleMDM icon
//! - [`permissions`] - execute bits on staged scripts
//! - [`pkg`] - `pkgbuild`/`productbuild` package generation
//! - [`xattr`] - quarantine attribute cleanup

pub mod archive;
pub mod expand;
pub mod icon;
pub mod permissions;
pub mod pkg;
pub mod xattr;

pub use archive::HostArchiveExtractor;
pub use expand::expand_installer;
pub use icon::create_icon_app;
pub use permissions::set_file_permissions;
pub use pkg::PkgbuildPackager;
pub use xattr::{QUARANTINE_ATTRIBUTES, XattrStripper, clear_quarantine_attributes};
