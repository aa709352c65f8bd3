//! Configuration for a Baseline build.
//!
//! [`Settings`] is immutable once built; [`SettingsBuilder`] provides the
//! defaults and validation.

mod builder;
mod core;
mod version;

pub use builder::SettingsBuilder;
pub use core::Settings;
pub use version::VersionSelector;
