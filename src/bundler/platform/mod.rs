//! Host platform integration.
//!
//! Baseline only targets macOS, so everything that touches installer
//! packages, payload archives or extended attributes lives in [`macos`].

pub mod macos;
