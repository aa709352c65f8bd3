//! Build orchestration and coordination.
//!
//! This module provides the [`Builder`] that turns a Baseline configuration
//! into an installer package.
//!
//! # Overview
//!
//! The builder:
//! 1. Fetches Baseline and, if requested, swiftDialog and Installomator
//! 2. Resolves the manifest into the staging tree
//! 3. Fixes permissions and clears quarantine attributes
//! 4. Validates the staged manifest
//! 5. Hands the tree to the [`PackageBuilder`](crate::bundler::PackageBuilder)
//!
//! Post-build validation is a separate call so callers can validate packages
//! they did not just build.
//!
//! # Module Organization
//!
//! - [`checksum`] - MD5 calculation for staged artifacts
//! - [`orchestrator`] - Main [`Builder`] struct
//! - [`session`] - Process-wide [`Session`] (download cache, label list)
//! - [`signing`] - Team ID extraction from package signatures
//! - [`tool_detection`] - Host tool availability checking

mod checksum;
mod orchestrator;
mod session;
mod signing;
mod tool_detection;

pub use checksum::{Md5Hasher, calculate_md5};
pub use orchestrator::{BuildOutcome, Builder};
pub use session::Session;
pub use signing::{PkgutilSignatureInspector, parse_team_id};
pub use tool_detection::{missing_host_tools, warn_missing_host_tools};
