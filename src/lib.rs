//! Baseline installer package builder.
//!
//! Builds macOS `.pkg` installers that deploy the Baseline agent together
//! with the scripts, packages and icons its configuration references, then
//! unpacks the result and checks that every file, hash and signer the
//! configuration claims is really in the package.
//!
//! It can be used both as a CLI tool (`baseline`) and as a library
//! dependency; see [`bundler::Builder`].

pub mod bundler;
pub mod cli;
pub mod error;

// Re-export commonly used types
pub use error::{BuilderError, CliError, Result};
