//! Top-level error types for the command line.
//!
//! Library failures arrive as [`crate::bundler::Error`]; this layer adds
//! argument problems and the plumbing `main` needs to report any of them.

use thiserror::Error;

/// Result type alias for command line operations
pub type Result<T> = std::result::Result<T, BuilderError>;

/// Main error type for all command line operations
#[derive(Error, Debug)]
pub enum BuilderError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Build or validation errors
    #[error("{0}")]
    Bundler(#[from] crate::bundler::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundler_errors_keep_their_message() {
        let err: BuilderError = crate::bundler::Error::UnresolvedReference {
            reference: "./missing.pkg".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Unable to resolve file: ./missing.pkg");
    }

    #[test]
    fn anyhow_errors_convert() {
        let err: BuilderError = anyhow::anyhow!("runtime unavailable").into();
        assert_eq!(err.to_string(), "runtime unavailable");
    }

    #[test]
    fn cli_errors_are_prefixed() {
        let err: BuilderError = CliError::InvalidArguments {
            reason: "--validate takes one or two paths".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "CLI error: Invalid arguments: --validate takes one or two paths"
        );
    }
}
