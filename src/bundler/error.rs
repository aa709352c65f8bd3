//! Error types for the build pipeline.
//!
//! Every failure is fatal for the current build. Variants are grouped by the
//! stage that raises them: reference resolution, network, extraction,
//! integrity checks and structural checks, plus the I/O plumbing underneath.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while fetching, resolving, packaging or validating.
#[derive(Error, Debug)]
pub enum Error {
    /// A declared file could not be found by any resolution rule.
    #[error("Unable to resolve file: {reference}")]
    UnresolvedReference {
        /// Reference as written in the manifest
        reference: String,
    },

    /// Release host answered with a non-success status.
    #[error("Unable to fetch {url}: HTTP {status}")]
    ApiStatus {
        /// Requested URL
        url: String,
        /// Status code returned
        status: u16,
    },

    /// Release host answered without a field we depend on.
    #[error("No {field} in response from {url}")]
    MissingField {
        /// Requested URL
        url: String,
        /// Missing JSON field
        field: &'static str,
    },

    /// Archive, installer or payload could not be unpacked.
    #[error("Unable to extract {}{}: {detail}", target.display(), source_url.as_deref().map(|u| format!(", verify that the asset URL is valid: {u}")).unwrap_or_default())]
    Extraction {
        /// Archive or directory being unpacked
        target: PathBuf,
        /// Where the archive was downloaded from, when known
        source_url: Option<String>,
        /// What went wrong
        detail: String,
    },

    /// Recorded hash does not match the artifact on disk.
    #[error("MD5 mismatch for {category} item '{item}' ({}): expected {expected}, found {actual}", path.display())]
    HashMismatch {
        /// Manifest category of the item
        category: String,
        /// Item display name
        item: String,
        /// Artifact that was hashed
        path: PathBuf,
        /// Hash recorded in the manifest
        expected: String,
        /// Hash computed now
        actual: String,
    },

    /// Recorded Team ID does not match the package signature.
    #[error("TeamID mismatch for {category} item '{item}' ({}): expected {expected}, found {}", path.display(), actual.as_deref().unwrap_or("<unsigned>"))]
    TeamIdMismatch {
        /// Manifest category of the item
        category: String,
        /// Item display name
        item: String,
        /// Package that was probed
        path: PathBuf,
        /// Team ID recorded in the manifest
        expected: String,
        /// Team ID probed now
        actual: Option<String>,
    },

    /// Installomator label is not supported by the fetched Installomator script.
    #[error("Invalid Installomator label for item '{item}': {label}")]
    InvalidLabel {
        /// Item display name
        item: String,
        /// Label declared by the item
        label: String,
    },

    /// Manifest item lacks its DisplayName.
    #[error("Missing DisplayName in {category} item")]
    MissingDisplayName {
        /// Manifest category of the item
        category: String,
    },

    /// A file referenced by the manifest or required in the package is absent.
    #[error("Unable to find {what}: {}", path.display())]
    MissingFile {
        /// Description of the missing file
        what: String,
        /// Expected location
        path: PathBuf,
    },

    /// Manifest does not match the expected schema.
    #[error("Malformed manifest: {0}")]
    MalformedManifest(String),

    /// Argument string could not be tokenized.
    #[error("Unable to parse arguments: {0}")]
    InvalidArguments(String),

    /// External package builder reported failure.
    #[error("Failed to generate pkg: {0}")]
    PackageGeneration(String),

    /// External command could not be spawned.
    #[error("Failed to run `{command}`: {error}")]
    CommandFailed {
        /// Command that failed
        command: String,
        /// Underlying spawn error
        error: std::io::Error,
    },

    /// Host tool is not installed.
    #[error("Required tool `{0}` not found in PATH")]
    ToolNotFound(String),

    /// I/O error with context about the operation.
    #[error("{context} ({}): {error}", path.display())]
    Fs {
        /// What was being done
        context: String,
        /// Path involved
        path: PathBuf,
        /// Underlying error
        error: std::io::Error,
    },

    /// Plain I/O error.
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// Property list (de)serialization error.
    #[error(transparent)]
    Plist(#[from] plist::Error),

    /// HTTP transport error.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Directory traversal error.
    #[error(transparent)]
    WalkDir(#[from] walkdir::Error),

    /// Path prefix error.
    #[error(transparent)]
    StripPrefix(#[from] std::path::StripPrefixError),

    /// Anything else.
    #[error("{0}")]
    GenericError(String),
}

/// Adds a message to `Option` and `Result` values, producing [`Error::GenericError`].
pub trait Context<T> {
    /// Wraps the failure with a fixed message.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static;

    /// Wraps the failure with a lazily built message.
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| Error::GenericError(f().to_string()))
    }
}

impl<T> Context<T> for Result<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| Error::GenericError(format!("{context}: {e}")))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::GenericError(format!("{}: {e}", f())))
    }
}

/// Attaches filesystem context to I/O results.
pub trait ErrorExt<T> {
    /// Records the action and the path involved.
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context: context.to_string(),
            path: path.as_ref().to_path_buf(),
            error,
        })
    }
}

/// Returns early with an [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_message_names_source_url() {
        let err = Error::Extraction {
            target: PathBuf::from("/tmp/build/Baseline.zip"),
            source_url: Some("https://example.com/Baseline.zip".into()),
            detail: "invalid Zip archive".into(),
        };
        let message = err.to_string();
        assert!(message.contains("/tmp/build/Baseline.zip"));
        assert!(message.contains("verify that the asset URL is valid: https://example.com/Baseline.zip"));
    }

    #[test]
    fn extraction_message_without_source_url() {
        let err = Error::Extraction {
            target: PathBuf::from("Baseline.zip"),
            source_url: None,
            detail: "bad".into(),
        };
        assert_eq!(err.to_string(), "Unable to extract Baseline.zip: bad");
    }

    #[test]
    fn option_context_becomes_generic_error() {
        let missing: Option<u8> = None;
        let err = missing.context("nothing here").unwrap_err();
        assert!(matches!(err, Error::GenericError(ref m) if m == "nothing here"));
    }

    #[test]
    fn fs_context_keeps_path() {
        let io: std::io::Result<()> = Err(std::io::Error::other("boom"));
        let err = io.fs_context("reading manifest", "/x/y.plist").unwrap_err();
        assert_eq!(err.to_string(), "reading manifest (/x/y.plist): boom");
    }
}
