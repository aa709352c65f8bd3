//! Capability interfaces over host tooling.
//!
//! The pipeline never invokes an OS utility directly; it goes through these
//! traits so the resolution and validation logic can run against fakes. The
//! default implementations in [`HostTools::system`] shell out to the macOS
//! tools (`pkgutil`, `pkgbuild`, `productbuild`, `tar`, `xattr`) or do the
//! work in-process where a crate covers it (zip extraction, MD5).

use crate::bundler::{
    Result,
    builder::{Md5Hasher, PkgutilSignatureInspector},
    platform::macos::{HostArchiveExtractor, PkgbuildPackager, XattrStripper},
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Unpacks source archives, installer packages and installer payloads.
#[async_trait]
pub trait ArchiveExtractor: Send + Sync {
    /// Extracts a zip archive into `destination`.
    async fn unzip(&self, archive: &Path, destination: &Path) -> Result<()>;

    /// Expands a flat installer package into `destination` (which must not exist).
    async fn expand_package(&self, package: &Path, destination: &Path) -> Result<()>;

    /// Extracts a component package `Payload` archive into `destination`.
    async fn extract_payload(&self, payload: &Path, destination: &Path) -> Result<()>;
}

/// Computes content hashes rendered as lowercase hex.
#[async_trait]
pub trait ContentHasher: Send + Sync {
    /// Hashes the file at `path`.
    async fn hash(&self, path: &Path) -> Result<String>;
}

/// Reads installer package signatures.
#[async_trait]
pub trait SignatureInspector: Send + Sync {
    /// Team ID of the Developer ID Installer certificate that signed the
    /// package, or `None` if it is unsigned or signed differently.
    async fn team_id(&self, package: &Path) -> Result<Option<String>>;
}

/// Removes extended attributes.
#[async_trait]
pub trait AttributeStripper: Send + Sync {
    /// Recursively removes `attribute` from everything under `root`.
    async fn strip(&self, root: &Path, attribute: &str) -> Result<()>;
}

/// Produces the final installer package.
#[async_trait]
pub trait PackageBuilder: Send + Sync {
    /// Builds the package described by `request`, reporting success.
    async fn build(&self, request: &PackageRequest) -> Result<bool>;
}

/// Everything the package builder needs to produce an installer.
#[derive(Debug, Clone)]
pub struct PackageRequest {
    /// Source file or directory mapped to its absolute install location.
    pub file_structure: BTreeMap<PathBuf, PathBuf>,
    /// Script run before the payload is laid down.
    pub preinstall_script: PathBuf,
    /// Script run after the payload is laid down.
    pub postinstall_script: PathBuf,
    /// Package bundle identifier.
    pub identifier: String,
    /// Package version.
    pub version: String,
    /// Where the installer is written.
    pub output: PathBuf,
    /// Developer ID Installer identity to sign with.
    pub signing_identity: Option<String>,
    /// Wrap the component package in a product archive.
    pub distribution: bool,
}

/// The set of host capabilities a build uses.
#[derive(Clone)]
pub struct HostTools {
    /// Archive and installer unpacking.
    pub extractor: Arc<dyn ArchiveExtractor>,
    /// Content hashing.
    pub hasher: Arc<dyn ContentHasher>,
    /// Signature probing.
    pub signatures: Arc<dyn SignatureInspector>,
    /// Extended attribute removal.
    pub attributes: Arc<dyn AttributeStripper>,
    /// Final package generation.
    pub packager: Arc<dyn PackageBuilder>,
}

impl HostTools {
    /// Implementations backed by the host's own tools.
    pub fn system() -> Self {
        Self {
            extractor: Arc::new(HostArchiveExtractor),
            hasher: Arc::new(Md5Hasher),
            signatures: Arc::new(PkgutilSignatureInspector),
            attributes: Arc::new(XattrStripper),
            packager: Arc::new(PkgbuildPackager),
        }
    }

    /// Replaces the archive extractor.
    pub fn with_extractor(mut self, extractor: impl ArchiveExtractor + 'static) -> Self {
        self.extractor = Arc::new(extractor);
        self
    }

    /// Replaces the content hasher.
    pub fn with_hasher(mut self, hasher: impl ContentHasher + 'static) -> Self {
        self.hasher = Arc::new(hasher);
        self
    }

    /// Replaces the signature inspector.
    pub fn with_signatures(mut self, signatures: impl SignatureInspector + 'static) -> Self {
        self.signatures = Arc::new(signatures);
        self
    }

    /// Replaces the attribute stripper.
    pub fn with_attributes(mut self, attributes: impl AttributeStripper + 'static) -> Self {
        self.attributes = Arc::new(attributes);
        self
    }

    /// Replaces the package builder.
    pub fn with_packager(mut self, packager: impl PackageBuilder + 'static) -> Self {
        self.packager = Arc::new(packager);
        self
    }
}

impl Default for HostTools {
    fn default() -> Self {
        Self::system()
    }
}

impl std::fmt::Debug for HostTools {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostTools").finish_non_exhaustive()
    }
}
