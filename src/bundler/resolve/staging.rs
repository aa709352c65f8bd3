//! The staging tree that becomes `/usr/local/Baseline`.

use crate::bundler::{Error, PRODUCTION_ROOT, Result, utils::fs};
use std::path::{Path, PathBuf};

/// Staging subdirectory a resolved file is copied into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagingKind {
    /// `Scripts/`
    Scripts,
    /// `Packages/`
    Packages,
    /// `Icons/`, also used for files named in argument strings.
    Icons,
}

impl StagingKind {
    /// Every staging subdirectory.
    pub const ALL: [StagingKind; 3] = [Self::Scripts, Self::Packages, Self::Icons];

    /// Directory name, identical on disk and on the device.
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Scripts => "Scripts",
            Self::Packages => "Packages",
            Self::Icons => "Icons",
        }
    }
}

/// Staging tree plus the directory author-relative references resolve against.
#[derive(Debug, Clone)]
pub struct Staging {
    root: PathBuf,
    source_root: PathBuf,
}

impl Staging {
    /// `root` stands in for the production root; `source_root` is where
    /// relative references in the manifest are looked up.
    pub fn new(root: impl Into<PathBuf>, source_root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            source_root: source_root.into(),
        }
    }

    /// Staging subdirectory for `kind`. It only exists once a file was staged.
    pub fn dir(&self, kind: StagingKind) -> PathBuf {
        self.root.join(kind.dir_name())
    }

    /// Install location of a file staged as `name` under `kind`.
    pub fn production_path(kind: StagingKind, name: &str) -> String {
        format!("{}/{}/{}", PRODUCTION_ROOT, kind.dir_name(), name)
    }

    /// Staged location of a production path.
    pub fn staged_path(&self, production: &str) -> PathBuf {
        let relative = production.strip_prefix(PRODUCTION_ROOT).unwrap_or(production);
        self.root.join(relative.trim_start_matches('/'))
    }

    /// Resolves a file reference to its production path, staging it once.
    ///
    /// Already-deployed paths (`/usr/local/Baseline/...`) are treated as
    /// relative to the source root. A file whose name is already staged is
    /// not copied again. With `optional`, a reference that is not a file is
    /// returned unchanged; otherwise it is an error.
    pub async fn resolve_file(
        &self,
        reference: &str,
        kind: StagingKind,
        optional: bool,
    ) -> Result<String> {
        let stripped = reference
            .strip_prefix(PRODUCTION_ROOT)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(reference);

        let Some(name) = Path::new(stripped)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
        else {
            return self.unresolved(reference, optional);
        };

        if !optional {
            log::info!("    Resolving file: {}...", name);
        }

        let staged = self.dir(kind).join(&name);
        if staged.exists() {
            return Ok(Self::production_path(kind, &name));
        }

        let local = self.source_root.join(stripped);
        if local.is_file() {
            fs::copy_file(&local, &staged).await?;
        } else if local.is_dir() && !optional {
            // Scripts and packages are hashed, so they must be single files.
            if kind != StagingKind::Icons {
                return Err(Error::MissingFile {
                    what: format!("file for {reference} (found a directory)"),
                    path: local,
                });
            }
            fs::copy_dir(&local, &staged).await?;
        } else {
            return self.unresolved(reference, optional);
        }

        log::debug!("    Staged {} as {}", local.display(), staged.display());
        Ok(Self::production_path(kind, &name))
    }

    fn unresolved(&self, reference: &str, optional: bool) -> Result<String> {
        if optional {
            return Ok(reference.to_string());
        }
        Err(Error::UnresolvedReference {
            reference: reference.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staging() -> (tempfile::TempDir, tempfile::TempDir, Staging) {
        let build = tempfile::tempdir().unwrap();
        let source = tempfile::tempdir().unwrap();
        let staging = Staging::new(build.path(), source.path());
        (build, source, staging)
    }

    #[tokio::test]
    async fn relative_file_is_staged() {
        let (build, source, staging) = staging();
        std::fs::write(source.path().join("setup.sh"), b"echo hi").unwrap();

        let resolved = staging
            .resolve_file("./setup.sh", StagingKind::Scripts, false)
            .await
            .unwrap();
        assert_eq!(resolved, "/usr/local/Baseline/Scripts/setup.sh");
        assert_eq!(
            std::fs::read(build.path().join("Scripts/setup.sh")).unwrap(),
            b"echo hi"
        );
    }

    #[tokio::test]
    async fn resolution_is_idempotent() {
        let (_build, source, staging) = staging();
        std::fs::write(source.path().join("logo.png"), b"png").unwrap();

        let first = staging
            .resolve_file("logo.png", StagingKind::Icons, false)
            .await
            .unwrap();
        std::fs::remove_file(source.path().join("logo.png")).unwrap();
        let second = staging
            .resolve_file("logo.png", StagingKind::Icons, false)
            .await
            .unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn production_prefix_is_stripped() {
        let (build, source, staging) = staging();
        std::fs::create_dir_all(source.path().join("Icons")).unwrap();
        std::fs::write(source.path().join("Icons/logo.png"), b"png").unwrap();

        let resolved = staging
            .resolve_file("/usr/local/Baseline/Icons/logo.png", StagingKind::Icons, false)
            .await
            .unwrap();
        assert_eq!(resolved, "/usr/local/Baseline/Icons/logo.png");
        assert!(build.path().join("Icons/logo.png").is_file());
    }

    #[tokio::test]
    async fn optional_miss_returns_token() {
        let (build, _source, staging) = staging();
        let resolved = staging
            .resolve_file("Hello", StagingKind::Icons, true)
            .await
            .unwrap();
        assert_eq!(resolved, "Hello");
        assert!(!build.path().join("Icons").exists());
    }

    #[tokio::test]
    async fn mandatory_miss_names_reference() {
        let (_build, _source, staging) = staging();
        let err = staging
            .resolve_file("./missing.pkg", StagingKind::Packages, false)
            .await
            .unwrap_err();
        assert!(
            matches!(err, Error::UnresolvedReference { ref reference } if reference == "./missing.pkg")
        );
    }

    #[tokio::test]
    async fn directory_is_not_a_script() {
        let (build, source, staging) = staging();
        std::fs::create_dir_all(source.path().join("tools/setup")).unwrap();

        let err = staging
            .resolve_file("tools/setup", StagingKind::Scripts, false)
            .await
            .unwrap_err();
        match err {
            Error::MissingFile { what, path } => {
                assert!(what.contains("tools/setup"));
                assert_eq!(path, source.path().join("tools/setup"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!build.path().join("Scripts").exists());
    }

    #[tokio::test]
    async fn icon_directory_is_staged() {
        let (build, source, staging) = staging();
        std::fs::create_dir_all(source.path().join("Branding")).unwrap();
        std::fs::write(source.path().join("Branding/logo.png"), b"png").unwrap();

        let resolved = staging
            .resolve_file("Branding", StagingKind::Icons, false)
            .await
            .unwrap();
        assert_eq!(resolved, "/usr/local/Baseline/Icons/Branding");
        assert!(build.path().join("Icons/Branding/logo.png").is_file());
    }

    #[test]
    fn staged_path_maps_back() {
        let staging = Staging::new("/tmp/build", "/src");
        assert_eq!(
            staging.staged_path("/usr/local/Baseline/Packages/app.pkg"),
            PathBuf::from("/tmp/build/Packages/app.pkg")
        );
    }
}
