//! Fetching Baseline and its helper packages.
//!
//! Every artifact goes through the session cache: a second build in the same
//! process, or a build with the artifact next to the configuration, never
//! touches the network.

pub mod cache;
pub mod github;

use crate::bundler::{
    ArchiveExtractor, Error, Result, Session, VersionSelector, error::ErrorExt, utils::fs,
};
use github::{AssetKind, BASELINE, Repository};
use std::path::{Path, PathBuf};

const BASELINE_ARCHIVE: &str = "Baseline.zip";

/// The extracted Baseline source tree.
#[derive(Debug, Clone)]
pub struct BaselineSource {
    root: PathBuf,
}

impl BaselineSource {
    /// Wraps an extracted tree, checking that the files a package needs exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let source = Self { root: root.into() };
        for (what, path) in [
            ("Baseline.sh", source.core_script()),
            ("preinstall script", source.preinstall_script()),
            ("postinstall script", source.postinstall_script()),
            ("launch daemon", source.launch_daemon()),
        ] {
            if !path.is_file() {
                return Err(Error::MissingFile {
                    what: what.into(),
                    path,
                });
            }
        }
        Ok(source)
    }

    /// Root of the tree.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The agent script.
    pub fn core_script(&self) -> PathBuf {
        self.root.join("Baseline.sh")
    }

    /// Installer preinstall hook.
    pub fn preinstall_script(&self) -> PathBuf {
        self.root.join("Build/Baseline_daemon-preinstall.sh")
    }

    /// Installer postinstall hook.
    pub fn postinstall_script(&self) -> PathBuf {
        self.root.join("Build/Baseline_daemon-postinstall.sh")
    }

    /// Launch daemon definition.
    pub fn launch_daemon(&self) -> PathBuf {
        self.root.join("Build/com.secondsonconsulting.baseline.plist")
    }

    /// Where a property-list manifest is written before packaging.
    pub fn configuration(&self) -> PathBuf {
        self.root.join("BaselineConfig.plist")
    }
}

/// Downloads artifacts into a build directory.
pub struct Fetcher<'a> {
    session: &'a Session,
    extractor: &'a dyn ArchiveExtractor,
    source_root: &'a Path,
}

impl<'a> Fetcher<'a> {
    /// Creates a fetcher that looks for local copies in `source_root`.
    pub fn new(
        session: &'a Session,
        extractor: &'a dyn ArchiveExtractor,
        source_root: &'a Path,
    ) -> Self {
        Self {
            session,
            extractor,
            source_root,
        }
    }

    /// Fetches and extracts Baseline into `<build_dir>/Baseline`.
    ///
    /// Returns the tree and the resolved version: the release tag when the
    /// API was consulted, otherwise the pinned selector, if any.
    pub async fn fetch_baseline(
        &self,
        version: &VersionSelector,
        build_dir: &Path,
    ) -> Result<(BaselineSource, Option<String>)> {
        log::info!("Fetching Baseline: {}...", version);

        let archive = build_dir.join(BASELINE_ARCHIVE);
        let mut source_url = None;
        let mut resolved = version.pinned();

        if !cache::restore(
            BASELINE_ARCHIVE,
            self.session.cache_dir(),
            self.source_root,
            &archive,
        )
        .await?
        {
            log::info!("  No cached archive for Baseline, fetching from GitHub...");
            let release = github::lookup_release(
                self.session.http(),
                BASELINE,
                version,
                AssetKind::SourceArchive,
            )
            .await?;
            cache::download(
                self.session.http(),
                &release.download_url,
                BASELINE_ARCHIVE,
                self.session.cache_dir(),
                &archive,
            )
            .await?;
            resolved = release.tag.or(resolved);
            source_url = Some(release.download_url);
        }

        log::info!("  Unzipping...");
        let scratch = build_dir.join(".unpack");
        fs::create_dir_all(&scratch, true).await?;
        self.extractor
            .unzip(&archive, &scratch)
            .await
            .map_err(|e| match e {
                Error::Extraction { target, detail, .. } => Error::Extraction {
                    target,
                    source_url: source_url.clone(),
                    detail,
                },
                other => other,
            })?;

        let extracted = top_level_directory(&scratch, &archive, source_url.as_deref()).await?;
        let root = build_dir.join("Baseline");
        tokio::fs::rename(&extracted, &root)
            .await
            .fs_context("renaming extracted Baseline", &extracted)?;

        fs::remove_dir_all(&scratch).await?;
        tokio::fs::remove_file(&archive)
            .await
            .fs_context("removing Baseline archive", &archive)?;

        Ok((BaselineSource::new(root)?, resolved))
    }

    /// Fetches the first release asset of `repository` into
    /// `<packages_dir>/<name>.pkg`, returning the resolved version.
    pub async fn fetch_package(
        &self,
        repository: Repository,
        version: &VersionSelector,
        packages_dir: &Path,
    ) -> Result<Option<String>> {
        log::info!("Fetching {}: {}...", repository.name, version);

        let name = format!("{}.pkg", repository.name);
        let destination = packages_dir.join(&name);

        if cache::restore(&name, self.session.cache_dir(), self.source_root, &destination).await? {
            return Ok(version.pinned());
        }

        log::info!("  No cached pkg for {}, fetching from GitHub...", repository.name);
        let release =
            github::lookup_release(self.session.http(), repository, version, AssetKind::FirstAsset)
                .await?;
        cache::download(
            self.session.http(),
            &release.download_url,
            &name,
            self.session.cache_dir(),
            &destination,
        )
        .await?;

        Ok(release.tag.or_else(|| version.pinned()))
    }
}

/// The one directory an archive unpacked into.
///
/// GitHub archives wrap the tree in `<repo>-<ref>/`. Stray entries such as
/// `__MACOSX` are ignored when a single Baseline directory is present.
async fn top_level_directory(
    scratch: &Path,
    archive: &Path,
    source_url: Option<&str>,
) -> Result<PathBuf> {
    let mut directories = Vec::new();
    let mut entries = tokio::fs::read_dir(scratch)
        .await
        .fs_context("reading extracted archive", scratch)?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .fs_context("reading extracted archive", scratch)?
    {
        if entry.path().is_dir() {
            directories.push(entry.path());
        }
    }

    if directories.len() > 1 {
        directories.retain(|dir| {
            dir.file_name()
                .is_some_and(|name| name.to_string_lossy().contains("Baseline"))
        });
    }

    match <[PathBuf; 1]>::try_from(directories) {
        Ok([directory]) => Ok(directory),
        Err(found) => Err(Error::Extraction {
            target: archive.to_path_buf(),
            source_url: source_url.map(String::from),
            detail: format!(
                "expected one top-level directory, found {}",
                found.len()
            ),
        }),
    }
}
