//! Shared fixtures for the integration tests.
//!
//! The fakes stand in for the macOS installer tooling: the packager lays the
//! payload out in a directory next to the output and writes that directory's
//! path into the "package"; expanding the package reads the path back.

#![allow(dead_code)]

use async_trait::async_trait;
use baseline_builder::bundler::{
    ArchiveExtractor, AttributeStripper, Builder, HostTools, PackageBuilder, PackageRequest,
    Result, Session, SettingsBuilder, SignatureInspector, utils::fs,
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const SIGNED_TEAM: &str = "ABCDE12345";

const LAUNCH_DAEMON: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>Label</key>
    <string>com.secondsonconsulting.baseline</string>
</dict>
</plist>
"#;

/// Unpacks any zip into a Baseline source tree and round-trips fake packages.
pub struct FakeExtractor;

#[async_trait]
impl ArchiveExtractor for FakeExtractor {
    async fn unzip(&self, _archive: &Path, destination: &Path) -> Result<()> {
        let root = destination.join("secondsonconsulting-Baseline-1a2b3c4");
        std::fs::create_dir_all(root.join("Build"))?;
        std::fs::write(root.join("Baseline.sh"), b"#!/bin/zsh\necho baseline\n")?;
        std::fs::write(root.join("Build/Baseline_daemon-preinstall.sh"), b"#!/bin/sh\n")?;
        std::fs::write(root.join("Build/Baseline_daemon-postinstall.sh"), b"#!/bin/sh\n")?;
        std::fs::write(
            root.join("Build/com.secondsonconsulting.baseline.plist"),
            LAUNCH_DAEMON,
        )?;
        Ok(())
    }

    async fn expand_package(&self, package: &Path, destination: &Path) -> Result<()> {
        std::fs::create_dir_all(destination)?;
        std::fs::copy(package, destination.join("Payload"))?;
        Ok(())
    }

    async fn extract_payload(&self, payload: &Path, destination: &Path) -> Result<()> {
        let root = PathBuf::from(std::fs::read_to_string(payload)?);
        fs::copy_dir(&root, destination).await
    }
}

/// Lays the payload out under `<output>.root` and records every request.
#[derive(Clone, Default)]
pub struct FakePackager {
    pub requests: Arc<Mutex<Vec<PackageRequest>>>,
    pub fail: bool,
}

impl FakePackager {
    pub fn payload_root(output: &Path) -> PathBuf {
        output.with_extension("root")
    }

    pub fn last_request(&self) -> PackageRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no package was built")
    }
}

#[async_trait]
impl PackageBuilder for FakePackager {
    async fn build(&self, request: &PackageRequest) -> Result<bool> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            return Ok(false);
        }

        let root = Self::payload_root(&request.output);
        fs::create_dir_all(&root, true).await?;
        for (source, destination) in &request.file_structure {
            let target = root.join(destination.strip_prefix("/").unwrap());
            if source.is_dir() {
                fs::copy_dir(source, &target).await?;
            } else {
                fs::copy_file(source, &target).await?;
            }
        }

        std::fs::write(&request.output, root.to_string_lossy().as_bytes())?;
        Ok(true)
    }
}

/// Packages named `signed*.pkg` carry a Developer ID Installer signature.
pub struct FakeSignatures;

#[async_trait]
impl SignatureInspector for FakeSignatures {
    async fn team_id(&self, package: &Path) -> Result<Option<String>> {
        let name = package.file_name().unwrap().to_string_lossy();
        Ok((name.starts_with("signed") && name.ends_with(".pkg")).then(|| SIGNED_TEAM.to_string()))
    }
}

/// Counts strip requests without touching the filesystem.
#[derive(Clone, Default)]
pub struct RecordingAttributes {
    pub stripped: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl AttributeStripper for RecordingAttributes {
    async fn strip(&self, _root: &Path, attribute: &str) -> Result<()> {
        self.stripped.lock().unwrap().push(attribute.to_string());
        Ok(())
    }
}

/// A source directory, an output directory and a session primed for offline builds.
pub struct Workspace {
    pub source: TempDir,
    pub out: TempDir,
    pub session: Arc<Session>,
    pub packager: FakePackager,
    pub attributes: RecordingAttributes,
}

impl Workspace {
    pub fn new() -> Self {
        let session = Session::new(None)
            .unwrap()
            .with_labels(["googlechrome", "firefoxpkg"]);
        std::fs::write(session.cache_dir().join("Baseline.zip"), b"PK").unwrap();

        Self {
            source: tempfile::tempdir().unwrap(),
            out: tempfile::tempdir().unwrap(),
            session: Arc::new(session),
            packager: FakePackager::default(),
            attributes: RecordingAttributes::default(),
        }
    }

    /// Writes a file into the source directory.
    pub fn file(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.source.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    pub fn output(&self) -> PathBuf {
        self.out.path().join("Baseline.pkg")
    }

    pub fn tools(&self) -> HostTools {
        HostTools::system()
            .with_extractor(FakeExtractor)
            .with_signatures(FakeSignatures)
            .with_attributes(self.attributes.clone())
            .with_packager(self.packager.clone())
    }

    /// Builder for `configuration` with settings adjusted by `configure`.
    pub fn builder_with(
        &self,
        configuration: &Path,
        configure: impl FnOnce(SettingsBuilder) -> SettingsBuilder,
    ) -> Builder {
        let settings = configure(
            SettingsBuilder::new()
                .configuration_file(configuration)
                .identifier("com.example.baseline.test")
                .version("2.0.0")
                .output(self.output())
                .source_root(self.source.path()),
        )
        .build()
        .unwrap();
        Builder::new(settings, self.session.clone(), self.tools()).unwrap()
    }

    pub fn builder(&self, configuration: &Path) -> Builder {
        self.builder_with(configuration, |s| s)
    }
}

/// Wraps dictionary entries in a property list document.
pub fn plist(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
{body}
</dict>
</plist>
"#
    )
}

/// Wraps dictionary entries in a configuration profile.
pub fn mobileconfig(body: &str) -> String {
    plist(&format!(
        r#"<key>PayloadContent</key>
<array>
<dict>
<key>PayloadType</key>
<string>com.secondsonconsulting.baseline</string>
{body}
</dict>
</array>
<key>PayloadDisplayName</key>
<string>Baseline</string>"#
    ))
}
