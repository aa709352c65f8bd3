//! SimpleMDM icon workaround.
//!
//! SimpleMDM shows the icon of an app bundle that the installer deploys. A
//! Baseline package ships no app, so a hidden placeholder bundle carrying
//! only the icon is staged next to the agent.

use crate::bundler::{Error, Result, error::ErrorExt, utils::fs};
use plist::{Dictionary, Value};
use std::path::{Path, PathBuf};

/// Name of the placeholder bundle, hidden from Finder.
pub const ICON_APP_NAME: &str = ".Baseline.app";

/// Creates `<build_dir>/.Baseline.app` with `icon` as its bundle icon.
///
/// Returns the path of the bundle.
pub async fn create_icon_app(build_dir: &Path, icon: &Path) -> Result<PathBuf> {
    log::info!("Generating SimpleMDM icon bundle...");

    if !icon.is_file() {
        return Err(Error::MissingFile {
            what: "SimpleMDM icon".into(),
            path: icon.to_path_buf(),
        });
    }
    let icon_name = icon
        .file_name()
        .ok_or_else(|| Error::MissingFile {
            what: "SimpleMDM icon".into(),
            path: icon.to_path_buf(),
        })?
        .to_string_lossy()
        .into_owned();

    let app = build_dir.join(ICON_APP_NAME);
    let contents = app.join("Contents");
    fs::create_dir_all(&app, true).await?;
    fs::copy_file(icon, &contents.join("Resources").join(&icon_name)).await?;

    let mut info = Dictionary::new();
    info.insert("CFBundleIconFile".into(), Value::String(icon_name));

    let mut xml = Vec::new();
    Value::Dictionary(info).to_writer_xml(&mut xml)?;
    let info_plist = contents.join("Info.plist");
    tokio::fs::write(&info_plist, xml)
        .await
        .fs_context("writing Info.plist", &info_plist)?;

    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bundle_references_icon() {
        let dir = tempfile::tempdir().unwrap();
        let icon = dir.path().join("logo.icns");
        std::fs::write(&icon, b"icns").unwrap();
        let build = dir.path().join("build");

        let app = create_icon_app(&build, &icon).await.unwrap();
        assert_eq!(app, build.join(".Baseline.app"));
        assert_eq!(
            std::fs::read(app.join("Contents/Resources/logo.icns")).unwrap(),
            b"icns"
        );

        let info = Value::from_file(app.join("Contents/Info.plist")).unwrap();
        assert_eq!(
            info.as_dictionary()
                .and_then(|d| d.get("CFBundleIconFile"))
                .and_then(Value::as_string),
            Some("logo.icns")
        );
    }

    #[tokio::test]
    async fn missing_icon_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = create_icon_app(dir.path(), &dir.path().join("nope.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingFile { .. }));
    }
}
