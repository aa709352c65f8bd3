//! Installer package generation with `pkgbuild` and `productbuild`.

use crate::bundler::{
    PackageBuilder, PackageRequest, Result,
    error::ErrorExt,
    utils::{fs, process},
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// [`PackageBuilder`] that lays the file structure out in a payload root and
/// runs `pkgbuild`, wrapping the result with `productbuild` for
/// distribution packages.
#[derive(Debug, Default, Clone, Copy)]
pub struct PkgbuildPackager;

/// Copies every mapped source into `root` at its install location.
async fn stage_payload(file_structure: &BTreeMap<PathBuf, PathBuf>, root: &Path) -> Result<()> {
    for (source, destination) in file_structure {
        let relative = destination.strip_prefix("/").unwrap_or(destination);
        let target = root.join(relative);
        log::debug!("  {} -> {}", source.display(), destination.display());

        if source.is_dir() {
            fs::copy_dir(source, &target).await?;
        } else {
            fs::copy_file(source, &target).await?;
        }
    }
    Ok(())
}

/// Installs the hook scripts under the names the installer expects.
async fn stage_scripts(request: &PackageRequest, scripts: &Path) -> Result<()> {
    for (source, name) in [
        (&request.preinstall_script, "preinstall"),
        (&request.postinstall_script, "postinstall"),
    ] {
        let target = scripts.join(name);
        fs::copy_file(source, &target).await?;
        fs::set_executable(&target).await?;
    }
    Ok(())
}

/// Appends `--sign <identity>` when signing was requested.
fn sign_args(args: &mut Vec<OsString>, identity: Option<&str>) {
    if let Some(identity) = identity {
        args.push("--sign".into());
        args.push(identity.into());
    }
}

#[async_trait]
impl PackageBuilder for PkgbuildPackager {
    async fn build(&self, request: &PackageRequest) -> Result<bool> {
        let workspace = tempfile::tempdir()?;
        let root = workspace.path().join("root");
        let scripts = workspace.path().join("scripts");

        fs::create_dir_all(&root, false).await?;
        stage_payload(&request.file_structure, &root).await?;
        stage_scripts(request, &scripts).await?;

        if let Some(parent) = request.output.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .fs_context("creating output directory", parent)?;
        }

        let component = if request.distribution {
            workspace.path().join("component.pkg")
        } else {
            request.output.clone()
        };

        let mut args: Vec<OsString> = vec![
            "--root".into(),
            root.into(),
            "--identifier".into(),
            request.identifier.clone().into(),
            "--version".into(),
            request.version.clone().into(),
            "--scripts".into(),
            scripts.into(),
            "--install-location".into(),
            "/".into(),
        ];
        sign_args(&mut args, request.signing_identity.as_deref());
        args.push(component.clone().into());

        let output = process::output("pkgbuild", &args).await?;
        if !output.status.success() {
            log::error!("pkgbuild failed: {}", process::stderr(&output));
            return Ok(false);
        }

        if !request.distribution {
            return Ok(true);
        }

        let mut args: Vec<OsString> = vec!["--package".into(), component.into()];
        sign_args(&mut args, request.signing_identity.as_deref());
        args.push(request.output.clone().into());

        let output = process::output("productbuild", &args).await?;
        if !output.status.success() {
            log::error!("productbuild failed: {}", process::stderr(&output));
            return Ok(false);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn payload_lands_at_install_locations() {
        let dir = tempfile::tempdir().unwrap();
        let daemon = dir.path().join("daemon.plist");
        std::fs::write(&daemon, b"<plist/>").unwrap();
        let scripts = dir.path().join("Scripts");
        std::fs::create_dir_all(&scripts).unwrap();
        std::fs::write(scripts.join("setup.sh"), b"echo").unwrap();

        let mut mapping = BTreeMap::new();
        mapping.insert(
            daemon,
            PathBuf::from("/Library/LaunchDaemons/com.secondsonconsulting.baseline.plist"),
        );
        mapping.insert(scripts, PathBuf::from("/usr/local/Baseline/Scripts"));

        let root = dir.path().join("root");
        stage_payload(&mapping, &root).await.unwrap();

        assert!(root
            .join("Library/LaunchDaemons/com.secondsonconsulting.baseline.plist")
            .is_file());
        assert!(root.join("usr/local/Baseline/Scripts/setup.sh").is_file());
    }

    #[test]
    fn signing_is_optional() {
        let mut args = Vec::new();
        sign_args(&mut args, None);
        assert!(args.is_empty());

        sign_args(&mut args, Some("Developer ID Installer: Example (ABCDE12345)"));
        assert_eq!(args[0], "--sign");
        assert_eq!(args.len(), 2);
    }
}
