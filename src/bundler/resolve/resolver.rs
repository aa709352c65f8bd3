//! Rewriting a manifest to production paths.

use super::staging::{Staging, StagingKind};
use crate::bundler::{
    Category, DialogOption, Error, HostTools, Item, Manifest, Result, manifest::arguments,
};

/// Produces a resolved copy of a manifest, staging every referenced file.
pub struct Resolver<'a> {
    staging: &'a Staging,
    tools: &'a HostTools,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver staging into `staging`.
    pub fn new(staging: &'a Staging, tools: &'a HostTools) -> Self {
        Self { staging, tools }
    }

    /// Resolves every item and dialog option of `manifest`.
    ///
    /// The input is left untouched. Keys the resolver does not interpret are
    /// carried over in their original order.
    pub async fn resolve(&self, manifest: &Manifest) -> Result<Manifest> {
        let mut resolved = manifest.clone();

        for category in Category::ALL {
            let items = manifest.body().items(category);
            if items.is_empty() {
                continue;
            }

            if items.iter().any(|item| item.display_name.is_empty()) {
                return Err(Error::MissingDisplayName {
                    category: category.to_string(),
                });
            }

            log::info!("Processing key: {}...", category);
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(self.resolve_item(category, item).await?);
            }
            *resolved.body_mut().items_mut(category) = out;
        }

        for option in DialogOption::ALL {
            let Some(value) = manifest.body().dialog(option) else {
                continue;
            };
            log::info!("Processing key: {}...", option.key());
            let value = self.resolve_arguments(value).await?;
            resolved.body_mut().set_dialog(option, Some(value));
        }

        Ok(resolved)
    }

    async fn resolve_item(&self, category: Category, item: &Item) -> Result<Item> {
        log::info!("  Processing item: {}", item.display_name);
        let mut item = item.clone();

        if let Some(icon) = &item.icon {
            item.icon = Some(
                self.staging
                    .resolve_file(icon, StagingKind::Icons, false)
                    .await?,
            );
        }

        if let Some(script) = &item.script_path {
            let production = self
                .staging
                .resolve_file(script, StagingKind::Scripts, false)
                .await?;
            let staged = self.staging.staged_path(&production);
            item.md5 = Some(self.tools.hasher.hash(&staged).await?);
            item.script_path = Some(production);
        }

        if let Some(package) = &item.package_path {
            let production = self
                .staging
                .resolve_file(package, StagingKind::Packages, false)
                .await?;
            let staged = self.staging.staged_path(&production);
            item.team_id = self.tools.signatures.team_id(&staged).await?;
            item.md5 = Some(self.tools.hasher.hash(&staged).await?);
            item.package_path = Some(production);
        }

        // Installomator arguments are directives, not files.
        if category != Category::Installomator {
            if let Some(args) = &item.arguments {
                item.arguments = Some(self.resolve_arguments(args).await?);
            }
        }

        Ok(item)
    }

    /// Stages any file named in an argument string and rewrites it to its
    /// production path. Tokens that are not files are kept as written.
    pub async fn resolve_arguments(&self, value: &str) -> Result<String> {
        let mut tokens = arguments::split(value)?;
        for token in tokens.iter_mut() {
            if arguments::is_flag(token) {
                continue;
            }
            let candidate = arguments::strip_quotes(token).to_string();
            *token = self
                .staging
                .resolve_file(&candidate, StagingKind::Icons, true)
                .await?;
        }
        arguments::join(&tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::{ContentHasher, ManifestFormat, SignatureInspector};
    use async_trait::async_trait;
    use std::path::Path;

    struct Signed;

    #[async_trait]
    impl SignatureInspector for Signed {
        async fn team_id(&self, package: &Path) -> Result<Option<String>> {
            let signed = package.file_name().is_some_and(|n| n == "signed.pkg");
            Ok(signed.then(|| "ABCDE12345".to_string()))
        }
    }

    struct Length;

    #[async_trait]
    impl ContentHasher for Length {
        async fn hash(&self, path: &Path) -> Result<String> {
            Ok(std::fs::metadata(path)?.len().to_string())
        }
    }

    struct Fixture {
        _build: tempfile::TempDir,
        source: tempfile::TempDir,
        staging: Staging,
        tools: HostTools,
    }

    fn fixture() -> Fixture {
        let build = tempfile::tempdir().unwrap();
        let source = tempfile::tempdir().unwrap();
        let staging = Staging::new(build.path(), source.path());
        let tools = HostTools::system().with_hasher(Length).with_signatures(Signed);
        Fixture {
            _build: build,
            source,
            staging,
            tools,
        }
    }

    fn parse(xml: &str) -> Manifest {
        Manifest::from_bytes(ManifestFormat::PropertyList, xml.as_bytes()).unwrap()
    }

    #[tokio::test]
    async fn packages_get_hash_and_team() {
        let fx = fixture();
        std::fs::write(fx.source.path().join("signed.pkg"), b"12345").unwrap();
        std::fs::write(fx.source.path().join("unsigned.pkg"), b"123").unwrap();

        let manifest = parse(
            r#"<plist version="1.0"><dict><key>Packages</key><array>
<dict><key>DisplayName</key><string>Signed</string><key>PackagePath</key><string>signed.pkg</string></dict>
<dict><key>DisplayName</key><string>Unsigned</string><key>PackagePath</key><string>unsigned.pkg</string><key>TeamID</key><string>STALE</string></dict>
</array></dict></plist>"#,
        );

        let resolved = Resolver::new(&fx.staging, &fx.tools)
            .resolve(&manifest)
            .await
            .unwrap();
        let items = resolved.body().items(Category::Packages);

        assert_eq!(items[0].package_path.as_deref(), Some("/usr/local/Baseline/Packages/signed.pkg"));
        assert_eq!(items[0].md5.as_deref(), Some("5"));
        assert_eq!(items[0].team_id.as_deref(), Some("ABCDE12345"));
        assert_eq!(items[1].md5.as_deref(), Some("3"));
        assert_eq!(items[1].team_id, None);

        // The input manifest is not modified.
        assert_eq!(
            manifest.body().items(Category::Packages)[0].package_path.as_deref(),
            Some("signed.pkg")
        );
    }

    #[tokio::test]
    async fn dialog_files_are_staged_and_text_kept() {
        let fx = fixture();
        let banner = fx.source.path().join("banner.png");
        std::fs::write(&banner, b"png").unwrap();

        let mut manifest = parse(r#"<plist version="1.0"><dict/></plist>"#);
        manifest.body_mut().set_dialog(
            DialogOption::List,
            Some(format!("-image {} -title Hello", banner.display())),
        );

        let resolved = Resolver::new(&fx.staging, &fx.tools)
            .resolve(&manifest)
            .await
            .unwrap();
        assert_eq!(
            resolved.body().dialog(DialogOption::List),
            Some("-image /usr/local/Baseline/Icons/banner.png -title Hello")
        );
        assert!(fx.staging.dir(StagingKind::Icons).join("banner.png").is_file());
    }

    #[tokio::test]
    async fn installomator_arguments_are_untouched() {
        let fx = fixture();
        std::fs::write(fx.source.path().join("NOTIFY=silent"), b"").unwrap();

        let manifest = parse(
            r#"<plist version="1.0"><dict><key>Installomator</key><array>
<dict><key>DisplayName</key><string>Chrome</string><key>Label</key><string>googlechrome</string><key>Arguments</key><string>NOTIFY=silent  BLOCKING_PROCESS_ACTION=kill</string></dict>
</array></dict></plist>"#,
        );

        let resolved = Resolver::new(&fx.staging, &fx.tools)
            .resolve(&manifest)
            .await
            .unwrap();
        assert_eq!(
            resolved.body().items(Category::Installomator)[0].arguments.as_deref(),
            Some("NOTIFY=silent  BLOCKING_PROCESS_ACTION=kill")
        );
    }

    #[tokio::test]
    async fn quoted_arguments_are_requoted() {
        let fx = fixture();
        let resolved = Resolver::new(&fx.staging, &fx.tools)
            .resolve_arguments(r#"--name "Example Corp" --flag"#)
            .await
            .unwrap();
        assert_eq!(
            arguments::split(&resolved).unwrap(),
            ["--name", "Example Corp", "--flag"]
        );
    }

    #[tokio::test]
    async fn empty_display_name_fails_before_staging() {
        let fx = fixture();
        std::fs::write(fx.source.path().join("setup.sh"), b"echo").unwrap();

        let manifest = parse(
            r#"<plist version="1.0"><dict><key>Scripts</key><array>
<dict><key>DisplayName</key><string>Setup</string><key>ScriptPath</key><string>setup.sh</string></dict>
<dict><key>DisplayName</key><string></string><key>ScriptPath</key><string>setup.sh</string></dict>
</array></dict></plist>"#,
        );

        let err = Resolver::new(&fx.staging, &fx.tools)
            .resolve(&manifest)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingDisplayName { ref category } if category == "Scripts"));
        assert!(!fx.staging.dir(StagingKind::Scripts).exists());
    }
}
