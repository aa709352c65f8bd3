//! Command line interface for Baseline Builder.
//!
//! Parses arguments, then either builds and validates a package or
//! validates an existing one.

mod args;

pub use args::{Args, Mode, order_validate_paths};

use crate::bundler::{Builder, HostTools, Session, builder, validate::Validator};
use crate::error::Result;
use clap::Parser;
use std::sync::Arc;

/// Main CLI entry point
///
/// Returns the process exit code. Usage errors print clap's message and
/// exit 1; `--help` and `--version` exit 0.
pub async fn run() -> Result<i32> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            e.print()?;
            return Ok(code);
        }
    };
    execute(&args).await?;
    Ok(0)
}

/// Runs the mode selected by `args`.
pub async fn execute(args: &Args) -> Result<()> {
    match args.mode()? {
        Mode::Build(configuration) => {
            let settings = args.settings(&configuration)?;
            let session = Arc::new(Session::new(settings.github_token().map(String::from))?);
            let builder = Builder::new(settings, session, HostTools::system())?;

            let outcome = builder.build().await?;
            builder
                .validate_package(&outcome.package, outcome.external_manifest())
                .await?;
            log::info!("Build complete: {}", outcome.package.display());
        }
        Mode::Validate { package, manifest } => {
            builder::warn_missing_host_tools();
            let session = Session::new(args.github_token.clone())?;
            let tools = HostTools::system();
            Validator::new(&tools, &session, &args.installomator_version)
                .validate_package(&package, manifest.as_deref())
                .await?;
        }
    }
    Ok(())
}
