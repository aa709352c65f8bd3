//! External command execution.

use crate::bundler::error::{Error, Result};
use std::ffi::{OsStr, OsString};
use std::process::Output;

/// Runs a host tool to completion and captures its output.
///
/// The tool is looked up in `PATH` first so a missing tool is reported as
/// [`Error::ToolNotFound`] rather than a bare spawn failure. A non-zero exit
/// status is not an error here; callers decide what it means.
pub async fn output<I, S>(program: &str, args: I) -> Result<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let path = which::which(program).map_err(|_| Error::ToolNotFound(program.to_string()))?;
    let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_owned()).collect();

    log::debug!("Running {} {:?}", path.display(), args);

    tokio::process::Command::new(&path)
        .args(&args)
        .output()
        .await
        .map_err(|error| Error::CommandFailed {
            command: program.to_string(),
            error,
        })
}

/// Renders a command's stderr for error messages.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_tool_is_reported_by_name() {
        let err = output("definitely-not-a-real-tool-xyz", ["--help"])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ToolNotFound(ref t) if t == "definitely-not-a-real-tool-xyz"));
    }
}
