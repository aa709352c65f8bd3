//! Shell-style argument strings.
//!
//! Item `Arguments` and the dialog option strings are tokenized with shell
//! quoting rules so a quoted path containing spaces stays one token, then
//! rejoined after file tokens have been rewritten.

use crate::bundler::{Error, Result};

/// Splits an argument string into tokens, honoring shell quoting.
pub fn split(arguments: &str) -> Result<Vec<String>> {
    shlex::split(arguments).ok_or_else(|| Error::InvalidArguments(arguments.to_string()))
}

/// Joins tokens with single spaces, shell-quoting any token that would not
/// survive [`split`] as written.
pub fn join<S: AsRef<str>>(tokens: &[S]) -> Result<String> {
    let quoted = tokens
        .iter()
        .map(|token| {
            let token = token.as_ref();
            shlex::try_quote(token).map_err(|e| Error::InvalidArguments(format!("{token:?}: {e}")))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(quoted.join(" "))
}

/// Whether the token is a flag rather than a value.
pub fn is_flag(token: &str) -> bool {
    token.starts_with('-')
}

/// Removes one leading and one trailing quote character, if present.
pub fn strip_quotes(token: &str) -> &str {
    let token = token
        .strip_prefix('"')
        .or_else(|| token.strip_prefix('\''))
        .unwrap_or(token);
    token
        .strip_suffix('"')
        .or_else(|| token.strip_suffix('\''))
        .unwrap_or(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_and_plain_paths_rejoin_unchanged() {
        let input = "-image /local/banner.png -title Hello";
        let tokens = split(input).unwrap();
        assert_eq!(tokens, ["-image", "/local/banner.png", "-title", "Hello"]);
        assert_eq!(join(&tokens).unwrap(), input);
    }

    #[test]
    fn quoted_path_with_spaces_stays_one_token() {
        let tokens = split(r#"--icon "/Library/My Icons/logo.png" -v"#).unwrap();
        assert_eq!(tokens, ["--icon", "/Library/My Icons/logo.png", "-v"]);
        assert_eq!(split(&join(&tokens).unwrap()).unwrap(), tokens);
    }

    #[test]
    fn collapses_extra_whitespace() {
        let tokens = split("  -a   b  ").unwrap();
        assert_eq!(join(&tokens).unwrap(), "-a b");
    }

    #[test]
    fn unbalanced_quotes_are_rejected() {
        assert!(matches!(split("-title \"Hello"), Err(Error::InvalidArguments(_))));
    }

    #[test]
    fn strips_single_layer_of_quotes() {
        assert_eq!(strip_quotes("'logo.png'"), "logo.png");
        assert_eq!(strip_quotes("\"logo.png\""), "logo.png");
        assert_eq!(strip_quotes("\"'x'\""), "'x'");
        assert_eq!(strip_quotes("plain"), "plain");
    }

    #[test]
    fn empty_string_has_no_tokens() {
        assert!(split("").unwrap().is_empty());
        assert_eq!(join::<String>(&[]).unwrap(), "");
    }

    #[test]
    fn embedded_quotes_and_variables_survive_rejoin() {
        let tokens = ["--title", "say \"hi\" now", "$HOME", ""];
        let joined = join(&tokens).unwrap();
        assert_eq!(split(&joined).unwrap(), tokens);
    }

    #[test]
    fn nul_bytes_cannot_be_quoted() {
        assert!(matches!(join(&["a\0b"]), Err(Error::InvalidArguments(_))));
    }
}
