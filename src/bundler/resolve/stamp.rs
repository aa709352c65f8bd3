//! Build provenance recorded in the manifest.

use plist::{Dictionary, Value};

const NOT_AVAILABLE: &str = "N/A";

/// Versions of everything that went into a package.
///
/// Informational only; validation never reads it back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionStamp {
    /// Package version.
    pub project_version: String,
    /// Package identifier.
    pub project_identifier: String,
    /// Baseline release, if known.
    pub baseline: Option<String>,
    /// swiftDialog release, if bundled and known.
    pub swift_dialog: Option<String>,
    /// Installomator release, if bundled and known.
    pub installomator: Option<String>,
}

impl VersionStamp {
    /// Renders the `Baseline-Builder` dictionary.
    pub fn to_dictionary(&self) -> Dictionary {
        let or_na = |v: &Option<String>| Value::String(v.as_deref().unwrap_or(NOT_AVAILABLE).to_string());

        let mut dict = Dictionary::new();
        dict.insert("Project Version".into(), Value::String(self.project_version.clone()));
        dict.insert(
            "Project Identifier".into(),
            Value::String(self.project_identifier.clone()),
        );
        dict.insert(
            "Baseline-Builder Version".into(),
            Value::String(env!("CARGO_PKG_VERSION").to_string()),
        );
        dict.insert("Baseline Version".into(), or_na(&self.baseline));
        dict.insert("swiftDialog Version".into(), or_na(&self.swift_dialog));
        dict.insert("Installomator Version".into(), or_na(&self.installomator));
        dict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_versions_are_na() {
        let stamp = VersionStamp {
            project_version: "1.2.0".into(),
            project_identifier: "com.example.baseline".into(),
            baseline: Some("v2.1".into()),
            ..Default::default()
        };
        let dict = stamp.to_dictionary();

        let get = |k: &str| dict.get(k).and_then(Value::as_string).unwrap().to_string();
        assert_eq!(get("Project Version"), "1.2.0");
        assert_eq!(get("Baseline Version"), "v2.1");
        assert_eq!(get("swiftDialog Version"), "N/A");
        assert_eq!(get("Installomator Version"), "N/A");
        assert_eq!(get("Baseline-Builder Version"), env!("CARGO_PKG_VERSION"));
        assert_eq!(
            dict.keys().next().map(String::as_str),
            Some("Project Version")
        );
    }
}
