//! Template configuration: semantic slide roles mapped to layout indices.
//!
//! A configuration is a flat record such as
//!
//! ```json
//! { "title_slide": 0, "content_slide": 1, "two_column": 3, "blank": 6 }
//! ```
//!
//! Roles mapped to `null` are known but not configured yet; looking them up
//! behaves exactly like looking up an unknown role. An optional `note` string
//! is carried through and ignored. Files ending in `.toml` are read and
//! written as TOML, everything else as JSON.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DeckError, Result};

/// Built-in role mapping, matching the default Office theme
pub const DEFAULT_LAYOUTS: &[(&str, usize)] = &[
    ("title_slide", 0),
    ("content_slide", 1),
    ("two_column", 3),
    ("blank", 6),
];

/// Role names the deck builder looks up
pub mod roles {
    pub const TITLE_SLIDE: &str = "title_slide";
    pub const CONTENT_SLIDE: &str = "content_slide";
    pub const TWO_COLUMN: &str = "two_column";
    pub const BLANK: &str = "blank";
    pub const SECTION_HEADER: &str = "section_header";
}

const SKELETON_NOTE: &str =
    "Set each role to the index of a layout in your template; run `slidesmith layouts` to list them";

/// Role → layout index mapping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Free text, ignored by all logic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    #[serde(flatten)]
    layouts: BTreeMap<String, Option<usize>>,
}

impl TemplateConfig {
    /// An empty configuration; every lookup falls back
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in mapping ([`DEFAULT_LAYOUTS`])
    pub fn builtin() -> Self {
        Self::from_map(DEFAULT_LAYOUTS.iter().map(|&(role, index)| (role, index)))
    }

    /// The record written for a user to fill in
    pub fn skeleton() -> Self {
        let mut config = Self::new();
        config.set(roles::TITLE_SLIDE, Some(0));
        config.set(roles::CONTENT_SLIDE, Some(1));
        config.set(roles::TWO_COLUMN, None);
        config.set(roles::BLANK, None);
        config.note = Some(SKELETON_NOTE.to_string());
        config
    }

    /// Build from literal pairs
    pub fn from_map<K: Into<String>>(entries: impl IntoIterator<Item = (K, usize)>) -> Self {
        Self {
            note: None,
            layouts: entries
                .into_iter()
                .map(|(role, index)| (role.into(), Some(index)))
                .collect(),
        }
    }

    /// Layout index for `role`, or `fallback` when the role is unknown or null
    pub fn resolve(&self, role: &str, fallback: usize) -> usize {
        self.get(role).unwrap_or(fallback)
    }

    /// Configured layout index for `role`
    pub fn get(&self, role: &str) -> Option<usize> {
        self.layouts.get(role).copied().flatten()
    }

    /// Set or clear a role
    pub fn set(&mut self, role: impl Into<String>, index: Option<usize>) {
        self.layouts.insert(role.into(), index);
    }

    /// Known roles, configured or not, in key order
    pub fn roles(&self) -> impl Iterator<Item = (&str, Option<usize>)> {
        self.layouts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Parse a JSON record
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| DeckError::format("template configuration", e.to_string()))
    }

    /// Parse a TOML record
    pub fn from_toml(toml_content: &str) -> Result<Self> {
        toml::from_str(toml_content)
            .map_err(|e| DeckError::format("template configuration", e.to_string()))
    }

    /// Load from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| DeckError::file(path, e))?;
        if is_toml(path) {
            Self::from_toml(&content)
        } else {
            Self::from_json(&content)
        }
    }

    /// Pretty JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DeckError::format("template configuration", e.to_string()))
    }

    /// TOML; unconfigured roles are omitted since TOML has no null
    pub fn to_toml(&self) -> Result<String> {
        #[derive(Serialize)]
        struct Configured<'a> {
            #[serde(skip_serializing_if = "Option::is_none")]
            note: Option<&'a str>,
            #[serde(flatten)]
            layouts: BTreeMap<&'a str, usize>,
        }

        let configured = Configured {
            note: self.note.as_deref(),
            layouts: self
                .layouts
                .iter()
                .filter_map(|(k, v)| v.map(|v| (k.as_str(), v)))
                .collect(),
        };
        toml::to_string_pretty(&configured)
            .map_err(|e| DeckError::format("template configuration", e.to_string()))
    }

    /// Write to a file, overwriting it
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if is_toml(path) {
            self.to_toml()?
        } else {
            self.to_json()?
        };
        std::fs::write(path, content).map_err(|e| DeckError::file(path, e))
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_builtin_config() {
        let config = TemplateConfig::builtin();

        assert_eq!(config.get("title_slide"), Some(0));
        assert_eq!(config.get("content_slide"), Some(1));
        assert_eq!(config.get("two_column"), Some(3));
        assert_eq!(config.get("blank"), Some(6));
        assert_eq!(config.note, None);
    }

    #[test]
    fn test_resolve_fallback() {
        let config = TemplateConfig::from_map([("content_slide", 1)]);

        assert_eq!(config.resolve("content_slide", 9), 1);
        assert_eq!(config.resolve("missing_role", 4), 4);
    }

    #[test]
    fn test_null_role_falls_back() {
        let config = TemplateConfig::skeleton();

        assert_eq!(config.resolve("two_column", 2), 2);
        assert_eq!(config.resolve("blank", 5), 5);
        assert_eq!(config.resolve("title_slide", 5), 0);
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{
            "title_slide": 2,
            "content_slide": 4,
            "two_column": null,
            "note": "corporate template"
        }"#;

        let config = TemplateConfig::from_json(json).unwrap();

        assert_eq!(config.get("title_slide"), Some(2));
        assert_eq!(config.get("content_slide"), Some(4));
        assert_eq!(config.get("two_column"), None);
        assert_eq!(config.note.as_deref(), Some("corporate template"));
        assert_eq!(config.roles().count(), 3);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
note = "from toml"
title_slide = 1
blank = 7
"#;

        let config = TemplateConfig::from_toml(toml).unwrap();

        assert_eq!(config.get("title_slide"), Some(1));
        assert_eq!(config.get("blank"), Some(7));
        assert_eq!(config.note.as_deref(), Some("from toml"));
    }

    #[test]
    fn test_invalid_record_is_format_error() {
        let err = TemplateConfig::from_json("[1, 2, 3]").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);

        let err = TemplateConfig::from_json(r#"{"title_slide": "zero"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_skeleton_json_keeps_nulls() {
        let json = TemplateConfig::skeleton().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["title_slide"], 0);
        assert_eq!(value["content_slide"], 1);
        assert!(value["two_column"].is_null());
        assert!(value["blank"].is_null());
        assert!(value["note"].is_string());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();

        for name in ["config.json", "config.toml"] {
            let path = dir.path().join(name);
            let mut config = TemplateConfig::builtin();
            config.set("section_header", Some(2));
            config.save(&path).unwrap();

            let loaded = TemplateConfig::load(&path).unwrap();
            assert_eq!(loaded, config, "{name}");
        }
    }

    #[test]
    fn test_load_missing_file() {
        let err = TemplateConfig::load("/nonexistent/config.json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::File);
    }

    #[test]
    fn test_save_to_unwritable_path() {
        let err = TemplateConfig::builtin()
            .save("/nonexistent/dir/config.json")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::File);
    }
}
