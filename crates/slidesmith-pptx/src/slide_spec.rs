//! Slide specifications: the JSON input of the deck builder.
//!
//! ```json
//! [
//!   { "type": "title", "title": "Quarterly Review", "subtitle": "Q3" },
//!   { "type": "content", "title": "Agenda", "content": ["Results", "Plans"] },
//!   { "type": "two_column", "title": "Pros & Cons", "left": ["Fast"], "right": ["New"] },
//!   { "type": "custom", "layout": 4 },
//!   { "type": "blank" }
//! ]
//! ```
//!
//! `type` defaults to `content`; unknown fields are ignored.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::assembler::TextPayload;
use crate::error::{DeckError, Result};

/// Title used when a slide of unrecognized type has none
pub const UNTITLED: &str = "Untitled";

/// One slide to assemble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideSpec {
    /// Declared slide type
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    /// Body text: one string or a list of bullets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<TextPayload>,

    /// Left column of a two-column slide
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<TextPayload>,

    /// Right column of a two-column slide
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<TextPayload>,

    /// Explicit layout index for `custom` slides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<usize>,
}

fn default_kind() -> String {
    "content".to_string()
}

impl Default for SlideSpec {
    fn default() -> Self {
        Self::new(default_kind())
    }
}

impl SlideSpec {
    /// A spec of the given type with no fields set
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            title: None,
            subtitle: None,
            content: None,
            left: None,
            right: None,
            layout: None,
        }
    }

    /// Title slide
    pub fn title(title: impl Into<String>, subtitle: Option<&str>) -> Self {
        Self {
            title: Some(title.into()),
            subtitle: subtitle.map(str::to_string),
            ..Self::new("title")
        }
    }

    /// Content slide
    pub fn content(title: impl Into<String>, content: impl Into<TextPayload>) -> Self {
        Self {
            title: Some(title.into()),
            content: Some(content.into()),
            ..Self::new("content")
        }
    }

    /// Two-column slide
    pub fn two_column(
        title: impl Into<String>,
        left: impl Into<TextPayload>,
        right: impl Into<TextPayload>,
    ) -> Self {
        Self {
            title: Some(title.into()),
            left: Some(left.into()),
            right: Some(right.into()),
            ..Self::new("two_column")
        }
    }

    /// Custom slide on an explicit layout
    pub fn custom(layout: usize) -> Self {
        Self {
            layout: Some(layout),
            ..Self::new("custom")
        }
    }

    /// The declared type, parsed
    pub fn slide_kind(&self) -> SlideKind {
        SlideKind::parse(&self.kind)
    }
}

/// Slide type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlideKind {
    Title,
    Content,
    TwoColumn,
    Custom,
    Blank,
    /// Any other type; assembled as a content slide
    Unrecognized(String),
}

impl SlideKind {
    /// Parse a declared type; `two-column` is accepted as well
    pub fn parse(s: &str) -> Self {
        match s {
            "title" => Self::Title,
            "content" => Self::Content,
            "two_column" | "two-column" => Self::TwoColumn,
            "custom" => Self::Custom,
            "blank" => Self::Blank,
            other => Self::Unrecognized(other.to_string()),
        }
    }
}

impl fmt::Display for SlideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title => f.write_str("title"),
            Self::Content => f.write_str("content"),
            Self::TwoColumn => f.write_str("two_column"),
            Self::Custom => f.write_str("custom"),
            Self::Blank => f.write_str("blank"),
            Self::Unrecognized(s) => write!(f, "{s} (unrecognized)"),
        }
    }
}

/// Parse a JSON array of slide specifications
pub fn parse_slide_specs(json: &str) -> Result<Vec<SlideSpec>> {
    serde_json::from_str(json).map_err(|e| DeckError::format("slide specification", e.to_string()))
}

/// Load slide specifications from a JSON file
pub fn load_slide_specs(path: impl AsRef<Path>) -> Result<Vec<SlideSpec>> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|e| DeckError::file(path, e))?;
    parse_slide_specs(&json)
}
