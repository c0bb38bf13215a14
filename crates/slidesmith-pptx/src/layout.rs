//! Slide layouts and the placeholders they define.
//!
//! Layouts are read from the first slide master of a template, in the order
//! of its `p:sldLayoutIdLst`. A layout's position in that list is its index
//! everywhere else in this crate (configuration, catalog, slide specs).

use serde::Serialize;

use crate::error::Result;
use crate::shape::{Geometry, ShapeTree};
use crate::xml::XmlIndex;

/// Semantic type of a placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderKind {
    /// Title placeholder
    Title,

    /// Center title (for title slides)
    CenterTitle,

    /// Subtitle
    Subtitle,

    /// Body content
    Body,

    /// Object (content); also any `p:ph` without a `type`
    Object,

    /// Picture
    Picture,

    /// Date, footer, slide number, chart, table, media, ...
    Other,
}

impl PlaceholderKind {
    /// Parse from the OOXML `type` attribute
    pub fn from_ooxml_type(s: Option<&str>) -> Self {
        match s {
            None | Some("obj") => Self::Object,
            Some("title") => Self::Title,
            Some("ctrTitle") => Self::CenterTitle,
            Some("subTitle") => Self::Subtitle,
            Some("body") => Self::Body,
            Some("pic") => Self::Picture,
            Some(_) => Self::Other,
        }
    }

    /// Human-readable label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::CenterTitle => "center-title",
            Self::Subtitle => "subtitle",
            Self::Body => "body",
            Self::Object => "object",
            Self::Picture => "picture",
            Self::Other => "other",
        }
    }

    /// Whether new slides get a text body for this kind
    pub fn takes_text(&self) -> bool {
        matches!(
            self,
            Self::Title | Self::CenterTitle | Self::Subtitle | Self::Body | Self::Object
        )
    }
}

impl std::fmt::Display for PlaceholderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A placeholder defined by a layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceholderDescriptor {
    /// Placeholder index (`idx` attribute, 0 when absent)
    pub idx: u32,

    /// Shape name
    pub name: String,

    /// Semantic type
    pub kind: PlaceholderKind,

    /// Raw OOXML `type` attribute
    #[serde(skip)]
    pub ooxml_type: Option<String>,

    /// Position and size, own or inherited from the master
    #[serde(skip)]
    pub geometry: Option<Geometry>,
}

impl PlaceholderDescriptor {
    /// Create a descriptor
    pub fn new(idx: u32, name: impl Into<String>, ooxml_type: Option<&str>) -> Self {
        Self {
            idx,
            name: name.into(),
            kind: PlaceholderKind::from_ooxml_type(ooxml_type),
            ooxml_type: ooxml_type.map(str::to_string),
            geometry: None,
        }
    }

    /// Date, footer and slide number placeholders are not copied onto new slides
    pub fn is_footer_like(&self) -> bool {
        matches!(self.ooxml_type.as_deref(), Some("dt" | "ftr" | "sldNum"))
    }

    /// Key used to match a layout placeholder with its master counterpart
    fn master_key(&self) -> &str {
        match self.ooxml_type.as_deref() {
            Some("title" | "ctrTitle") => "title",
            Some("dt") => "dt",
            Some("ftr") => "ftr",
            Some("sldNum") => "sldNum",
            _ => "body",
        }
    }
}

/// A slide layout from a template
#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    /// Position in the master's layout list (0-based)
    pub index: usize,

    /// Display name (`p:cSld/@name`), not guaranteed unique
    pub name: String,

    /// Part name inside the package
    #[serde(skip)]
    pub part_name: String,

    /// Placeholders, in shape tree order
    pub placeholders: Vec<PlaceholderDescriptor>,
}

impl Layout {
    /// Parse a layout part
    pub fn parse(index: usize, part_name: impl Into<String>, xml: &str) -> Result<Self> {
        let doc = XmlIndex::parse(xml)?;
        let name = doc
            .first("cSld")
            .and_then(|c_sld| doc.node(c_sld).attr("name"))
            .unwrap_or_default()
            .to_string();

        let tree = ShapeTree::parse(xml)?;
        let placeholders = tree
            .shapes
            .iter()
            .filter_map(|shape| {
                let ph = shape.placeholder.as_ref()?;
                let mut descriptor =
                    PlaceholderDescriptor::new(ph.idx, shape.name.clone(), ph.ooxml_type.as_deref());
                descriptor.geometry = shape.geometry;
                Some(descriptor)
            })
            .collect();

        Ok(Self {
            index,
            name,
            part_name: part_name.into(),
            placeholders,
        })
    }

    /// Fill missing placeholder geometry from the slide master
    pub fn inherit_geometry(&mut self, master: &[PlaceholderDescriptor]) {
        for placeholder in self.placeholders.iter_mut().filter(|p| p.geometry.is_none()) {
            let key = placeholder.master_key();
            placeholder.geometry = master
                .iter()
                .find(|m| m.master_key() == key)
                .and_then(|m| m.geometry);
        }
    }

    /// Placeholder by `idx`
    pub fn placeholder(&self, idx: u32) -> Option<&PlaceholderDescriptor> {
        self.placeholders.iter().find(|p| p.idx == idx)
    }
}

/// Read the master placeholders used for geometry inheritance
pub(crate) fn master_placeholders(xml: &str) -> Result<Vec<PlaceholderDescriptor>> {
    Ok(Layout::parse(0, "", xml)?.placeholders)
}
