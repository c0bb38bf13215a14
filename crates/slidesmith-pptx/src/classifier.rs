//! Title / content / other classification of slide shapes.
//!
//! Placeholder type decides first. Shapes that are not title or content
//! placeholders fall back to geometry: a text shape in the top third of the
//! slide that is taller than half an inch reads as a title. Decorative text
//! boxes near the top of a slide can be misread as titles this way.

use serde::Serialize;

use crate::constants::TITLE_MIN_HEIGHT_EMU;
use crate::layout::PlaceholderKind;
use crate::presentation::Slide;
use crate::shape::{Geometry, Shape, ShapeKind};

/// Role of a shape on a slide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeRole {
    Title,
    Content,
    Other,
}

/// Role implied by a placeholder kind alone
pub fn role_from_placeholder(kind: PlaceholderKind) -> Option<ShapeRole> {
    match kind {
        PlaceholderKind::Title | PlaceholderKind::CenterTitle | PlaceholderKind::Subtitle => {
            Some(ShapeRole::Title)
        }
        PlaceholderKind::Body | PlaceholderKind::Object => Some(ShapeRole::Content),
        PlaceholderKind::Picture | PlaceholderKind::Other => None,
    }
}

/// Role implied by geometry, for shapes that are not title or content placeholders
pub fn role_from_geometry(has_text: bool, geometry: Option<Geometry>, slide_height: i64) -> ShapeRole {
    if !has_text {
        return ShapeRole::Other;
    }
    match geometry {
        Some(g) if g.top < slide_height / 3 && g.height > TITLE_MIN_HEIGHT_EMU => ShapeRole::Title,
        _ => ShapeRole::Content,
    }
}

/// Classify a shape
pub fn role_of(shape: &Shape, slide_height: i64) -> ShapeRole {
    shape
        .placeholder
        .as_ref()
        .and_then(|ph| role_from_placeholder(ph.kind))
        .unwrap_or_else(|| {
            role_from_geometry(shape.has_text_frame(), shape.effective_geometry(), slide_height)
        })
}

/// Text-bearing shapes of a slide grouped by role, as shape positions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextShapes {
    /// The first title-classified shape
    pub title: Option<usize>,
    /// Content-classified shapes in z-order
    pub content: Vec<usize>,
    /// Further titles and every other `p:sp`, picture placeholders included
    pub other: Vec<usize>,
}

/// Group the `p:sp` shapes of a slide by role
///
/// Pictures, tables, groups and connectors are skipped. A picture
/// placeholder is a `p:sp` that takes no text; it always lands in `other`.
pub fn find_text_shapes(slide: &Slide, slide_height: i64) -> TextShapes {
    let mut found = TextShapes::default();
    for (i, shape) in slide.shapes().iter().enumerate() {
        if shape.kind != ShapeKind::AutoShape {
            continue;
        }
        match role_of(shape, slide_height) {
            ShapeRole::Title if found.title.is_none() => found.title = Some(i),
            ShapeRole::Content => found.content.push(i),
            _ => found.other.push(i),
        }
    }
    found
}
