//! Analysis of an existing deck.
//!
//! Layout usage counts, runs of the same layout on consecutive slides, a
//! character-density estimate of text overflow, and a per-slide profile with
//! a guess at what each slide is good for. None of it modifies the deck.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::classifier::{role_of, ShapeRole};
use crate::presentation::{Presentation, Slide};
use crate::shape::ShapeKind;

/// Runs shorter than this are not reported
pub const MIN_REPETITION_RUN: usize = 3;

/// Characters per square inch above which text probably overflows
pub const OVERFLOW_DENSITY: f64 = 200.0;

const TITLE_PREVIEW_CHARS: usize = 50;
const CONTENT_PREVIEW_CHARS: usize = 100;

/// Number of slides per layout name
pub fn layout_usage(presentation: &Presentation) -> BTreeMap<String, usize> {
    let mut usage = BTreeMap::new();
    for slide in presentation.slides() {
        *usage.entry(slide.layout_name().to_string()).or_insert(0) += 1;
    }
    usage
}

/// A layout used on several consecutive slides
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepetitionWarning {
    pub layout: String,
    pub count: usize,
    /// 1-based number of the first slide of the run
    pub start_slide: usize,
}

impl fmt::Display for RepetitionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "from slide {}: '{}' used {} times in a row",
            self.start_slide, self.layout, self.count
        )
    }
}

/// Runs of identical consecutive names of at least [`MIN_REPETITION_RUN`]
pub fn consecutive_runs<S: AsRef<str>>(names: &[S]) -> Vec<RepetitionWarning> {
    let mut runs: Vec<RepetitionWarning> = Vec::new();
    for (i, name) in names.iter().enumerate() {
        let name = name.as_ref();
        match runs.last_mut() {
            Some(run) if run.layout == name => run.count += 1,
            _ => runs.push(RepetitionWarning {
                layout: name.to_string(),
                count: 1,
                start_slide: i + 1,
            }),
        }
    }
    runs.retain(|run| run.count >= MIN_REPETITION_RUN);
    runs
}

/// Repeated layouts in a deck
pub fn repetition_warnings(presentation: &Presentation) -> Vec<RepetitionWarning> {
    let names: Vec<&str> = presentation.slides().iter().map(Slide::layout_name).collect();
    consecutive_runs(&names)
}

/// Characters per square inch; 0 when the area is 0
pub fn text_density(chars: usize, area_sq_in: f64) -> f64 {
    if area_sq_in > 0.0 {
        chars as f64 / area_sq_in
    } else {
        0.0
    }
}

/// A shape holding more text than its size suggests it can show
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextOverflow {
    /// Position of the shape on its slide
    pub shape: usize,
    pub shape_name: String,
    pub text_length: usize,
    /// Square inches
    pub area: f64,
    /// Characters per square inch
    pub density: f64,
}

impl fmt::Display for TextOverflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' may hold too much text: {} characters in {:.2} square inches",
            self.shape_name, self.text_length, self.area
        )
    }
}

/// Text shapes of a slide whose density exceeds [`OVERFLOW_DENSITY`]
///
/// Shapes without any known size have zero area and are never flagged.
pub fn check_text_overflow(slide: &Slide) -> Vec<TextOverflow> {
    slide
        .shapes()
        .iter()
        .enumerate()
        .filter(|(_, shape)| shape.has_text_frame())
        .filter_map(|(i, shape)| {
            let text_length = shape.text_frame().map_or(0, |f| f.char_count());
            let area = shape.effective_geometry().map_or(0.0, |g| g.area_sq_in());
            let density = text_density(text_length, area);
            (density > OVERFLOW_DENSITY).then(|| TextOverflow {
                shape: i,
                shape_name: shape.name.clone(),
                text_length,
                area,
                density,
            })
        })
        .collect()
}

/// Overflow candidates of every slide, with 0-based slide index
pub fn overflow_warnings(presentation: &Presentation) -> Vec<(usize, TextOverflow)> {
    presentation
        .slides()
        .iter()
        .enumerate()
        .flat_map(|(i, slide)| check_text_overflow(slide).into_iter().map(move |o| (i, o)))
        .collect()
}

/// What a slide's structure suggests it is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedUse {
    TitleOrSectionDivider,
    MultiSectionGrid,
    BulletedContent,
    ImageCentric,
    Other,
}

impl SuggestedUse {
    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::TitleOrSectionDivider => "title slide, section divider",
            Self::MultiSectionGrid => "multiple sections, grid layout",
            Self::BulletedContent => "bulleted list, standard content",
            Self::ImageCentric => "image-centric, diagrams",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for SuggestedUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Structure summary of one slide
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlideProfile {
    pub slide_index: usize,
    pub layout_name: String,
    pub text_shapes_count: usize,
    pub image_shapes_count: usize,
    pub decorative_shapes_count: usize,
    pub has_title: bool,
    pub has_content: bool,
    pub title_text: String,
    pub content_preview: String,
    pub suggested_use: SuggestedUse,
}

impl SlideProfile {
    /// Profile a slide
    pub fn of(slide_index: usize, slide: &Slide, slide_height: i64) -> Self {
        let mut profile = Self {
            slide_index,
            layout_name: slide.layout_name().to_string(),
            text_shapes_count: 0,
            image_shapes_count: 0,
            decorative_shapes_count: 0,
            has_title: false,
            has_content: false,
            title_text: String::new(),
            content_preview: String::new(),
            suggested_use: SuggestedUse::Other,
        };

        for shape in slide.shapes() {
            if shape.has_text_frame() {
                profile.text_shapes_count += 1;
                match role_of(shape, slide_height) {
                    ShapeRole::Title if !profile.has_title => {
                        profile.has_title = true;
                        profile.title_text = truncate_chars(&shape.text(), TITLE_PREVIEW_CHARS);
                    }
                    ShapeRole::Content if !profile.has_content => {
                        profile.has_content = true;
                        profile.content_preview = truncate_chars(&shape.text(), CONTENT_PREVIEW_CHARS);
                    }
                    _ => {}
                }
            } else if shape.kind == ShapeKind::Picture {
                profile.image_shapes_count += 1;
            } else {
                profile.decorative_shapes_count += 1;
            }
        }

        profile.suggested_use = profile.suggest();
        profile
    }

    fn suggest(&self) -> SuggestedUse {
        match (self.has_title, self.has_content) {
            (true, false) => SuggestedUse::TitleOrSectionDivider,
            (true, true) if self.text_shapes_count >= 3 => SuggestedUse::MultiSectionGrid,
            (true, true) => SuggestedUse::BulletedContent,
            _ if self.image_shapes_count > 0 => SuggestedUse::ImageCentric,
            _ => SuggestedUse::Other,
        }
    }
}

/// Profile every slide of a deck
pub fn profile_slides(presentation: &Presentation) -> Vec<SlideProfile> {
    let height = presentation.slide_size().height;
    presentation
        .slides()
        .iter()
        .enumerate()
        .map(|(i, slide)| SlideProfile::of(i, slide, height))
        .collect()
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
