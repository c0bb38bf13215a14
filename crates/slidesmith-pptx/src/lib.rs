//! # slidesmith-pptx
//!
//! Template-driven PowerPoint (PPTX) authoring and analysis.
//!
//! A template supplies slide layouts; a [`DeckBuilder`] strips whatever slides
//! the template carries and assembles a new deck from a list of
//! [`SlideSpec`]s, mapping semantic roles (title, content, two columns, ...)
//! to layouts through a [`TemplateConfig`].
//!
//! ## Features
//!
//! - **Layout Catalog**: layouts and their placeholders, by index and name
//! - **Template Configuration**: role → layout index, JSON or TOML
//! - **Shape Classifier**: placeholder type first, geometry as fallback
//! - **Slide Assembler**: instantiate a layout and fill title/content text
//! - **Analysis**: layout usage, repetition runs, text density, slide profiles
//! - **Template Survey**: layout categories and a recommended configuration
//!
//! ## Example
//!
//! ```rust,ignore
//! use slidesmith_pptx::{DeckBuilder, SlideSpec, TemplateConfig};
//!
//! let specs = slidesmith_pptx::load_slide_specs("slides.json")?;
//! let builder = DeckBuilder::new(TemplateConfig::builtin());
//! builder.build_file("template.pptx", &specs, "output.pptx")?;
//! ```

pub mod analysis;
pub mod assembler;
pub mod builder;
pub mod catalog;
pub mod classifier;
pub mod config;
pub mod error;
pub mod layout;
pub mod package;
pub mod presentation;
pub mod relationships;
pub mod shape;
pub mod slide_spec;
mod xml;

#[cfg(any(test, feature = "test-utils"))]
pub mod fixtures;

// Re-exports
pub use analysis::{RepetitionWarning, SlideProfile, SuggestedUse, TextOverflow};
pub use assembler::{LayoutTarget, SlideAssembler, TextPayload};
pub use builder::{Deck, DeckBuilder};
pub use catalog::{LayoutCatalog, LayoutCategory, RecommendedConfig, TemplateSurvey};
pub use classifier::{find_text_shapes, role_of, ShapeRole, TextShapes};
pub use config::{TemplateConfig, DEFAULT_LAYOUTS};
pub use error::{DeckError, ErrorKind, Result};
pub use layout::{Layout, PlaceholderDescriptor, PlaceholderKind};
pub use package::Package;
pub use presentation::{Presentation, Slide, SlideSize};
pub use relationships::Relationships;
pub use shape::{Geometry, Paragraph, Placeholder, Shape, ShapeKind, TextFrame};
pub use slide_spec::{load_slide_specs, parse_slide_specs, SlideKind, SlideSpec};

/// PPTX-related constants
pub mod constants {
    /// Default slide width in EMU (914400 EMU = 1 inch, standard 10" width)
    pub const DEFAULT_SLIDE_WIDTH_EMU: i64 = 9_144_000;

    /// Default slide height in EMU (standard 7.5" height for 4:3)
    pub const DEFAULT_SLIDE_HEIGHT_EMU: i64 = 6_858_000;

    /// EMU per inch
    pub const EMU_PER_INCH: i64 = 914_400;

    /// Half an inch, the minimum height of a geometric title
    pub const TITLE_MIN_HEIGHT_EMU: i64 = EMU_PER_INCH / 2;

    /// Language tag written on generated text runs
    pub const DEFAULT_LANG: &str = "en-US";

    /// PresentationML namespace
    pub const NS_PRESENTATION: &str =
        "http://schemas.openxmlformats.org/presentationml/2006/main";

    /// DrawingML namespace
    pub const NS_DRAWING: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";

    /// Relationships namespace
    pub const NS_RELATIONSHIPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

    /// Package relationships namespace (`.rels` parts)
    pub const NS_PACKAGE_RELATIONSHIPS: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships";

    /// Content Types namespace
    pub const NS_CONTENT_TYPES: &str =
        "http://schemas.openxmlformats.org/package/2006/content-types";

    /// Office document relationship type (package root → presentation)
    pub const REL_TYPE_OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

    /// Slide relationship type
    pub const REL_TYPE_SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";

    /// Slide layout relationship type
    pub const REL_TYPE_SLIDE_LAYOUT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";

    /// Slide master relationship type
    pub const REL_TYPE_SLIDE_MASTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";

    /// Notes slide relationship type
    pub const REL_TYPE_NOTES_SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide";

    /// Theme relationship type
    pub const REL_TYPE_THEME: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";

    /// Slide part content type
    pub const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";

    /// Presentation part content type
    pub const CT_PRESENTATION: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";

    /// Template (`.potx`) presentation part content type
    pub const CT_TEMPLATE: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.template.main+xml";

    /// Slide layout part content type
    pub const CT_SLIDE_LAYOUT: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";

    /// Slide master part content type
    pub const CT_SLIDE_MASTER: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";

    /// Notes slide part content type
    pub const CT_NOTES_SLIDE: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.notesSlide+xml";

    /// Relationships part content type
    pub const CT_RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
}
