//! Slide assembly: resolve a layout, instantiate it, fill in text.
//!
//! Every `compose_*` method builds a detached [`Slide`] from a layout and
//! leaves the presentation untouched; the matching `add_*` method appends the
//! composed slide. A slide that fails to compose is never appended.
//!
//! Missing title or content placeholders are not errors: the text meant for
//! them is dropped and a warning is logged. A two-column slide on a layout with
//! fewer than two content placeholders is an error.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::LayoutCatalog;
use crate::classifier::find_text_shapes;
use crate::config::{roles, TemplateConfig};
use crate::error::{DeckError, Result};
use crate::presentation::{Presentation, Slide};

/// Text destined for a content placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextPayload {
    /// The whole text of the shape, as a single paragraph
    Single(String),
    /// One top-level paragraph per item
    Bullets(Vec<String>),
}

impl TextPayload {
    /// No text at all
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(s) => s.is_empty(),
            Self::Bullets(items) => items.is_empty(),
        }
    }
}

impl From<&str> for TextPayload {
    fn from(s: &str) -> Self {
        Self::Single(s.to_string())
    }
}

impl From<String> for TextPayload {
    fn from(s: String) -> Self {
        Self::Single(s)
    }
}

impl From<Vec<String>> for TextPayload {
    fn from(items: Vec<String>) -> Self {
        Self::Bullets(items)
    }
}

impl From<&[&str]> for TextPayload {
    fn from(items: &[&str]) -> Self {
        Self::Bullets(items.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for TextPayload {
    fn from(items: [&str; N]) -> Self {
        Self::from(&items[..])
    }
}

/// Where a new slide's layout comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutTarget {
    /// A configuration role, or failing that a layout display name
    Role(String),
    /// An explicit layout index
    Index(usize),
}

impl From<&str> for LayoutTarget {
    fn from(role: &str) -> Self {
        Self::Role(role.to_string())
    }
}

impl From<usize> for LayoutTarget {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Builds slides from a template's layouts
#[derive(Debug, Clone, Copy)]
pub struct SlideAssembler<'a> {
    config: &'a TemplateConfig,
    catalog: &'a LayoutCatalog,
}

impl<'a> SlideAssembler<'a> {
    pub fn new(config: &'a TemplateConfig, catalog: &'a LayoutCatalog) -> Self {
        Self { config, catalog }
    }

    /// Layout index for a target
    ///
    /// A role resolves through the configuration; when the configuration does
    /// not know it, a layout with that display name is used, else layout 0.
    pub fn resolve_layout(&self, target: &LayoutTarget) -> usize {
        match target {
            LayoutTarget::Role(role) => self
                .config
                .resolve(role, self.catalog.index_of(role).unwrap_or(0)),
            LayoutTarget::Index(index) => *index,
        }
    }

    /// Compose a slide with an optional title and content payload
    pub fn compose(
        &self,
        presentation: &Presentation,
        target: &LayoutTarget,
        title: Option<&str>,
        content: Option<&TextPayload>,
    ) -> Result<Slide> {
        let mut slide = presentation.instantiate(self.resolve_layout(target))?;
        replace_slide_text(&mut slide, presentation.slide_size().height, title, content);
        Ok(slide)
    }

    /// Compose and append a slide, returning its index
    pub fn add_slide(
        &self,
        presentation: &mut Presentation,
        target: &LayoutTarget,
        title: Option<&str>,
        content: Option<&TextPayload>,
    ) -> Result<usize> {
        let slide = self.compose(presentation, target, title, content)?;
        Ok(presentation.push_slide(slide))
    }

    /// Title slide; the subtitle goes to the first content placeholder, or
    /// else to the first other text placeholder that is not the title
    pub fn compose_title_slide(
        &self,
        presentation: &Presentation,
        title: Option<&str>,
        subtitle: Option<&str>,
    ) -> Result<Slide> {
        let height = presentation.slide_size().height;
        let target = LayoutTarget::from(roles::TITLE_SLIDE);
        let mut slide = self.compose(presentation, &target, title, None)?;

        if let Some(subtitle) = subtitle.filter(|s| !s.is_empty()) {
            let found = find_text_shapes(&slide, height);
            let shapes = slide.shapes();
            let position = found.content.first().copied().or_else(|| {
                found.other.iter().copied().find(|&i| {
                    shapes[i].has_text_frame()
                        && shapes[i].placeholder.as_ref().is_some_and(|ph| ph.idx != 0)
                })
            });
            match position {
                Some(i) => {
                    slide.shapes_mut()[i].set_text(subtitle);
                }
                None => warn!(
                    "Layout '{}' has no subtitle placeholder; subtitle dropped",
                    slide.layout_name()
                ),
            }
        }

        Ok(slide)
    }

    pub fn add_title_slide(
        &self,
        presentation: &mut Presentation,
        title: Option<&str>,
        subtitle: Option<&str>,
    ) -> Result<usize> {
        let slide = self.compose_title_slide(presentation, title, subtitle)?;
        Ok(presentation.push_slide(slide))
    }

    /// Content slide
    pub fn compose_content_slide(
        &self,
        presentation: &Presentation,
        title: Option<&str>,
        content: Option<&TextPayload>,
    ) -> Result<Slide> {
        self.compose(presentation, &LayoutTarget::from(roles::CONTENT_SLIDE), title, content)
    }

    pub fn add_content_slide(
        &self,
        presentation: &mut Presentation,
        title: Option<&str>,
        content: Option<&TextPayload>,
    ) -> Result<usize> {
        let slide = self.compose_content_slide(presentation, title, content)?;
        Ok(presentation.push_slide(slide))
    }

    /// Two-column slide: left and right go into the first two content placeholders
    pub fn compose_two_column_slide(
        &self,
        presentation: &Presentation,
        title: Option<&str>,
        left: Option<&TextPayload>,
        right: Option<&TextPayload>,
    ) -> Result<Slide> {
        let height = presentation.slide_size().height;
        let layout = self.resolve_layout(&LayoutTarget::from(roles::TWO_COLUMN));
        let mut slide = presentation.instantiate(layout)?;

        let found = find_text_shapes(&slide, height);
        let [first, second, ..] = found.content[..] else {
            return Err(DeckError::unsupported(format!(
                "layout {} ('{}') has {} content placeholder(s), two-column slides need 2",
                layout,
                slide.layout_name(),
                found.content.len()
            )));
        };

        set_title(&mut slide, height, title);
        for (position, column) in [(first, left), (second, right)] {
            if let Some(column) = column.filter(|c| !c.is_empty()) {
                fill(&mut slide, position, column);
            }
        }
        Ok(slide)
    }

    pub fn add_two_column_slide(
        &self,
        presentation: &mut Presentation,
        title: Option<&str>,
        left: Option<&TextPayload>,
        right: Option<&TextPayload>,
    ) -> Result<usize> {
        let slide = self.compose_two_column_slide(presentation, title, left, right)?;
        Ok(presentation.push_slide(slide))
    }

    /// Slide on an explicit layout, with no text
    pub fn compose_custom_slide(&self, presentation: &Presentation, layout: usize) -> Result<Slide> {
        self.compose(presentation, &LayoutTarget::Index(layout), None, None)
    }

    pub fn add_custom_slide(&self, presentation: &mut Presentation, layout: usize) -> Result<usize> {
        let slide = self.compose_custom_slide(presentation, layout)?;
        Ok(presentation.push_slide(slide))
    }

    /// Blank slide, with an optional title
    pub fn compose_blank_slide(&self, presentation: &Presentation, title: Option<&str>) -> Result<Slide> {
        self.compose(presentation, &LayoutTarget::from(roles::BLANK), title, None)
    }

    pub fn add_blank_slide(&self, presentation: &mut Presentation, title: Option<&str>) -> Result<usize> {
        let slide = self.compose_blank_slide(presentation, title)?;
        Ok(presentation.push_slide(slide))
    }
}

/// Set the text of the slide's title shape; false when it has none
pub fn set_title(slide: &mut Slide, slide_height: i64, title: Option<&str>) -> bool {
    let Some(title) = title else {
        return false;
    };
    match find_text_shapes(slide, slide_height).title {
        Some(i) => slide.shapes_mut()[i].set_text(title),
        None => {
            warn!(
                "Layout '{}' has no title placeholder; title dropped",
                slide.layout_name()
            );
            false
        }
    }
}

/// Fill the slide's first content shape; false when it has none
pub fn set_content(slide: &mut Slide, slide_height: i64, content: Option<&TextPayload>) -> bool {
    let Some(content) = content.filter(|c| !c.is_empty()) else {
        return false;
    };
    match find_text_shapes(slide, slide_height).content.first() {
        Some(&i) => fill(slide, i, content),
        None => {
            warn!(
                "Layout '{}' has no content placeholder; content dropped",
                slide.layout_name()
            );
            false
        }
    }
}

/// Replace title and content text of a slide, new or existing
///
/// `None` leaves the corresponding text as it is.
pub fn replace_slide_text(
    slide: &mut Slide,
    slide_height: i64,
    title: Option<&str>,
    content: Option<&TextPayload>,
) {
    set_title(slide, slide_height, title);
    set_content(slide, slide_height, content);
}

fn fill(slide: &mut Slide, position: usize, payload: &TextPayload) -> bool {
    let shape = &mut slide.shapes_mut()[position];
    match payload {
        TextPayload::Single(text) => shape.set_text(text.as_str()),
        TextPayload::Bullets(items) => shape.set_paragraphs(items.as_slice()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_SLIDE_HEIGHT_EMU;
    use crate::error::ErrorKind;
    use crate::fixtures::TemplateBuilder;

    fn setup() -> (Presentation, LayoutCatalog) {
        let pres = Presentation::from_bytes(&TemplateBuilder::new().build()).unwrap();
        let catalog = LayoutCatalog::from_presentation(&pres);
        (pres, catalog)
    }

    #[test]
    fn test_resolve_layout() {
        let (_, catalog) = setup();
        let config = TemplateConfig::from_map([("content_slide", 4)]);
        let assembler = SlideAssembler::new(&config, &catalog);

        assert_eq!(assembler.resolve_layout(&"content_slide".into()), 4);
        // Not configured: layout display name
        assert_eq!(assembler.resolve_layout(&"Section Header".into()), 2);
        // Neither
        assert_eq!(assembler.resolve_layout(&"title_slide".into()), 0);
        assert_eq!(assembler.resolve_layout(&LayoutTarget::Index(5)), 5);
    }

    #[test]
    fn test_content_slide_bullets() {
        let (mut pres, catalog) = setup();
        let config = TemplateConfig::builtin();
        let assembler = SlideAssembler::new(&config, &catalog);

        let payload = TextPayload::from(["One", "Two", "Three"]);
        let index = assembler
            .add_content_slide(&mut pres, Some("Agenda"), Some(&payload))
            .unwrap();

        let slide = pres.slide(index).unwrap();
        assert_eq!(slide.layout_index(), Some(1));
        assert_eq!(slide.shapes()[0].text(), "Agenda");

        let frame = slide.shapes()[1].text_frame().unwrap();
        let texts: Vec<_> = frame.paragraphs().iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["One", "Two", "Three"]);
        assert!(frame.paragraphs().iter().all(|p| p.level == 0));
    }

    #[test]
    fn test_single_string_payload() {
        let (mut pres, catalog) = setup();
        let config = TemplateConfig::builtin();
        let assembler = SlideAssembler::new(&config, &catalog);

        let payload = TextPayload::from("Just one paragraph");
        let index = assembler
            .add_content_slide(&mut pres, None, Some(&payload))
            .unwrap();

        let slide = pres.slide(index).unwrap();
        assert_eq!(slide.shapes()[0].text(), "");
        assert_eq!(slide.shapes()[1].text_frame().unwrap().paragraphs().len(), 1);
        assert_eq!(slide.shapes()[1].text(), "Just one paragraph");
    }

    #[test]
    fn test_title_slide_subtitle() {
        let (mut pres, catalog) = setup();
        let config = TemplateConfig::builtin();
        let assembler = SlideAssembler::new(&config, &catalog);

        let index = assembler
            .add_title_slide(&mut pres, Some("Deck"), Some("Subtitle"))
            .unwrap();

        let texts = pres.slide(index).unwrap().texts();
        assert_eq!(texts, vec!["Deck", "Subtitle"]);
    }

    #[test]
    fn test_title_dropped_without_title_placeholder() {
        let (mut pres, catalog) = setup();
        let config = TemplateConfig::builtin();
        let assembler = SlideAssembler::new(&config, &catalog);

        let index = assembler.add_blank_slide(&mut pres, Some("Nowhere")).unwrap();

        let slide = pres.slide(index).unwrap();
        assert_eq!(slide.layout_name(), "Blank");
        assert!(slide.shapes().is_empty());
    }

    #[test]
    fn test_two_column_slide() {
        let (mut pres, catalog) = setup();
        let config = TemplateConfig::builtin();
        let assembler = SlideAssembler::new(&config, &catalog);

        let left = TextPayload::from(["L1", "L2"]);
        let right = TextPayload::from("R");
        let index = assembler
            .add_two_column_slide(&mut pres, Some("Compare"), Some(&left), Some(&right))
            .unwrap();

        let texts = pres.slide(index).unwrap().texts();
        assert_eq!(texts, vec!["Compare", "L1\nL2", "R"]);
    }

    #[test]
    fn test_two_column_needs_two_content_placeholders() {
        let (mut pres, catalog) = setup();
        let config = TemplateConfig::from_map([("two_column", 1)]);
        let assembler = SlideAssembler::new(&config, &catalog);

        let err = assembler
            .add_two_column_slide(&mut pres, Some("Compare"), None, None)
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Unsupported);
        assert_eq!(pres.slide_count(), 0);
    }

    #[test]
    fn test_layout_out_of_range() {
        let (mut pres, catalog) = setup();
        let config = TemplateConfig::builtin();
        let assembler = SlideAssembler::new(&config, &catalog);

        let err = assembler.add_custom_slide(&mut pres, 42).unwrap_err();

        assert!(matches!(err, DeckError::LayoutOutOfRange { index: 42, count: 7 }));
        assert_eq!(pres.slide_count(), 0);
    }

    #[test]
    fn test_replace_text_on_existing_slide() {
        let bytes = TemplateBuilder::new().with_slides(&[1]).build();
        let mut pres = Presentation::from_bytes(&bytes).unwrap();
        let slide = pres.slide_mut(0).unwrap();

        replace_slide_text(slide, DEFAULT_SLIDE_HEIGHT_EMU, Some("New title"), None);
        assert_eq!(slide.texts(), vec!["New title", "Old body"]);

        let bullets = TextPayload::from(["a", "b"]);
        replace_slide_text(slide, DEFAULT_SLIDE_HEIGHT_EMU, None, Some(&bullets));
        assert_eq!(slide.texts(), vec!["New title", "a\nb"]);
    }

    #[test]
    fn test_empty_payload_leaves_text() {
        let bytes = TemplateBuilder::new().with_slides(&[1]).build();
        let mut pres = Presentation::from_bytes(&bytes).unwrap();
        let slide = pres.slide_mut(0).unwrap();

        assert!(!set_content(slide, DEFAULT_SLIDE_HEIGHT_EMU, Some(&TextPayload::Bullets(vec![]))));
        assert_eq!(slide.texts()[1], "Old body");
    }
}
