//! Deck generation from a template and a list of slide specifications.
//!
//! A build runs in two phases. Every specification is first composed into a
//! detached slide against the template's layouts; any error there (a layout
//! index out of range, a two-column layout without two content placeholders)
//! aborts the build before the template is touched. Only then are the
//! template's own slides removed and the composed slides appended in order.

use std::path::Path;

use tracing::{debug, info};

use crate::assembler::SlideAssembler;
use crate::catalog::LayoutCatalog;
use crate::config::TemplateConfig;
use crate::error::Result;
use crate::presentation::{Presentation, Slide};
use crate::slide_spec::{SlideKind, SlideSpec, UNTITLED};

/// Deck builder
#[derive(Debug, Clone)]
pub struct DeckBuilder {
    /// Role → layout mapping
    config: TemplateConfig,
}

impl Default for DeckBuilder {
    fn default() -> Self {
        Self::new(TemplateConfig::builtin())
    }
}

impl DeckBuilder {
    /// Create a builder with a configuration
    pub fn new(config: TemplateConfig) -> Self {
        Self { config }
    }

    /// The configuration in use
    pub fn config(&self) -> &TemplateConfig {
        &self.config
    }

    /// Build a deck from a loaded template
    pub fn build(&self, mut template: Presentation, specs: &[SlideSpec]) -> Result<Deck> {
        let catalog = LayoutCatalog::from_presentation(&template);
        let assembler = SlideAssembler::new(&self.config, &catalog);

        let slides = specs
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                debug!("Composing slide {} ({})", i + 1, spec.slide_kind());
                compose(&assembler, &template, spec)
            })
            .collect::<Result<Vec<_>>>()?;

        let removed = template.clear_slides();
        for slide in slides {
            template.push_slide(slide);
        }
        info!(
            "Built {} slides ({} template slides removed)",
            template.slide_count(),
            removed
        );

        Ok(Deck {
            presentation: template,
            catalog,
        })
    }

    /// Load a template, build and save the deck
    pub fn build_file(
        &self,
        template_path: impl AsRef<Path>,
        specs: &[SlideSpec],
        output_path: impl AsRef<Path>,
    ) -> Result<Deck> {
        let template = Presentation::open(template_path)?;
        let deck = self.build(template, specs)?;
        deck.save(output_path)?;
        Ok(deck)
    }
}

fn compose(assembler: &SlideAssembler<'_>, template: &Presentation, spec: &SlideSpec) -> Result<Slide> {
    let title = spec.title.as_deref();
    match spec.slide_kind() {
        SlideKind::Title => assembler.compose_title_slide(template, title, spec.subtitle.as_deref()),
        SlideKind::Content => assembler.compose_content_slide(template, title, spec.content.as_ref()),
        SlideKind::TwoColumn => assembler.compose_two_column_slide(
            template,
            title,
            spec.left.as_ref(),
            spec.right.as_ref(),
        ),
        SlideKind::Custom => assembler.compose_custom_slide(template, spec.layout.unwrap_or(0)),
        SlideKind::Blank => assembler.compose_blank_slide(template, title),
        SlideKind::Unrecognized(_) => assembler.compose_content_slide(
            template,
            Some(title.unwrap_or(UNTITLED)),
            spec.content.as_ref(),
        ),
    }
}

/// A generated deck
#[derive(Debug, Clone)]
pub struct Deck {
    presentation: Presentation,
    catalog: LayoutCatalog,
}

impl Deck {
    /// The generated presentation
    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    /// Layouts of the template the deck was built from
    pub fn catalog(&self) -> &LayoutCatalog {
        &self.catalog
    }

    /// Number of slides
    pub fn slide_count(&self) -> usize {
        self.presentation.slide_count()
    }

    /// Layout name of every slide, in order
    pub fn layout_sequence(&self) -> Vec<String> {
        self.presentation
            .slides()
            .iter()
            .map(|s| s.layout_name().to_string())
            .collect()
    }

    /// Text of every text-bearing shape, per slide
    pub fn slide_texts(&self) -> Vec<Vec<String>> {
        self.presentation.slides().iter().map(Slide::texts).collect()
    }

    /// Serialize to `.pptx` bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.presentation.to_bytes()
    }

    /// Write to a file, overwriting it
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.presentation.save(path)
    }

    /// Take the presentation out
    pub fn into_presentation(self) -> Presentation {
        self.presentation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::fixtures::TemplateBuilder;

    fn template(slides: &[usize]) -> Presentation {
        Presentation::from_bytes(&TemplateBuilder::new().with_slides(slides).build()).unwrap()
    }

    #[test]
    fn test_empty_specs_strip_template_slides() {
        let deck = DeckBuilder::default().build(template(&[0, 1, 1]), &[]).unwrap();

        assert_eq!(deck.slide_count(), 0);
        assert_eq!(deck.catalog().len(), 7);
    }

    #[test]
    fn test_build_dispatches_by_kind() {
        let specs = vec![
            SlideSpec::title("Deck", Some("Sub")),
            SlideSpec::content("Agenda", ["One", "Two"]),
            SlideSpec::two_column("Compare", "Left", "Right"),
            SlideSpec::custom(4),
            SlideSpec::new("blank"),
            SlideSpec::new("quote"),
        ];

        let deck = DeckBuilder::default().build(template(&[2]), &specs).unwrap();

        assert_eq!(
            deck.layout_sequence(),
            vec![
                "Title Slide",
                "Title and Content",
                "Two Content",
                "Title Only",
                "Blank",
                "Title and Content"
            ]
        );

        let texts = deck.slide_texts();
        assert_eq!(texts[0], vec!["Deck", "Sub"]);
        assert_eq!(texts[1], vec!["Agenda", "One\nTwo"]);
        assert_eq!(texts[2], vec!["Compare", "Left", "Right"]);
        assert_eq!(texts[3], vec![""]);
        assert!(texts[4].is_empty());
        assert_eq!(texts[5], vec!["Untitled", ""]);
    }

    #[test]
    fn test_validation_error_leaves_template_untouched() {
        let specs = vec![SlideSpec::content("Fine", "ok"), SlideSpec::custom(99)];
        let builder = DeckBuilder::default();

        let err = builder.build(template(&[0]), &specs).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);

        let config = TemplateConfig::from_map([("two_column", 1)]);
        let err = DeckBuilder::new(config)
            .build(template(&[0]), &[SlideSpec::two_column("T", "L", "R")])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }

    #[test]
    fn test_builds_are_independent() {
        let specs = vec![SlideSpec::title("A", None), SlideSpec::content("B", "b")];
        let builder = DeckBuilder::default();

        let first = builder.build(template(&[1]), &specs).unwrap();
        let second = builder.build(template(&[1]), &specs).unwrap();

        assert_eq!(first.layout_sequence(), second.layout_sequence());
        assert_eq!(first.slide_texts(), second.slide_texts());
    }

    #[test]
    fn test_build_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let template_path = dir.path().join("template.pptx");
        let output_path = dir.path().join("out.pptx");
        std::fs::write(&template_path, TemplateBuilder::new().with_slides(&[0]).build()).unwrap();

        let specs = vec![SlideSpec::content("Saved", ["x", "y", "z"])];
        DeckBuilder::default()
            .build_file(&template_path, &specs, &output_path)
            .unwrap();

        let reopened = Presentation::open(&output_path).unwrap();
        assert_eq!(reopened.slide_count(), 1);
        assert_eq!(reopened.slide(0).unwrap().texts(), vec!["Saved", "x\ny\nz"]);
    }

    #[test]
    fn test_build_file_unwritable_output() {
        let dir = tempfile::tempdir().unwrap();
        let template_path = dir.path().join("template.pptx");
        std::fs::write(&template_path, TemplateBuilder::new().build()).unwrap();

        let err = DeckBuilder::default()
            .build_file(&template_path, &[], dir.path().join("missing/out.pptx"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::File);
    }
}
