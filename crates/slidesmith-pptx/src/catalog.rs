//! Layout catalog and template survey.
//!
//! [`LayoutCatalog`] is the read-only list of a template's layouts, looked up
//! by index or by display name. Names are not unique in real templates; the
//! last layout carrying a name wins a name lookup.
//!
//! [`TemplateSurvey`] sorts layouts into rough categories from their names and
//! placeholder names, and derives a configuration a user can start from.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::config::{roles, TemplateConfig};
use crate::layout::Layout;
use crate::presentation::Presentation;

/// Layouts of a template, by index and by name
#[derive(Debug, Clone, Default)]
pub struct LayoutCatalog {
    layouts: Vec<Layout>,
    by_name: HashMap<String, usize>,
}

impl LayoutCatalog {
    /// Catalog the layouts of a presentation's first slide master
    pub fn from_presentation(presentation: &Presentation) -> Self {
        Self::from_layouts(presentation.layouts().to_vec())
    }

    /// Catalog a list of layouts, in index order
    pub fn from_layouts(layouts: Vec<Layout>) -> Self {
        let by_name = layouts
            .iter()
            .map(|layout| (layout.name.clone(), layout.index))
            .collect();
        Self { layouts, by_name }
    }

    /// Number of layouts
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    /// Whether the template has no layouts
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Layout by index
    pub fn get(&self, index: usize) -> Option<&Layout> {
        self.layouts.get(index)
    }

    /// Index of the last layout with this display name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Layouts in index order
    pub fn iter(&self) -> impl Iterator<Item = &Layout> {
        self.layouts.iter()
    }

    /// Layouts as a slice
    pub fn layouts(&self) -> &[Layout] {
        &self.layouts
    }
}

/// Rough purpose of a layout, guessed from names
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutCategory {
    TitleSlides,
    ContentSlides,
    TwoColumnSlides,
    BlankSlides,
    SectionHeaders,
    Other,
}

impl LayoutCategory {
    /// All categories in report order
    pub const ALL: [LayoutCategory; 6] = [
        Self::TitleSlides,
        Self::ContentSlides,
        Self::TwoColumnSlides,
        Self::BlankSlides,
        Self::SectionHeaders,
        Self::Other,
    ];

    /// Key used in JSON output
    pub fn key(&self) -> &'static str {
        match self {
            Self::TitleSlides => "title_slides",
            Self::ContentSlides => "content_slides",
            Self::TwoColumnSlides => "two_column_slides",
            Self::BlankSlides => "blank_slides",
            Self::SectionHeaders => "section_headers",
            Self::Other => "other",
        }
    }

    /// Heading used in the text report
    pub fn heading(&self) -> String {
        self.key().to_uppercase().replace('_', " ")
    }

    /// Categorize one layout
    ///
    /// Rules apply in order, on lowercased names: a title slide must also be
    /// layout 0; placeholder names containing "content" or "text" count as
    /// content areas.
    pub fn of(layout: &Layout) -> Self {
        let name = layout.name.to_lowercase();
        let has_title = layout
            .placeholders
            .iter()
            .any(|ph| ph.name.to_lowercase().contains("title"));
        let content_count = layout
            .placeholders
            .iter()
            .filter(|ph| {
                let n = ph.name.to_lowercase();
                n.contains("content") || n.contains("text")
            })
            .count();

        if name.contains("title") && name.contains("slide") && layout.index == 0 {
            Self::TitleSlides
        } else if name.contains("blank") || name.contains("empty") {
            Self::BlankSlides
        } else if name.contains("section") || name.contains("header") {
            Self::SectionHeaders
        } else if content_count >= 2 || name.contains("two") || name.contains('2') {
            Self::TwoColumnSlides
        } else if has_title && content_count >= 1 {
            Self::ContentSlides
        } else {
            Self::Other
        }
    }
}

/// Configuration derived from a survey, in report order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecommendedConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_slide: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_slide: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub two_column: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_header: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blank: Option<usize>,
}

impl RecommendedConfig {
    /// As a template configuration; unset roles are left out
    pub fn to_config(&self) -> TemplateConfig {
        TemplateConfig::from_map(
            [
                (roles::TITLE_SLIDE, self.title_slide),
                (roles::CONTENT_SLIDE, self.content_slide),
                (roles::TWO_COLUMN, self.two_column),
                (roles::SECTION_HEADER, self.section_header),
                (roles::BLANK, self.blank),
            ]
            .into_iter()
            .filter_map(|(role, index)| index.map(|i| (role, i))),
        )
    }

    /// Pretty JSON, keys in report order
    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| crate::DeckError::format("recommended configuration", e.to_string()))
    }
}

/// Categorized layouts of a template with a recommended configuration
#[derive(Debug, Clone, Serialize)]
pub struct TemplateSurvey {
    pub template_name: String,
    pub total_layouts: usize,
    pub layouts: Vec<Layout>,
    pub categorized: BTreeMap<LayoutCategory, Vec<usize>>,
    pub recommended_config: RecommendedConfig,
}

impl TemplateSurvey {
    /// Survey a catalog; `template_name` is only used for display
    pub fn new(template_name: impl Into<String>, catalog: &LayoutCatalog) -> Self {
        let mut categorized: BTreeMap<LayoutCategory, Vec<usize>> = LayoutCategory::ALL
            .iter()
            .map(|&c| (c, Vec::new()))
            .collect();
        for layout in catalog.iter() {
            categorized
                .entry(LayoutCategory::of(layout))
                .or_default()
                .push(layout.index);
        }

        let first = |c: LayoutCategory| categorized.get(&c).and_then(|v| v.first().copied());
        let total = catalog.len();
        let recommended_config = RecommendedConfig {
            title_slide: first(LayoutCategory::TitleSlides).or((total > 0).then_some(0)),
            content_slide: first(LayoutCategory::ContentSlides).or((total > 1).then_some(1)),
            two_column: first(LayoutCategory::TwoColumnSlides),
            section_header: first(LayoutCategory::SectionHeaders),
            blank: first(LayoutCategory::BlankSlides),
        };

        Self {
            template_name: template_name.into(),
            total_layouts: total,
            layouts: catalog.layouts().to_vec(),
            categorized,
            recommended_config,
        }
    }

    /// Layout indices in a category
    pub fn category(&self, category: LayoutCategory) -> &[usize] {
        self.categorized
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Human-readable report
    pub fn render_report(&self) -> crate::Result<String> {
        let heavy = "=".repeat(70);
        let light = "-".repeat(70);

        let mut out = format!("{heavy}\nTEMPLATE ANALYSIS: {}\n{heavy}\n", self.template_name);
        out.push_str(&format!("\nTotal Layouts: {}\n\n", self.total_layouts));
        out.push_str(&format!("LAYOUT CATEGORIES:\n{light}\n"));
        for (category, indices) in &self.categorized {
            if indices.is_empty() {
                continue;
            }
            out.push_str(&format!("\n{}:\n", category.heading()));
            for &idx in indices {
                let name = self.layouts.get(idx).map_or("", |l| l.name.as_str());
                out.push_str(&format!("  [{idx}] {name}\n"));
            }
        }

        out.push_str(&format!("\n{light}\n\nRECOMMENDED CONFIGURATION:\n{light}\n"));
        out.push_str(&self.recommended_config.to_json()?);
        out.push_str("\n\n");
        Ok(out)
    }

    /// Full survey as pretty JSON
    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| crate::DeckError::format("template survey", e.to_string()))
    }
}
