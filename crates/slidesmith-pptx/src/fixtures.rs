//! In-memory template fixtures for tests.
//!
//! [`TemplateBuilder`] synthesizes a small but complete PPTX package: one
//! slide master, the seven layouts of the default Office theme that the
//! built-in configuration expects, and optionally some pre-existing slides.
//!
//! | index | layout              | placeholders                          |
//! |-------|---------------------|---------------------------------------|
//! | 0     | Title Slide         | ctrTitle, subTitle(1), dt, ftr, sldNum |
//! | 1     | Title and Content   | title, obj(1)                         |
//! | 2     | Section Header      | title, body(1)                        |
//! | 3     | Two Content         | title, obj(1), obj(2)                 |
//! | 4     | Title Only          | title                                 |
//! | 5     | Picture with Caption| title, pic(1), body(2)                |
//! | 6     | Blank               | (none)                                |

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::CompressionMethod;
use zip::ZipWriter;

use crate::constants::{
    CT_NOTES_SLIDE, CT_PRESENTATION, CT_RELATIONSHIPS, CT_SLIDE, CT_SLIDE_LAYOUT, CT_SLIDE_MASTER,
    CT_TEMPLATE, NS_CONTENT_TYPES, NS_DRAWING, NS_PACKAGE_RELATIONSHIPS, NS_PRESENTATION,
    NS_RELATIONSHIPS, REL_TYPE_NOTES_SLIDE, REL_TYPE_OFFICE_DOCUMENT, REL_TYPE_SLIDE,
    REL_TYPE_SLIDE_LAYOUT, REL_TYPE_SLIDE_MASTER, REL_TYPE_THEME,
};
use crate::xml::escape_xml;

type Rect = (i64, i64, i64, i64);

/// Placeholder on a fixture layout: (ph type, idx, shape name, own geometry)
type FixturePlaceholder = (Option<&'static str>, u32, &'static str, Option<Rect>);

const TITLE_RECT: Rect = (457_200, 274_638, 8_229_600, 1_143_000);
const BODY_RECT: Rect = (457_200, 1_600_200, 8_229_600, 4_525_963);

fn default_layouts() -> Vec<(String, Vec<FixturePlaceholder>)> {
    vec![
        (
            "Title Slide".into(),
            vec![
                (Some("ctrTitle"), 0, "Title 1", Some((685_800, 2_130_425, 7_772_400, 1_470_025))),
                (Some("subTitle"), 1, "Subtitle 2", Some((1_371_600, 3_886_200, 6_400_800, 1_752_600))),
                (Some("dt"), 10, "Date Placeholder 3", None),
                (Some("ftr"), 11, "Footer Placeholder 4", None),
                (Some("sldNum"), 12, "Slide Number Placeholder 5", None),
            ],
        ),
        (
            "Title and Content".into(),
            vec![
                (Some("title"), 0, "Title 1", None),
                (None, 1, "Content Placeholder 2", None),
            ],
        ),
        (
            "Section Header".into(),
            vec![
                (Some("title"), 0, "Title 1", Some((722_313, 4_406_900, 7_772_400, 1_362_075))),
                (Some("body"), 1, "Text Placeholder 2", Some((722_313, 2_906_713, 7_772_400, 1_500_187))),
            ],
        ),
        (
            "Two Content".into(),
            vec![
                (Some("title"), 0, "Title 1", None),
                (None, 1, "Content Placeholder 2", Some((457_200, 1_600_200, 4_038_600, 4_525_963))),
                (None, 2, "Content Placeholder 3", Some((4_648_200, 1_600_200, 4_038_600, 4_525_963))),
            ],
        ),
        ("Title Only".into(), vec![(Some("title"), 0, "Title 1", None)]),
        (
            "Picture with Caption".into(),
            vec![
                (Some("title"), 0, "Title 1", Some((1_792_288, 4_800_600, 5_486_400, 566_738))),
                (Some("pic"), 1, "Picture Placeholder 2", Some((1_792_288, 612_775, 5_486_400, 4_114_800))),
                (Some("body"), 2, "Text Placeholder 3", Some((1_792_288, 5_367_338, 5_486_400, 804_862))),
            ],
        ),
        ("Blank".into(), Vec::new()),
    ]
}

/// Builder for synthetic template packages
#[derive(Debug, Clone)]
pub struct TemplateBuilder {
    layouts: Vec<(String, Vec<FixturePlaceholder>)>,
    slides: Vec<usize>,
    sections: Vec<(String, usize)>,
    template: bool,
}

impl Default for TemplateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateBuilder {
    /// The seven default layouts, no slides
    pub fn new() -> Self {
        Self {
            layouts: default_layouts(),
            slides: Vec::new(),
            sections: Vec::new(),
            template: false,
        }
    }

    /// Add pre-existing slides using the given layout indices
    ///
    /// Each slide's title reads `Existing slide N`; the first slide carries
    /// speaker notes.
    pub fn with_slides(mut self, layouts: &[usize]) -> Self {
        self.slides = layouts.to_vec();
        self
    }

    /// Group the slides into named sections of the given sizes, in order
    pub fn with_sections(mut self, sections: &[(&str, usize)]) -> Self {
        self.sections = sections
            .iter()
            .map(|(name, count)| (name.to_string(), *count))
            .collect();
        self
    }

    /// Rename a layout
    pub fn rename_layout(mut self, index: usize, name: &str) -> Self {
        if let Some(layout) = self.layouts.get_mut(index) {
            layout.0 = name.to_string();
        }
        self
    }

    /// Swap two placeholders of a layout in z-order
    pub fn swap_placeholders(mut self, layout: usize, a: usize, b: usize) -> Self {
        if let Some((_, placeholders)) = self.layouts.get_mut(layout) {
            if a < placeholders.len() && b < placeholders.len() {
                placeholders.swap(a, b);
            }
        }
        self
    }

    /// Keep only the first `count` layouts
    pub fn truncate_layouts(mut self, count: usize) -> Self {
        self.layouts.truncate(count);
        self
    }

    /// Declare the package a `.potx` template
    pub fn as_template(mut self) -> Self {
        self.template = true;
        self
    }

    /// Build the package bytes
    pub fn build(&self) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(&mut buffer);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

        let mut put = |name: &str, contents: String| {
            zip.start_file(name, options).unwrap();
            zip.write_all(contents.as_bytes()).unwrap();
        };

        put("[Content_Types].xml", self.content_types());
        put(
            "_rels/.rels",
            rels(&[("rId1", REL_TYPE_OFFICE_DOCUMENT, "ppt/presentation.xml")]),
        );
        put("ppt/presentation.xml", self.presentation());
        put("ppt/_rels/presentation.xml.rels", self.presentation_rels());
        put("ppt/theme/theme1.xml", theme());
        put("ppt/slideMasters/slideMaster1.xml", self.master());
        put("ppt/slideMasters/_rels/slideMaster1.xml.rels", self.master_rels());

        for (i, (name, placeholders)) in self.layouts.iter().enumerate() {
            let n = i + 1;
            put(
                &format!("ppt/slideLayouts/slideLayout{n}.xml"),
                part(
                    "sldLayout",
                    name,
                    &shapes(placeholders.iter().enumerate().map(|(j, ph)| {
                        placeholder(j as u32 + 2, ph.2, ph.0, ph.1, ph.3, None)
                    })),
                ),
            );
            put(
                &format!("ppt/slideLayouts/_rels/slideLayout{n}.xml.rels"),
                rels(&[("rId1", REL_TYPE_SLIDE_MASTER, "../slideMasters/slideMaster1.xml")]),
            );
        }

        for (i, &layout) in self.slides.iter().enumerate() {
            let n = i + 1;
            let placeholders = self.layouts.get(layout).map(|l| l.1.clone()).unwrap_or_default();
            let title = format!("Existing slide {n}");
            let body = shapes(
                placeholders
                    .iter()
                    .filter(|ph| !matches!(ph.0, Some("dt" | "ftr" | "sldNum")))
                    .enumerate()
                    .map(|(j, ph)| {
                        let text = match ph.0 {
                            Some("title" | "ctrTitle") => Some(title.as_str()),
                            Some("pic") => None,
                            _ => Some("Old body"),
                        };
                        placeholder(j as u32 + 2, ph.2, ph.0, ph.1, None, text)
                    }),
            );
            put(&format!("ppt/slides/slide{n}.xml"), part("sld", "", &body));

            let layout_target = format!("../slideLayouts/slideLayout{}.xml", layout + 1);
            let mut slide_rels = vec![("rId1", REL_TYPE_SLIDE_LAYOUT, layout_target.as_str())];
            if n == 1 {
                slide_rels.push(("rId2", REL_TYPE_NOTES_SLIDE, "../notesSlides/notesSlide1.xml"));
            }
            put(&format!("ppt/slides/_rels/slide{n}.xml.rels"), rels(&slide_rels));
        }

        if !self.slides.is_empty() {
            put("ppt/notesSlides/notesSlide1.xml", notes());
            put(
                "ppt/notesSlides/_rels/notesSlide1.xml.rels",
                rels(&[("rId1", REL_TYPE_SLIDE, "../slides/slide1.xml")]),
            );
        }

        drop(put);
        zip.finish().unwrap();
        buffer.into_inner()
    }

    fn content_types(&self) -> String {
        let main = if self.template { CT_TEMPLATE } else { CT_PRESENTATION };
        let mut xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="{NS_CONTENT_TYPES}"><Default Extension="rels" ContentType="{CT_RELATIONSHIPS}"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/presentation.xml" ContentType="{main}"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="{CT_SLIDE_MASTER}"/><Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>"#
        );
        for n in 1..=self.layouts.len() {
            xml.push_str(&format!(
                r#"<Override PartName="/ppt/slideLayouts/slideLayout{n}.xml" ContentType="{CT_SLIDE_LAYOUT}"/>"#
            ));
        }
        for n in 1..=self.slides.len() {
            xml.push_str(&format!(
                r#"<Override PartName="/ppt/slides/slide{n}.xml" ContentType="{CT_SLIDE}"/>"#
            ));
        }
        if !self.slides.is_empty() {
            xml.push_str(&format!(
                r#"<Override PartName="/ppt/notesSlides/notesSlide1.xml" ContentType="{CT_NOTES_SLIDE}"/>"#
            ));
        }
        xml.push_str("</Types>");
        xml
    }

    fn presentation(&self) -> String {
        let mut slide_list = String::new();
        if !self.slides.is_empty() {
            slide_list.push_str("<p:sldIdLst>");
            for n in 1..=self.slides.len() {
                slide_list.push_str(&format!(
                    r#"<p:sldId id="{}" r:id="rId{}"/>"#,
                    255 + n,
                    n + 2
                ));
            }
            slide_list.push_str("</p:sldIdLst>");
        }
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:a="{NS_DRAWING}" xmlns:r="{NS_RELATIONSHIPS}" xmlns:p="{NS_PRESENTATION}" saveSubsetFonts="1"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>{slide_list}<p:sldSz cx="9144000" cy="6858000" type="screen4x3"/><p:notesSz cx="6858000" cy="9144000"/>{}</p:presentation>"#,
            self.section_list()
        )
    }

    fn section_list(&self) -> String {
        if self.sections.is_empty() {
            return String::new();
        }
        let mut xml = String::from(
            r#"<p:extLst><p:ext uri="{521415D9-36F7-43E2-AB2F-B90AF26B5E84}"><p14:sectionLst xmlns:p14="http://schemas.microsoft.com/office/powerpoint/2010/main">"#,
        );
        let mut next_id = 256;
        for (n, (name, count)) in self.sections.iter().enumerate() {
            xml.push_str(&format!(
                r#"<p14:section name="{}" id="{{00000000-0000-0000-0000-00000000000{n}}}"><p14:sldIdLst>"#,
                escape_xml(name)
            ));
            for id in next_id..next_id + count {
                xml.push_str(&format!(r#"<p14:sldId id="{id}"/>"#));
            }
            next_id += count;
            xml.push_str("</p14:sldIdLst></p14:section>");
        }
        xml.push_str("</p14:sectionLst></p:ext></p:extLst>");
        xml
    }

    fn presentation_rels(&self) -> String {
        let targets: Vec<(String, &str, String)> = [
            ("rId1".to_string(), REL_TYPE_SLIDE_MASTER, "slideMasters/slideMaster1.xml".to_string()),
            ("rId2".to_string(), REL_TYPE_THEME, "theme/theme1.xml".to_string()),
        ]
        .into_iter()
        .chain((1..=self.slides.len()).map(|n| {
            (format!("rId{}", n + 2), REL_TYPE_SLIDE, format!("slides/slide{n}.xml"))
        }))
        .collect();
        let refs: Vec<(&str, &str, &str)> = targets
            .iter()
            .map(|(id, ty, target)| (id.as_str(), *ty, target.as_str()))
            .collect();
        rels(&refs)
    }

    fn master(&self) -> String {
        let placeholders = shapes(
            [
                placeholder(2, "Title Placeholder 1", Some("title"), 0, Some(TITLE_RECT), None),
                placeholder(3, "Text Placeholder 2", Some("body"), 1, Some(BODY_RECT), None),
                placeholder(4, "Date Placeholder 3", Some("dt"), 2, Some((457_200, 6_356_350, 2_133_600, 365_125)), None),
                placeholder(5, "Footer Placeholder 4", Some("ftr"), 3, Some((3_124_200, 6_356_350, 2_895_600, 365_125)), None),
                placeholder(6, "Slide Number Placeholder 5", Some("sldNum"), 4, Some((6_553_200, 6_356_350, 2_133_600, 365_125)), None),
            ]
            .into_iter(),
        );
        let mut layout_ids = String::from("<p:sldLayoutIdLst>");
        for n in 1..=self.layouts.len() {
            layout_ids.push_str(&format!(
                r#"<p:sldLayoutId id="{}" r:id="rId{n}"/>"#,
                2_147_483_648u64 + n as u64
            ));
        }
        layout_ids.push_str("</p:sldLayoutIdLst>");

        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster xmlns:a="{NS_DRAWING}" xmlns:r="{NS_RELATIONSHIPS}" xmlns:p="{NS_PRESENTATION}"><p:cSld><p:spTree>{}{placeholders}</p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>{layout_ids}</p:sldMaster>"#,
            GROUP_PROPS
        )
    }

    fn master_rels(&self) -> String {
        let ids: Vec<(String, String)> = (1..=self.layouts.len())
            .map(|n| (format!("rId{n}"), format!("../slideLayouts/slideLayout{n}.xml")))
            .collect();
        let mut refs: Vec<(&str, &str, &str)> = ids
            .iter()
            .map(|(id, target)| (id.as_str(), REL_TYPE_SLIDE_LAYOUT, target.as_str()))
            .collect();
        let theme_id = format!("rId{}", self.layouts.len() + 1);
        refs.push((theme_id.as_str(), REL_TYPE_THEME, "../theme/theme1.xml"));
        rels(&refs)
    }
}

const GROUP_PROPS: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>"#;

fn rels(entries: &[(&str, &str, &str)]) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{NS_PACKAGE_RELATIONSHIPS}">"#
    );
    for (id, ty, target) in entries {
        xml.push_str(&format!(
            r#"<Relationship Id="{id}" Type="{ty}" Target="{target}"/>"#
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

fn part(root: &str, name: &str, shapes: &str) -> String {
    let name_attr = if name.is_empty() {
        String::new()
    } else {
        format!(r#" name="{}""#, escape_xml(name))
    };
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:{root} xmlns:a="{NS_DRAWING}" xmlns:r="{NS_RELATIONSHIPS}" xmlns:p="{NS_PRESENTATION}"><p:cSld{name_attr}><p:spTree>{GROUP_PROPS}{shapes}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:{root}>"#
    )
}

fn shapes(items: impl Iterator<Item = String>) -> String {
    items.collect()
}

fn placeholder(
    id: u32,
    name: &str,
    ph_type: Option<&str>,
    idx: u32,
    rect: Option<Rect>,
    text: Option<&str>,
) -> String {
    let type_attr = ph_type.map(|t| format!(r#" type="{t}""#)).unwrap_or_default();
    let idx_attr = if idx == 0 { String::new() } else { format!(r#" idx="{idx}""#) };
    let sp_pr = match rect {
        Some((x, y, cx, cy)) => format!(
            r#"<p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm></p:spPr>"#
        ),
        None => "<p:spPr/>".to_string(),
    };
    let tx_body = match text {
        Some(text) => format!(
            r#"<p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:rPr lang="en-US" dirty="0"/><a:t>{}</a:t></a:r></a:p></p:txBody>"#,
            escape_xml(text)
        ),
        None if ph_type == Some("pic") => String::new(),
        None => r#"<p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:endParaRPr lang="en-US"/></a:p></p:txBody>"#
            .to_string(),
    };
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph{type_attr}{idx_attr}/></p:nvPr></p:nvSpPr>{sp_pr}{tx_body}</p:sp>"#,
        escape_xml(name)
    )
}

fn notes() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:notes xmlns:a="{NS_DRAWING}" xmlns:r="{NS_RELATIONSHIPS}" xmlns:p="{NS_PRESENTATION}"><p:cSld><p:spTree>{GROUP_PROPS}{}</p:spTree></p:cSld></p:notes>"#,
        placeholder(2, "Notes Placeholder 1", Some("body"), 1, None, Some("Speaker notes"))
    )
}

fn theme() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="{NS_DRAWING}" name="Office Theme"><a:themeElements/></a:theme>"#
    )
}
