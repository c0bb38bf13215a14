//! Shapes on a slide: geometry, placeholder reference and text.
//!
//! A [`Shape`] keeps the markup it was parsed from. Only its text body is
//! regenerated when text is assigned, so fills, outlines and effects survive
//! an edit untouched.

use serde::Serialize;

use crate::constants::{DEFAULT_LANG, EMU_PER_INCH};
use crate::error::{DeckError, Result};
use crate::layout::{PlaceholderDescriptor, PlaceholderKind};
use crate::xml::{escape_xml, XmlIndex};

/// Position and size in EMU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Geometry {
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
}

impl Geometry {
    /// Create a geometry
    pub fn new(left: i64, top: i64, width: i64, height: i64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Area in square inches
    pub fn area_sq_in(&self) -> f64 {
        (self.width as f64 / EMU_PER_INCH as f64) * (self.height as f64 / EMU_PER_INCH as f64)
    }
}

/// Kind of element a shape is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    /// `p:sp`
    AutoShape,
    /// `p:pic`
    Picture,
    /// `p:graphicFrame` (tables, charts, diagrams)
    GraphicFrame,
    /// `p:grpSp`
    Group,
    /// `p:cxnSp`
    Connector,
    /// Anything else in the shape tree
    Other,
}

impl ShapeKind {
    fn from_element(local: &str) -> Self {
        match local {
            "sp" => Self::AutoShape,
            "pic" => Self::Picture,
            "graphicFrame" => Self::GraphicFrame,
            "grpSp" => Self::Group,
            "cxnSp" => Self::Connector,
            _ => Self::Other,
        }
    }
}

/// Placeholder reference carried by a slide shape (`p:nvPr/p:ph`)
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    pub kind: PlaceholderKind,
    pub idx: u32,
    pub ooxml_type: Option<String>,
}

impl Placeholder {
    /// Date, footer or slide number
    pub fn is_footer_like(&self) -> bool {
        matches!(self.ooxml_type.as_deref(), Some("dt" | "ftr" | "sldNum"))
    }
}

/// One paragraph of a text frame
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    /// Plain text; line breaks are `\n`
    pub text: String,
    /// Indentation level (`a:pPr/@lvl`)
    pub level: u32,
    /// Paragraph properties (`a:pPr`) markup
    props: Option<String>,
    /// Original markup, written back verbatim
    raw: Option<String>,
}

impl Paragraph {
    /// A new top-level paragraph
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: 0,
            props: None,
            raw: None,
        }
    }

    fn to_xml(&self) -> String {
        if let Some(raw) = &self.raw {
            return raw.clone();
        }

        let mut xml = String::from("<a:p>");
        match &self.props {
            Some(props) => xml.push_str(props),
            None if self.level > 0 => xml.push_str(&format!(r#"<a:pPr lvl="{}"/>"#, self.level)),
            None => {}
        }
        for (i, line) in self.text.split('\n').enumerate() {
            if i > 0 {
                xml.push_str(&format!(
                    r#"<a:br><a:rPr lang="{}" dirty="0"/></a:br>"#,
                    DEFAULT_LANG
                ));
            }
            if !line.is_empty() {
                xml.push_str(&format!(
                    r#"<a:r><a:rPr lang="{}" dirty="0"/><a:t>{}</a:t></a:r>"#,
                    DEFAULT_LANG,
                    escape_xml(line)
                ));
            }
        }
        xml.push_str("</a:p>");
        xml
    }
}

/// Text body of a shape
#[derive(Debug, Clone, PartialEq)]
pub struct TextFrame {
    body_pr: String,
    lst_style: Option<String>,
    paragraphs: Vec<Paragraph>,
}

impl Default for TextFrame {
    fn default() -> Self {
        Self {
            body_pr: "<a:bodyPr/>".to_string(),
            lst_style: Some("<a:lstStyle/>".to_string()),
            paragraphs: Vec::new(),
        }
    }
}

impl TextFrame {
    fn parse(index: &XmlIndex<'_>, tx_body: usize) -> Self {
        let mut frame = Self {
            lst_style: None,
            ..Self::default()
        };

        for child in index.children(tx_body) {
            match index.node(child).local_name() {
                "bodyPr" => frame.body_pr = index.raw(child).to_string(),
                "lstStyle" => frame.lst_style = Some(index.raw(child).to_string()),
                "p" => frame.paragraphs.push(parse_paragraph(index, child)),
                _ => {}
            }
        }

        frame
    }

    /// Paragraphs in order
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// Remove every paragraph
    pub fn clear(&mut self) {
        self.paragraphs.clear();
    }

    /// Replace the whole text with a single paragraph
    ///
    /// The paragraph keeps the properties of the current first paragraph.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let first = self.emptied_first_paragraph();
        self.paragraphs = vec![Paragraph {
            text: text.into(),
            ..first
        }];
    }

    /// Replace the text with one paragraph per item
    ///
    /// The first item keeps the properties of the current first paragraph;
    /// the others are new top-level paragraphs.
    pub fn set_paragraphs<S: AsRef<str>>(&mut self, items: &[S]) {
        let first = self.emptied_first_paragraph();
        self.clear();
        for (i, item) in items.iter().enumerate() {
            let paragraph = if i == 0 {
                Paragraph {
                    text: item.as_ref().to_string(),
                    ..first.clone()
                }
            } else {
                Paragraph::new(item.as_ref())
            };
            self.add_paragraph(paragraph);
        }
    }

    fn emptied_first_paragraph(&self) -> Paragraph {
        match self.paragraphs.first() {
            Some(p) => Paragraph {
                text: String::new(),
                level: p.level,
                props: p.props.clone(),
                raw: None,
            },
            None => Paragraph::new(""),
        }
    }

    /// Append a paragraph
    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph);
    }

    /// Full text, paragraphs joined with `\n`
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Number of characters over all paragraphs, separators excluded
    pub fn char_count(&self) -> usize {
        self.paragraphs.iter().map(|p| p.text.chars().count()).sum()
    }

    fn to_xml(&self) -> String {
        let mut xml = String::from("<p:txBody>");
        xml.push_str(&self.body_pr);
        if let Some(lst_style) = &self.lst_style {
            xml.push_str(lst_style);
        }
        if self.paragraphs.is_empty() {
            // A text body needs at least one paragraph
            xml.push_str("<a:p/>");
        }
        for paragraph in &self.paragraphs {
            xml.push_str(&paragraph.to_xml());
        }
        xml.push_str("</p:txBody>");
        xml
    }
}

fn parse_paragraph(index: &XmlIndex<'_>, p: usize) -> Paragraph {
    let mut text = String::new();
    for node_id in index.descendants(p) {
        let node = index.node(node_id);
        match node.local_name() {
            "t" => text.push_str(&node.text),
            "br" => text.push('\n'),
            _ => {}
        }
    }
    let props = index.child(p, "pPr");
    Paragraph {
        text,
        level: props
            .and_then(|i| index.node(i).attr_parsed("lvl"))
            .unwrap_or(0),
        props: props.map(|i| index.raw(i).to_string()),
        raw: Some(index.raw(p).to_string()),
    }
}

/// A shape in a slide's shape tree
#[derive(Debug, Clone)]
pub struct Shape {
    /// Shape id (`cNvPr/@id`)
    pub id: u32,
    /// Shape name (`cNvPr/@name`)
    pub name: String,
    pub kind: ShapeKind,
    pub placeholder: Option<Placeholder>,
    /// Explicit position and size (`a:xfrm`)
    pub geometry: Option<Geometry>,
    /// Position and size of the matching layout placeholder
    pub inherited: Option<Geometry>,
    text_frame: Option<TextFrame>,
    raw: String,
    text_span: Option<(usize, usize)>,
    dirty: bool,
}

impl Shape {
    /// Parse one shape element
    pub fn parse(raw: &str) -> Result<Self> {
        let index = XmlIndex::parse(raw)?;
        if index.is_empty() {
            return Err(DeckError::format("shape", "no element"));
        }
        let root = 0;
        let kind = ShapeKind::from_element(index.node(root).local_name());

        let nv = index
            .children(root)
            .find(|&i| index.node(i).local_name().starts_with("nv"));

        let (id, name) = nv
            .and_then(|nv| index.descendant(nv, "cNvPr"))
            .map(|c| {
                let node = index.node(c);
                (
                    node.attr_parsed("id").unwrap_or(0),
                    node.attr("name").unwrap_or_default().to_string(),
                )
            })
            .unwrap_or_default();

        let placeholder = nv.and_then(|nv| index.descendant(nv, "ph")).map(|ph| {
            let node = index.node(ph);
            let ooxml_type = node.attr("type").map(str::to_string);
            Placeholder {
                kind: PlaceholderKind::from_ooxml_type(ooxml_type.as_deref()),
                idx: node.attr_parsed("idx").unwrap_or(0),
                ooxml_type,
            }
        });

        let geometry = parse_geometry(&index, root);

        let tx_body = index.child(root, "txBody");
        let text_frame = tx_body.map(|tx| TextFrame::parse(&index, tx));
        let text_span = tx_body.map(|tx| {
            let node = index.node(tx);
            (node.start, node.end)
        });

        Ok(Self {
            id,
            name,
            kind,
            placeholder,
            geometry,
            inherited: None,
            text_frame,
            raw: raw.to_string(),
            text_span,
            dirty: false,
        })
    }

    /// A fresh slide placeholder cloned from a layout placeholder
    pub fn from_layout_placeholder(id: u32, descriptor: &PlaceholderDescriptor) -> Self {
        let mut ph = String::from("<p:ph");
        if let Some(ooxml_type) = &descriptor.ooxml_type {
            ph.push_str(&format!(r#" type="{}""#, escape_xml(ooxml_type)));
        }
        if descriptor.idx != 0 {
            ph.push_str(&format!(r#" idx="{}""#, descriptor.idx));
        }
        ph.push_str("/>");

        let raw = format!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="{}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr>{}</p:nvPr></p:nvSpPr><p:spPr/></p:sp>"#,
            id,
            escape_xml(&descriptor.name),
            ph
        );

        let text_frame = descriptor.kind.takes_text().then(TextFrame::default);

        Self {
            id,
            name: descriptor.name.clone(),
            kind: ShapeKind::AutoShape,
            placeholder: Some(Placeholder {
                kind: descriptor.kind,
                idx: descriptor.idx,
                ooxml_type: descriptor.ooxml_type.clone(),
            }),
            geometry: None,
            inherited: descriptor.geometry,
            dirty: text_frame.is_some(),
            text_frame,
            raw,
            text_span: None,
        }
    }

    /// Explicit geometry, else the geometry inherited from the layout
    pub fn effective_geometry(&self) -> Option<Geometry> {
        self.geometry.or(self.inherited)
    }

    /// Whether this shape can hold text
    ///
    /// Every `p:sp` can, except picture placeholders.
    pub fn has_text_frame(&self) -> bool {
        self.kind == ShapeKind::AutoShape
            && self
                .placeholder
                .as_ref()
                .map_or(true, |ph| ph.kind != PlaceholderKind::Picture)
    }

    /// The text body, if the shape has one
    pub fn text_frame(&self) -> Option<&TextFrame> {
        self.text_frame.as_ref()
    }

    /// Mutable text body, created on demand for text-capable shapes
    pub fn text_frame_mut(&mut self) -> Option<&mut TextFrame> {
        if !self.has_text_frame() {
            return None;
        }
        self.dirty = true;
        Some(self.text_frame.get_or_insert_with(TextFrame::default))
    }

    /// Full text of the shape
    pub fn text(&self) -> String {
        self.text_frame.as_ref().map(TextFrame::text).unwrap_or_default()
    }

    /// Replace the text with a single paragraph; false if the shape holds no text
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        match self.text_frame_mut() {
            Some(frame) => {
                frame.set_text(text);
                true
            }
            None => false,
        }
    }

    /// Replace the text with one top-level paragraph per item
    pub fn set_paragraphs<S: AsRef<str>>(&mut self, items: &[S]) -> bool {
        match self.text_frame_mut() {
            Some(frame) => {
                frame.set_paragraphs(items);
                true
            }
            None => false,
        }
    }

    /// Serialize the shape
    pub fn to_xml(&self) -> String {
        let Some(frame) = self.text_frame.as_ref().filter(|_| self.dirty) else {
            return self.raw.clone();
        };

        let body = frame.to_xml();
        match self.text_span {
            Some((start, end)) => format!("{}{}{}", &self.raw[..start], body, &self.raw[end..]),
            // txBody precedes p:extLst, the last child of a shape
            None => match self.ext_lst_start().or_else(|| self.raw.rfind("</")) {
                Some(at) => format!("{}{}{}", &self.raw[..at], body, &self.raw[at..]),
                None => self.raw.clone(),
            },
        }
    }

    /// Change the shape id, in the kept markup as well
    pub(crate) fn set_id(&mut self, id: u32) {
        self.id = id;
        let Some((start, end)) = self.id_value_span() else {
            return;
        };
        let value = id.to_string();
        let shift = value.len() as isize - (end - start) as isize;
        self.raw.replace_range(start..end, &value);
        if let Some((body_start, body_end)) = self.text_span {
            self.text_span = Some((
                body_start.saturating_add_signed(shift),
                body_end.saturating_add_signed(shift),
            ));
        }
    }

    /// Byte range of the `cNvPr/@id` value
    fn id_value_span(&self) -> Option<(usize, usize)> {
        let index = XmlIndex::parse(&self.raw).ok()?;
        let start = index.node(index.first("cNvPr")?).start;
        let tag_end = start + self.raw[start..].find('>')?;
        let value_start = start + self.raw[start..tag_end].find(r#" id=""#)? + 5;
        let value_end = value_start + self.raw[value_start..].find('"')?;
        Some((value_start, value_end))
    }

    fn ext_lst_start(&self) -> Option<usize> {
        let index = XmlIndex::parse(&self.raw).ok()?;
        let ext_lst = index.child(0, "extLst")?;
        Some(index.node(ext_lst).start)
    }
}

fn parse_geometry(index: &XmlIndex<'_>, root: usize) -> Option<Geometry> {
    // spPr/xfrm sits at depth 2, graphicFrame's own xfrm at depth 1
    let xfrm = index
        .descendants(root)
        .find(|&i| index.node(i).local_name() == "xfrm" && index.node(i).depth <= 2)?;
    let off = index.node(index.child(xfrm, "off")?);
    let ext = index.node(index.child(xfrm, "ext")?);

    Some(Geometry::new(
        off.attr_parsed("x").unwrap_or(0),
        off.attr_parsed("y").unwrap_or(0),
        ext.attr_parsed("cx").unwrap_or(0),
        ext.attr_parsed("cy").unwrap_or(0),
    ))
}

/// The shapes of a `p:spTree`, with the surrounding document kept verbatim
#[derive(Debug, Clone)]
pub(crate) struct ShapeTree {
    prefix: String,
    pub shapes: Vec<Shape>,
    suffix: String,
}

impl ShapeTree {
    /// Split a slide, layout or master part around its shape tree
    pub fn parse(xml: &str) -> Result<Self> {
        let index = XmlIndex::parse(xml)?;
        let tree = index
            .first("spTree")
            .ok_or_else(|| DeckError::format("slide part", "no p:spTree element"))?;

        let mut insert_at = None;
        let mut shapes = Vec::new();
        let mut first_start = None;
        let mut last_end = None;

        for child in index.children(tree) {
            let node = index.node(child);
            match node.local_name() {
                "nvGrpSpPr" | "grpSpPr" => insert_at = Some(node.end),
                "extLst" => {}
                _ => {
                    first_start.get_or_insert(node.start);
                    last_end = Some(node.end);
                    shapes.push(Shape::parse(index.raw(child))?);
                }
            }
        }

        let (split_start, split_end) = match (first_start, last_end) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                let at = match insert_at {
                    Some(at) => at,
                    None => open_tag_end(xml, index.node(tree).start)?,
                };
                (at, at)
            }
        };

        Ok(Self {
            prefix: xml[..split_start].to_string(),
            shapes,
            suffix: xml[split_end..].to_string(),
        })
    }

    /// Smallest id not used by any shape (the group itself is 1)
    pub fn next_shape_id(&self) -> u32 {
        self.shapes.iter().map(|s| s.id).max().unwrap_or(1).max(1) + 1
    }

    /// Serialize the document with the current shapes
    pub fn to_xml(&self) -> String {
        let mut xml = self.prefix.clone();
        for shape in &self.shapes {
            xml.push_str(&shape.to_xml());
        }
        xml.push_str(&self.suffix);
        xml
    }
}

fn open_tag_end(xml: &str, start: usize) -> Result<usize> {
    let close = xml[start..]
        .find('>')
        .map(|i| start + i)
        .ok_or_else(|| DeckError::format("slide part", "unterminated p:spTree tag"))?;
    if xml[..close].ends_with('/') {
        return Err(DeckError::format("slide part", "empty p:spTree element"));
    }
    Ok(close + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"<p:sp><p:nvSpPr><p:cNvPr id="3" name="Content Placeholder 2"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr><p:spPr><a:solidFill><a:srgbClr val="FF0000"/></a:solidFill></p:spPr><p:txBody><a:bodyPr anchor="t"/><a:lstStyle/><a:p><a:r><a:rPr lang="en-US" b="1"/><a:t>First</a:t></a:r></a:p><a:p><a:pPr lvl="1"/><a:r><a:t>Second</a:t></a:r><a:br/><a:r><a:t>line</a:t></a:r></a:p></p:txBody></p:sp>"#;

    const PICTURE: &str = r#"<p:pic><p:nvPicPr><p:cNvPr id="7" name="Picture 6"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill/><p:spPr><a:xfrm><a:off x="914400" y="914400"/><a:ext cx="1828800" cy="914400"/></a:xfrm></p:spPr></p:pic>"#;

    #[test]
    fn test_parse_placeholder_shape() {
        let shape = Shape::parse(BODY).unwrap();

        assert_eq!(shape.id, 3);
        assert_eq!(shape.name, "Content Placeholder 2");
        assert_eq!(shape.kind, ShapeKind::AutoShape);
        let ph = shape.placeholder.as_ref().unwrap();
        assert_eq!(ph.kind, PlaceholderKind::Object);
        assert_eq!(ph.idx, 1);
        assert!(shape.geometry.is_none());

        let frame = shape.text_frame().unwrap();
        assert_eq!(frame.paragraphs().len(), 2);
        assert_eq!(frame.paragraphs()[1].level, 1);
        assert_eq!(shape.text(), "First\nSecond\nline");
        assert_eq!(frame.char_count(), "FirstSecond\nline".chars().count());
    }

    #[test]
    fn test_parse_picture_geometry() {
        let shape = Shape::parse(PICTURE).unwrap();

        assert_eq!(shape.kind, ShapeKind::Picture);
        assert!(!shape.has_text_frame());
        assert_eq!(
            shape.geometry,
            Some(Geometry::new(914_400, 914_400, 1_828_800, 914_400))
        );
        assert!((shape.geometry.unwrap().area_sq_in() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_untouched_shape_is_verbatim() {
        let shape = Shape::parse(BODY).unwrap();
        assert_eq!(shape.to_xml(), BODY);
    }

    #[test]
    fn test_set_paragraphs_keeps_shape_properties() {
        let mut shape = Shape::parse(BODY).unwrap();
        assert!(shape.set_paragraphs(&["a", "b", "c"]));

        let xml = shape.to_xml();
        assert!(xml.contains(r#"<a:srgbClr val="FF0000"/>"#));
        assert!(xml.contains(r#"<a:bodyPr anchor="t"/>"#));
        assert!(!xml.contains("First"));

        let reparsed = Shape::parse(&xml).unwrap();
        let paragraphs = reparsed.text_frame().unwrap().paragraphs();
        let texts: Vec<_> = paragraphs.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
        assert!(paragraphs.iter().all(|p| p.level == 0));
    }

    #[test]
    fn test_set_text_escapes_and_breaks_lines() {
        let mut shape = Shape::parse(BODY).unwrap();
        shape.set_text("Q&A\nnext");

        let reparsed = Shape::parse(&shape.to_xml()).unwrap();
        assert_eq!(reparsed.text_frame().unwrap().paragraphs().len(), 1);
        assert_eq!(reparsed.text(), "Q&A\nnext");
    }

    #[test]
    fn test_replacing_text_keeps_first_paragraph_properties() {
        let centered = r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:p><a:pPr algn="ctr" lvl="1"/><a:r><a:t>Old</a:t></a:r></a:p><a:p><a:r><a:t>Gone</a:t></a:r></a:p></p:txBody></p:sp>"#;

        let mut shape = Shape::parse(centered).unwrap();
        shape.set_text("New");
        let xml = shape.to_xml();
        assert!(xml.contains(r#"<a:p><a:pPr algn="ctr" lvl="1"/><a:r>"#));
        assert!(!xml.contains("Gone"));

        let mut shape = Shape::parse(centered).unwrap();
        shape.set_paragraphs(&["a", "b"]);
        let reparsed = Shape::parse(&shape.to_xml()).unwrap();
        let paragraphs = reparsed.text_frame().unwrap().paragraphs();
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].level, 1);
        assert_eq!(paragraphs[1].level, 0);
        assert_eq!(shape.to_xml().matches("<a:pPr").count(), 1);
    }

    #[test]
    fn test_new_text_body_precedes_ext_lst() {
        let bare = r#"<p:sp><p:nvSpPr><p:cNvPr id="4" name="Shape 3"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr/><p:extLst><p:ext uri="{X}"/></p:extLst></p:sp>"#;

        let mut shape = Shape::parse(bare).unwrap();
        assert!(shape.set_text("Hi"));
        let xml = shape.to_xml();

        let body = xml.find("<p:txBody>").unwrap();
        let ext = xml.find("<p:extLst>").unwrap();
        assert!(xml[..body].ends_with("<p:spPr/>"));
        assert!(body < ext);
        assert_eq!(Shape::parse(&xml).unwrap().text(), "Hi");
    }

    #[test]
    fn test_set_id_rewrites_markup() {
        let mut shape = Shape::parse(BODY).unwrap();
        shape.set_id(1234);
        assert!(shape.set_text("Moved"));

        let reparsed = Shape::parse(&shape.to_xml()).unwrap();
        assert_eq!(reparsed.id, 1234);
        assert_eq!(reparsed.text(), "Moved");
        assert!(shape.to_xml().contains(r#"<a:solidFill><a:srgbClr val="FF0000"/></a:solidFill>"#));
    }

    #[test]
    fn test_picture_rejects_text() {
        let mut shape = Shape::parse(PICTURE).unwrap();
        assert!(!shape.set_text("caption"));
        assert_eq!(shape.to_xml(), PICTURE);
    }

    #[test]
    fn test_from_layout_placeholder() {
        let mut descriptor = PlaceholderDescriptor::new(1, "Subtitle 2", Some("subTitle"));
        descriptor.geometry = Some(Geometry::new(0, 3_000_000, 9_144_000, 1_000_000));

        let mut shape = Shape::from_layout_placeholder(3, &descriptor);
        assert_eq!(shape.effective_geometry().map(|g| g.top), Some(3_000_000));
        shape.set_text("Hello");

        let reparsed = Shape::parse(&shape.to_xml()).unwrap();
        let ph = reparsed.placeholder.as_ref().unwrap();
        assert_eq!(ph.kind, PlaceholderKind::Subtitle);
        assert_eq!(ph.idx, 1);
        assert_eq!(reparsed.text(), "Hello");
        assert_eq!(reparsed.id, 3);
    }

    #[test]
    fn test_picture_placeholder_has_no_text_body() {
        let descriptor = PlaceholderDescriptor::new(1, "Picture Placeholder 2", Some("pic"));
        let shape = Shape::from_layout_placeholder(4, &descriptor);

        assert!(!shape.has_text_frame());
        assert!(!shape.to_xml().contains("txBody"));
    }

    #[test]
    fn test_shape_tree_roundtrip_and_insert() {
        let slide = format!(
            r#"<p:sld><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/></p:nvGrpSpPr><p:grpSpPr/>{}{}</p:spTree></p:cSld></p:sld>"#,
            BODY, PICTURE
        );
        let tree = ShapeTree::parse(&slide).unwrap();
        assert_eq!(tree.shapes.len(), 2);
        assert_eq!(tree.next_shape_id(), 8);
        assert_eq!(tree.to_xml(), slide);

        let empty = r#"<p:sld><p:cSld><p:spTree><p:nvGrpSpPr/><p:grpSpPr/></p:spTree></p:cSld></p:sld>"#;
        let mut tree = ShapeTree::parse(empty).unwrap();
        assert_eq!(tree.next_shape_id(), 2);
        tree.shapes.push(Shape::parse(PICTURE).unwrap());
        assert_eq!(
            tree.to_xml(),
            format!(
                r#"<p:sld><p:cSld><p:spTree><p:nvGrpSpPr/><p:grpSpPr/>{}</p:spTree></p:cSld></p:sld>"#,
                PICTURE
            )
        );
    }
}
