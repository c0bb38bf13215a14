//! Presentation document model over a [`Package`].
//!
//! [`Presentation`] resolves the presentation part, the layouts of its first
//! slide master and its slides (in `p:sldIdLst` order). Slides are edited in
//! memory and written back into a copy of the package on save; every part
//! that no slide edit touches is carried through unchanged.

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, warn};

use crate::constants::{
    CT_PRESENTATION, CT_SLIDE, CT_TEMPLATE, DEFAULT_SLIDE_HEIGHT_EMU, DEFAULT_SLIDE_WIDTH_EMU,
    NS_DRAWING, NS_PRESENTATION, NS_RELATIONSHIPS, REL_TYPE_SLIDE, REL_TYPE_SLIDE_LAYOUT,
};
use crate::error::{DeckError, Result};
use crate::layout::{master_placeholders, Layout};
use crate::package::{
    rels_path_for, relative_target, resolve_target, ContentTypes, Package, CONTENT_TYPES_PART,
    ROOT_RELS_PART,
};
use crate::relationships::Relationships;
use crate::shape::{Shape, ShapeTree};
use crate::xml::XmlIndex;

/// Smallest slide id PowerPoint accepts is 256
const MIN_SLIDE_ID: u32 = 256;

/// Slide dimensions in EMU
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct SlideSize {
    pub width: i64,
    pub height: i64,
}

impl Default for SlideSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_SLIDE_WIDTH_EMU,
            height: DEFAULT_SLIDE_HEIGHT_EMU,
        }
    }
}

/// A loaded presentation or template
#[derive(Debug, Clone)]
pub struct Presentation {
    package: Package,
    part_name: String,
    rels: Relationships,
    content_types: ContentTypes,
    slide_size: SlideSize,
    layouts: Vec<Layout>,
    slides: Vec<Slide>,
    /// Next free slide id; ids are never reused, even after removal
    next_slide_id: u32,
}

impl Presentation {
    /// Load a presentation from a `.pptx`/`.potx` file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading presentation {}", path.display());
        Self::from_package(Package::open(path)?)
    }

    /// Load a presentation from bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_package(Package::from_bytes(data)?)
    }

    /// Resolve the document model of an unpacked package
    pub fn from_package(package: Package) -> Result<Self> {
        let root_rels = Relationships::parse(package.require_str(ROOT_RELS_PART)?)?;
        let (_, office_document) = root_rels
            .find_by_type("officeDocument")
            .ok_or_else(|| DeckError::invalid_template("no officeDocument relationship"))?;
        let part_name = resolve_target("", &office_document.target);

        let content_types = ContentTypes::parse(package.require_str(CONTENT_TYPES_PART)?)?;
        let rels = read_rels(&package, &part_name)?;

        let xml = package.require_str(&part_name)?;
        let index = XmlIndex::parse(xml)?;

        let slide_size = index
            .first("sldSz")
            .map(|i| {
                let node = index.node(i);
                SlideSize {
                    width: node.attr_parsed("cx").unwrap_or(DEFAULT_SLIDE_WIDTH_EMU),
                    height: node.attr_parsed("cy").unwrap_or(DEFAULT_SLIDE_HEIGHT_EMU),
                }
            })
            .unwrap_or_default();

        let master_part = index
            .first("sldMasterId")
            .and_then(|i| relationship_id(index.node(i)))
            .and_then(|rid| rels.get(rid))
            .map(|rel| resolve_target(&part_name, &rel.target))
            .ok_or_else(|| DeckError::invalid_template("no slide master"))?;
        let layouts = read_layouts(&package, &master_part)?;

        let mut slides = Vec::new();
        let slide_ids: Vec<usize> = match main_slide_list(&index) {
            Some(list) => index.children(list).collect(),
            None => Vec::new(),
        };
        for i in slide_ids {
            let node = index.node(i);
            let rel_id = relationship_id(node)
                .ok_or_else(|| DeckError::format(&part_name, "p:sldId without r:id"))?;
            let rel = rels.get(rel_id).ok_or_else(|| {
                DeckError::format(&part_name, format!("dangling slide relationship {rel_id}"))
            })?;
            let slide_part = resolve_target(&part_name, &rel.target);

            let mut slide = Slide::load(&package, &slide_part, &layouts)?;
            slide.rel_id = rel_id.to_string();
            slide.slide_id = node.attr_parsed("id").unwrap_or(0);
            slides.push(slide);
        }

        // Section lists may still name ids of slides removed earlier
        let next_slide_id = index
            .all("sldId")
            .filter_map(|i| index.node(i).attr_parsed::<u32>("id"))
            .max()
            .map_or(MIN_SLIDE_ID, |max| max.saturating_add(1).max(MIN_SLIDE_ID));

        debug!(
            "Presentation {} has {} layouts and {} slides",
            part_name,
            layouts.len(),
            slides.len()
        );

        Ok(Self {
            package,
            part_name,
            rels,
            content_types,
            slide_size,
            layouts,
            slides,
            next_slide_id,
        })
    }

    /// Slide dimensions
    pub fn slide_size(&self) -> SlideSize {
        self.slide_size
    }

    /// Layouts of the first slide master, in template order
    pub fn layouts(&self) -> &[Layout] {
        &self.layouts
    }

    /// Layout by index
    pub fn layout(&self, index: usize) -> Result<&Layout> {
        self.layouts
            .get(index)
            .ok_or_else(|| DeckError::layout_out_of_range(index, self.layouts.len()))
    }

    /// Slides in presentation order
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Number of slides
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Slide by index
    pub fn slide(&self, index: usize) -> Result<&Slide> {
        self.slides
            .get(index)
            .ok_or_else(|| DeckError::slide_out_of_range(index, self.slides.len()))
    }

    /// Mutable slide by index
    pub fn slide_mut(&mut self, index: usize) -> Result<&mut Slide> {
        let count = self.slides.len();
        self.slides
            .get_mut(index)
            .ok_or_else(|| DeckError::slide_out_of_range(index, count))
    }

    /// Remove every slide, returning how many were removed
    pub fn clear_slides(&mut self) -> usize {
        let count = self.slides.len();
        while !self.slides.is_empty() {
            self.detach(0);
        }
        if count > 0 {
            debug!("Removed {} existing slides", count);
        }
        count
    }

    /// Remove one slide
    pub fn remove_slide(&mut self, index: usize) -> Result<()> {
        if index >= self.slides.len() {
            return Err(DeckError::slide_out_of_range(index, self.slides.len()));
        }
        self.detach(index);
        Ok(())
    }

    /// Keep only the slides at the given indices, returning how many were removed
    ///
    /// Indices that do not exist are ignored.
    pub fn retain_slides(&mut self, keep: &[usize]) -> usize {
        let keep: HashSet<usize> = keep.iter().copied().collect();
        let mut removed = 0;
        for index in (0..self.slides.len()).rev() {
            if !keep.contains(&index) {
                self.detach(index);
                removed += 1;
            }
        }
        removed
    }

    /// Create a detached slide from a layout
    ///
    /// The slide gets one placeholder per layout placeholder, except date,
    /// footer and slide number. Nothing is added to the presentation until
    /// [`push_slide`](Self::push_slide).
    pub fn instantiate(&self, layout_index: usize) -> Result<Slide> {
        let layout = self.layout(layout_index)?;
        Slide::from_layout(layout)
    }

    /// Append a slide, returning its index
    pub fn push_slide(&mut self, mut slide: Slide) -> usize {
        let part_name = self.next_slide_part();

        if slide.rels.find_by_type("slideLayout").is_none() {
            slide.rels.add(
                relative_target(&part_name, &slide.layout_part),
                REL_TYPE_SLIDE_LAYOUT,
            );
        }

        slide.slide_id = self.next_slide_id;
        self.next_slide_id += 1;
        slide.rel_id = self
            .rels
            .add(relative_target(&self.part_name, &part_name), REL_TYPE_SLIDE);
        self.content_types.add_override(&part_name, CT_SLIDE);
        slide.part_name = part_name;

        debug!("Added {} using layout '{}'", slide.part_name, slide.layout_name);
        self.slides.push(slide);
        self.slides.len() - 1
    }

    /// Instantiate a layout and append it, returning the slide index
    pub fn add_slide(&mut self, layout_index: usize) -> Result<usize> {
        let slide = self.instantiate(layout_index)?;
        Ok(self.push_slide(slide))
    }

    /// Append a copy of a slide, bound to the same layout
    ///
    /// Shapes and relationships (images, hyperlinks) are copied; speaker
    /// notes are not.
    pub fn duplicate_slide(&mut self, index: usize) -> Result<usize> {
        let source = self.slide(index)?;
        let mut copy = source.clone();

        let mut rels = Relationships::new();
        for (id, rel) in source.rels.iter().filter(|(_, rel)| !rel.is_type("notesSlide")) {
            rels.insert(id, rel.clone());
        }
        copy.rels = rels;
        copy.part_name = String::new();

        Ok(self.push_slide(copy))
    }

    /// Serialize to `.pptx` bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.to_package()?.to_bytes()
    }

    /// Write to a file, overwriting it
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes).map_err(|e| DeckError::file(path, e))?;
        debug!("Saved {} slides to {}", self.slides.len(), path.display());
        Ok(())
    }

    /// Build the package as it would be saved
    pub fn to_package(&self) -> Result<Package> {
        let mut package = self.package.clone();

        for slide in &self.slides {
            package.set(slide.part_name.clone(), slide.to_xml());
            package.set(rels_path_for(&slide.part_name), slide.rels.to_xml());
        }

        let xml = package.require_str(&self.part_name)?;
        let presentation_xml = self.rewrite_slide_list(xml)?;
        package.set(self.part_name.clone(), presentation_xml);
        package.set(rels_path_for(&self.part_name), self.rels.to_xml());

        let mut content_types = self.content_types.clone();
        if content_types.content_type(&self.part_name) == Some(CT_TEMPLATE) {
            // A template saved as a deck must declare itself a presentation
            content_types.add_override(&self.part_name, CT_PRESENTATION);
        }
        drop_orphaned_slides(&mut package, &mut content_types)?;
        package.set(CONTENT_TYPES_PART, content_types.to_xml());

        Ok(package)
    }

    /// Drop a slide from the list, its relationship and its content type
    fn detach(&mut self, index: usize) {
        let slide = self.slides.remove(index);
        self.rels.remove(&slide.rel_id);
        self.content_types.remove_override(&slide.part_name);
        self.package.remove(&slide.part_name);
        self.package.remove(&rels_path_for(&slide.part_name));
        debug!("Detached {}", slide.part_name);
    }

    fn next_slide_part(&self) -> String {
        let dir = match self.part_name.rsplit_once('/') {
            Some((dir, _)) => format!("{dir}/slides"),
            None => "slides".to_string(),
        };
        (1..)
            .map(|n| format!("{dir}/slide{n}.xml"))
            .find(|candidate| {
                !self.package.contains(candidate)
                    && !self.slides.iter().any(|s| &s.part_name == candidate)
            })
            .unwrap_or_else(|| format!("{dir}/slide.xml"))
    }

    /// Replace (or insert) `p:sldIdLst` with the current slides
    ///
    /// Section lists (`p14:sldIdLst` in extensions) lose the ids of slides
    /// that no longer exist. Slides no section names yet are appended to the
    /// last section, so every slide keeps belonging to exactly one.
    fn rewrite_slide_list(&self, xml: &str) -> Result<String> {
        let index = XmlIndex::parse(xml)?;

        let master_list = index
            .first("sldMasterIdLst")
            .ok_or_else(|| DeckError::invalid_template("no p:sldMasterIdLst"))?;
        let prefix = index
            .node(master_list)
            .name
            .split_once(':')
            .map(|(p, _)| format!("{p}:"))
            .unwrap_or_default();
        let r_prefix = index
            .first("sldMasterId")
            .and_then(|i| {
                index
                    .node(i)
                    .attrs
                    .iter()
                    .find(|(k, _)| k.ends_with(":id"))
                    .map(|(k, _)| k.trim_end_matches("id").to_string())
            })
            .unwrap_or_else(|| "r:".to_string());

        let list = if self.slides.is_empty() {
            String::new()
        } else {
            let mut list = format!("<{prefix}sldIdLst>");
            for slide in &self.slides {
                list.push_str(&format!(
                    r#"<{prefix}sldId id="{}" {r_prefix}id="{}"/>"#,
                    slide.slide_id, slide.rel_id
                ));
            }
            list.push_str(&format!("</{prefix}sldIdLst>"));
            list
        };

        let main_list = main_slide_list(&index);
        let mut splices: Vec<(usize, usize, String)> = Vec::new();
        match main_list {
            Some(i) => splices.push((index.node(i).start, index.node(i).end, list)),
            None => {
                let after = ["sldMasterIdLst", "notesMasterIdLst", "handoutMasterIdLst"]
                    .iter()
                    .filter_map(|name| index.first(name))
                    .map(|i| index.node(i).end)
                    .max()
                    .unwrap_or(index.node(master_list).end);
                splices.push((after, after, list));
            }
        }

        let live: HashSet<u32> = self.slides.iter().map(|s| s.slide_id).collect();
        let mut sectioned = HashSet::new();
        let main_range = main_list.map(|i| (index.node(i).start, index.node(i).end));
        for i in index.all("sldId") {
            let node = index.node(i);
            if main_range.is_some_and(|(start, end)| node.start >= start && node.end <= end) {
                continue;
            }
            match node.attr_parsed::<u32>("id") {
                Some(id) if live.contains(&id) => {
                    sectioned.insert(id);
                }
                _ => splices.push((node.start, node.end, String::new())),
            }
        }

        let last_section = index
            .all("section")
            .filter_map(|i| index.child(i, "sldIdLst"))
            .last();
        let unsectioned: Vec<u32> = self
            .slides
            .iter()
            .map(|s| s.slide_id)
            .filter(|id| !sectioned.contains(id))
            .collect();
        if let (Some(i), false) = (last_section, unsectioned.is_empty()) {
            let node = index.node(i);
            let item_name = match node.name.split_once(':') {
                Some((p, _)) => format!("{p}:sldId"),
                None => "sldId".to_string(),
            };
            let items: String = unsectioned
                .iter()
                .map(|id| format!(r#"<{item_name} id="{id}"/>"#))
                .collect();
            let close = format!("</{}>", node.name);
            if index.raw(i).ends_with(&close) {
                let at = node.end - close.len();
                splices.push((at, at, items));
            } else {
                splices.push((node.start, node.end, format!("<{0}>{items}</{0}>", node.name)));
            }
        }
        splices.sort_by_key(|(start, _, _)| *start);

        let mut out = String::with_capacity(xml.len());
        let mut cursor = 0;
        for (start, end, replacement) in splices {
            out.push_str(&xml[cursor..start]);
            out.push_str(&replacement);
            cursor = end;
        }
        out.push_str(&xml[cursor..]);
        Ok(out)
    }
}

/// The presentation's own `p:sldIdLst`, not a section's
fn main_slide_list(index: &XmlIndex<'_>) -> Option<usize> {
    index.first("presentation").and_then(|root| index.child(root, "sldIdLst"))
}

/// A slide, either loaded from a package or instantiated from a layout
#[derive(Debug, Clone)]
pub struct Slide {
    part_name: String,
    rel_id: String,
    slide_id: u32,
    layout_part: String,
    layout_name: String,
    layout_index: Option<usize>,
    tree: ShapeTree,
    rels: Relationships,
}

impl Slide {
    /// Parse a standalone slide part, not bound to any layout
    pub fn parse(xml: &str) -> Result<Self> {
        Ok(Self {
            part_name: String::new(),
            rel_id: String::new(),
            slide_id: 0,
            layout_part: String::new(),
            layout_name: String::new(),
            layout_index: None,
            tree: ShapeTree::parse(xml)?,
            rels: Relationships::new(),
        })
    }

    fn load(package: &Package, part_name: &str, layouts: &[Layout]) -> Result<Self> {
        let xml = package.require_str(part_name)?;
        let mut slide = Self::parse(xml)?;
        slide.part_name = part_name.to_string();
        slide.rels = read_rels(package, part_name)?;

        let layout_part = slide
            .rels
            .find_by_type("slideLayout")
            .map(|(_, rel)| resolve_target(part_name, &rel.target));

        let Some(layout_part) = layout_part else {
            warn!("{} has no slide layout relationship", part_name);
            return Ok(slide);
        };

        let foreign;
        let layout = match layouts.iter().find(|l| l.part_name == layout_part) {
            Some(layout) => {
                slide.layout_index = Some(layout.index);
                layout
            }
            None => {
                // Layout of another slide master
                foreign = Layout::parse(0, layout_part.clone(), package.require_str(&layout_part)?)?;
                &foreign
            }
        };

        slide.layout_name = layout.name.clone();
        slide.layout_part = layout_part;
        slide.inherit_geometry(layout);
        Ok(slide)
    }

    fn from_layout(layout: &Layout) -> Result<Self> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="{}" xmlns:r="{}" xmlns:p="{}"><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#,
            NS_DRAWING, NS_RELATIONSHIPS, NS_PRESENTATION
        );

        let mut slide = Self::parse(&xml)?;
        slide.layout_part = layout.part_name.clone();
        slide.layout_name = layout.name.clone();
        slide.layout_index = Some(layout.index);

        for descriptor in layout.placeholders.iter().filter(|p| !p.is_footer_like()) {
            let id = slide.tree.next_shape_id();
            slide
                .tree
                .shapes
                .push(Shape::from_layout_placeholder(id, descriptor));
        }

        Ok(slide)
    }

    /// Placeholder shapes take the geometry of the layout placeholder with the same idx
    fn inherit_geometry(&mut self, layout: &Layout) {
        for shape in &mut self.tree.shapes {
            if let Some(ph) = &shape.placeholder {
                shape.inherited = layout.placeholder(ph.idx).and_then(|p| p.geometry);
            }
        }
    }

    /// Part name inside the package (empty until the slide is added)
    pub fn part_name(&self) -> &str {
        &self.part_name
    }

    /// Display name of the slide's layout
    pub fn layout_name(&self) -> &str {
        &self.layout_name
    }

    /// Index of the slide's layout, if it belongs to the first master
    pub fn layout_index(&self) -> Option<usize> {
        self.layout_index
    }

    /// Shapes in z-order
    pub fn shapes(&self) -> &[Shape] {
        &self.tree.shapes
    }

    /// Mutable shapes in z-order
    pub fn shapes_mut(&mut self) -> &mut [Shape] {
        &mut self.tree.shapes
    }

    /// Append a shape, assigning it the next free id
    pub fn add_shape(&mut self, mut shape: Shape) -> &mut Shape {
        shape.set_id(self.tree.next_shape_id());
        self.tree.shapes.push(shape);
        let last = self.tree.shapes.len() - 1;
        &mut self.tree.shapes[last]
    }

    /// Relationships of the slide part
    pub fn relationships(&self) -> &Relationships {
        &self.rels
    }

    /// Text of every shape that can hold text, in z-order
    pub fn texts(&self) -> Vec<String> {
        self.tree
            .shapes
            .iter()
            .filter(|s| s.has_text_frame())
            .map(Shape::text)
            .collect()
    }

    /// Serialize the slide part
    pub fn to_xml(&self) -> String {
        self.tree.to_xml()
    }
}

/// The `r:id` attribute of an element, whatever its prefix
fn relationship_id(node: &crate::xml::XmlNode) -> Option<&str> {
    node.attrs
        .iter()
        .find(|(k, _)| k.ends_with(":id"))
        .map(|(_, v)| v.as_str())
}

fn read_rels(package: &Package, part_name: &str) -> Result<Relationships> {
    match package.get_str(&rels_path_for(part_name))? {
        Some(xml) => Relationships::parse(xml),
        None => Ok(Relationships::new()),
    }
}

fn read_layouts(package: &Package, master_part: &str) -> Result<Vec<Layout>> {
    let master_xml = package.require_str(master_part)?;
    let master_rels = read_rels(package, master_part)?;
    let master = master_placeholders(master_xml)?;
    let index = XmlIndex::parse(master_xml)?;

    let mut layouts = Vec::new();
    for i in index.all("sldLayoutId") {
        let Some(rel) = relationship_id(index.node(i)).and_then(|rid| master_rels.get(rid)) else {
            return Err(DeckError::format(master_part, "dangling layout relationship"));
        };
        let part = resolve_target(master_part, &rel.target);
        let mut layout = Layout::parse(layouts.len(), part.clone(), package.require_str(&part)?)?;
        layout.inherit_geometry(&master);
        layouts.push(layout);
    }

    Ok(layouts)
}

/// Remove slide and notes parts that no relationship reaches any more
fn drop_orphaned_slides(package: &mut Package, content_types: &mut ContentTypes) -> Result<()> {
    let mut reachable: HashSet<String> = HashSet::new();
    let mut pending = vec![String::new()];

    while let Some(part) = pending.pop() {
        let rels = match package.get_str(&rels_path_for(&part))? {
            Some(xml) => Relationships::parse(xml)?,
            None => continue,
        };
        for (_, rel) in rels.iter().filter(|(_, rel)| !rel.is_external()) {
            let target = resolve_target(&part, &rel.target);
            if reachable.insert(target.clone()) {
                pending.push(target);
            }
        }
    }

    let orphans: Vec<String> = package
        .part_names()
        .filter(|name| is_slide_like(name) && !reachable.contains(*name))
        .map(str::to_string)
        .collect();

    for part in orphans {
        package.remove(&part);
        package.remove(&rels_path_for(&part));
        content_types.remove_override(&part);
        debug!("Dropped orphaned part {}", part);
    }

    Ok(())
}

fn is_slide_like(part: &str) -> bool {
    let Some((dir, file)) = part.rsplit_once('/') else {
        return false;
    };
    file.ends_with(".xml") && (dir.ends_with("/slides") || dir.ends_with("/notesSlides"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::TemplateBuilder;
    use crate::layout::PlaceholderKind;

    #[test]
    fn test_open_fixture_template() {
        let pres = Presentation::from_bytes(&TemplateBuilder::new().build()).unwrap();

        assert_eq!(pres.layouts().len(), 7);
        assert_eq!(pres.layout(0).unwrap().name, "Title Slide");
        assert_eq!(pres.layout(6).unwrap().name, "Blank");
        assert_eq!(pres.slide_count(), 0);
        assert_eq!(pres.slide_size().height, 6_858_000);

        let err = pres.layout(7).unwrap_err();
        assert!(matches!(err, DeckError::LayoutOutOfRange { index: 7, count: 7 }));
    }

    #[test]
    fn test_existing_slides_are_loaded() {
        let bytes = TemplateBuilder::new().with_slides(&[0, 1, 1]).build();
        let pres = Presentation::from_bytes(&bytes).unwrap();

        let names: Vec<_> = pres.slides().iter().map(|s| s.layout_name()).collect();
        assert_eq!(names, vec!["Title Slide", "Title and Content", "Title and Content"]);
        assert_eq!(pres.slide(1).unwrap().layout_index(), Some(1));
    }

    #[test]
    fn test_instantiate_skips_footer_placeholders() {
        let pres = Presentation::from_bytes(&TemplateBuilder::new().build()).unwrap();
        let slide = pres.instantiate(0).unwrap();

        let kinds: Vec<_> = slide
            .shapes()
            .iter()
            .filter_map(|s| s.placeholder.as_ref().map(|p| p.kind))
            .collect();
        assert_eq!(kinds, vec![PlaceholderKind::CenterTitle, PlaceholderKind::Subtitle]);
        assert!(slide.shapes().iter().all(|s| s.effective_geometry().is_some()));
        assert_eq!(slide.shapes()[0].id, 2);
        assert_eq!(slide.shapes()[1].id, 3);
    }

    #[test]
    fn test_add_slide_roundtrip() {
        let mut pres = Presentation::from_bytes(&TemplateBuilder::new().build()).unwrap();
        let index = pres.add_slide(1).unwrap();
        pres.slide_mut(index).unwrap().shapes_mut()[0].set_text("Agenda");
        pres.add_slide(6).unwrap();

        let reloaded = Presentation::from_bytes(&pres.to_bytes().unwrap()).unwrap();
        assert_eq!(reloaded.slide_count(), 2);
        assert_eq!(reloaded.slide(0).unwrap().layout_name(), "Title and Content");
        assert_eq!(reloaded.slide(0).unwrap().texts()[0], "Agenda");
        assert_eq!(reloaded.slide(1).unwrap().layout_name(), "Blank");
        assert!(reloaded.slide(1).unwrap().shapes().is_empty());
    }

    #[test]
    fn test_add_slide_out_of_range() {
        let mut pres = Presentation::from_bytes(&TemplateBuilder::new().build()).unwrap();
        let err = pres.add_slide(42).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::OutOfRange);
        assert_eq!(pres.slide_count(), 0);
    }

    #[test]
    fn test_clear_slides_drops_parts() {
        let bytes = TemplateBuilder::new().with_slides(&[0, 1]).build();
        let mut pres = Presentation::from_bytes(&bytes).unwrap();

        assert_eq!(pres.clear_slides(), 2);
        assert_eq!(pres.slide_count(), 0);

        let package = pres.to_package().unwrap();
        assert!(!package.contains("ppt/slides/slide1.xml"));
        assert!(!package.contains("ppt/notesSlides/notesSlide1.xml"));
        assert!(!package
            .get_str(CONTENT_TYPES_PART)
            .unwrap()
            .unwrap()
            .contains("/ppt/slides/slide1.xml"));

        let reloaded = Presentation::from_package(package).unwrap();
        assert_eq!(reloaded.slide_count(), 0);
        assert_eq!(reloaded.layouts().len(), 7);
    }

    #[test]
    fn test_new_slides_reuse_removed_part_names() {
        let bytes = TemplateBuilder::new().with_slides(&[0, 1]).build();
        let mut pres = Presentation::from_bytes(&bytes).unwrap();
        pres.clear_slides();
        pres.add_slide(1).unwrap();

        assert_eq!(pres.slide(0).unwrap().part_name(), "ppt/slides/slide1.xml");

        let reloaded = Presentation::from_bytes(&pres.to_bytes().unwrap()).unwrap();
        assert_eq!(reloaded.slide_count(), 1);
        assert!(reloaded.slide(0).unwrap().texts().iter().all(|t| t.is_empty()));
        assert!(reloaded
            .slide(0)
            .unwrap()
            .relationships()
            .find_by_type("notesSlide")
            .is_none());
    }

    #[test]
    fn test_retain_and_remove_slides() {
        let bytes = TemplateBuilder::new().with_slides(&[0, 1, 2, 3]).build();
        let mut pres = Presentation::from_bytes(&bytes).unwrap();

        assert_eq!(pres.retain_slides(&[1, 3, 99]), 2);
        let names: Vec<_> = pres.slides().iter().map(|s| s.layout_name()).collect();
        assert_eq!(names, vec!["Title and Content", "Two Content"]);

        pres.remove_slide(0).unwrap();
        assert_eq!(pres.slide_count(), 1);
        assert!(pres.remove_slide(5).is_err());
    }

    #[test]
    fn test_duplicate_slide() {
        let mut pres = Presentation::from_bytes(&TemplateBuilder::new().build()).unwrap();
        let index = pres.add_slide(1).unwrap();
        pres.slide_mut(index).unwrap().shapes_mut()[0].set_text("Original");

        let copy = pres.duplicate_slide(index).unwrap();
        assert_eq!(copy, 1);

        let reloaded = Presentation::from_bytes(&pres.to_bytes().unwrap()).unwrap();
        assert_eq!(reloaded.slide_count(), 2);
        assert_eq!(reloaded.slide(1).unwrap().texts()[0], "Original");
        assert_eq!(reloaded.slide(1).unwrap().layout_name(), "Title and Content");
        assert_ne!(
            reloaded.slide(0).unwrap().part_name(),
            reloaded.slide(1).unwrap().part_name()
        );
    }

    fn presentation_xml(pres: &Presentation) -> String {
        let package = pres.to_package().unwrap();
        package.get_str("ppt/presentation.xml").unwrap().unwrap().to_string()
    }

    #[test]
    fn test_slide_ids_are_not_reused() {
        let bytes = TemplateBuilder::new().with_slides(&[0, 1]).build();
        let mut pres = Presentation::from_bytes(&bytes).unwrap();
        pres.clear_slides();
        pres.add_slide(1).unwrap();
        pres.add_slide(1).unwrap();

        let ids: Vec<_> = pres.slides().iter().map(|s| s.slide_id).collect();
        assert_eq!(ids, vec![258, 259]);
    }

    #[test]
    fn test_rebuilt_slides_join_last_section() {
        let bytes = TemplateBuilder::new()
            .with_slides(&[0, 1])
            .with_sections(&[("A", 1), ("B", 1)])
            .build();
        let mut pres = Presentation::from_bytes(&bytes).unwrap();
        pres.clear_slides();
        for _ in 0..3 {
            pres.add_slide(1).unwrap();
        }

        let xml = presentation_xml(&pres);
        assert!(!xml.contains(r#"id="256""#));
        assert!(!xml.contains(r#"id="257""#));
        assert!(xml.contains(r#"<p14:section name="A" id="{00000000-0000-0000-0000-000000000000}"><p14:sldIdLst></p14:sldIdLst>"#));
        assert!(xml.contains(
            r#"<p14:section name="B" id="{00000000-0000-0000-0000-000000000001}"><p14:sldIdLst><p14:sldId id="258"/><p14:sldId id="259"/><p14:sldId id="260"/></p14:sldIdLst>"#
        ));

        let reloaded = Presentation::from_bytes(&pres.to_bytes().unwrap()).unwrap();
        assert_eq!(reloaded.slide_count(), 3);
    }

    #[test]
    fn test_sections_keep_surviving_slides() {
        let bytes = TemplateBuilder::new()
            .with_slides(&[0, 1, 1])
            .with_sections(&[("Intro", 1), ("Body", 2)])
            .build();
        let mut pres = Presentation::from_bytes(&bytes).unwrap();
        pres.retain_slides(&[0, 2]);
        pres.add_slide(6).unwrap();

        let xml = presentation_xml(&pres);
        assert!(xml.contains(r#"<p14:sldIdLst><p14:sldId id="256"/></p14:sldIdLst>"#));
        assert!(xml.contains(r#"<p14:sldIdLst><p14:sldId id="258"/><p14:sldId id="259"/></p14:sldIdLst>"#));
        assert!(!xml.contains(r#"id="257""#));
    }

    #[test]
    fn test_empty_deck_with_sections_reopens() {
        let bytes = TemplateBuilder::new()
            .with_slides(&[0])
            .with_sections(&[("Only", 1)])
            .build();
        let mut pres = Presentation::from_bytes(&bytes).unwrap();
        pres.clear_slides();

        let reloaded = Presentation::from_bytes(&pres.to_bytes().unwrap()).unwrap();
        assert_eq!(reloaded.slide_count(), 0);
    }

    #[test]
    fn test_missing_presentation_part() {
        let mut package = Package::from_bytes(&TemplateBuilder::new().build()).unwrap();
        package.remove("ppt/presentation.xml");

        let err = Presentation::from_package(package).unwrap_err();
        assert_eq!(err.code(), "DECK003");
    }
}
