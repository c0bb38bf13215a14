//! ZIP container handling for PPTX/POTX files.
//!
//! A presentation is a ZIP archive of XML parts and media. [`Package`] keeps
//! every entry in memory, keyed by its part name, so parts that nothing edits
//! are written back exactly as they were read.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

use zip::read::ZipArchive;
use zip::write::ZipWriter;
use zip::CompressionMethod;

use crate::constants::NS_CONTENT_TYPES;
use crate::error::{DeckError, Result};
use crate::xml::{escape_xml, XmlIndex};

/// Part name of the content types manifest
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Part name of the package-level relationships
pub const ROOT_RELS_PART: &str = "_rels/.rels";

/// An unpacked presentation package
#[derive(Debug, Clone, Default)]
pub struct Package {
    /// All entries, keyed by part name (no leading slash)
    files: BTreeMap<String, Vec<u8>>,
}

impl Package {
    /// Create an empty package
    pub fn new() -> Self {
        Self::default()
    }

    /// Open and unpack a PPTX/POTX file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| DeckError::file(path, e))?;
        Self::from_reader(file)
    }

    /// Unpack from an in-memory archive
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }

    /// Create from any reader that implements Read + Seek
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut files = BTreeMap::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().trim_start_matches('/').to_string();

            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;
            files.insert(name, contents);
        }

        tracing::debug!("Unpacked {} parts", files.len());
        Ok(Self { files })
    }

    /// Get a part's contents by name
    pub fn get(&self, part: &str) -> Option<&[u8]> {
        self.files.get(part).map(|v| v.as_slice())
    }

    /// Get a part as UTF-8 text, if present
    pub fn get_str(&self, part: &str) -> Result<Option<&str>> {
        match self.files.get(part) {
            Some(bytes) => std::str::from_utf8(bytes)
                .map(Some)
                .map_err(|e| DeckError::format(part, e.to_string())),
            None => Ok(None),
        }
    }

    /// Get a part as UTF-8 text, failing if it is missing
    pub fn require_str(&self, part: &str) -> Result<&str> {
        self.get_str(part)?
            .ok_or_else(|| DeckError::invalid_template(format!("missing part {part}")))
    }

    /// Check if a part exists
    pub fn contains(&self, part: &str) -> bool {
        self.files.contains_key(part)
    }

    /// List all part names in sorted order
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(|s| s.as_str())
    }

    /// Set or update a part's contents
    pub fn set(&mut self, part: impl Into<String>, contents: impl Into<Vec<u8>>) {
        self.files.insert(part.into(), contents.into());
    }

    /// Remove a part
    pub fn remove(&mut self, part: &str) -> Option<Vec<u8>> {
        self.files.remove(part)
    }

    /// Write the package to any writer
    ///
    /// The content types manifest goes first, as Office expects.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated);

        if let Some(contents) = self.files.get(CONTENT_TYPES_PART) {
            zip.start_file(CONTENT_TYPES_PART, options)?;
            zip.write_all(contents)?;
        }

        for (path, contents) in &self.files {
            if path == CONTENT_TYPES_PART {
                continue;
            }
            zip.start_file(path.as_str(), options)?;
            zip.write_all(contents)?;
        }

        zip.finish()?;
        Ok(())
    }

    /// Serialize the package to an in-memory archive
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        self.write_to(&mut buffer)?;
        Ok(buffer.into_inner())
    }
}

/// Parsed `[Content_Types].xml`
#[derive(Debug, Clone, Default)]
pub struct ContentTypes {
    /// Extension → content type
    defaults: Vec<(String, String)>,
    /// Part name (no leading slash) → content type
    overrides: Vec<(String, String)>,
}

impl ContentTypes {
    /// Parse the manifest
    pub fn parse(xml: &str) -> Result<Self> {
        let index = XmlIndex::parse(xml)?;
        let mut types = Self::default();

        for i in index.all("Default") {
            let node = index.node(i);
            if let (Some(ext), Some(ct)) = (node.attr("Extension"), node.attr("ContentType")) {
                types.defaults.push((ext.to_ascii_lowercase(), ct.to_string()));
            }
        }
        for i in index.all("Override") {
            let node = index.node(i);
            if let (Some(part), Some(ct)) = (node.attr("PartName"), node.attr("ContentType")) {
                types
                    .overrides
                    .push((part.trim_start_matches('/').to_string(), ct.to_string()));
            }
        }

        Ok(types)
    }

    /// Effective content type of a part
    pub fn content_type(&self, part: &str) -> Option<&str> {
        if let Some((_, ct)) = self.overrides.iter().find(|(p, _)| p == part) {
            return Some(ct);
        }
        let ext = part.rsplit('.').next()?.to_ascii_lowercase();
        self.defaults
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, ct)| ct.as_str())
    }

    /// Add or replace the override for a part
    pub fn add_override(&mut self, part: &str, content_type: &str) {
        let part = part.trim_start_matches('/');
        match self.overrides.iter_mut().find(|(p, _)| p == part) {
            Some(entry) => entry.1 = content_type.to_string(),
            None => self
                .overrides
                .push((part.to_string(), content_type.to_string())),
        }
    }

    /// Remove the override for a part
    pub fn remove_override(&mut self, part: &str) -> bool {
        let part = part.trim_start_matches('/');
        let before = self.overrides.len();
        self.overrides.retain(|(p, _)| p != part);
        self.overrides.len() != before
    }

    /// Serialize the manifest
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<Types xmlns="{}">"#, NS_CONTENT_TYPES));
        for (ext, ct) in &self.defaults {
            xml.push_str(&format!(
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                escape_xml(ext),
                escape_xml(ct)
            ));
        }
        for (part, ct) in &self.overrides {
            xml.push_str(&format!(
                r#"<Override PartName="/{}" ContentType="{}"/>"#,
                escape_xml(part),
                escape_xml(ct)
            ));
        }
        xml.push_str("</Types>");
        xml
    }
}

/// Relationship part that belongs to `part`
///
/// `ppt/slides/slide1.xml` → `ppt/slides/_rels/slide1.xml.rels`
pub fn rels_path_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{dir}/_rels/{file}.rels"),
        None if part.is_empty() => ROOT_RELS_PART.to_string(),
        None => format!("_rels/{part}.rels"),
    }
}

/// Resolve a relationship target against the part that owns it
pub fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return normalize(absolute.split('/'));
    }
    let dir = source_part.rsplit_once('/').map(|(d, _)| d).unwrap_or("");
    normalize(dir.split('/').chain(target.split('/')))
}

/// Relative target from `from_part` to `to_part`, as stored in a `.rels` file
pub fn relative_target(from_part: &str, to_part: &str) -> String {
    let from_dir: Vec<&str> = match from_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    let to: Vec<&str> = to_part.split('/').collect();
    let (to_dir, file) = to.split_at(to.len().saturating_sub(1));

    let common = from_dir
        .iter()
        .zip(to_dir.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<&str> = vec![".."; from_dir.len() - common];
    segments.extend_from_slice(&to_dir[common..]);
    segments.extend_from_slice(file);
    segments.join("/")
}

fn normalize<'a>(segments: impl Iterator<Item = &'a str>) -> String {
    let mut out: Vec<&str> = Vec::new();
    for segment in segments {
        match segment {
            "" | "." => {}
            ".." => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_operations() {
        let mut package = Package::new();

        package.set("ppt/presentation.xml", "<p:presentation/>");
        assert!(package.contains("ppt/presentation.xml"));
        assert_eq!(
            package.get_str("ppt/presentation.xml").unwrap(),
            Some("<p:presentation/>")
        );

        package.remove("ppt/presentation.xml");
        assert!(!package.contains("ppt/presentation.xml"));
        assert!(package.require_str("ppt/presentation.xml").is_err());
    }

    #[test]
    fn test_roundtrip_through_zip() {
        let mut package = Package::new();
        package.set(CONTENT_TYPES_PART, ContentTypes::default().to_xml());
        package.set("ppt/media/image1.png", vec![0x89, 0x50, 0x4e, 0x47]);

        let bytes = package.to_bytes().unwrap();
        let restored = Package::from_bytes(&bytes).unwrap();

        assert_eq!(
            restored.get("ppt/media/image1.png"),
            Some(&[0x89, 0x50, 0x4e, 0x47][..])
        );
        assert_eq!(restored.part_names().count(), 2);
    }

    #[test]
    fn test_open_missing_file_is_file_error() {
        let err = Package::open("/nonexistent/template.pptx").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::File);
    }

    #[test]
    fn test_garbage_is_format_error() {
        let err = Package::from_bytes(b"not a zip archive").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Format);
    }

    #[test]
    fn test_content_types() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/ppt/slides/slide1.xml" ContentType="slide"/>
</Types>"#;
        let mut types = ContentTypes::parse(xml).unwrap();

        assert_eq!(types.content_type("ppt/slides/slide1.xml"), Some("slide"));
        assert_eq!(types.content_type("ppt/other.xml"), Some("application/xml"));

        types.add_override("/ppt/slides/slide2.xml", "slide");
        assert!(types.remove_override("ppt/slides/slide1.xml"));
        assert!(!types.remove_override("ppt/slides/slide1.xml"));

        let reparsed = ContentTypes::parse(&types.to_xml()).unwrap();
        assert_eq!(reparsed.content_type("ppt/slides/slide2.xml"), Some("slide"));
        assert_eq!(reparsed.content_type("ppt/slides/slide1.xml"), Some("application/xml"));
    }

    #[test]
    fn test_rels_path_for() {
        assert_eq!(
            rels_path_for("ppt/slides/slide1.xml"),
            "ppt/slides/_rels/slide1.xml.rels"
        );
        assert_eq!(
            rels_path_for("ppt/presentation.xml"),
            "ppt/_rels/presentation.xml.rels"
        );
        assert_eq!(rels_path_for(""), "_rels/.rels");
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(
            resolve_target("ppt/slides/slide1.xml", "../slideLayouts/slideLayout2.xml"),
            "ppt/slideLayouts/slideLayout2.xml"
        );
        assert_eq!(
            resolve_target("ppt/presentation.xml", "slides/slide1.xml"),
            "ppt/slides/slide1.xml"
        );
        assert_eq!(
            resolve_target("ppt/slides/slide1.xml", "/ppt/media/image1.png"),
            "ppt/media/image1.png"
        );
        assert_eq!(resolve_target("", "ppt/presentation.xml"), "ppt/presentation.xml");
    }

    #[test]
    fn test_relative_target() {
        assert_eq!(
            relative_target("ppt/slides/slide1.xml", "ppt/slideLayouts/slideLayout1.xml"),
            "../slideLayouts/slideLayout1.xml"
        );
        assert_eq!(
            relative_target("ppt/presentation.xml", "ppt/slides/slide3.xml"),
            "slides/slide3.xml"
        );
        assert_eq!(
            relative_target("ppt/slides/slide1.xml", "ppt/slides/slide2.xml"),
            "slide2.xml"
        );
    }
}
