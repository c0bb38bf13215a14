//! Element index over a single XML part.
//!
//! Parts are kept as strings. Reading goes through [`XmlIndex`], which records
//! the byte range, depth, attributes and direct text of every element; editing
//! splices those ranges so untouched markup is written back byte-for-byte.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{DeckError, Result};

/// One element of an indexed XML part
#[derive(Debug, Clone)]
pub(crate) struct XmlNode {
    /// Qualified element name (e.g. `p:sp`)
    pub name: String,
    /// Nesting depth (document element is 0)
    pub depth: usize,
    /// Byte offset of the opening `<`
    pub start: usize,
    /// Byte offset just past the closing `>`
    pub end: usize,
    /// Attributes in document order, qualified keys, unescaped values
    pub attrs: Vec<(String, String)>,
    /// Unescaped text directly inside this element
    pub text: String,
}

impl XmlNode {
    /// Element name without its namespace prefix
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// Attribute value by qualified key (`idx`, `r:id`, ...)
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Attribute parsed as a number
    pub fn attr_parsed<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.attr(key).and_then(|v| v.trim().parse().ok())
    }
}

/// Flat, document-ordered index of all elements in a part
#[derive(Debug)]
pub(crate) struct XmlIndex<'a> {
    source: &'a str,
    nodes: Vec<XmlNode>,
}

impl<'a> XmlIndex<'a> {
    /// Index `source`, failing on malformed markup
    pub fn parse(source: &'a str) -> Result<Self> {
        let mut reader = Reader::from_str(source);
        reader.config_mut().trim_text(false);

        let mut nodes: Vec<XmlNode> = Vec::new();
        let mut open: Vec<usize> = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let end_of_tag = reader.buffer_position() as usize;
                    // `<` + tag content + `>`
                    let start = end_of_tag.saturating_sub(e.len() + 2);
                    nodes.push(open_node(&e, open.len(), start, end_of_tag)?);
                    open.push(nodes.len() - 1);
                }
                Event::Empty(e) => {
                    let end = reader.buffer_position() as usize;
                    // `<` + tag content + `/>`
                    let start = end.saturating_sub(e.len() + 3);
                    nodes.push(open_node(&e, open.len(), start, end)?);
                }
                Event::End(_) => {
                    let end = reader.buffer_position() as usize;
                    if let Some(i) = open.pop() {
                        nodes[i].end = end;
                    }
                }
                Event::Text(t) => {
                    if let Some(&i) = open.last() {
                        let text = t
                            .unescape()
                            .map_err(|e| DeckError::format("XML text", e.to_string()))?;
                        nodes[i].text.push_str(&text);
                    }
                }
                Event::CData(c) => {
                    if let Some(&i) = open.last() {
                        nodes[i].text.push_str(&String::from_utf8_lossy(&c));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(&i) = open.last() {
            return Err(DeckError::format(
                "XML",
                format!("element <{}> is never closed", nodes[i].name),
            ));
        }

        Ok(Self { source, nodes })
    }

    /// Whether the source holds no element at all
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node by position
    pub fn node(&self, id: usize) -> &XmlNode {
        &self.nodes[id]
    }

    /// Raw markup of a node, tags included
    pub fn raw(&self, id: usize) -> &'a str {
        let node = &self.nodes[id];
        &self.source[node.start..node.end]
    }

    /// First element in the document with the given local name
    pub fn first(&self, local: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.local_name() == local)
    }

    /// Every element with the given local name, in document order
    pub fn all<'s>(&'s self, local: &'s str) -> impl Iterator<Item = usize> + 's {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, n)| n.local_name() == local)
            .map(|(i, _)| i)
    }

    /// Direct children of `parent`, in document order
    pub fn children(&self, parent: usize) -> impl Iterator<Item = usize> + '_ {
        let depth = self.nodes[parent].depth + 1;
        self.descendant_range(parent)
            .filter(move |&i| self.nodes[i].depth == depth)
    }

    /// First direct child of `parent` with the given local name
    pub fn child(&self, parent: usize, local: &str) -> Option<usize> {
        self.children(parent)
            .find(|&i| self.nodes[i].local_name() == local)
    }

    /// All descendants of `parent`, in document order
    pub fn descendants(&self, parent: usize) -> impl Iterator<Item = usize> + '_ {
        self.descendant_range(parent)
    }

    /// First descendant of `parent` with the given local name
    pub fn descendant(&self, parent: usize, local: &str) -> Option<usize> {
        self.descendant_range(parent)
            .find(|&i| self.nodes[i].local_name() == local)
    }

    fn descendant_range(&self, parent: usize) -> std::ops::Range<usize> {
        let end = self.nodes[parent].end;
        let last = self.nodes[parent + 1..]
            .iter()
            .position(|n| n.start >= end)
            .map(|offset| parent + 1 + offset)
            .unwrap_or(self.nodes.len());
        parent + 1..last
    }
}

fn open_node(e: &BytesStart<'_>, depth: usize, start: usize, end: usize) -> Result<XmlNode> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut attrs = Vec::new();
    for attr in e.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| DeckError::format(format!("attribute {key} of <{name}>"), err.to_string()))?
            .into_owned();
        attrs.push((key, value));
    }
    Ok(XmlNode {
        name,
        depth,
        start,
        end,
        attrs,
        text: String::new(),
    })
}

/// Strip a namespace prefix
pub(crate) fn local_part(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

/// Escape XML special characters
pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
