//! Relationship parts (`_rels/*.rels`) of a presentation package.
//!
//! Every part that points at another part (presentation → slides, slide →
//! layout, master → layouts) does so through a relationship ID. This module
//! parses, edits and re-serializes those files while keeping their order.

use std::collections::HashMap;

use crate::constants::NS_PACKAGE_RELATIONSHIPS;
use crate::error::Result;
use crate::xml::{escape_xml, XmlIndex};

/// A relationship target with its type and mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipTarget {
    /// The target path (relative to the source part) or URL
    pub target: String,
    /// The relationship type URI
    pub rel_type: String,
    /// Target mode: "External" for URLs, None for internal parts
    pub target_mode: Option<String>,
}

impl RelationshipTarget {
    /// Whether the relationship type ends with the given short name
    /// (e.g. `slideLayout`, `notesSlide`)
    pub fn is_type(&self, short: &str) -> bool {
        self.rel_type.rsplit('/').next() == Some(short)
    }

    /// Whether this points outside the package
    pub fn is_external(&self) -> bool {
        self.target_mode.as_deref() == Some("External")
    }
}

/// Parsed relationships of one part
///
/// Maintains insertion order for deterministic XML serialization.
#[derive(Debug, Clone)]
pub struct Relationships {
    order: Vec<String>,
    map: HashMap<String, RelationshipTarget>,
    next_id_counter: u32,
}

impl Default for Relationships {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            map: HashMap::new(),
            next_id_counter: 1,
        }
    }
}

impl Relationships {
    /// Create an empty relationship set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse relationships from XML text
    pub fn parse(xml: &str) -> Result<Self> {
        let index = XmlIndex::parse(xml)?;
        let mut rels = Self::default();
        let mut max_id = 0;

        for i in index.all("Relationship") {
            let node = index.node(i);
            let (Some(id), Some(target)) = (node.attr("Id"), node.attr("Target")) else {
                continue;
            };
            if let Some(num) = extract_id_number(id) {
                max_id = max_id.max(num);
            }
            rels.order.push(id.to_string());
            rels.map.insert(
                id.to_string(),
                RelationshipTarget {
                    target: target.to_string(),
                    rel_type: node.attr("Type").unwrap_or_default().to_string(),
                    target_mode: node.attr("TargetMode").map(str::to_string),
                },
            );
        }

        rels.next_id_counter = max_id + 1;
        Ok(rels)
    }

    /// Add a new internal relationship and return the generated ID
    pub fn add(&mut self, target: impl Into<String>, rel_type: impl Into<String>) -> String {
        let mut id = format!("rId{}", self.next_id_counter);
        while self.map.contains_key(&id) {
            self.next_id_counter += 1;
            id = format!("rId{}", self.next_id_counter);
        }
        self.next_id_counter += 1;

        self.order.push(id.clone());
        self.map.insert(
            id.clone(),
            RelationshipTarget {
                target: target.into(),
                rel_type: rel_type.into(),
                target_mode: None,
            },
        );
        id
    }

    /// Insert a relationship under an existing ID, replacing any previous one
    pub fn insert(&mut self, id: impl Into<String>, rel: RelationshipTarget) {
        let id = id.into();
        if let Some(num) = extract_id_number(&id) {
            self.next_id_counter = self.next_id_counter.max(num + 1);
        }
        if !self.map.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.map.insert(id, rel);
    }

    /// Remove a relationship, returning its target
    pub fn remove(&mut self, id: &str) -> Option<RelationshipTarget> {
        let removed = self.map.remove(id)?;
        self.order.retain(|existing| existing != id);
        Some(removed)
    }

    /// Serialize to a `.rels` document
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(
            r#"<Relationships xmlns="{}">"#,
            NS_PACKAGE_RELATIONSHIPS
        ));

        for (id, rel) in self.iter() {
            xml.push_str("<Relationship");
            xml.push_str(&format!(r#" Id="{}""#, escape_xml(id)));
            xml.push_str(&format!(r#" Type="{}""#, escape_xml(&rel.rel_type)));
            xml.push_str(&format!(r#" Target="{}""#, escape_xml(&rel.target)));
            if let Some(mode) = &rel.target_mode {
                xml.push_str(&format!(r#" TargetMode="{}""#, escape_xml(mode)));
            }
            xml.push_str("/>");
        }

        xml.push_str("</Relationships>");
        xml
    }

    /// Get the full relationship for an ID
    pub fn get(&self, id: &str) -> Option<&RelationshipTarget> {
        self.map.get(id)
    }

    /// First relationship of the given short type name
    pub fn find_by_type(&self, short: &str) -> Option<(&str, &RelationshipTarget)> {
        self.iter().find(|(_, rel)| rel.is_type(short))
    }

    /// Get the number of relationships
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if there are no relationships
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate over relationships in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RelationshipTarget)> {
        self.order
            .iter()
            .filter_map(|id| self.map.get(id).map(|rel| (id.as_str(), rel)))
    }
}

/// Extract the numeric portion from a relationship ID (e.g., "rId5" -> 5)
fn extract_id_number(id: &str) -> Option<u32> {
    id.strip_prefix("rId")
        .or_else(|| id.strip_prefix("RId"))
        .or_else(|| id.strip_prefix("rid"))
        .and_then(|num_str| num_str.parse().ok())
}
