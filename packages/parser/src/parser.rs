//! # Hydration
//!
//! Turns the record handed over by the persistence layer into a clean,
//! numbered [`DocumentStructure`]. A record may carry the structure as an
//! encoded JSON string, as an already decoded object, or not at all.
//!
//! Hydration never fails: an unreadable structure is logged and replaced by
//! the default skeleton. Whatever is read is normalized and renumbered so
//! that inconsistencies written by other tools do not leak into the editor.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ast::{
    DocumentKind, DocumentNode, DocumentStructure, NodeKind, DEFAULT_SUBSECTION_CONTENT,
};
use crate::error::{ParseError, ParseResult};
use crate::id_generator::{fresh_id, IdSource};
use crate::numbering::renumber_in_place;

/// Title of the single section every new agreement starts with
pub const DEFAULT_SECTION_TITLE: &str = "GENERAL PROVISIONS";

/// Display format of agreement dates
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Record handed over by the persistence layer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgreementRecord {
    /// Document kind tag ("lease", "sale", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(
        default,
        alias = "documentStructure",
        skip_serializing_if = "Option::is_none"
    )]
    pub structure: Option<StoredStructure>,
}

impl AgreementRecord {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            structure: None,
        }
    }

    pub fn with_structure(mut self, structure: StoredStructure) -> Self {
        self.structure = Some(structure);
        self
    }

    pub fn document_kind(&self) -> DocumentKind {
        self.kind
            .as_deref()
            .map(DocumentKind::from_tag)
            .unwrap_or(DocumentKind::Other)
    }
}

/// Persisted structure as it arrives from storage
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredStructure {
    /// JSON text that still needs decoding
    Encoded(String),
    Decoded(serde_json::Value),
}

/// Today's date in [`DATE_FORMAT`]
pub fn today() -> String {
    chrono::Local::now().format(DATE_FORMAT).to_string()
}

/// Decode a structure from JSON text
pub fn parse_structure(source: &str) -> ParseResult<DocumentStructure> {
    if source.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let value: serde_json::Value = serde_json::from_str(source)?;
    structure_from_value(value)
}

/// Decode a stored structure in either of its forms
pub fn decode(stored: &StoredStructure) -> ParseResult<DocumentStructure> {
    match stored {
        StoredStructure::Encoded(source) => parse_structure(source),
        StoredStructure::Decoded(value) => structure_from_value(value.clone()),
    }
}

fn structure_from_value(value: serde_json::Value) -> ParseResult<DocumentStructure> {
    let found = match &value {
        serde_json::Value::Object(_) => None,
        serde_json::Value::Null => Some("null"),
        serde_json::Value::Bool(_) => Some("a boolean"),
        serde_json::Value::Number(_) => Some("a number"),
        serde_json::Value::String(_) => Some("a string"),
        serde_json::Value::Array(_) => Some("an array"),
    };

    if let Some(found) = found {
        return Err(ParseError::not_an_object(found));
    }

    Ok(serde_json::from_value(value)?)
}

/// Skeleton of a new agreement: one section with one subsection
pub fn default_structure(
    kind: DocumentKind,
    date: &str,
    ids: &mut dyn IdSource,
) -> DocumentStructure {
    let mut structure = DocumentStructure::new(kind.default_title(), "", date);

    let section_id = ids.next_id();
    let subsection_id = ids.next_id();
    structure.nodes = vec![DocumentNode::section(section_id, DEFAULT_SECTION_TITLE)
        .with_children(vec![DocumentNode::subsection(
            subsection_id,
            DEFAULT_SUBSECTION_CONTENT,
        )])];

    renumber_in_place(&mut structure.nodes);
    structure
}

/// Where a hydrated structure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Decoded from the stored structure
    Stored,
    /// The record had no structure; a new skeleton was created
    Skeleton,
    /// The stored structure was unreadable and replaced by a skeleton
    Recovered,
}

/// Build the editing structure from a stored record
///
/// `date` is used only when the default skeleton has to be created.
pub fn hydrate(record: &AgreementRecord, date: &str, ids: &mut dyn IdSource) -> DocumentStructure {
    hydrate_with_origin(record, date, ids).0
}

/// Like [`hydrate`], also reporting whether the stored structure was used
pub fn hydrate_with_origin(
    record: &AgreementRecord,
    date: &str,
    ids: &mut dyn IdSource,
) -> (DocumentStructure, Origin) {
    let kind = record.document_kind();

    let mut structure = match &record.structure {
        None => {
            debug!(kind = ?kind, "No stored structure, starting from default skeleton");
            return (default_structure(kind, date, ids), Origin::Skeleton);
        }
        Some(stored) => match decode(stored) {
            Ok(structure) => structure,
            Err(err) => {
                warn!(error = %err, "Stored agreement structure is unreadable, using default skeleton");
                return (default_structure(kind, date, ids), Origin::Recovered);
            }
        },
    };

    let last_id = std::mem::take(&mut structure.last_id);
    ids.resume(last_id, &structure.all_ids());

    if structure.title.trim().is_empty() {
        structure.title = kind.default_title().to_string();
    }

    let repairs = normalize(&mut structure, ids);
    if repairs > 0 {
        debug!(repairs, "Repaired stored agreement structure");
    }

    renumber_in_place(&mut structure.nodes);
    (structure, Origin::Stored)
}

/// Repair structural inconsistencies in place, returning the number of fixes
///
/// - sections nested inside sections are lifted to follow their parent
/// - children of non-sections and grandchildren are flattened one level up
/// - `depth`, stray `label`s and stray `items` are corrected
/// - bullet lists without items are dropped
/// - empty or duplicated ids are replaced with fresh ones
pub fn normalize(structure: &mut DocumentStructure, ids: &mut dyn IdSource) -> usize {
    let taken = structure
        .all_ids()
        .into_iter()
        .map(str::to_string)
        .collect::<HashSet<_>>();

    let mut normalizer = Normalizer {
        ids,
        taken,
        seen: HashSet::new(),
        repairs: 0,
    };

    let nodes = std::mem::take(&mut structure.nodes);
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        normalizer.place_top(node, &mut out);
    }
    structure.nodes = out;

    normalizer.repairs
}

struct Normalizer<'a> {
    ids: &'a mut dyn IdSource,
    taken: HashSet<String>,
    seen: HashSet<String>,
    repairs: usize,
}

impl Normalizer<'_> {
    fn place_top(&mut self, mut node: DocumentNode, out: &mut Vec<DocumentNode>) {
        let children = std::mem::take(&mut node.children);
        if !self.repair_fields(&mut node, 0) {
            return;
        }

        if node.is_section() {
            let mut kept = Vec::with_capacity(children.len());
            let mut lifted = Vec::new();
            for child in children {
                self.place_child(child, &mut kept, &mut lifted);
            }
            node.children = kept;
            out.push(node);

            for section in lifted {
                self.place_top(section, out);
            }
        } else {
            if !children.is_empty() {
                self.repairs += 1;
            }
            out.push(node);

            for child in children {
                self.place_top(child, out);
            }
        }
    }

    fn place_child(
        &mut self,
        mut child: DocumentNode,
        kept: &mut Vec<DocumentNode>,
        lifted: &mut Vec<DocumentNode>,
    ) {
        if child.is_section() {
            self.repairs += 1;
            lifted.push(child);
            return;
        }

        let grandchildren = std::mem::take(&mut child.children);
        if !grandchildren.is_empty() {
            self.repairs += 1;
        }

        if self.repair_fields(&mut child, 1) {
            kept.push(child);
        }

        for grandchild in grandchildren {
            self.place_child(grandchild, kept, lifted);
        }
    }

    /// Fix per-node fields; returns false when the node must be dropped
    fn repair_fields(&mut self, node: &mut DocumentNode, depth: u8) -> bool {
        if node.kind == NodeKind::BulletList && node.items.is_empty() {
            self.repairs += 1;
            return false;
        }

        if node.depth != depth {
            node.depth = depth;
            self.repairs += 1;
        }

        if !node.kind.is_numbered() && node.label.is_some() {
            node.label = None;
            self.repairs += 1;
        }

        if node.kind != NodeKind::BulletList && !node.items.is_empty() {
            node.items.clear();
            self.repairs += 1;
        }

        if node.id.is_empty() || !self.seen.insert(node.id.clone()) {
            let taken = &self.taken;
            let id = fresh_id(&mut *self.ids, |candidate| taken.contains(candidate));
            self.taken.insert(id.clone());
            self.seen.insert(id.clone());
            node.id = id;
            self.repairs += 1;
        }

        true
    }
}
