//! # Agreement document tree
//!
//! The persisted and in-memory shape of a legal document: a header block
//! (title, location, date) followed by an ordered list of top-level nodes.
//!
//! ```text
//! DocumentStructure
//!   ├─ Section "1"
//!   │    ├─ Subsection "1.1"
//!   │    ├─ Paragraph
//!   │    └─ BulletList [items...]
//!   └─ Section "2"
//! ```
//!
//! Only sections own children, and a section's children are never sections
//! themselves. Labels are derived by [`crate::numbering`] and never set by hand.

use serde::{Deserialize, Serialize};

/// Kind of content a node carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Section,
    Subsection,
    Paragraph,
    BulletList,

    /// Tag written by a newer or foreign editor. Tolerated on read, never created.
    #[serde(other)]
    Unknown,
}

impl NodeKind {
    /// Kinds that carry a numbering label
    pub fn is_numbered(self) -> bool {
        matches!(self, NodeKind::Section | NodeKind::Subsection)
    }

    /// Kinds allowed as the direct child of a section
    pub fn is_section_child(self) -> bool {
        matches!(
            self,
            NodeKind::Subsection | NodeKind::Paragraph | NodeKind::BulletList
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Section => "section",
            NodeKind::Subsection => "subsection",
            NodeKind::Paragraph => "paragraph",
            NodeKind::BulletList => "bullet_list",
            NodeKind::Unknown => "unknown",
        }
    }
}

/// One unit of document content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentNode {
    /// Stable identifier, unique across the whole tree
    pub id: String,

    #[serde(rename = "type")]
    pub kind: NodeKind,

    /// Inline markup (plain text plus emphasis tags)
    #[serde(default)]
    pub content: String,

    /// Derived numbering ("2", "2.3"); sections and subsections only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DocumentNode>,

    /// List entries; bullet lists only, never empty while the list exists
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<String>,

    /// Indentation level for rendering (0 = top level)
    #[serde(default)]
    pub depth: u8,
}

pub const DEFAULT_SECTION_CONTENT: &str = "NEW SECTION";
pub const DEFAULT_SUBSECTION_CONTENT: &str = "Enter the text of the clause";
pub const DEFAULT_PARAGRAPH_CONTENT: &str = "Enter the paragraph text";
pub const DEFAULT_LIST_ITEM: &str = "New item";

impl DocumentNode {
    /// Build a node of `kind` with placeholder content
    pub fn placeholder(id: String, kind: NodeKind) -> Self {
        let (content, items, depth) = match kind {
            NodeKind::Section => (DEFAULT_SECTION_CONTENT, vec![], 0),
            NodeKind::Subsection => (DEFAULT_SUBSECTION_CONTENT, vec![], 1),
            NodeKind::Paragraph => (DEFAULT_PARAGRAPH_CONTENT, vec![], 1),
            NodeKind::BulletList => ("", vec![DEFAULT_LIST_ITEM.to_string()], 1),
            NodeKind::Unknown => ("", vec![], 1),
        };

        Self {
            id,
            kind,
            content: content.to_string(),
            label: None,
            children: Vec::new(),
            items,
            depth,
        }
    }

    pub fn section(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Section,
            content: content.into(),
            label: None,
            children: Vec::new(),
            items: Vec::new(),
            depth: 0,
        }
    }

    pub fn subsection(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::leaf(id, NodeKind::Subsection, content)
    }

    pub fn paragraph(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::leaf(id, NodeKind::Paragraph, content)
    }

    pub fn bullet_list<I, S>(id: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut node = Self::leaf(id, NodeKind::BulletList, "");
        node.items = items.into_iter().map(Into::into).collect();
        node
    }

    fn leaf(id: impl Into<String>, kind: NodeKind, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            content: content.into(),
            label: None,
            children: Vec::new(),
            items: Vec::new(),
            depth: 1,
        }
    }

    /// Attach children (builder style, used by fixtures and hydration)
    pub fn with_children(mut self, children: Vec<DocumentNode>) -> Self {
        self.children = children;
        self
    }

    pub fn is_section(&self) -> bool {
        self.kind == NodeKind::Section
    }

    /// Copy of this node without its children (a standalone banner)
    pub fn header_only(&self) -> Self {
        Self {
            children: Vec::new(),
            ..self.clone()
        }
    }

    /// Number of nodes in this subtree, including self
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(DocumentNode::subtree_len).sum::<usize>()
    }
}

/// Document kind, used only to pick a default title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Lease,
    Sale,
    Management,
    Service,
    Acceptance,
    Other,
}

impl DocumentKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "lease" | "rent" | "rental" => DocumentKind::Lease,
            "sale" | "purchase" => DocumentKind::Sale,
            "management" => DocumentKind::Management,
            "service" | "services" => DocumentKind::Service,
            "acceptance" | "act" => DocumentKind::Acceptance,
            _ => DocumentKind::Other,
        }
    }

    pub fn default_title(self) -> &'static str {
        match self {
            DocumentKind::Lease => "LEASE AGREEMENT",
            DocumentKind::Sale => "PURCHASE AND SALE AGREEMENT",
            DocumentKind::Management => "PROPERTY MANAGEMENT AGREEMENT",
            DocumentKind::Service => "SERVICE AGREEMENT",
            DocumentKind::Acceptance => "ACCEPTANCE CERTIFICATE",
            DocumentKind::Other => "AGREEMENT",
        }
    }
}

/// Aggregate root of one agreement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentStructure {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub location: String,

    #[serde(default)]
    pub date: String,

    #[serde(rename = "sections", default)]
    pub nodes: Vec<DocumentNode>,

    /// Highest generated id counter at save time
    ///
    /// Written when a document is persisted and consumed by hydration, so a
    /// hydrated structure always holds zero here.
    #[serde(rename = "lastId", default, skip_serializing_if = "is_zero")]
    pub last_id: u32,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

impl DocumentStructure {
    pub fn new(title: impl Into<String>, location: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            location: location.into(),
            date: date.into(),
            nodes: Vec::new(),
            last_id: 0,
        }
    }

    /// Find a node anywhere in the tree
    pub fn find_node(&self, id: &str) -> Option<&DocumentNode> {
        find_in(&self.nodes, id)
    }

    pub fn find_node_mut(&mut self, id: &str) -> Option<&mut DocumentNode> {
        find_in_mut(&mut self.nodes, id)
    }

    /// Find the section whose `children` directly contain `child_id`
    pub fn find_parent(&self, child_id: &str) -> Option<&DocumentNode> {
        find_parent_in(&self.nodes, child_id)
    }

    pub fn find_parent_mut(&mut self, child_id: &str) -> Option<&mut DocumentNode> {
        find_parent_in_mut(&mut self.nodes, child_id)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.find_node(id).is_some()
    }

    /// Every id in document order (depth-first)
    pub fn all_ids(&self) -> Vec<&str> {
        let mut ids = Vec::with_capacity(self.node_count());
        collect_ids(&self.nodes, &mut ids);
        ids
    }

    pub fn node_count(&self) -> usize {
        self.nodes.iter().map(DocumentNode::subtree_len).sum()
    }

    /// Top-level sections only
    pub fn sections(&self) -> impl Iterator<Item = &DocumentNode> {
        self.nodes.iter().filter(|n| n.is_section())
    }
}

fn find_in<'a>(nodes: &'a [DocumentNode], id: &str) -> Option<&'a DocumentNode> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_in(&node.children, id) {
            return Some(found);
        }
    }
    None
}

fn find_in_mut<'a>(nodes: &'a mut [DocumentNode], id: &str) -> Option<&'a mut DocumentNode> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_in_mut(&mut node.children, id) {
            return Some(found);
        }
    }
    None
}

fn find_parent_in<'a>(nodes: &'a [DocumentNode], child_id: &str) -> Option<&'a DocumentNode> {
    for node in nodes {
        if node.children.iter().any(|c| c.id == child_id) {
            return Some(node);
        }
        if let Some(found) = find_parent_in(&node.children, child_id) {
            return Some(found);
        }
    }
    None
}

fn find_parent_in_mut<'a>(
    nodes: &'a mut [DocumentNode],
    child_id: &str,
) -> Option<&'a mut DocumentNode> {
    for node in nodes {
        if node.children.iter().any(|c| c.id == child_id) {
            return Some(node);
        }
        if let Some(found) = find_parent_in_mut(&mut node.children, child_id) {
            return Some(found);
        }
    }
    None
}

fn collect_ids<'a>(nodes: &'a [DocumentNode], out: &mut Vec<&'a str>) {
    for node in nodes {
        out.push(&node.id);
        collect_ids(&node.children, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DocumentStructure {
        let mut doc = DocumentStructure::new("LEASE AGREEMENT", "Amsterdam", "01.02.2026");
        doc.nodes = vec![
            DocumentNode::section("s1", "SUBJECT").with_children(vec![
                DocumentNode::subsection("s1-1", "The landlord lets the premises"),
                DocumentNode::bullet_list("l1", ["keys", "meters"]),
            ]),
            DocumentNode::section("s2", "RENT"),
        ];
        doc
    }

    #[test]
    fn test_find_nested_node() {
        let doc = sample();
        assert_eq!(doc.find_node("l1").unwrap().items.len(), 2);
        assert_eq!(doc.find_parent("l1").unwrap().id, "s1");
        assert!(doc.find_parent("s1").is_none());
        assert!(doc.find_node("missing").is_none());
    }

    #[test]
    fn test_all_ids_in_document_order() {
        let doc = sample();
        assert_eq!(doc.all_ids(), vec!["s1", "s1-1", "l1", "s2"]);
        assert_eq!(doc.node_count(), 4);
    }

    #[test]
    fn test_unknown_kind_is_tolerated() {
        let node: DocumentNode =
            serde_json::from_str(r#"{"id":"x","type":"table","content":"grid"}"#).unwrap();
        assert_eq!(node.kind, NodeKind::Unknown);
        assert!(node.children.is_empty());
        assert!(node.label.is_none());
    }

    #[test]
    fn test_optional_fields_skipped_on_write() {
        let json = serde_json::to_string(&DocumentNode::paragraph("p1", "Text")).unwrap();
        assert!(!json.contains("label"));
        assert!(!json.contains("children"));
        assert!(!json.contains("items"));
        assert!(json.contains(r#""type":"paragraph""#));
    }

    #[test]
    fn test_default_titles() {
        assert_eq!(DocumentKind::from_tag("Lease").default_title(), "LEASE AGREEMENT");
        assert_eq!(DocumentKind::from_tag("act").default_title(), "ACCEPTANCE CERTIFICATE");
        assert_eq!(DocumentKind::from_tag("invoice").default_title(), "AGREEMENT");
    }
}
