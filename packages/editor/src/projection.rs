//! Editable projection of the document tree
//!
//! Derived on demand from the same [`DocumentStructure`] the print
//! projection reads, so both views always show the same content.

use covenant_parser::ast::{DocumentNode, DocumentStructure, NodeKind};
use serde::Serialize;

/// Editing controls a block offers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Affordances {
    pub can_edit_content: bool,
    pub can_remove: bool,
    /// Sections only
    pub can_add_subsection: bool,
    /// Paragraph/list may follow this block inside its section
    pub can_insert_sibling: bool,
    pub can_add_item: bool,
    /// Only while a list has more than one item
    pub can_remove_item: bool,
}

/// One row of the editable view, in document order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditableBlock {
    pub id: String,
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<String>,
    /// 0 for top-level blocks, 1 inside a section
    pub depth: u8,
    pub affordances: Affordances,
}

/// Flatten the tree into editable blocks, depth-first
pub fn editable_view(structure: &DocumentStructure) -> Vec<EditableBlock> {
    let mut blocks = Vec::with_capacity(structure.node_count());
    for node in &structure.nodes {
        push_blocks(node, None, 0, &mut blocks);
    }
    blocks
}

fn push_blocks(
    node: &DocumentNode,
    parent: Option<&DocumentNode>,
    depth: u8,
    out: &mut Vec<EditableBlock>,
) {
    out.push(EditableBlock {
        id: node.id.clone(),
        kind: node.kind,
        label: node.label.clone(),
        content: node.content.clone(),
        items: node.items.clone(),
        depth,
        affordances: affordances(node, parent),
    });

    for child in &node.children {
        push_blocks(child, Some(node), depth.saturating_add(1), out);
    }
}

fn affordances(node: &DocumentNode, parent: Option<&DocumentNode>) -> Affordances {
    let in_section = parent.map_or(false, DocumentNode::is_section);
    let is_list = node.kind == NodeKind::BulletList;

    Affordances {
        can_edit_content: !is_list,
        can_remove: true,
        can_add_subsection: node.is_section(),
        can_insert_sibling: in_section,
        can_add_item: is_list && !node.items.is_empty(),
        can_remove_item: is_list && node.items.len() > 1,
    }
}
