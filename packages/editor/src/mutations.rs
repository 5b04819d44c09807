//! # Tree Mutations
//!
//! Semantic edit operations on an agreement tree.
//!
//! ## Mutation Semantics
//!
//! ### InsertNode
//! - `after_id = None, kind = Section`: append a section at the end
//! - `after_id = section, kind = Section`: new section right after it
//! - `after_id = section, kind = Subsection`: append to that section
//! - `after_id = child, kind = Paragraph | BulletList`: new sibling right
//!   after the child, inside the same section
//!
//! ### RemoveNode
//! - Removes the node wherever it is, with its whole subtree
//!
//! ### Bullet items
//! - Indices must be in range; removing the last item removes the list
//!   (see [`crate::post_effects::DropEmptyLists`])
//!
//! Every mutation validates before touching the tree, so a rejected
//! mutation leaves it exactly as it was. Labels are not maintained here;
//! renumbering runs as a post-effect.

use covenant_parser::ast::{DocumentNode, DocumentStructure, NodeKind, DEFAULT_LIST_ITEM};
use covenant_parser::{fresh_id, IdSource};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Semantic mutations (intent-preserving operations)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    /// Insert a node with placeholder content
    InsertNode {
        #[serde(default)]
        after_id: Option<String>,
        kind: NodeKind,
    },

    /// Remove a node and its subtree
    RemoveNode { node_id: String },

    /// Replace the inline content of a node (atomic, last write wins)
    UpdateContent { node_id: String, content: String },

    /// Insert a default item right after `after_index`
    AddListItem { node_id: String, after_index: usize },

    UpdateListItem {
        node_id: String,
        index: usize,
        text: String,
    },

    RemoveListItem { node_id: String, index: usize },

    /// Edit the header block; `None` fields are left as they are
    UpdateHeader {
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        location: Option<String>,
        #[serde(default)]
        date: Option<String>,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("No section contains node {0}")]
    ParentNotFound(String),

    #[error("Node {0} is not a section")]
    NotASection(String),

    #[error("Node {0} is not a bullet list")]
    NotAList(String),

    #[error("Item index {index} out of range for list {node_id} with {len} items")]
    ItemOutOfRange {
        node_id: String,
        index: usize,
        len: usize,
    },

    #[error("Only sections can be inserted at the top level, got {0:?}")]
    TopLevelNotSection(NodeKind),

    #[error("Cannot insert a {0:?} node")]
    UnsupportedKind(NodeKind),

    #[error("Header update without any field")]
    EmptyHeaderUpdate,
}

/// What an accepted mutation did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Applied {
    /// Id of the node created by [`Mutation::InsertNode`]
    pub inserted_id: Option<String>,
}

impl Mutation {
    /// Apply mutation to the tree with validation
    pub fn apply(
        &self,
        doc: &mut DocumentStructure,
        ids: &mut dyn IdSource,
    ) -> Result<Applied, MutationError> {
        // Validate first
        self.validate(doc)?;

        match self {
            Mutation::InsertNode { after_id, kind } => {
                let id = fresh_id(ids, |candidate| doc.contains_id(candidate));
                Self::apply_insert(doc, after_id.as_deref(), *kind, id.clone());
                Ok(Applied {
                    inserted_id: Some(id),
                })
            }

            Mutation::RemoveNode { node_id } => {
                remove_node(&mut doc.nodes, node_id);
                Ok(Applied::default())
            }

            Mutation::UpdateContent { node_id, content } => {
                let node = find_mut(doc, node_id)?;
                node.content = content.clone();
                Ok(Applied::default())
            }

            Mutation::AddListItem {
                node_id,
                after_index,
            } => {
                let node = find_mut(doc, node_id)?;
                node.items
                    .insert(after_index + 1, DEFAULT_LIST_ITEM.to_string());
                Ok(Applied::default())
            }

            Mutation::UpdateListItem {
                node_id,
                index,
                text,
            } => {
                let node = find_mut(doc, node_id)?;
                node.items[*index] = text.clone();
                Ok(Applied::default())
            }

            Mutation::RemoveListItem { node_id, index } => {
                let node = find_mut(doc, node_id)?;
                node.items.remove(*index);
                Ok(Applied::default())
            }

            Mutation::UpdateHeader {
                title,
                location,
                date,
            } => {
                if let Some(title) = title {
                    doc.title = title.clone();
                }
                if let Some(location) = location {
                    doc.location = location.clone();
                }
                if let Some(date) = date {
                    doc.date = date.clone();
                }
                Ok(Applied::default())
            }
        }
    }

    fn apply_insert(doc: &mut DocumentStructure, after_id: Option<&str>, kind: NodeKind, id: String) {
        let node = DocumentNode::placeholder(id, kind);

        match (kind, after_id) {
            (NodeKind::Section, None) => doc.nodes.push(node),

            (NodeKind::Section, Some(after)) => {
                if let Some(pos) = doc.nodes.iter().position(|n| n.id == after) {
                    doc.nodes.insert(pos + 1, node);
                }
            }

            (NodeKind::Subsection, Some(section_id)) => {
                if let Some(section) = doc.find_node_mut(section_id) {
                    section.children.push(node);
                }
            }

            (_, Some(sibling_id)) => {
                if let Some(parent) = doc.find_parent_mut(sibling_id) {
                    if let Some(pos) = parent.children.iter().position(|c| c.id == sibling_id) {
                        parent.children.insert(pos + 1, node);
                    }
                }
            }

            // Rejected by validate
            (_, None) => {}
        }
    }

    /// Validate without applying
    pub fn validate(&self, doc: &DocumentStructure) -> Result<(), MutationError> {
        match self {
            Mutation::InsertNode { after_id, kind } => match (*kind, after_id) {
                (NodeKind::Unknown, _) => Err(MutationError::UnsupportedKind(*kind)),

                (NodeKind::Section, None) => Ok(()),
                (kind, None) => Err(MutationError::TopLevelNotSection(kind)),

                (NodeKind::Section, Some(after)) => {
                    let node = doc
                        .nodes
                        .iter()
                        .find(|n| &n.id == after)
                        .ok_or_else(|| MutationError::NodeNotFound(after.clone()))?;
                    if node.is_section() {
                        Ok(())
                    } else {
                        Err(MutationError::NotASection(after.clone()))
                    }
                }

                (NodeKind::Subsection, Some(section_id)) => {
                    let node = doc
                        .find_node(section_id)
                        .ok_or_else(|| MutationError::NodeNotFound(section_id.clone()))?;
                    if node.is_section() {
                        Ok(())
                    } else {
                        Err(MutationError::NotASection(section_id.clone()))
                    }
                }

                (_, Some(sibling_id)) => {
                    doc.find_parent(sibling_id)
                        .filter(|parent| parent.is_section())
                        .ok_or_else(|| MutationError::ParentNotFound(sibling_id.clone()))?;
                    Ok(())
                }
            },

            Mutation::RemoveNode { node_id } | Mutation::UpdateContent { node_id, .. } => {
                doc.find_node(node_id)
                    .ok_or_else(|| MutationError::NodeNotFound(node_id.clone()))?;
                Ok(())
            }

            Mutation::AddListItem {
                node_id,
                after_index: index,
            }
            | Mutation::UpdateListItem { node_id, index, .. }
            | Mutation::RemoveListItem { node_id, index } => {
                let node = doc
                    .find_node(node_id)
                    .ok_or_else(|| MutationError::NodeNotFound(node_id.clone()))?;

                if node.kind != NodeKind::BulletList {
                    return Err(MutationError::NotAList(node_id.clone()));
                }

                if *index >= node.items.len() {
                    return Err(MutationError::ItemOutOfRange {
                        node_id: node_id.clone(),
                        index: *index,
                        len: node.items.len(),
                    });
                }

                Ok(())
            }

            Mutation::UpdateHeader {
                title,
                location,
                date,
            } => {
                if title.is_none() && location.is_none() && date.is_none() {
                    Err(MutationError::EmptyHeaderUpdate)
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::InsertNode { .. } => "insert_node",
            Mutation::RemoveNode { .. } => "remove_node",
            Mutation::UpdateContent { .. } => "update_content",
            Mutation::AddListItem { .. } => "add_list_item",
            Mutation::UpdateListItem { .. } => "update_list_item",
            Mutation::RemoveListItem { .. } => "remove_list_item",
            Mutation::UpdateHeader { .. } => "update_header",
        }
    }
}

fn find_mut<'a>(
    doc: &'a mut DocumentStructure,
    node_id: &str,
) -> Result<&'a mut DocumentNode, MutationError> {
    doc.find_node_mut(node_id)
        .ok_or_else(|| MutationError::NodeNotFound(node_id.to_string()))
}

/// Recursive filter: drop matching nodes at every level
fn remove_node(nodes: &mut Vec<DocumentNode>, node_id: &str) {
    nodes.retain(|n| n.id != node_id);
    for node in nodes.iter_mut() {
        remove_node(&mut node.children, node_id);
    }
}

/// Result of applying a mutation through a [`crate::Document`]
#[derive(Debug, Clone, PartialEq)]
pub struct MutationResult {
    /// Document version after the call
    pub version: u64,

    /// False when the mutation was ignored as a no-op
    pub applied: bool,

    pub inserted_id: Option<String>,

    /// Why the mutation was ignored, if it was
    pub rejection: Option<MutationError>,
}
