//! # Post-Effect System
//!
//! Every accepted mutation is followed by effects that restore the tree
//! invariants before the result is committed:
//!
//! 1. [`DropEmptyLists`]: a bullet list whose last item was removed is
//!    deleted instead of lingering empty
//! 2. [`Renumber`]: labels are recomputed from scratch
//!
//! Effects are deterministic and idempotent; running them on an already
//! consistent tree changes nothing.

use covenant_parser::ast::{DocumentNode, DocumentStructure, NodeKind};
use covenant_parser::renumber_in_place;
use tracing::debug;

use crate::mutations::Mutation;

/// Effect run after a mutation has been applied
pub trait PostEffect: std::fmt::Debug {
    /// Repair the tree; returns true if anything changed
    fn apply(&self, mutation: &Mutation, doc: &mut DocumentStructure) -> bool;

    /// Debug name for logs
    fn name(&self) -> &'static str;
}

/// Delete bullet lists left without items
#[derive(Debug)]
pub struct DropEmptyLists;

impl PostEffect for DropEmptyLists {
    fn apply(&self, mutation: &Mutation, doc: &mut DocumentStructure) -> bool {
        // Only item removal can empty a list
        if !matches!(mutation, Mutation::RemoveListItem { .. }) {
            return false;
        }
        drop_empty_lists(&mut doc.nodes) > 0
    }

    fn name(&self) -> &'static str {
        "drop_empty_lists"
    }
}

fn drop_empty_lists(nodes: &mut Vec<DocumentNode>) -> usize {
    let before = nodes.len();
    nodes.retain(|n| !(n.kind == NodeKind::BulletList && n.items.is_empty()));
    let mut dropped = before - nodes.len();

    for node in nodes.iter_mut() {
        dropped += drop_empty_lists(&mut node.children);
    }
    dropped
}

/// Recompute every section and subsection label
#[derive(Debug)]
pub struct Renumber;

impl PostEffect for Renumber {
    fn apply(&self, _mutation: &Mutation, doc: &mut DocumentStructure) -> bool {
        let before = labels(&doc.nodes);
        renumber_in_place(&mut doc.nodes);
        labels(&doc.nodes) != before
    }

    fn name(&self) -> &'static str {
        "renumber"
    }
}

fn labels(nodes: &[DocumentNode]) -> Vec<Option<String>> {
    nodes
        .iter()
        .flat_map(|n| std::iter::once(n).chain(n.children.iter()))
        .map(|n| n.label.clone())
        .collect()
}

/// Post-effect engine that applies all registered effects in order
#[derive(Debug)]
pub struct PostEffectEngine {
    effects: Vec<Box<dyn PostEffect>>,
}

impl PostEffectEngine {
    /// Create engine with default effects
    pub fn new() -> Self {
        Self {
            effects: vec![Box::new(DropEmptyLists), Box::new(Renumber)],
        }
    }

    /// Run every effect after `mutation`; returns names of effects that changed the tree
    pub fn run(&self, mutation: &Mutation, doc: &mut DocumentStructure) -> Vec<&'static str> {
        let mut changed = Vec::new();

        for effect in &self.effects {
            if effect.apply(mutation, doc) {
                changed.push(effect.name());
            }
        }

        if !changed.is_empty() {
            debug!(mutation = mutation.name(), effects = ?changed, "Post-effects changed the tree");
        }
        changed
    }
}

impl Default for PostEffectEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> DocumentStructure {
        let mut doc = DocumentStructure::new("T", "", "");
        doc.nodes = vec![
            DocumentNode::section("a", "A"),
            DocumentNode::section("b", "B").with_children(vec![
                DocumentNode::subsection("b1", "x"),
                DocumentNode::bullet_list("empty", Vec::<String>::new()),
            ]),
        ];
        doc
    }

    #[test]
    fn test_post_effect_engine_creation() {
        let engine = PostEffectEngine::new();
        assert_eq!(engine.effects.len(), 2);
    }

    #[test]
    fn test_empty_list_dropped_after_item_removal() {
        let mut d = doc();
        let mutation = Mutation::RemoveListItem {
            node_id: "empty".to_string(),
            index: 0,
        };

        let changed = PostEffectEngine::new().run(&mutation, &mut d);
        assert_eq!(changed, vec!["drop_empty_lists", "renumber"]);
        assert!(!d.contains_id("empty"));
        assert_eq!(d.find_node("b1").unwrap().label.as_deref(), Some("2.1"));
    }

    #[test]
    fn test_effects_are_idempotent() {
        let mut d = doc();
        let mutation = Mutation::RemoveListItem {
            node_id: "empty".to_string(),
            index: 0,
        };
        let engine = PostEffectEngine::new();

        engine.run(&mutation, &mut d);
        let snapshot = d.clone();
        let changed = engine.run(&mutation, &mut d);

        assert!(changed.is_empty());
        assert_eq!(d, snapshot);
    }
}
