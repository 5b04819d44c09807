//! # Undo/Redo Stack
//!
//! Tracks mutation history and enables undo/redo operations.
//!
//! ## Design
//!
//! - Each batch records the structure before and after it ran
//! - Undo restores the `before` snapshot and moves the batch to redo
//! - Redo restores the `after` snapshot
//! - New mutations clear the redo stack
//! - Mutations that were ignored are not recorded
//!
//! Snapshots keep undo exact even when post-effects (renumbering, empty
//! list removal) changed more than the mutation itself touched.
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//! let mut doc = Document::from_record(&AgreementRecord::new("lease"), "lease-1");
//!
//! stack.apply(mutation, &mut doc);
//! stack.undo(&mut doc);
//! stack.redo(&mut doc);
//! ```

use covenant_parser::DocumentStructure;

use crate::{Document, Mutation, MutationResult};

/// A group of mutations that should be undone/redone together
#[derive(Debug, Clone)]
pub struct MutationBatch {
    /// The mutations in this batch (in application order)
    pub mutations: Vec<Mutation>,

    /// Structure before the first mutation
    pub before: DocumentStructure,

    /// Structure after the last mutation
    pub after: DocumentStructure,

    /// Optional description of this batch
    pub description: Option<String>,
}

impl MutationBatch {
    fn open(before: DocumentStructure) -> Self {
        Self {
            mutations: Vec::new(),
            after: before.clone(),
            before,
            description: None,
        }
    }

    /// Add a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Undo/redo stack for document editing
#[derive(Debug)]
pub struct UndoStack {
    /// Stack of applied batches (most recent last)
    undo_stack: Vec<MutationBatch>,

    /// Stack of undone batches (most recent last)
    redo_stack: Vec<MutationBatch>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// Currently building a batch
    current_batch: Option<MutationBatch>,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    /// Create an undo stack with custom max levels
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            current_batch: None,
        }
    }

    /// Apply a mutation and record it for undo
    pub fn apply(&mut self, mutation: Mutation, doc: &mut Document) -> MutationResult {
        let before = doc.structure().clone();
        let result = doc.apply(mutation.clone());

        if !result.applied {
            return result;
        }

        if let Some(batch) = &mut self.current_batch {
            batch.mutations.push(mutation);
            batch.after = doc.structure().clone();
        } else {
            let mut batch = MutationBatch::open(before);
            batch.mutations.push(mutation);
            batch.after = doc.structure().clone();
            self.push_batch(batch);
        }

        result
    }

    /// Start a batch of mutations (will be undone/redone together)
    pub fn begin_batch(&mut self, doc: &Document) {
        self.current_batch = Some(MutationBatch::open(doc.structure().clone()));
    }

    /// End the current batch and push to undo stack
    pub fn end_batch(&mut self) {
        if let Some(batch) = self.current_batch.take() {
            if !batch.mutations.is_empty() {
                self.push_batch(batch);
            }
        }
    }

    /// Set description for current batch (if batching)
    pub fn set_batch_description(&mut self, description: impl Into<String>) {
        if let Some(batch) = &mut self.current_batch {
            batch.description = Some(description.into());
        }
    }

    pub fn is_batching(&self) -> bool {
        self.current_batch.is_some()
    }

    fn push_batch(&mut self, batch: MutationBatch) {
        self.undo_stack.push(batch);

        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        // New action invalidates future
        self.redo_stack.clear();
    }

    /// Undo the most recent batch; returns false if there was nothing to undo
    pub fn undo(&mut self, doc: &mut Document) -> bool {
        // An open batch is closed first so it can be undone as a unit
        self.end_batch();

        match self.undo_stack.pop() {
            Some(batch) => {
                doc.restore(batch.before.clone());
                self.redo_stack.push(batch);
                true
            }
            None => false,
        }
    }

    /// Redo the most recently undone batch
    pub fn redo(&mut self, doc: &mut Document) -> bool {
        match self.redo_stack.pop() {
            Some(batch) => {
                doc.restore(batch.after.clone());
                self.undo_stack.push(batch);
                true
            }
            None => false,
        }
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch = None;
    }

    /// Get description of the next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }

    /// Get description of the next redo operation
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use covenant_parser::{AgreementRecord, NodeKind};

    fn lease() -> Document {
        Document::from_record(&AgreementRecord::new("lease"), "lease-1")
    }

    fn first_section_id(doc: &Document) -> String {
        doc.structure().nodes[0].id.clone()
    }

    #[test]
    fn test_undo_stack_creation() {
        let stack = UndoStack::new();
        assert_eq!(stack.undo_levels(), 0);
        assert_eq!(stack.redo_levels(), 0);
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_apply_and_undo_content_mutation() {
        let mut doc = lease();
        let mut stack = UndoStack::new();
        let section_id = first_section_id(&doc);
        let original = doc.structure().clone();

        stack.apply(
            Mutation::UpdateContent {
                node_id: section_id.clone(),
                content: "RENT".to_string(),
            },
            &mut doc,
        );
        assert_eq!(stack.undo_levels(), 1);

        assert!(stack.undo(&mut doc));
        assert_eq!(doc.structure(), &original);
        assert!(stack.can_redo());

        assert!(stack.redo(&mut doc));
        assert_eq!(doc.structure().nodes[0].content, "RENT");
        assert_eq!(stack.redo_levels(), 0);
    }

    #[test]
    fn test_undo_restores_labels_changed_by_renumbering() {
        let mut doc = lease();
        let mut stack = UndoStack::new();
        let original = doc.structure().clone();

        // The new section is also labelled by renumbering
        let first = first_section_id(&doc);
        stack.apply(
            Mutation::InsertNode {
                after_id: Some(first),
                kind: NodeKind::Section,
            },
            &mut doc,
        );
        assert_ne!(doc.structure(), &original);

        stack.undo(&mut doc);
        assert_eq!(doc.structure(), &original);
    }

    #[test]
    fn test_ignored_mutations_are_not_recorded() {
        let mut doc = lease();
        let mut stack = UndoStack::new();

        let result = stack.apply(
            Mutation::RemoveNode {
                node_id: "missing".to_string(),
            },
            &mut doc,
        );

        assert!(!result.applied);
        assert!(!stack.can_undo());
    }

    #[test]
    fn test_batched_mutations() {
        let mut doc = lease();
        let mut stack = UndoStack::new();
        let section_id = first_section_id(&doc);
        let original = doc.structure().clone();

        stack.begin_batch(&doc);
        stack.set_batch_description("Rename section");
        for content in ["PREMISES", "THE PREMISES"] {
            stack.apply(
                Mutation::UpdateContent {
                    node_id: section_id.clone(),
                    content: content.to_string(),
                },
                &mut doc,
            );
        }
        stack.end_batch();

        assert_eq!(stack.undo_levels(), 1);
        assert_eq!(stack.undo_description(), Some("Rename section"));

        stack.undo(&mut doc);
        assert_eq!(doc.structure(), &original);
    }

    #[test]
    fn test_new_mutation_clears_redo() {
        let mut doc = lease();
        let mut stack = UndoStack::new();
        let section_id = first_section_id(&doc);

        let rename = |content: &str| Mutation::UpdateContent {
            node_id: section_id.clone(),
            content: content.to_string(),
        };

        stack.apply(rename("A"), &mut doc);
        stack.undo(&mut doc);
        assert_eq!(stack.redo_levels(), 1);

        stack.apply(rename("B"), &mut doc);
        assert_eq!(stack.redo_levels(), 0);
    }

    #[test]
    fn test_max_levels_enforced() {
        let mut doc = lease();
        let mut stack = UndoStack::with_max_levels(2);
        let section_id = first_section_id(&doc);

        for i in 0..3 {
            stack.apply(
                Mutation::UpdateContent {
                    node_id: section_id.clone(),
                    content: format!("Section {}", i),
                },
                &mut doc,
            );
        }

        assert_eq!(stack.undo_levels(), 2);
    }
}
