//! # Covenant Editor
//!
//! Editing engine for structured agreements.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ parser: stored record → DocumentStructure   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Document lifecycle + mutations      │
//! │  - Load/save documents                      │
//! │  - Apply mutations with validation          │
//! │  - Post-effects keep numbering consistent   │
//! │  - Snapshot undo/redo                       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ layout + compiler-html: pages, markup       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The tree is the source of truth**: markup, pages and the editable
//!    view are derived from it and never edited directly
//! 2. **Stale ids are harmless**: a mutation whose target is gone is ignored
//! 3. **Labels are derived**: every accepted mutation is followed by renumbering
//!
//! ## Usage
//!
//! ```rust,ignore
//! use covenant_editor::{Document, EditSession, Mutation};
//!
//! let doc = Document::load("lease.json".into())?;
//! let mut session = EditSession::new("editor-1", doc);
//!
//! session.apply(Mutation::InsertNode { after_id: None, kind: NodeKind::Section });
//! println!("{}", session.markup());
//!
//! session.save()?;
//! ```

mod document;
mod errors;
mod mutations;
mod pipeline;
mod post_effects;
mod projection;
mod session;
mod undo_stack;

pub use document::{Document, DocumentStorage};
pub use errors::EditorError;
pub use mutations::{Applied, Mutation, MutationError, MutationResult};
pub use pipeline::{Pipeline, PipelineResult};
pub use post_effects::{DropEmptyLists, PostEffect, PostEffectEngine, Renumber};
pub use projection::{editable_view, Affordances, EditableBlock};
pub use session::EditSession;
pub use undo_stack::{MutationBatch, UndoStack};

// Re-export common types for convenience
pub use covenant_parser::ast::{DocumentNode, DocumentStructure, NodeKind};
