//! # Edit Session Management
//!
//! An EditSession is the single editor's view of one agreement: the
//! document, its undo history and the derived projections.
//!
//! Every accepted mutation is followed synchronously by renumbering,
//! re-serialization and (outside edit mode) re-pagination.

use covenant_compiler_html::{compile_print, CompileOptions};
use covenant_layout::{HeightEstimator, HeuristicEstimator, Page};
use tracing::{debug, info};

use crate::projection::{editable_view, EditableBlock};
use crate::{Document, EditorError, Mutation, MutationResult, Pipeline, UndoStack};

/// Single-editor session
#[derive(Debug)]
pub struct EditSession<E = HeuristicEstimator> {
    /// Unique session identifier
    pub id: String,

    pipeline: Pipeline<E>,
    history: UndoStack,
}

impl EditSession<HeuristicEstimator> {
    /// Create new edit session with the default estimator and geometry
    pub fn new(id: impl Into<String>, document: Document) -> Self {
        Self::with_pipeline(id, Pipeline::new(document))
    }
}

impl<E: HeightEstimator> EditSession<E> {
    pub fn with_pipeline(id: impl Into<String>, pipeline: Pipeline<E>) -> Self {
        Self {
            id: id.into(),
            pipeline,
            history: UndoStack::new(),
        }
    }

    /// Apply one mutation; ignored mutations leave the session untouched
    pub fn apply(&mut self, mutation: Mutation) -> MutationResult {
        let result = self.history.apply(mutation, self.pipeline.document_mut());
        if result.applied {
            self.pipeline.refresh();
        }
        result
    }

    /// Apply several mutations as one undo step
    pub fn apply_batch(
        &mut self,
        mutations: impl IntoIterator<Item = Mutation>,
        description: impl Into<String>,
    ) -> Vec<MutationResult> {
        self.history.begin_batch(self.pipeline.document());
        self.history.set_batch_description(description);

        let results: Vec<_> = mutations
            .into_iter()
            .map(|mutation| self.history.apply(mutation, self.pipeline.document_mut()))
            .collect();

        self.history.end_batch();
        self.pipeline.refresh();

        debug!(
            session = %self.id,
            applied = results.iter().filter(|r| r.applied).count(),
            total = results.len(),
            "Applied mutation batch"
        );
        results
    }

    pub fn undo(&mut self) -> bool {
        let undone = self.history.undo(self.pipeline.document_mut());
        if undone {
            self.pipeline.refresh();
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.history.redo(self.pipeline.document_mut());
        if redone {
            self.pipeline.refresh();
        }
        redone
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Enter or leave edit mode; leaving it re-paginates
    pub fn set_edit_mode(&mut self, edit_mode: bool) {
        self.pipeline.set_edit_mode(edit_mode);
    }

    pub fn document(&self) -> &Document {
        self.pipeline.document()
    }

    pub fn markup(&self) -> &str {
        self.pipeline.markup()
    }

    /// Current pages, `None` while in edit mode
    pub fn pages(&self) -> Option<&[Page]> {
        self.pipeline.pages()
    }

    /// Interactive projection of the current tree
    pub fn editable_view(&self) -> Vec<EditableBlock> {
        editable_view(self.document().structure())
    }

    /// Print projection; paginates on demand in edit mode
    pub fn print_html(&self, options: &CompileOptions) -> String {
        let structure = self.document().structure();
        match self.pipeline.pages() {
            Some(pages) => compile_print(structure, pages, options),
            None => compile_print(structure, &self.pipeline.paginate_now(), options),
        }
    }

    /// Save the document if it is file-backed
    pub fn save(&mut self) -> Result<(), EditorError> {
        self.pipeline.document_mut().save()?;
        info!(session = %self.id, version = self.document().version, "Saved agreement");
        Ok(())
    }
}
