//! # Editing Pipeline
//!
//! Coordinates the document lifecycle: Mutate → Renumber → Serialize → Paginate
//!
//! The Pipeline manages:
//! - Applying mutations
//! - Re-deriving the markup string after every accepted change
//! - Re-paginating, unless the session is in edit mode
//! - Caching both per document version

use covenant_compiler_html::to_markup;
use covenant_layout::{HeightEstimator, HeuristicEstimator, Page, PageGeometry, Paginator};
use tracing::debug;

use crate::{Document, Mutation, MutationResult};

/// Manages the edit → render pipeline
#[derive(Debug)]
pub struct Pipeline<E = HeuristicEstimator> {
    document: Document,
    paginator: Paginator<E>,

    /// While editing, pagination is deferred until edit mode is left
    edit_mode: bool,

    markup: Option<Derived<String>>,
    pages: Option<Derived<Vec<Page>>>,
}

#[derive(Debug, Clone)]
struct Derived<T> {
    version: u64,
    value: T,
}

impl Pipeline<HeuristicEstimator> {
    /// Create pipeline for document with the default estimator and geometry
    pub fn new(document: Document) -> Self {
        Self::with_paginator(document, Paginator::new(PageGeometry::default()))
    }
}

impl<E: HeightEstimator> Pipeline<E> {
    pub fn with_paginator(document: Document, paginator: Paginator<E>) -> Self {
        let mut pipeline = Self {
            document,
            paginator,
            edit_mode: false,
            markup: None,
            pages: None,
        };
        pipeline.full_evaluate();
        pipeline
    }

    /// Apply mutation and re-derive the projections
    pub fn apply_mutation(&mut self, mutation: Mutation) -> PipelineResult {
        let mutation = self.document.apply(mutation);
        self.refresh();
        self.result(mutation)
    }

    /// Re-derive whatever is stale for the current version
    pub fn refresh(&mut self) {
        let version = self.document.version;

        if self.markup.as_ref().map(|m| m.version) != Some(version) {
            self.markup = Some(Derived {
                version,
                value: to_markup(self.document.structure()),
            });
        }

        if !self.edit_mode && self.pages.as_ref().map(|p| p.version) != Some(version) {
            let pages = self.paginator.paginate(&self.document.structure().nodes);
            debug!(version, pages = pages.len(), "Re-paginated document");
            self.pages = Some(Derived {
                version,
                value: pages,
            });
        }
    }

    /// Drop caches and derive everything again
    pub fn full_evaluate(&mut self) {
        self.clear_cache();
        self.refresh();
    }

    pub fn set_edit_mode(&mut self, edit_mode: bool) {
        self.edit_mode = edit_mode;
        if !edit_mode {
            self.refresh();
        }
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    /// Markup for the current version
    pub fn markup(&self) -> &str {
        self.markup.as_ref().map(|m| m.value.as_str()).unwrap_or("")
    }

    /// Pages for the current version; `None` while stale (edit mode)
    pub fn pages(&self) -> Option<&[Page]> {
        self.pages
            .as_ref()
            .filter(|p| p.version == self.document.version)
            .map(|p| p.value.as_slice())
    }

    /// Paginate the current version regardless of edit mode
    pub fn paginate_now(&self) -> Vec<Page> {
        self.paginator.paginate(&self.document.structure().nodes)
    }

    pub fn paginator(&self) -> &Paginator<E> {
        &self.paginator
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access; call [`Pipeline::refresh`] after changing the document
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Clear derived caches (force full re-render on next refresh)
    pub fn clear_cache(&mut self) {
        self.markup = None;
        self.pages = None;
    }

    fn result(&self, mutation: MutationResult) -> PipelineResult {
        PipelineResult {
            version: self.document.version,
            mutation,
            markup: self.markup().to_string(),
            pages: self.pages().map(<[Page]>::to_vec),
        }
    }
}

/// Result of pipeline execution
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Document version after the mutation
    pub version: u64,

    pub mutation: MutationResult,

    /// Markup projection of the new version
    pub markup: String,

    /// Pages of the new version (`None` in edit mode)
    pub pages: Option<Vec<Page>>,
}
