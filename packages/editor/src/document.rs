//! # Document Handle
//!
//! A Document owns the one mutable [`DocumentStructure`] of an editing
//! session, the id source used for new nodes, and its storage.
//!
//! - **Memory-backed**: handed over by the persistence layer, or for tests
//! - **File-backed**: JSON on disk, saved explicitly
//!
//! ## Lifecycle
//!
//! ```text
//! Record/File → Hydrate → Edit → Persist
//!      ↓           ↓        ↓        ↓
//!    JSON     Structure  Mutations  JSON
//! ```
//!
//! Mutations that cannot be applied are no-ops: the tree and the version
//! stay as they were and the reason is logged.

use std::path::{Path, PathBuf};

use covenant_parser::{
    check_numbering, hydrate_with_origin, to_json, to_json_pretty, today, AgreementRecord,
    DocumentStructure, IDGenerator, Origin, StoredStructure,
};
use tracing::debug;

use crate::post_effects::PostEffectEngine;
use crate::{EditorError, Mutation, MutationResult};

/// Editable agreement document
#[derive(Debug)]
pub struct Document {
    /// Current version number (increments on each accepted change)
    pub version: u64,

    /// Document kind tag, kept for the persisted record
    kind: Option<String>,

    structure: DocumentStructure,
    origin: Origin,
    ids: IDGenerator,
    effects: PostEffectEngine,

    /// Backing storage strategy
    storage: DocumentStorage,
}

/// Storage backend for document
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentStorage {
    /// In-memory only; persistence is the caller's job
    Memory,

    /// JSON file on disk
    File { path: PathBuf, dirty: bool },
}

impl Document {
    /// Hydrate from a stored record (memory-backed)
    ///
    /// `reference` seeds the id generator and should identify the agreement.
    pub fn from_record(record: &AgreementRecord, reference: &str) -> Self {
        let mut ids = IDGenerator::new(reference);
        let (structure, origin) = hydrate_with_origin(record, &today(), &mut ids);

        Self {
            version: 0,
            kind: record.kind.clone(),
            structure,
            origin,
            ids,
            effects: PostEffectEngine::new(),
            storage: DocumentStorage::Memory,
        }
    }

    /// Load document from a JSON file (file-backed)
    ///
    /// Unreadable content falls back to the default skeleton and
    /// [`Document::is_recovered`] reports it; only IO errors fail.
    pub fn load(path: PathBuf) -> Result<Self, EditorError> {
        let source = std::fs::read_to_string(&path)?;
        let record = AgreementRecord {
            kind: None,
            structure: Some(StoredStructure::Encoded(source)),
        };

        let mut doc = Self::from_record(&record, &path.display().to_string());
        doc.storage = DocumentStorage::File { path, dirty: false };
        Ok(doc)
    }

    /// Create a new file-backed document with the default skeleton for `kind`
    pub fn create(path: PathBuf, kind: &str) -> Self {
        let record = AgreementRecord::new(kind);
        let mut doc = Self::from_record(&record, &path.display().to_string());
        doc.storage = DocumentStorage::File { path, dirty: true };
        doc
    }

    pub fn structure(&self) -> &DocumentStructure {
        &self.structure
    }

    pub fn storage(&self) -> &DocumentStorage {
        &self.storage
    }

    /// True when the stored structure was unreadable and replaced by a skeleton
    ///
    /// Saving such a document over its source discards whatever was stored.
    pub fn is_recovered(&self) -> bool {
        self.origin == Origin::Recovered
    }

    /// Apply a mutation; unresolvable mutations are ignored
    pub fn apply(&mut self, mutation: Mutation) -> MutationResult {
        match mutation.apply(&mut self.structure, &mut self.ids) {
            Ok(applied) => {
                self.effects.run(&mutation, &mut self.structure);
                debug_assert!(check_numbering(&self.structure.nodes).is_ok());
                self.touch();

                MutationResult {
                    version: self.version,
                    applied: true,
                    inserted_id: applied.inserted_id,
                    rejection: None,
                }
            }
            Err(err) => {
                debug!(mutation = mutation.name(), reason = %err, "Ignoring mutation");

                MutationResult {
                    version: self.version,
                    applied: false,
                    inserted_id: None,
                    rejection: Some(err),
                }
            }
        }
    }

    /// Like [`Document::apply`], but a rejected mutation is an error
    pub fn try_apply(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        let result = self.apply(mutation);
        match result.rejection {
            Some(err) => Err(err.into()),
            None => Ok(result),
        }
    }

    /// Replace the whole structure (undo/redo)
    pub fn restore(&mut self, structure: DocumentStructure) {
        self.structure = structure;
        self.touch();
    }

    fn touch(&mut self) {
        self.version += 1;
        if let DocumentStorage::File { dirty, .. } = &mut self.storage {
            *dirty = true;
        }
    }

    /// Check if document has unsaved changes
    pub fn is_dirty(&self) -> bool {
        match &self.storage {
            DocumentStorage::File { dirty, .. } => *dirty,
            DocumentStorage::Memory => false,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.storage {
            DocumentStorage::File { path, .. } => Some(path),
            DocumentStorage::Memory => None,
        }
    }

    /// Save document to disk (if file-backed)
    pub fn save(&mut self) -> Result<(), EditorError> {
        let persisted = self.persisted();
        match &mut self.storage {
            DocumentStorage::File { path, dirty } => {
                std::fs::write(&*path, to_json_pretty(&persisted))?;
                *dirty = false;
                Ok(())
            }
            DocumentStorage::Memory => Err(EditorError::NotFileBacked),
        }
    }

    /// Switch to file-backed storage at `path` and save
    pub fn save_as(&mut self, path: PathBuf) -> Result<(), EditorError> {
        self.storage = DocumentStorage::File { path, dirty: true };
        self.save()
    }

    /// Persisted JSON form
    pub fn to_json(&self) -> String {
        to_json(&self.persisted())
    }

    pub fn to_json_pretty(&self) -> String {
        to_json_pretty(&self.persisted())
    }

    /// Structure as stored, carrying the id counter so reloads never reuse ids
    fn persisted(&self) -> DocumentStructure {
        let mut structure = self.structure.clone();
        structure.last_id = self.ids.count();
        structure
    }

    /// Record for the persistence layer
    pub fn to_record(&self) -> AgreementRecord {
        AgreementRecord {
            kind: self.kind.clone(),
            structure: Some(StoredStructure::Encoded(self.to_json())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use covenant_parser::NodeKind;

    #[test]
    fn test_create_memory_document() {
        let doc = Document::from_record(&AgreementRecord::new("lease"), "lease-1");

        assert_eq!(doc.version, 0);
        assert!(!doc.is_dirty());
        assert_eq!(doc.structure().title, "LEASE AGREEMENT");
        assert!(doc.path().is_none());
    }

    #[test]
    fn test_document_version_increments_only_when_applied() {
        let mut doc = Document::from_record(&AgreementRecord::new("lease"), "lease-1");

        let ignored = doc.apply(Mutation::UpdateContent {
            node_id: "missing".to_string(),
            content: "Hello".to_string(),
        });
        assert!(!ignored.applied);
        assert_eq!(doc.version, 0);

        let accepted = doc.apply(Mutation::InsertNode {
            after_id: None,
            kind: NodeKind::Section,
        });
        assert!(accepted.applied);
        assert_eq!(doc.version, 1);
        assert!(accepted.inserted_id.is_some());
    }

    #[test]
    fn test_try_apply_reports_rejection() {
        let mut doc = Document::from_record(&AgreementRecord::new("lease"), "lease-1");
        let err = doc
            .try_apply(Mutation::RemoveNode {
                node_id: "missing".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, EditorError::Mutation(_)));
    }

    #[test]
    fn test_memory_document_cannot_save() {
        let mut doc = Document::from_record(&AgreementRecord::new("lease"), "lease-1");
        assert!(matches!(doc.save(), Err(EditorError::NotFileBacked)));
    }

    #[test]
    fn test_record_round_trip() {
        let mut doc = Document::from_record(&AgreementRecord::new("service"), "svc-1");
        doc.apply(Mutation::InsertNode {
            after_id: None,
            kind: NodeKind::Section,
        });

        let restored = Document::from_record(&doc.to_record(), "svc-1");
        assert_eq!(restored.structure(), doc.structure());
        assert!(!restored.is_recovered());
    }

    #[test]
    fn test_removed_ids_are_not_reissued_after_reload() {
        let mut doc = Document::from_record(&AgreementRecord::new("lease"), "lease-1");
        let removed = doc
            .apply(Mutation::InsertNode {
                after_id: None,
                kind: NodeKind::Section,
            })
            .inserted_id
            .unwrap();
        doc.apply(Mutation::RemoveNode {
            node_id: removed.clone(),
        });

        let mut reloaded = Document::from_record(&doc.to_record(), "lease-1");
        let inserted = reloaded
            .apply(Mutation::InsertNode {
                after_id: None,
                kind: NodeKind::Section,
            })
            .inserted_id
            .unwrap();

        assert_ne!(inserted, removed);
    }
}
