//! # Clause numbering
//!
//! Labels are always recomputed from scratch in document order:
//! sections get `1, 2, 3…`, each section's subsections get
//! `<section>.1, <section>.2…`. Nothing is patched incrementally, so no
//! gap or duplicate can survive a deletion.

use crate::ast::{DocumentNode, NodeKind};
use crate::error::NumberingError;

/// Return a relabelled copy of `nodes`; the input is left untouched
pub fn renumber(nodes: &[DocumentNode]) -> Vec<DocumentNode> {
    let mut out = nodes.to_vec();
    renumber_in_place(&mut out);
    out
}

/// Relabel every section and subsection in place
pub fn renumber_in_place(nodes: &mut [DocumentNode]) {
    let mut section_counter = 1usize;

    for node in nodes.iter_mut() {
        if node.kind != NodeKind::Section {
            continue;
        }

        let section_label = section_counter.to_string();
        section_counter += 1;

        let mut subsection_counter = 1usize;
        for child in node.children.iter_mut() {
            if child.kind == NodeKind::Subsection {
                child.label = Some(format!("{}.{}", section_label, subsection_counter));
                subsection_counter += 1;
            }
        }

        node.label = Some(section_label);
    }
}

/// Verify that every label equals what a fresh pass would assign
pub fn check_numbering(nodes: &[DocumentNode]) -> Result<(), NumberingError> {
    let expected = renumber(nodes);
    compare(nodes, &expected)
}

fn compare(actual: &[DocumentNode], expected: &[DocumentNode]) -> Result<(), NumberingError> {
    for (a, e) in actual.iter().zip(expected) {
        if a.kind.is_numbered() && a.label != e.label {
            return Err(NumberingError::WrongLabel {
                id: a.id.clone(),
                expected: e.label.clone(),
                found: a.label.clone(),
            });
        }
        compare(&a.children, &e.children)?;
    }
    Ok(())
}
