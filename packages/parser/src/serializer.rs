//! Persisted JSON form of an agreement structure
//!
//! This is what the persistence layer stores after every accepted edit and
//! what [`crate::hydrate`] reads back on the next load.

use crate::ast::DocumentStructure;
use crate::error::ParseResult;
use crate::parser::parse_structure;

/// Compact JSON, as written back to storage
pub fn to_json(structure: &DocumentStructure) -> String {
    // A tree of strings and integers cannot fail to serialize
    serde_json::to_string(structure).unwrap_or_default()
}

/// Indented JSON, for files meant to be read by people
pub fn to_json_pretty(structure: &DocumentStructure) -> String {
    serde_json::to_string_pretty(structure).unwrap_or_default()
}

/// Strict decode (no fallback, no normalization)
pub fn from_json(source: &str) -> ParseResult<DocumentStructure> {
    parse_structure(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::DocumentNode;
    use crate::numbering::renumber_in_place;

    #[test]
    fn test_json_round_trip_keeps_tree() {
        let mut doc = DocumentStructure::new("LEASE AGREEMENT", "Rotterdam", "05.05.2026");
        doc.nodes = vec![DocumentNode::section("s", "PARTIES").with_children(vec![
            DocumentNode::subsection("s-1", "The <b>landlord</b>"),
            DocumentNode::bullet_list("l", ["one", "two"]),
        ])];
        renumber_in_place(&mut doc.nodes);

        let restored = from_json(&to_json(&doc)).unwrap();
        assert_eq!(restored, doc);
    }

    #[test]
    fn test_json_uses_persisted_field_names() {
        let doc = DocumentStructure::new("T", "L", "D");
        let json = to_json(&doc);
        assert!(json.contains(r#""sections":[]"#));
        assert!(json.contains(r#""title":"T""#));
    }
}
