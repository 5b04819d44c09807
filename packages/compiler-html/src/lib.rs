//! # Covenant HTML
//!
//! Markup projections of an agreement:
//!
//! - [`to_markup`]: flat markup of the whole tree, stored next to the
//!   structure and handed to document generation
//! - [`compile_print`]: the paginated print view, one block per page
//!
//! Both read the same [`DocumentStructure`](covenant_parser::DocumentStructure)
//! and never modify it.

mod compiler;
mod inline;


pub use compiler::{compile_markup, compile_print, to_markup, CompileOptions};
pub use inline::sanitize_inline;
