pub mod ast;
pub mod error;
pub mod id_generator;
pub mod numbering;
pub mod parser;
pub mod serializer;

pub use ast::{DocumentKind, DocumentNode, DocumentStructure, NodeKind};
pub use error::{NumberingError, ParseError, ParseResult};
pub use id_generator::{fresh_id, IDGenerator, IdSource};
pub use numbering::{check_numbering, renumber, renumber_in_place};
pub use parser::{
    decode, default_structure, hydrate, hydrate_with_origin, normalize, parse_structure, today,
    AgreementRecord, Origin, StoredStructure,
};
pub use serializer::{from_json, to_json, to_json_pretty};
