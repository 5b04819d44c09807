use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid JSON at line {line}, column {column}: {message}")]
    InvalidJson {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Stored structure must be a JSON object, found {found}")]
    NotAnObject { found: String },

    #[error("Stored structure is empty")]
    Empty,
}

impl ParseError {
    pub fn not_an_object(found: impl Into<String>) -> Self {
        Self::NotAnObject {
            found: found.into(),
        }
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidJson {
            line: e.line(),
            column: e.column(),
            message: e.to_string(),
        }
    }
}

/// Raised when labels do not match a fresh renumbering pass
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumberingError {
    #[error("Node {id} has label {found:?}, expected {expected:?}")]
    WrongLabel {
        id: String,
        expected: Option<String>,
        found: Option<String>,
    },
}
