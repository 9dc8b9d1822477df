//! Error types for text conversion.

use raven_common::ErrorKind;
use thiserror::Error;

/// Errors that can occur when reading or writing JSON and XML trees.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error while writing.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON syntax error, unsupported JSON value, or JSON write failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// XML parsing or writing error.
    #[error("XML error: {0}")]
    Xml(String),

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Top-level JSON value is not an object.
    #[error("JSON document must be an object with a single root key")]
    NotAnObject,

    /// Document without exactly one root element.
    #[error("found {0} root elements, required 1")]
    RootCount(usize),

    /// Root element given as a scalar instead of an object.
    #[error("root element {name:?} must be an object")]
    ScalarRoot { name: String },

    /// XML element with text content, which XMLB cannot store.
    #[error("element <{element}> has text content {text:?}; only attributes and child elements are supported")]
    TextContent { element: String, text: String },

    /// XML element still open at end of input.
    #[error("element <{name}> is never closed")]
    UnclosedElement { name: String },

    /// Element or attribute name that XML cannot spell.
    #[error("{name:?} is not a valid XML name")]
    InvalidName { name: String },

    /// Elements nested deeper than the reader of the format accepts.
    #[error("elements nested deeper than {max} levels")]
    TooDeep { max: usize },
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) => ErrorKind::Io,
            Self::Json(e) if e.is_io() => ErrorKind::Io,
            _ => ErrorKind::Schema,
        }
    }
}

/// Result type for text conversion.
pub type Result<T> = std::result::Result<T, Error>;
