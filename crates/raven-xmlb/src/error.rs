//! Error types for XMLB encoding and decoding.

use raven_common::ErrorKind;
use thiserror::Error;

/// Errors that can occur when decoding or encoding XMLB files.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] raven_common::Error),

    /// Invalid magic number (not an XMLB file).
    #[error("invalid XMLB magic: expected 0x11B1, got {actual:#x}")]
    InvalidMagic { actual: u32 },

    /// Header version other than 1.
    #[error("unsupported XMLB version: {0} (expected 1)")]
    UnsupportedVersion(u32),

    /// Element offset that points into the header.
    #[error("element offset {offset} points inside the header")]
    ElementInHeader { offset: u32 },

    /// Link field holding a negative value other than -1.
    #[error("element at offset {element} has invalid link value {value}")]
    InvalidLink { element: u32, value: i32 },

    /// Attribute count that cannot fit in the remaining bytes.
    #[error("element at offset {element} declares {count} attributes but the file ends first")]
    TruncatedAttributes { element: u32, count: u32 },

    /// Element reached a second time while following links.
    #[error("cyclic offset chain: element at offset {offset} is linked more than once")]
    CyclicOffset { offset: u32 },

    /// Root element with a next sibling.
    #[error("multiple root elements: root links to a sibling at offset {next_sibling}")]
    MultipleRoots { next_sibling: u32 },

    /// Tree deeper than [`crate::MAX_DEPTH`].
    #[error("elements nested deeper than {max} levels")]
    TooDeep { max: usize },

    /// Encoded output would not be addressable with 32-bit offsets.
    #[error("encoded size exceeds the 32-bit offset range")]
    TooLarge,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) => ErrorKind::Io,
            Self::Common(e) => e.kind(),
            Self::TooLarge => ErrorKind::Encoding,
            _ => ErrorKind::Format,
        }
    }
}

/// Result type for XMLB operations.
pub type Result<T> = std::result::Result<T, Error>;
