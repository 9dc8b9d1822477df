//! Error types for raven-common.

use thiserror::Error;

/// Common error type for Raven operations.
#[derive(Debug, Error)]
pub enum Error {
    /// End of buffer reached while reading.
    #[error("unexpected end of buffer at offset {offset}: needed {needed} bytes but only {available} available")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// An absolute offset points past the end of the buffer.
    #[error("offset {offset} out of bounds (buffer size: {size})")]
    OffsetOutOfBounds { offset: usize, size: usize },

    /// Missing null terminator in string.
    #[error("string at offset {offset} missing null terminator")]
    MissingNullTerminator { offset: usize },

    /// Text contains characters that Windows-1252 cannot represent.
    #[error("string {text:?} cannot be represented in Windows-1252")]
    Unrepresentable { text: String },

    /// Text contains a NUL character, which would terminate the stored string early.
    #[error("string {text:?} contains a NUL character")]
    InteriorNul { text: String },
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unrepresentable { .. } | Self::InteriorNul { .. } => ErrorKind::Encoding,
            _ => ErrorKind::Format,
        }
    }
}

/// Broad classes of conversion failure.
///
/// Every error in the Raven crates maps onto one of these, which lets batch
/// reports group failures without matching on each crate's variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The binary input is malformed.
    Format,
    /// A string cannot be stored in the binary string table.
    Encoding,
    /// A text document does not describe a single valid tree.
    Schema,
    /// Reading or writing a file failed.
    Io,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Format => "format",
            Self::Encoding => "encoding",
            Self::Schema => "schema",
            Self::Io => "I/O",
        })
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
