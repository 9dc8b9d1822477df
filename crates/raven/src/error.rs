//! Error types for file conversion.

use std::path::{Path, PathBuf};

use raven_common::ErrorKind;
use thiserror::Error;

/// Errors that can occur when converting files.
///
/// Every variant tied to a file carries that file's path.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading, writing or renaming a file failed.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The binary file is malformed, or the tree cannot be encoded.
    #[error("{}: {source}", path.display())]
    Xmlb {
        path: PathBuf,
        source: raven_xmlb::Error,
    },

    /// The text file does not describe a single valid tree.
    #[error("{}: {source}", path.display())]
    Text {
        path: PathBuf,
        source: raven_text::Error,
    },

    /// Invalid input glob pattern.
    #[error("invalid pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },

    /// Input pattern that matches no files.
    #[error("no files match {0:?}")]
    NoMatches(String),
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Xmlb { source, .. } => source.kind(),
            Self::Text { source, .. } => source.kind(),
            Self::Io { .. } | Self::Pattern { .. } | Self::NoMatches(_) => ErrorKind::Io,
        }
    }

    /// The file this error is attributed to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Io { path, .. } | Self::Xmlb { path, .. } | Self::Text { path, .. } => Some(path),
            Self::Pattern { .. } | Self::NoMatches(_) => None,
        }
    }

    pub(crate) fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn xmlb(path: &Path) -> impl FnOnce(raven_xmlb::Error) -> Self + '_ {
        move |source| Self::Xmlb {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn text(path: &Path) -> impl FnOnce(raven_text::Error) -> Self + '_ {
        move |source| Self::Text {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;
