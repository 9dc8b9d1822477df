//! Raven - XMLB conversion library for Raven engine game data.
//!
//! This crate provides a unified interface to the Raven library ecosystem
//! and the file-level operations built on it.
//!
//! # Crates
//!
//! - [`raven_common`] - Common utilities (bounded binary reading, Windows-1252)
//! - [`raven_xmlb`] - XMLB binary tree encoding and decoding
//! - [`raven_text`] - JSON and XML text forms
//!
//! # Example
//!
//! ```no_run
//! use raven::prelude::*;
//!
//! // Decompile one file to JSON
//! convert_file(
//!     "data/herostat.xmlb".as_ref(),
//!     "json/herostat.json".as_ref(),
//!     Direction::Decompile,
//!     &ConvertOptions::default(),
//! )?;
//!
//! // Compile every JSON file back to binary
//! let jobs = raven::batch::plan("json/*.json", "data/*.xmlb")?;
//! let report = raven::batch::run(&jobs, Direction::Compile, &ConvertOptions::default(), |_, _| {});
//! println!("{} converted, {} failed", report.converted, report.failures.len());
//! # Ok::<(), raven::Error>(())
//! ```

// Re-export all sub-crates
pub use raven_common as common;
pub use raven_text as text;
pub use raven_xmlb as xmlb;

pub mod batch;
mod convert;
mod error;

pub use convert::{convert_file, read_tree, write_tree, ConvertOptions, Direction, Format};
pub use error::{Error, Result};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::batch::{BatchJob, BatchReport};
    pub use crate::{convert_file, ConvertOptions, Direction, Format};
    pub use raven_common::ErrorKind;
    pub use raven_text::Layout;
    pub use raven_xmlb::{Node, Value};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
