//! Text forms of XMLB trees.
//!
//! XMLB files are edited as text and compiled back to binary. Two text forms
//! are supported:
//!
//! - [`json`] - a single-key object per element, in the layout the game
//!   modding tools have always used. Sibling elements frequently share a tag,
//!   so objects are read and written as ordered key lists that allow
//!   duplicate keys.
//! - [`xml`] - elements and attributes map directly onto XML.
//!
//! # Example
//!
//! ```
//! use raven_text::{json, xml, Layout};
//!
//! let node = json::from_str(r#"{"stats": {"name": "ironman", "level": 3, "isteam": true}}"#)?;
//! let text = xml::to_string(&node, Layout::Compact)?;
//! assert!(text.ends_with(r#"<stats name="ironman" level="3" isteam="true"/>"#));
//! # Ok::<(), raven_text::Error>(())
//! ```

mod error;

pub mod json;
pub mod xml;

pub use error::{Error, Result};

/// Whitespace layout of generated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// One element or key per line, indented by nesting depth.
    #[default]
    Pretty,
    /// No insignificant whitespace.
    Compact,
}
