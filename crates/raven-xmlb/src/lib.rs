//! XMLB binary tree codec.
//!
//! Raven engine games ship much of their configuration (hero stats, character
//! info, menus) as XMLB: a compact binary tree in which elements link to their
//! first child and next sibling by absolute byte offset, and every name and
//! value lives once in a trailing Windows-1252 string table.
//!
//! This crate converts between that layout and [`Node`], an order-preserving
//! in-memory tree whose attribute values carry their inferred scalar type.
//!
//! # File layout
//!
//! | region         | contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | header         | `u32 magic = 0x11B1`, `u32 version = 1`                    |
//! | records        | per element, pre-order: one [`ElementRecord`] followed by its [`AttributeRecord`]s |
//! | string table   | unique NUL-terminated strings, in first-use order          |
//!
//! All integers are little-endian.
//!
//! # Supported File Types
//!
//! - `.xmlb` - Binary game data
//! - `.engb`, `.freb`, `.gerb`, `.itab` - Localized string tables in the same format
//!
//! # Example
//!
//! ```
//! use raven_xmlb::{Node, Value};
//!
//! let stats = Node::new("stats")
//!     .attr("name", "ironman")
//!     .attr("level", 3)
//!     .attr("isteam", true);
//!
//! let bytes = raven_xmlb::encode(&stats)?;
//! assert!(raven_xmlb::is_xmlb(&bytes));
//!
//! let decoded = raven_xmlb::decode(&bytes)?;
//! assert_eq!(decoded.attribute("level"), Some(&Value::Int(3)));
//! assert_eq!(decoded, stats);
//! # Ok::<(), raven_xmlb::Error>(())
//! ```

use raven_common::BinaryReader;

mod attribute;
mod decoder;
mod element;
mod encoder;
mod error;
mod header;
mod node;
mod string_table;
mod value;

pub use attribute::AttributeRecord;
pub use decoder::XmlbDecoder;
pub use element::ElementRecord;
pub use encoder::XmlbEncoder;
pub use error::{Error, Result};
pub use header::XmlbHeader;
pub use node::Node;
pub use string_table::{StringId, StringLayout, StringTable};
pub use value::Value;

/// Maximum element nesting accepted by the encoder and decoder.
///
/// Writers of the text forms recurse once per level, so this also bounds
/// their stack use.
pub const MAX_DEPTH: usize = 256;

/// Check if data is an XMLB file by checking the header magic.
pub fn is_xmlb(data: &[u8]) -> bool {
    data.len() >= XmlbHeader::SIZE
        && matches!(BinaryReader::new(data).peek_u32(), Ok(XmlbHeader::MAGIC))
}

/// Encode a tree into XMLB bytes.
pub fn encode(root: &Node) -> Result<Vec<u8>> {
    XmlbEncoder::new(root).encode()
}

/// Decode XMLB bytes into a tree.
pub fn decode(data: &[u8]) -> Result<Node> {
    XmlbDecoder::new(data)?.decode()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_xmlb() {
        assert!(is_xmlb(&[0xB1, 0x11, 0, 0, 1, 0, 0, 0]));
        assert!(is_xmlb(&[0xB1, 0x11, 0, 0, 7, 0, 0, 0, 0xFF]));
        assert!(!is_xmlb(b"<?xml ve"));
        assert!(!is_xmlb(&[0xB1, 0x11, 0, 0]));
    }
}
