//! XMLB element record.

use zerocopy::byteorder::little_endian::{I32, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// An element in the XMLB tree.
///
/// Elements are linked by absolute file offset rather than by index: the
/// parent points at its first child and each child points at the next one.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct ElementRecord {
    /// Offset of the element name in the string table.
    pub name_offset: U32,
    /// Offset of the next sibling's record (-1 for none).
    pub next_sibling_offset: I32,
    /// Offset of the first child's record (-1 for none).
    pub first_child_offset: I32,
    /// Number of attribute records that directly follow this one.
    pub attribute_count: U32,
}

impl ElementRecord {
    /// Link value meaning "no element".
    pub const NONE: i32 = -1;

    /// Size of an element record in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Create a new element record.
    pub fn new(
        name_offset: u32,
        next_sibling_offset: i32,
        first_child_offset: i32,
        attribute_count: u32,
    ) -> Self {
        Self {
            name_offset: U32::new(name_offset),
            next_sibling_offset: I32::new(next_sibling_offset),
            first_child_offset: I32::new(first_child_offset),
            attribute_count: U32::new(attribute_count),
        }
    }
}
