//! XMLB attribute record.

use zerocopy::byteorder::little_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// An attribute of an XMLB element.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct AttributeRecord {
    /// Offset into the string table for the attribute name.
    pub name_offset: U32,
    /// Offset into the string table for the attribute value.
    pub value_offset: U32,
}

impl AttributeRecord {
    /// Size of an attribute record in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Create a new attribute record.
    pub fn new(name_offset: u32, value_offset: u32) -> Self {
        Self {
            name_offset: U32::new(name_offset),
            value_offset: U32::new(value_offset),
        }
    }
}
