//! XMLB header structure.

use zerocopy::byteorder::little_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// XMLB file header.
///
/// The first 8 bytes of every file. The root element record follows immediately.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct XmlbHeader {
    /// Magic number, always 0x11B1.
    pub magic: U32,
    /// Format version, always 1.
    pub version: U32,
}

impl XmlbHeader {
    /// The magic number at the start of an XMLB file.
    pub const MAGIC: u32 = 0x11B1;

    /// The only format version in use.
    pub const VERSION: u32 = 1;

    /// Size of the header in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Create the header written at the start of every encoded file.
    pub const fn new() -> Self {
        Self {
            magic: U32::new(Self::MAGIC),
            version: U32::new(Self::VERSION),
        }
    }
}

impl Default for XmlbHeader {
    fn default() -> Self {
        Self::new()
    }
}
