//! Binary reader for bounds-checked parsing of byte slices.
//!
//! This module provides [`BinaryReader`], a cursor-like type that reads
//! fixed-layout records and NUL-terminated strings from a byte slice without
//! copying. Every read is checked against the end of the slice, so a corrupt
//! offset surfaces as an error instead of a panic.

use zerocopy::FromBytes;

use crate::{Error, Result};

/// A binary reader that provides zero-copy reading from a byte slice.
///
/// # Example
///
/// ```
/// use raven_common::BinaryReader;
///
/// let data = [0xB1, 0x11, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00];
/// let reader = BinaryReader::new(&data);
///
/// assert_eq!(reader.peek_u32().unwrap(), 0x11B1);
/// assert_eq!(reader.remaining(), 8);
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BinaryReader<'a> {
    /// Create a new reader from a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Get the current position in the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Get the total length of the underlying buffer.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the underlying buffer is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the number of bytes remaining to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Seek to an absolute position.
    ///
    /// Seeking to exactly the end of the buffer is allowed; anything past it is not.
    #[inline]
    pub fn seek(&mut self, position: usize) -> Result<()> {
        if position > self.data.len() {
            return Err(Error::OffsetOutOfBounds {
                offset: position,
                size: self.data.len(),
            });
        }
        self.position = position;
        Ok(())
    }

    /// Peek at bytes without advancing the position.
    #[inline]
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::UnexpectedEof {
                offset: self.position,
                needed: count,
                available: self.remaining(),
            });
        }
        Ok(&self.data[self.position..self.position + count])
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.position += count;
        Ok(bytes)
    }

    /// Peek at a little-endian u32 without advancing.
    #[inline]
    pub fn peek_u32(&self) -> Result<u32> {
        let bytes = self.peek_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a struct using zerocopy.
    ///
    /// The struct must implement `FromBytes` from the zerocopy crate.
    #[inline]
    pub fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let bytes = self.read_bytes(size)?;
        T::read_from_bytes(bytes).map_err(|_| Error::UnexpectedEof {
            offset: self.position - size,
            needed: size,
            available: bytes.len(),
        })
    }

    /// Read the NUL-terminated byte string starting at an absolute offset.
    ///
    /// The terminator is not included in the returned slice. The reader's
    /// own position is left untouched.
    pub fn cstring_at(&self, offset: usize) -> Result<&'a [u8]> {
        if offset >= self.data.len() {
            return Err(Error::OffsetOutOfBounds {
                offset,
                size: self.data.len(),
            });
        }

        let tail = &self.data[offset..];
        let end = memchr::memchr(0, tail).ok_or(Error::MissingNullTerminator { offset })?;

        Ok(&tail[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_bytes_advances() {
        let data = [0x01u8, 0x02, 0x03, 0x04, 0xFF, 0xFF];
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.read_bytes(4).unwrap(), &[1, 2, 3, 4]);
        assert_eq!(reader.position(), 4);
        assert_eq!(reader.remaining(), 2);
    }

    #[test]
    fn test_cstring_at_keeps_position() {
        let data = b"hello\0world\0";
        let mut reader = BinaryReader::new(data);
        reader.seek(3).unwrap();

        assert_eq!(reader.cstring_at(6).unwrap(), b"world");
        assert_eq!(reader.cstring_at(0).unwrap(), b"hello");
        assert_eq!(reader.position(), 3);
    }

    #[test]
    fn test_cstring_at_empty_string() {
        let data = b"\0abc\0";
        let reader = BinaryReader::new(data);
        assert_eq!(reader.cstring_at(0).unwrap(), b"");
    }

    #[test]
    fn test_cstring_at_unterminated() {
        let data = b"abc\0def";
        let reader = BinaryReader::new(data);

        assert!(matches!(
            reader.cstring_at(4),
            Err(Error::MissingNullTerminator { offset: 4 })
        ));
        assert!(matches!(
            reader.cstring_at(7),
            Err(Error::OffsetOutOfBounds { offset: 7, size: 7 })
        ));
    }

    #[test]
    fn test_peek_does_not_advance() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.peek_u32().unwrap(), 0x04030201);
        assert_eq!(reader.position(), 0);
        reader.read_bytes(4).unwrap();
        assert!(reader.peek_u32().is_err());
    }

    #[test]
    fn test_seek_bounds() {
        let data = [0u8; 4];
        let mut reader = BinaryReader::new(&data);

        assert!(reader.seek(4).is_ok());
        assert!(matches!(
            reader.seek(5),
            Err(Error::OffsetOutOfBounds { offset: 5, size: 4 })
        ));
    }

    #[test]
    fn test_eof_error() {
        let data = [0x01, 0x02];
        let mut reader = BinaryReader::new(&data);

        assert!(matches!(
            reader.read_bytes(4),
            Err(Error::UnexpectedEof { needed: 4, available: 2, .. })
        ));
    }
}
