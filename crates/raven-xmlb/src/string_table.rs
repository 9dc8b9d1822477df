//! String table construction.
//!
//! Strings are collected while the encoder lays out element records, before it
//! knows where the table will start. [`StringTable::intern`] therefore hands out
//! a [`StringId`] instead of an offset, and [`StringTable::finalize`] turns ids
//! into absolute file offsets once the record region has been sized.

use raven_common::codepage;
use rustc_hash::FxHashMap;

use crate::{Error, Result};

/// Handle to an interned string, valid before offsets are assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StringId(u32);

/// Deduplicating collection of strings in first-use order.
#[derive(Debug, Default)]
pub struct StringTable {
    strings: Vec<String>,
    ids: FxHashMap<String, StringId>,
}

impl StringTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a string to the table if not already present.
    ///
    /// Equal strings always return the same id.
    pub fn intern(&mut self, s: &str) -> StringId {
        if let Some(&id) = self.ids.get(s) {
            return id;
        }

        let id = StringId(self.strings.len() as u32);
        self.ids.insert(s.to_string(), id);
        self.strings.push(s.to_string());
        id
    }

    /// Number of unique strings.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if no strings have been interned.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Assign offsets starting at `start_offset` and encode the table bytes.
    ///
    /// Each string takes its Windows-1252 length plus one NUL byte. Fails on
    /// the first string the codepage cannot represent.
    pub fn finalize(self, start_offset: u32) -> Result<StringLayout> {
        let mut offsets = Vec::with_capacity(self.strings.len());
        let mut bytes = Vec::new();

        for s in &self.strings {
            let encoded = codepage::encode(s)?;
            let offset = u64::from(start_offset) + bytes.len() as u64;
            if offset + encoded.len() as u64 + 1 > u64::from(u32::MAX) {
                return Err(Error::TooLarge);
            }

            offsets.push(offset as u32);
            bytes.extend_from_slice(&encoded);
            bytes.push(0);
        }

        Ok(StringLayout { offsets, bytes })
    }
}

/// A finalized string table: absolute offsets plus the bytes to write.
#[derive(Debug)]
pub struct StringLayout {
    offsets: Vec<u32>,
    bytes: Vec<u8>,
}

impl StringLayout {
    /// Absolute file offset of an interned string.
    pub fn offset(&self, id: StringId) -> u32 {
        self.offsets[id.0 as usize]
    }

    /// The encoded table, NUL-terminated strings back to back.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}
