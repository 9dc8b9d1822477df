//! Common utilities for Raven.
//!
//! This crate provides foundational types and utilities used across all Raven crates:
//!
//! - [`BinaryReader`] - Bounds-checked binary reading from byte slices
//! - [`codepage`] - Windows-1252 encoding and decoding of stored strings

mod error;
mod reader;

pub mod codepage;

pub use error::{Error, ErrorKind, Result};
pub use reader::BinaryReader;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};
