//! Windows-1252 string handling.
//!
//! XMLB files store every string as single-byte Windows-1252 text followed by a
//! NUL terminator. Text formats on the other side are UTF-8, so every string
//! crosses this module on its way in or out of a binary file.

use std::borrow::Cow;

use encoding_rs::WINDOWS_1252;

use crate::{Error, Result};

/// Decode Windows-1252 bytes into a string.
///
/// Every byte value maps to a character, so decoding cannot fail.
pub fn decode(bytes: &[u8]) -> Cow<'_, str> {
    let (text, _had_errors) = WINDOWS_1252.decode_without_bom_handling(bytes);
    text
}

/// Encode a string as Windows-1252 bytes (without the NUL terminator).
///
/// Fails if the string contains a character outside the codepage or a NUL.
pub fn encode(text: &str) -> Result<Cow<'_, [u8]>> {
    if text.contains('\0') {
        return Err(Error::InteriorNul {
            text: text.to_string(),
        });
    }

    let (bytes, _, had_errors) = WINDOWS_1252.encode(text);
    if had_errors {
        return Err(Error::Unrepresentable {
            text: text.to_string(),
        });
    }

    Ok(bytes)
}
