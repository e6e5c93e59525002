//! Encoding tags and character-boundary helpers.
//!
//! Buffers are plain bytes tagged with an [`Encoding`]. Nothing here
//! transcodes: the tag only decides where characters begin and end, and
//! whether bytes written under one tag are representable under another.
//!
//! UTF-8 decoding leans on [`bstr::decode_utf8`], which reports the length of
//! the maximal valid prefix for broken sequences. A character cut short by the
//! end of the buffer therefore consumes all of the remaining bytes, and an
//! invalid lead byte consumes exactly one.

use alloc::{string::String, vec::Vec};
use core::{fmt, str::FromStr};

use crate::{
    error::{EncodingError, Result},
    view::ByteView,
};

/// The encoding a buffer's bytes are tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Encoding {
    /// Raw bytes (`ASCII-8BIT`). Never converted, every byte is a character.
    Binary,
    /// 7-bit ASCII.
    UsAscii,
    #[default]
    Utf8,
}

impl Encoding {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Binary => "ASCII-8BIT",
            Self::UsAscii => "US-ASCII",
            Self::Utf8 => "UTF-8",
        }
    }

    #[must_use]
    pub const fn is_binary(self) -> bool {
        matches!(self, Self::Binary)
    }

    /// Byte length of the character starting at `bytes[0]`.
    ///
    /// Returns 0 only for an empty slice. A broken trailing character spans
    /// the rest of the slice.
    #[must_use]
    pub fn char_len(self, bytes: &[u8]) -> usize {
        if bytes.is_empty() {
            return 0;
        }
        match self {
            Self::Binary | Self::UsAscii => 1,
            Self::Utf8 => bstr::decode_utf8(bytes).1.max(1),
        }
    }

    /// Decodes the codepoint at `bytes[0]`, returning it with its byte length.
    ///
    /// `None` means the bytes do not form a valid character.
    #[must_use]
    pub fn codepoint(self, bytes: &[u8]) -> Option<(u32, usize)> {
        let &first = bytes.first()?;
        match self {
            Self::Binary => Some((u32::from(first), 1)),
            Self::UsAscii => first.is_ascii().then_some((u32::from(first), 1)),
            Self::Utf8 => match bstr::decode_utf8(bytes) {
                (Some(ch), len) => Some((u32::from(ch), len)),
                (None, _) => None,
            },
        }
    }

    /// Moves `target` forward to the next character head if it falls inside a
    /// multi-byte character that starts at or after `start`.
    ///
    /// The result never exceeds `bytes.len()`.
    #[must_use]
    pub fn right_adjust_char_head(self, bytes: &[u8], start: usize, target: usize) -> usize {
        if target >= bytes.len() {
            return bytes.len();
        }
        if !matches!(self, Self::Utf8) {
            return target;
        }

        let mut head = target;
        while head > start && target - head < 3 && is_utf8_continuation(bytes[head]) {
            head -= 1;
        }
        if head == target {
            return target;
        }

        let (_, len) = bstr::decode_utf8(&bytes[head..]);
        if head + len > target {
            (head + len).min(bytes.len())
        } else {
            target
        }
    }

    /// Checks that `data`, tagged `from`, can be stored under `self`.
    ///
    /// Binary on either side disables the check. All supported encodings are
    /// ASCII-compatible, so representability reduces to "ASCII when either
    /// side is US-ASCII".
    pub(crate) fn check_representable(
        self,
        from: Encoding,
        data: &[u8],
    ) -> Result<(), EncodingError> {
        if self == from || self.is_binary() || from.is_binary() {
            return Ok(());
        }
        if matches!(self, Self::UsAscii) || matches!(from, Self::UsAscii) {
            if let Some(offset) = data.iter().position(|b| !b.is_ascii()) {
                return Err(EncodingError::Unrepresentable {
                    from,
                    to: self,
                    byte: data[offset],
                    offset,
                });
            }
        }
        Ok(())
    }

    pub(crate) fn encode_char(self, ch: char) -> Vec<u8> {
        let mut tmp = [0u8; 4];
        match (self, u8::try_from(ch)) {
            // Single-byte encodings store U+0000..=U+00FF as one byte.
            (Self::Binary | Self::UsAscii, Ok(byte)) => alloc::vec![byte],
            _ => ch.encode_utf8(&mut tmp).as_bytes().to_vec(),
        }
    }
}

#[inline]
fn is_utf8_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Encoding {
    type Err = EncodingError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let upper: String = name.chars().map(|c| c.to_ascii_uppercase()).collect();
        match upper.as_str() {
            "ASCII-8BIT" | "BINARY" => Ok(Self::Binary),
            "US-ASCII" | "ASCII" | "ANSI_X3.4-1968" | "646" => Ok(Self::UsAscii),
            "UTF-8" | "UTF8" | "CP65001" => Ok(Self::Utf8),
            _ => Err(EncodingError::UnknownEncoding(name.into())),
        }
    }
}

/// Bytes paired with the encoding they were produced in.
///
/// This is what write operations accept: `&str` and `String` are UTF-8, raw
/// byte slices are binary, and a [`ByteView`] keeps its own tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedBytes<'a> {
    bytes: &'a [u8],
    encoding: Encoding,
}

impl<'a> EncodedBytes<'a> {
    #[must_use]
    pub const fn new(bytes: &'a [u8], encoding: Encoding) -> Self {
        Self { bytes, encoding }
    }

    #[must_use]
    pub const fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    #[must_use]
    pub const fn encoding(&self) -> Encoding {
        self.encoding
    }
}

impl<'a> From<&'a str> for EncodedBytes<'a> {
    fn from(s: &'a str) -> Self {
        Self::new(s.as_bytes(), Encoding::Utf8)
    }
}

impl<'a> From<&'a String> for EncodedBytes<'a> {
    fn from(s: &'a String) -> Self {
        Self::new(s.as_bytes(), Encoding::Utf8)
    }
}

impl<'a> From<&'a [u8]> for EncodedBytes<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::new(bytes, Encoding::Binary)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for EncodedBytes<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Self::new(bytes, Encoding::Binary)
    }
}

impl<'a> From<&'a Vec<u8>> for EncodedBytes<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Self::new(bytes, Encoding::Binary)
    }
}

impl<'a> From<&'a ByteView> for EncodedBytes<'a> {
    fn from(view: &'a ByteView) -> Self {
        Self::new(view.as_bytes(), view.encoding())
    }
}
