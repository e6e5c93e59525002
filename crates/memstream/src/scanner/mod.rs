//! Line scanning over a byte slice.
//!
//! [`scan_line`] is a pure function: given the buffer bytes, a start
//! position, an optional byte limit and a [`ScanMode`], it returns the byte
//! range of the next line. The stream turns that range into a view and
//! advances its cursor; nothing here touches shared state.
//!
//! Modes:
//! - `Slurp` takes the whole window.
//! - `Paragraph` skips leading newlines, then ends after the first blank line
//!   (`"\n\n"`). Further newlines of the same blank run are left for the next
//!   call to skip.
//! - `Byte` ends after the first occurrence of the byte.
//! - `Pattern` ends after the first occurrence of a multi-byte separator,
//!   found with [`Horspool`].
//!
//! The window is the rest of the buffer, clipped to `limit` bytes when a
//! positive limit is given, and then widened to the next character boundary
//! so a multi-byte character is never split.

mod horspool;

use bstr::ByteSlice;

pub use self::horspool::Horspool;
use crate::encoding::Encoding;

/// Selects how a line read finds the end of its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Separator<'a> {
    /// No separator: read to the end of the buffer.
    Slurp,
    /// The stream's configured record separator.
    #[default]
    Default,
    /// Lines end at a blank line; leading newlines are skipped.
    Paragraph,
    /// A literal separator. An empty one means paragraph mode.
    Custom(&'a [u8]),
}

impl<'a> Separator<'a> {
    pub(crate) fn resolve(self, default: Option<&'a [u8]>) -> ScanMode<'a> {
        match self {
            Self::Slurp => ScanMode::Slurp,
            Self::Paragraph => ScanMode::Paragraph,
            Self::Custom(sep) => ScanMode::for_separator(sep),
            Self::Default => default.map_or(ScanMode::Slurp, ScanMode::for_separator),
        }
    }
}

impl<'a> From<&'a str> for Separator<'a> {
    fn from(sep: &'a str) -> Self {
        Self::Custom(sep.as_bytes())
    }
}

impl<'a> From<&'a [u8]> for Separator<'a> {
    fn from(sep: &'a [u8]) -> Self {
        Self::Custom(sep)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Separator<'a> {
    fn from(sep: &'a [u8; N]) -> Self {
        Self::Custom(sep)
    }
}

impl<'a> From<Option<&'a str>> for Separator<'a> {
    fn from(sep: Option<&'a str>) -> Self {
        sep.map_or(Self::Slurp, Self::from)
    }
}

/// A separator resolved to the algorithm that finds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode<'a> {
    Slurp,
    Paragraph,
    Byte(u8),
    Pattern(&'a [u8]),
}

impl<'a> ScanMode<'a> {
    #[must_use]
    pub fn for_separator(sep: &'a [u8]) -> Self {
        match sep {
            [] => Self::Paragraph,
            &[b] => Self::Byte(b),
            _ => Self::Pattern(sep),
        }
    }
}

/// Byte range `[start, end)` of a scanned line.
///
/// `start` differs from the scan position only in paragraph mode, where
/// leading newlines are dropped. The cursor moves to `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    pub start: usize,
    pub end: usize,
}

/// Finds the next line in `bytes` starting at `pos`.
///
/// Returns `None` at end of data: when `pos` is at or past the end, or when
/// paragraph mode finds only newlines.
#[must_use]
pub fn scan_line(
    bytes: &[u8],
    pos: usize,
    limit: Option<usize>,
    mode: ScanMode<'_>,
    encoding: Encoding,
) -> Option<Line> {
    if pos >= bytes.len() {
        return None;
    }

    let mut start = pos;
    if mode == ScanMode::Paragraph {
        start += bytes[pos..].iter().take_while(|&&b| b == b'\n').count();
        if start == bytes.len() {
            return None;
        }
    }

    let window_end = window_end(bytes, start, limit, encoding);
    debug_assert!(start < window_end && window_end <= bytes.len());
    let window = &bytes[start..window_end];

    let cut = match mode {
        ScanMode::Slurp => None,
        ScanMode::Paragraph => window.find(b"\n\n").map(|i| i + 2),
        ScanMode::Byte(b) => window.find_byte(b).map(|i| i + 1),
        ScanMode::Pattern(sep) if sep.len() < window.len() => {
            Horspool::new(sep).find(window).map(|i| i + sep.len())
        }
        ScanMode::Pattern(_) => None,
    };

    Some(Line {
        start,
        end: cut.map_or(window_end, |cut| start + cut),
    })
}

fn window_end(bytes: &[u8], start: usize, limit: Option<usize>, encoding: Encoding) -> usize {
    match limit {
        Some(limit) if limit > 0 && limit < bytes.len() - start => {
            encoding.right_adjust_char_head(bytes, start, start + limit)
        }
        _ => bytes.len(),
    }
}

#[cfg(test)]
mod tests;
