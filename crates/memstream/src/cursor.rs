use crate::error::{InvalidValueError, Result};

/// Byte position and line counter of one handle.
///
/// The position may sit past the end of the buffer; that reads as end of
/// data, and the next write zero-fills the gap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Cursor {
    pub(crate) pos: usize,
    pub(crate) lineno: i64,
}

impl Cursor {
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    /// Sets the position from a signed value, rejecting negatives.
    pub(crate) fn set_pos(&mut self, pos: i64) -> Result<()> {
        self.pos = to_offset(pos)?;
        Ok(())
    }

    pub(crate) fn advance(&mut self, by: usize) {
        self.pos += by;
    }

    pub(crate) fn next_line(&mut self) {
        self.lineno += 1;
    }
}

/// Converts a signed position into a byte offset.
fn to_offset(pos: i64) -> Result<usize> {
    if pos < 0 {
        return Err(InvalidValueError::NegativePosition(pos).into());
    }
    usize::try_from(pos).map_err(|_| InvalidValueError::OutOfRange(pos).into())
}
