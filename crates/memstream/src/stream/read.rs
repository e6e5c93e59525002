use alloc::vec::Vec;

use super::{StringStream, attached};
use crate::{
    buffer::grow_zeroed,
    encoding::{EncodedBytes, Encoding},
    error::{ArgumentError, Result, StreamError},
    view::ByteView,
};

/// A single byte or a byte sequence, as accepted by
/// [`StringStream::ungetbyte`] and [`StringStream::putc`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteInput<'a> {
    Byte(u8),
    Bytes(EncodedBytes<'a>),
}

impl From<u8> for ByteInput<'_> {
    fn from(byte: u8) -> Self {
        Self::Byte(byte)
    }
}

impl<'a> From<&'a str> for ByteInput<'a> {
    fn from(s: &'a str) -> Self {
        Self::Bytes(s.into())
    }
}

impl<'a> From<&'a [u8]> for ByteInput<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::Bytes(bytes.into())
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for ByteInput<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Self::Bytes(bytes.into())
    }
}

impl<'a> From<&'a ByteView> for ByteInput<'a> {
    fn from(view: &'a ByteView) -> Self {
        Self::Bytes(view.into())
    }
}

impl StringStream {
    /// Reads up to `len` bytes, or everything that is left when `len` is
    /// `None`.
    ///
    /// With a length, the result is tagged binary and `None` signals end of
    /// data. Without one, the result carries the stream's encoding and is
    /// empty at end of data.
    pub fn read(&mut self, len: Option<i64>) -> Result<Option<ByteView>> {
        self.mode.check_readable()?;
        let wanted = match len {
            Some(n) if n < 0 => return Err(ArgumentError::NegativeLength(n).into()),
            Some(n) => Some(usize::try_from(n).unwrap_or(usize::MAX)),
            None => None,
        };

        let pos = self.cursor.pos;
        let cell = attached(self.buffer.as_ref())?.borrow();
        let available = cell.len().saturating_sub(pos);
        let view = match wanted {
            None if available == 0 => ByteView::empty(self.encoding),
            None => cell.view(pos, cell.len(), self.encoding),
            Some(0) => ByteView::empty(Encoding::Binary),
            Some(_) if available == 0 => return Ok(None),
            Some(n) => cell.view(pos, pos + n.min(available), Encoding::Binary),
        };
        drop(cell);

        self.cursor.advance(view.len());
        Ok(Some(view))
    }

    /// Like [`read`](Self::read), copying into `out` instead of returning a
    /// view. Earlier contents of `out` are discarded.
    pub fn read_into(&mut self, len: Option<i64>, out: &mut Vec<u8>) -> Result<Option<usize>> {
        let view = self.read(len)?;
        out.clear();
        Ok(view.map(|view| {
            out.extend_from_slice(&view);
            view.len()
        }))
    }

    /// Reads up to `len` bytes, failing with [`StreamError::Eof`] at end of
    /// data.
    pub fn readpartial(&mut self, len: i64) -> Result<ByteView> {
        self.read(Some(len))?.ok_or(StreamError::Eof)
    }

    /// Same as [`readpartial`](Self::readpartial).
    pub fn sysread(&mut self, len: i64) -> Result<ByteView> {
        self.readpartial(len)
    }

    /// Same as [`readpartial`](Self::readpartial); a memory stream never
    /// blocks.
    pub fn read_nonblock(&mut self, len: i64) -> Result<ByteView> {
        self.readpartial(len)
    }

    pub fn getbyte(&mut self) -> Result<Option<u8>> {
        self.mode.check_readable()?;
        let byte = attached(self.buffer.as_ref())?
            .borrow()
            .bytes()
            .get(self.cursor.pos)
            .copied();
        if byte.is_some() {
            self.cursor.advance(1);
        }
        Ok(byte)
    }

    pub fn readbyte(&mut self) -> Result<u8> {
        self.getbyte()?.ok_or(StreamError::Eof)
    }

    /// Reads one character in the stream's encoding.
    ///
    /// A character cut short by the end of the buffer is returned as the
    /// bytes that remain.
    pub fn getchar(&mut self) -> Result<Option<ByteView>> {
        self.mode.check_readable()?;
        let pos = self.cursor.pos;
        let cell = attached(self.buffer.as_ref())?.borrow();
        let Some(rest) = cell.bytes().get(pos..).filter(|rest| !rest.is_empty()) else {
            return Ok(None);
        };
        let len = self.encoding.char_len(rest);
        let view = cell.view(pos, pos + len, self.encoding);
        drop(cell);

        self.cursor.advance(len);
        Ok(Some(view))
    }

    pub fn readchar(&mut self) -> Result<ByteView> {
        self.getchar()?.ok_or(StreamError::Eof)
    }

    /// Pushes bytes back so the next read returns them.
    ///
    /// The pushed bytes overwrite what was just read; pushing back more bytes
    /// than the position grows the buffer at the front. At or past the end,
    /// the buffer is first zero-filled to the larger of the position and the
    /// pushed length.
    ///
    /// ```rust
    /// use memstream::StringStream;
    ///
    /// let mut stream = StringStream::with_buffer("abc");
    /// assert_eq!(stream.getbyte().unwrap(), Some(b'a'));
    /// stream.ungetbyte("XY").unwrap();
    /// assert_eq!(stream.pos(), 0);
    /// assert_eq!(stream.read(None).unwrap().unwrap(), "XYbc");
    /// ```
    pub fn ungetbyte<'a>(&mut self, input: impl Into<ByteInput<'a>>) -> Result<()> {
        self.mode.check_readable()?;
        match input.into() {
            ByteInput::Byte(byte) => self.unget_byte(byte),
            ByteInput::Bytes(bytes) => self.unget_bytes(bytes.bytes()),
        }
    }

    /// Pushes back a character, encoded in the stream's encoding.
    pub fn ungetc(&mut self, ch: char) -> Result<()> {
        self.mode.check_readable()?;
        let bytes = self.encoding.encode_char(ch);
        self.unget_bytes(&bytes)
    }

    fn unget_byte(&mut self, byte: u8) -> Result<()> {
        let mut cell = attached(self.buffer.as_ref())?.borrow_mut();
        let storage = cell.make_mut()?;
        match self.cursor.pos.checked_sub(1) {
            None => storage.insert(0, byte),
            Some(pos) => {
                grow_zeroed(storage, pos + 1)?;
                storage[pos] = byte;
                self.cursor.pos = pos;
            }
        }
        Ok(())
    }

    fn unget_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        let mut cell = attached(self.buffer.as_ref())?.borrow_mut();
        let storage = cell.make_mut()?;

        let pos = self.cursor.pos;
        if pos >= storage.len() {
            grow_zeroed(storage, pos.max(bytes.len()))?;
        }
        let start = pos.saturating_sub(bytes.len());
        storage.splice(start..pos, bytes.iter().copied());
        self.cursor.pos = start;
        Ok(())
    }

    /// Calls `f` with every byte from the position to the end.
    ///
    /// The length is checked again before every byte, so bytes appended
    /// from inside `f` (through a [`Buffer`](crate::Buffer) clone or another
    /// stream) are visited too.
    pub fn each_byte(&mut self, mut f: impl FnMut(u8)) -> Result<()> {
        self.mode.check_readable()?;
        while let Some(byte) = self.getbyte()? {
            f(byte);
        }
        Ok(())
    }

    pub fn each_char(&mut self, mut f: impl FnMut(ByteView)) -> Result<()> {
        self.mode.check_readable()?;
        while let Some(ch) = self.getchar()? {
            f(ch);
        }
        Ok(())
    }

    /// Calls `f` with every codepoint from the position to the end.
    ///
    /// Stops with an argument error at the first invalid byte sequence; the
    /// position is left at its start.
    pub fn each_codepoint(&mut self, mut f: impl FnMut(u32)) -> Result<()> {
        self.mode.check_readable()?;
        loop {
            let pos = self.cursor.pos;
            let decoded = {
                let cell = attached(self.buffer.as_ref())?.borrow();
                match cell.bytes().get(pos..) {
                    Some(rest) if !rest.is_empty() => self.encoding.codepoint(rest),
                    _ => return Ok(()),
                }
            };
            let Some((codepoint, len)) = decoded else {
                return Err(ArgumentError::InvalidByteSequence {
                    encoding: self.encoding,
                    offset: pos,
                }
                .into());
            };
            self.cursor.advance(len);
            f(codepoint);
        }
    }

    /// Iterator over the remaining bytes.
    pub fn bytes(&mut self) -> Result<Bytes<'_>> {
        self.mode.check_readable()?;
        Ok(Bytes { stream: self })
    }

    /// Iterator over the remaining characters.
    pub fn chars(&mut self) -> Result<Chars<'_>> {
        self.mode.check_readable()?;
        Ok(Chars { stream: self })
    }
}

/// Iterator returned by [`StringStream::bytes`].
#[derive(Debug)]
pub struct Bytes<'s> {
    stream: &'s mut StringStream,
}

impl Iterator for Bytes<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        self.stream.getbyte().ok().flatten()
    }
}

/// Iterator returned by [`StringStream::chars`].
#[derive(Debug)]
pub struct Chars<'s> {
    stream: &'s mut StringStream,
}

impl Iterator for Chars<'_> {
    type Item = ByteView;

    fn next(&mut self) -> Option<ByteView> {
        self.stream.getchar().ok().flatten()
    }
}
