use core::fmt;

use super::{ByteInput, StringStream, attached};
use crate::{
    encoding::{EncodedBytes, Encoding},
    error::{InvalidValueError, Result},
};

impl StringStream {
    /// Writes `data` at the position and returns the number of bytes written.
    ///
    /// Writing past the end zero-fills the gap. In append mode every write
    /// lands at the end of the buffer, wherever the position was.
    ///
    /// ```rust
    /// use memstream::StringStream;
    ///
    /// let mut stream = StringStream::new();
    /// stream.set_pos(3).unwrap();
    /// assert_eq!(stream.write("ab").unwrap(), 2);
    /// assert_eq!(stream.buffer().unwrap().to_vec(), b"\0\0\0ab");
    /// ```
    pub fn write<'a>(&mut self, data: impl Into<EncodedBytes<'a>>) -> Result<usize> {
        let data = data.into();
        self.mode.check_writable()?;
        self.encoding.check_representable(data.encoding(), data.bytes())?;
        self.write_bytes(data.bytes())
    }

    /// Same as [`write`](Self::write).
    pub fn syswrite<'a>(&mut self, data: impl Into<EncodedBytes<'a>>) -> Result<usize> {
        self.write(data)
    }

    /// Same as [`write`](Self::write); a memory stream never blocks.
    pub fn write_nonblock<'a>(&mut self, data: impl Into<EncodedBytes<'a>>) -> Result<usize> {
        self.write(data)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<usize> {
        if bytes.is_empty() {
            return Ok(0);
        }
        let mut cell = attached(self.buffer.as_ref())?.borrow_mut();
        cell.ensure_modifiable()?;

        let end = cell.len();
        if self.mode.appending() {
            self.cursor.pos = end;
        }
        let pos = self.cursor.pos;
        if pos == end {
            cell.make_mut()?.extend_from_slice(bytes);
        } else {
            let storage = cell.extend(pos, bytes.len())?;
            storage[pos..pos + bytes.len()].copy_from_slice(bytes);
        }
        drop(cell);

        self.cursor.advance(bytes.len());
        Ok(bytes.len())
    }

    /// Writes one byte, or the first character of a string.
    pub fn putc<'a>(&mut self, ch: impl Into<ByteInput<'a>>) -> Result<()> {
        match ch.into() {
            ByteInput::Byte(byte) => self.write(EncodedBytes::new(&[byte], Encoding::Binary)),
            ByteInput::Bytes(data) => {
                let len = data.encoding().char_len(data.bytes());
                self.write(EncodedBytes::new(&data.bytes()[..len], data.encoding()))
            }
        }
        .map(drop)
    }

    /// Writes each item in turn.
    pub fn print<'a, I>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<EncodedBytes<'a>>,
    {
        for item in items {
            self.write(item)?;
        }
        Ok(())
    }

    /// Writes each item followed by a newline unless it already ends in one.
    /// With no items, writes a single newline.
    ///
    /// ```rust
    /// use memstream::StringStream;
    ///
    /// let mut stream = StringStream::new();
    /// stream.puts(["a", "b\n"]).unwrap();
    /// stream.puts(std::iter::empty::<&str>()).unwrap();
    /// assert_eq!(stream.buffer().unwrap().to_vec(), b"a\nb\n\n");
    /// ```
    pub fn puts<'a, I>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<EncodedBytes<'a>>,
    {
        let mut wrote_any = false;
        for item in items {
            let item = item.into();
            self.write(item)?;
            if item.bytes().last() != Some(&b'\n') {
                self.write("\n")?;
            }
            wrote_any = true;
        }
        if !wrote_any {
            self.write("\n")?;
        }
        Ok(())
    }

    /// Writes formatted text.
    ///
    /// ```rust
    /// use memstream::StringStream;
    ///
    /// let mut stream = StringStream::new();
    /// stream.printf(format_args!("{}-{:03}", "id", 7)).unwrap();
    /// assert_eq!(stream.buffer().unwrap().to_vec(), b"id-007");
    /// ```
    pub fn printf(&mut self, args: fmt::Arguments<'_>) -> Result<()> {
        let text = alloc::fmt::format(args);
        self.write(text.as_str()).map(drop)
    }

    /// Writes `data` and returns the stream for chaining.
    ///
    /// ```rust
    /// use memstream::StringStream;
    ///
    /// let mut stream = StringStream::new();
    /// stream.append("a")?.append("b")?;
    /// assert_eq!(stream.buffer().unwrap().to_vec(), b"ab");
    /// # Ok::<(), memstream::StreamError>(())
    /// ```
    pub fn append<'a>(&mut self, data: impl Into<EncodedBytes<'a>>) -> Result<&mut Self> {
        self.write(data)?;
        Ok(self)
    }

    /// Sets the buffer length to exactly `len` bytes, zero-filling when it
    /// grows. The position does not move.
    pub fn truncate(&mut self, len: i64) -> Result<()> {
        self.mode.check_writable()?;
        if len < 0 {
            return Err(InvalidValueError::NegativeLength(len).into());
        }
        let len = usize::try_from(len).map_err(|_| InvalidValueError::OutOfRange(len))?;
        attached(self.buffer.as_ref())?.borrow_mut().resize(len)
    }
}

impl fmt::Write for StringStream {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write(s).map(drop).map_err(|_| fmt::Error)
    }
}
