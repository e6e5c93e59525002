//! The stream handle.
//!
//! A [`StringStream`] owns a cursor, a mode and a reference to a shared
//! [`Buffer`]. Reads, writes and line scans live in the `read`, `write` and
//! `lines` submodules; this module holds construction, lifecycle,
//! positioning and metadata.

mod lines;
mod read;
mod write;

use alloc::vec::Vec;

pub use self::{
    lines::Lines,
    read::{ByteInput, Bytes, Chars},
};
use crate::{
    buffer::Buffer,
    cursor::Cursor,
    encoding::Encoding,
    error::{InvalidValueError, IoError, Result, StreamError},
    mode::{Lifecycle, Mode, ModeState, OpenMode},
    options::StreamOptions,
};

/// How a stream is initialised.
#[derive(Debug, Clone, Default)]
pub enum StreamConfig {
    /// A fresh empty buffer, open for reading and writing.
    #[default]
    Empty,
    /// An existing buffer; read-only when the buffer is frozen.
    FromBuffer(Buffer),
    /// An existing buffer with an explicit open mode.
    FromBufferAndMode(Buffer, OpenMode),
}

impl From<Buffer> for StreamConfig {
    fn from(buffer: Buffer) -> Self {
        Self::FromBuffer(buffer)
    }
}

impl From<&str> for StreamConfig {
    fn from(s: &str) -> Self {
        Self::FromBuffer(Buffer::from(s))
    }
}

/// Reference point for [`StringStream::seek`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Whence {
    #[default]
    Start,
    Current,
    End,
}

impl Whence {
    /// Maps `SEEK_SET`, `SEEK_CUR` and `SEEK_END` (0, 1, 2).
    pub fn from_raw(whence: i32) -> Result<Self> {
        match whence {
            0 => Ok(Self::Start),
            1 => Ok(Self::Current),
            2 => Ok(Self::End),
            _ => Err(InvalidValueError::InvalidWhence(whence).into()),
        }
    }
}

/// A file-like stream over an in-memory byte buffer.
///
/// Any number of streams (and [`Buffer`] clones) may share one buffer; each
/// stream keeps its own position, line counter and mode. A write through
/// one stream is visible to all the others.
///
/// ```rust
/// use memstream::{Separator, StringStream, Whence};
///
/// let mut stream = StringStream::with_buffer("hello\nworld\n");
/// assert_eq!(stream.gets().unwrap().unwrap(), "hello\n");
///
/// stream.seek(0, Whence::End).unwrap();
/// stream.write("!\n").unwrap();
///
/// stream.rewind();
/// let lines = stream.readlines(Separator::Default, None).unwrap();
/// assert_eq!(lines.len(), 3);
/// ```
///
/// Handles are `!Send`: a buffer shared between handles must stay on one
/// thread.
pub struct StringStream {
    buffer: Option<Buffer>,
    encoding: Encoding,
    cursor: Cursor,
    mode: ModeState,
    options: StreamOptions,
}

impl StringStream {
    /// A stream over a fresh empty UTF-8 buffer, open for reading and writing.
    #[must_use]
    pub fn new() -> Self {
        let options = StreamOptions::default();
        let buffer = Buffer::with_encoding(Vec::new(), options.default_encoding);
        Self::from_parts(buffer, Mode::READ_WRITE, options)
    }

    /// A stream over `buffer`, read-only if the buffer is frozen.
    #[must_use]
    pub fn with_buffer(buffer: impl Into<Buffer>) -> Self {
        let buffer = buffer.into();
        let mode = default_mode(&buffer);
        Self::from_parts(buffer, mode, StreamOptions::default())
    }

    /// A stream over `buffer` opened with an explicit mode.
    ///
    /// ```rust
    /// use memstream::{Buffer, StringStream};
    ///
    /// let buffer = Buffer::from("old contents");
    /// let mut stream = StringStream::open(buffer.clone(), "w").unwrap();
    /// assert!(buffer.is_empty());
    /// stream.write("new").unwrap();
    /// assert_eq!(buffer.to_vec(), b"new");
    /// ```
    pub fn open(buffer: impl Into<Buffer>, mode: impl Into<OpenMode>) -> Result<Self> {
        Self::from_config(
            StreamConfig::FromBufferAndMode(buffer.into(), mode.into()),
            StreamOptions::default(),
        )
    }

    pub fn from_config(config: StreamConfig, options: StreamOptions) -> Result<Self> {
        let mut stream = Self {
            buffer: None,
            encoding: options.default_encoding,
            cursor: Cursor::default(),
            mode: ModeState::new(Mode::empty()),
            options,
        };
        stream.init(config)?;
        Ok(stream)
    }

    fn from_parts(buffer: Buffer, mode: Mode, options: StreamOptions) -> Self {
        let encoding = stream_encoding(&buffer, mode);
        Self {
            buffer: Some(buffer),
            encoding,
            cursor: Cursor::default(),
            mode: ModeState::new(mode),
            options,
        }
    }

    /// Attaches the stream to the buffer `config` names.
    ///
    /// Validation happens before anything changes: on error the stream is
    /// left as it was.
    fn init(&mut self, config: StreamConfig) -> Result<()> {
        let (buffer, mode) = match config {
            StreamConfig::Empty => (
                Buffer::with_encoding(Vec::new(), self.options.default_encoding),
                Mode::READ_WRITE,
            ),
            StreamConfig::FromBuffer(buffer) => {
                let mode = default_mode(&buffer);
                (buffer, mode)
            }
            StreamConfig::FromBufferAndMode(buffer, open) => {
                let mode = open.to_mode()?;
                if mode.contains(Mode::WRITABLE) && buffer.is_frozen() {
                    return Err(StreamError::PermissionDenied);
                }
                if mode.contains(Mode::TRUNCATE) {
                    buffer.borrow_mut().resize(0)?;
                }
                (buffer, mode)
            }
        };

        self.encoding = stream_encoding(&buffer, mode);
        self.buffer = Some(buffer);
        self.mode = ModeState::new(mode);
        self.cursor.reset();
        Ok(())
    }

    /// Re-initialises this stream in place.
    ///
    /// Position, line counter and closed sides are all reset. Other streams
    /// sharing the previous buffer are unaffected.
    pub fn reopen(&mut self, config: StreamConfig) -> Result<()> {
        self.init(config)
    }

    /// Turns this stream into a duplicate of `other`.
    pub fn reopen_from(&mut self, other: &StringStream) {
        *self = other.duplicate();
    }

    /// A new stream sharing this stream's buffer.
    ///
    /// Mode, closed sides, encoding, options, position and line counter are
    /// copied; from then on the two cursors move independently.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            buffer: self.buffer.clone(),
            encoding: self.encoding,
            cursor: self.cursor,
            mode: self.mode,
            options: self.options.clone(),
        }
    }

    /// Runs `f` with this stream, then detaches it from its buffer.
    ///
    /// Detachment happens however `f` exits, including by panic. Afterwards
    /// both sides are closed and [`buffer`](Self::buffer) is `None`.
    pub fn scoped<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let mut guard = DetachGuard { stream: self };
        f(&mut *guard.stream)
    }

    /// Creates a stream, runs `f` with it and detaches it afterwards.
    ///
    /// ```rust
    /// use memstream::{Buffer, StreamConfig, StreamOptions, StringStream};
    ///
    /// let buffer = Buffer::from("abc");
    /// let len = StringStream::open_with(
    ///     StreamConfig::FromBuffer(buffer.clone()),
    ///     StreamOptions::default(),
    ///     |stream| stream.read(None).unwrap().unwrap().len(),
    /// )
    /// .unwrap();
    /// assert_eq!(len, 3);
    /// assert_eq!(buffer.sharers(), 1);
    /// ```
    pub fn open_with<R>(
        config: StreamConfig,
        options: StreamOptions,
        f: impl FnOnce(&mut Self) -> R,
    ) -> Result<R> {
        let mut stream = Self::from_config(config, options)?;
        Ok(stream.scoped(f))
    }

    fn detach(&mut self) {
        self.buffer = None;
        self.mode.close();
    }

    // Lifecycle

    /// Closes both sides. Closing a closed stream does nothing.
    pub fn close(&mut self) {
        self.mode.close();
    }

    /// Closes the read side; fails if the stream was never readable.
    pub fn close_read(&mut self) -> Result<()> {
        self.mode.close_read()
    }

    /// Closes the write side; fails if the stream was never writable.
    pub fn close_write(&mut self) -> Result<()> {
        self.mode.close_write()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.mode.closed()
    }

    #[must_use]
    pub fn is_closed_read(&self) -> bool {
        !self.mode.readable()
    }

    #[must_use]
    pub fn is_closed_write(&self) -> bool {
        !self.mode.writable()
    }

    #[must_use]
    pub fn is_readable(&self) -> bool {
        self.mode.readable()
    }

    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.mode.writable()
    }

    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.mode.lifecycle()
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode.mode()
    }

    // Positioning

    #[must_use]
    pub fn pos(&self) -> usize {
        self.cursor.pos
    }

    #[must_use]
    pub fn tell(&self) -> usize {
        self.pos()
    }

    /// Moves to an absolute position. Positions past the end are allowed.
    pub fn set_pos(&mut self, pos: i64) -> Result<()> {
        self.cursor.set_pos(pos)
    }

    /// Moves relative to `whence` and returns the new position.
    pub fn seek(&mut self, offset: i64, whence: Whence) -> Result<usize> {
        let buffer = attached(self.buffer.as_ref())?;
        if self.mode.closed() {
            return Err(IoError::ClosedStream.into());
        }

        let base = match whence {
            Whence::Start => 0,
            Whence::Current => self.cursor.pos,
            Whence::End => buffer.len(),
        };
        let base = i64::try_from(base).map_err(|_| InvalidValueError::OutOfRange(offset))?;
        let target = base
            .checked_add(offset)
            .ok_or(InvalidValueError::OutOfRange(offset))?;

        self.cursor.set_pos(target)?;
        Ok(self.cursor.pos)
    }

    /// Resets position and line counter to zero.
    pub fn rewind(&mut self) {
        self.cursor.reset();
    }

    /// Whether the position is at or past the end of the buffer.
    pub fn eof(&self) -> Result<bool> {
        self.mode.check_readable()?;
        Ok(self.cursor.pos >= attached(self.buffer.as_ref())?.len())
    }

    // Metadata

    #[must_use]
    pub fn lineno(&self) -> i64 {
        self.cursor.lineno
    }

    pub fn set_lineno(&mut self, lineno: i64) {
        self.cursor.lineno = lineno;
    }

    #[must_use]
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    #[must_use]
    pub fn external_encoding(&self) -> Encoding {
        self.encoding
    }

    /// Always `None`: nothing is transcoded on read.
    #[must_use]
    pub fn internal_encoding(&self) -> Option<Encoding> {
        None
    }

    /// Changes the stream's encoding, falling back to the configured default.
    ///
    /// A writable stream also retags its buffer.
    pub fn set_encoding(&mut self, encoding: Option<Encoding>) -> Result<()> {
        let encoding = encoding.unwrap_or(self.options.default_encoding);
        if self.mode.writable() {
            if let Some(buffer) = &self.buffer {
                buffer.borrow_mut().set_encoding(encoding)?;
            }
        }
        self.encoding = encoding;
        Ok(())
    }

    /// Length of the buffer in bytes.
    pub fn size(&self) -> Result<usize> {
        Ok(attached(self.buffer.as_ref())?.len())
    }

    /// The attached buffer, `None` once detached.
    #[must_use]
    pub fn buffer(&self) -> Option<&Buffer> {
        self.buffer.as_ref()
    }

    /// Points this stream at another buffer.
    ///
    /// The mode becomes read-write, or read-only for a frozen buffer. Position
    /// and line counter reset, the encoding follows the new buffer, and sides
    /// closed earlier stay closed.
    pub fn set_buffer(&mut self, buffer: impl Into<Buffer>) {
        let buffer = buffer.into();
        self.mode.set_mode(default_mode(&buffer));
        self.encoding = buffer.encoding();
        self.buffer = Some(buffer);
        self.cursor.reset();
    }

    #[must_use]
    pub fn options(&self) -> &StreamOptions {
        &self.options
    }

    #[must_use]
    pub fn is_tty(&self) -> bool {
        false
    }

    #[must_use]
    pub fn sync(&self) -> bool {
        true
    }

    #[must_use]
    pub fn fileno(&self) -> Option<i32> {
        None
    }

    /// Does nothing; bytes are never translated.
    pub fn binmode(&mut self) -> &mut Self {
        self
    }

    pub fn flush(&mut self) {}

    #[must_use]
    pub fn fsync(&mut self) -> i32 {
        0
    }
}

impl Default for StringStream {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for StringStream {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StringStream")
            .field("buffer", &self.buffer)
            .field("encoding", &self.encoding)
            .field("pos", &self.cursor.pos)
            .field("lineno", &self.cursor.lineno)
            .field("lifecycle", &self.mode.lifecycle())
            .finish_non_exhaustive()
    }
}

struct DetachGuard<'s> {
    stream: &'s mut StringStream,
}

impl Drop for DetachGuard<'_> {
    fn drop(&mut self) {
        self.stream.detach();
    }
}

fn default_mode(buffer: &Buffer) -> Mode {
    if buffer.is_frozen() {
        Mode::READABLE
    } else {
        Mode::READ_WRITE
    }
}

fn stream_encoding(buffer: &Buffer, mode: Mode) -> Encoding {
    if mode.contains(Mode::BINARY) {
        Encoding::Binary
    } else {
        buffer.encoding()
    }
}

/// The buffer of a stream that has not been detached.
pub(crate) fn attached(buffer: Option<&Buffer>) -> Result<&Buffer> {
    buffer.ok_or(StreamError::Io(IoError::NotOpened))
}
