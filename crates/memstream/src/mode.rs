//! Open modes and the read/write lifecycle of a handle.
//!
//! A handle's capabilities come from two places: the [`Mode`] it was opened
//! with, and which of its sides are still open. `close_read` and
//! `close_write` shut one side each; a handle with neither side usable is
//! closed but still answers position and metadata queries.

use alloc::string::{String, ToString};

use crate::error::{ArgumentError, IoError, Result};

/// POSIX `O_RDONLY`.
pub const O_RDONLY: i32 = 0;
/// POSIX `O_WRONLY`.
pub const O_WRONLY: i32 = 1;
/// POSIX `O_RDWR`.
pub const O_RDWR: i32 = 2;
/// POSIX `O_TRUNC` (Linux value).
pub const O_TRUNC: i32 = 0o1000;
/// POSIX `O_APPEND` (Linux value).
pub const O_APPEND: i32 = 0o2000;

const O_ACCMODE: i32 = 3;

bitflags::bitflags! {
    /// Capabilities and open-time behaviour selected by an open mode.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Mode: u8 {
        const READABLE = 1 << 0;
        const WRITABLE = 1 << 1;
        /// Every write first moves the position to the end of the buffer.
        const APPEND   = 1 << 2;
        /// The buffer is emptied when the handle is opened.
        const TRUNCATE = 1 << 3;
        const BINARY   = 1 << 4;

        const READ_WRITE = Self::READABLE.bits() | Self::WRITABLE.bits();
    }
}

impl Mode {
    /// Parses an `fopen`-style mode string.
    ///
    /// The first character must be `r`, `w` or `a`. A `+` anywhere after it
    /// opens both sides and a `b` sets [`Mode::BINARY`]; anything else
    /// (text markers, `:encoding` suffixes) is ignored.
    pub fn parse_str(mode: &str) -> Result<Self, ArgumentError> {
        let mut chars = mode.chars();
        let mut flags = match chars.next() {
            Some('r') => Self::READABLE,
            Some('w') => Self::WRITABLE | Self::TRUNCATE,
            Some('a') => Self::WRITABLE | Self::APPEND,
            _ => return Err(ArgumentError::InvalidMode(mode.to_string())),
        };

        for ch in chars {
            match ch {
                '+' => flags |= Self::READ_WRITE,
                'b' => flags |= Self::BINARY,
                ':' => break,
                _ => {}
            }
        }

        Ok(flags)
    }

    /// Converts POSIX `open(2)` flag bits.
    pub fn from_posix_flags(oflags: i32) -> Result<Self, ArgumentError> {
        let mut flags = match oflags & O_ACCMODE {
            O_RDONLY => Self::READABLE,
            O_WRONLY => Self::WRITABLE,
            O_RDWR => Self::READ_WRITE,
            _ => return Err(ArgumentError::InvalidMode(oflags.to_string())),
        };
        if oflags & O_TRUNC != 0 {
            flags |= Self::TRUNCATE;
        }
        if oflags & O_APPEND != 0 {
            flags |= Self::APPEND;
        }
        Ok(flags)
    }
}

/// An open mode as a caller supplies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenMode {
    /// POSIX `O_*` flag bits.
    Flags(i32),
    /// A mode string such as `"r+"` or `"a"`.
    Str(String),
}

impl OpenMode {
    pub fn to_mode(&self) -> Result<Mode, ArgumentError> {
        match self {
            Self::Flags(oflags) => Mode::from_posix_flags(*oflags),
            Self::Str(s) => Mode::parse_str(s),
        }
    }
}

impl From<i32> for OpenMode {
    fn from(oflags: i32) -> Self {
        Self::Flags(oflags)
    }
}

impl From<&str> for OpenMode {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for OpenMode {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<Mode> for OpenMode {
    fn from(mode: Mode) -> Self {
        let mut oflags = match (mode.contains(Mode::READABLE), mode.contains(Mode::WRITABLE)) {
            (true, true) => O_RDWR,
            (false, true) => O_WRONLY,
            _ => O_RDONLY,
        };
        if mode.contains(Mode::TRUNCATE) {
            oflags |= O_TRUNC;
        }
        if mode.contains(Mode::APPEND) {
            oflags |= O_APPEND;
        }
        Self::Flags(oflags)
    }
}

/// Where a handle is in its read/write lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    Open { readable: bool, writable: bool },
    /// The read side was closed; the write side is still usable.
    ClosedRead,
    /// The write side was closed; the read side is still usable.
    ClosedWrite,
    Closed,
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    struct Sides: u8 {
        const READ  = 1 << 0;
        const WRITE = 1 << 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ModeState {
    mode: Mode,
    open: Sides,
}

impl ModeState {
    pub(crate) fn new(mode: Mode) -> Self {
        Self {
            mode,
            open: Sides::all(),
        }
    }

    pub(crate) fn mode(self) -> Mode {
        self.mode
    }

    /// Replaces the open mode, leaving closed sides closed.
    pub(crate) fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub(crate) fn readable(self) -> bool {
        self.mode.contains(Mode::READABLE) && self.open.contains(Sides::READ)
    }

    pub(crate) fn writable(self) -> bool {
        self.mode.contains(Mode::WRITABLE) && self.open.contains(Sides::WRITE)
    }

    pub(crate) fn closed(self) -> bool {
        !self.readable() && !self.writable()
    }

    pub(crate) fn appending(self) -> bool {
        self.mode.contains(Mode::APPEND)
    }

    pub(crate) fn check_readable(self) -> Result<()> {
        if self.readable() {
            Ok(())
        } else {
            Err(IoError::NotOpenedForReading.into())
        }
    }

    pub(crate) fn check_writable(self) -> Result<()> {
        if self.writable() {
            Ok(())
        } else {
            Err(IoError::NotOpenedForWriting.into())
        }
    }

    pub(crate) fn close(&mut self) {
        self.open = Sides::empty();
    }

    pub(crate) fn close_read(&mut self) -> Result<()> {
        if !self.mode.contains(Mode::READABLE) {
            return Err(IoError::NotOpenedForReading.into());
        }
        self.open.remove(Sides::READ);
        Ok(())
    }

    pub(crate) fn close_write(&mut self) -> Result<()> {
        if !self.mode.contains(Mode::WRITABLE) {
            return Err(IoError::NotOpenedForWriting.into());
        }
        self.open.remove(Sides::WRITE);
        Ok(())
    }

    pub(crate) fn lifecycle(self) -> Lifecycle {
        if self.closed() {
            Lifecycle::Closed
        } else if self.mode.contains(Mode::READABLE) && !self.open.contains(Sides::READ) {
            Lifecycle::ClosedRead
        } else if self.mode.contains(Mode::WRITABLE) && !self.open.contains(Sides::WRITE) {
            Lifecycle::ClosedWrite
        } else {
            Lifecycle::Open {
                readable: self.readable(),
                writable: self.writable(),
            }
        }
    }
}
