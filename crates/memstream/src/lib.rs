//! In-memory, file-like byte streams.
//!
//! A [`StringStream`] reads and writes a shared [`Buffer`] the way a file
//! handle reads and writes a file: it has a position, an open mode with
//! independently closable read and write sides, a line counter, line reads
//! with configurable separators, byte and character push-back, and
//! truncation. Reads return [`ByteView`]s that share the buffer's storage.
//!
//! ```rust
//! use memstream::{Buffer, Separator, StringStream};
//!
//! let buffer = Buffer::from("a--b--c");
//! let mut reader = StringStream::with_buffer(buffer.clone());
//! let mut writer = reader.duplicate();
//!
//! writer.set_pos(7).unwrap();
//! writer.write("--d").unwrap();
//!
//! let parts: Vec<_> = reader.lines("--", None).unwrap().collect();
//! assert_eq!(parts, ["a--", "b--", "c--", "d"]);
//! assert_eq!(buffer.to_vec(), b"a--b--c--d");
//! ```
//!
//! The crate is `no_std` with `alloc`; the `std` feature adds
//! `std::io::{Read, Write, Seek}` implementations.

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod buffer;
mod cursor;
mod encoding;
mod error;
mod mode;
mod options;
mod stream;
mod view;

#[cfg(feature = "fuzzing")]
pub mod scanner;
#[cfg(not(feature = "fuzzing"))]
mod scanner;

#[cfg(feature = "std")]
mod io;

#[cfg(test)]
mod tests;

pub use buffer::Buffer;
pub use encoding::{EncodedBytes, Encoding};
pub use error::{
    ArgumentError, EncodingError, ErrorKind, InvalidValueError, IoError, Result, StreamError,
};
pub use mode::{Lifecycle, Mode, O_APPEND, O_RDONLY, O_RDWR, O_TRUNC, O_WRONLY, OpenMode};
pub use options::StreamOptions;
pub use scanner::Separator;
pub use stream::{ByteInput, Bytes, Chars, Lines, StreamConfig, StringStream, Whence};
pub use view::ByteView;

/// Substring search used by multi-byte line separators.
pub mod search {
    pub use crate::scanner::Horspool;
}
