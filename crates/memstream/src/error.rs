use alloc::string::String;

use thiserror::Error;

use crate::encoding::Encoding;

/// Result alias used throughout the crate.
pub type Result<T, E = StreamError> = core::result::Result<T, E>;

/// Every failure a stream operation can report.
///
/// The detail enums carry the specifics; [`StreamError::kind`] gives a coarse
/// classification for callers that only need to know which family a failure
/// belongs to.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    #[error("argument error: {0}")]
    Argument(#[from] ArgumentError),
    #[error("io error: {0}")]
    Io(#[from] IoError),
    #[error("invalid value: {0}")]
    InvalidValue(#[from] InvalidValueError),
    #[error("permission denied")]
    PermissionDenied,
    #[error("end of file reached")]
    Eof,
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),
}

/// Coarse classification of a [`StreamError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Argument,
    Io,
    InvalidValue,
    PermissionDenied,
    Eof,
    Encoding,
}

impl StreamError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Argument(_) => ErrorKind::Argument,
            Self::Io(_) => ErrorKind::Io,
            Self::InvalidValue(_) => ErrorKind::InvalidValue,
            Self::PermissionDenied => ErrorKind::PermissionDenied,
            Self::Eof => ErrorKind::Eof,
            Self::Encoding(_) => ErrorKind::Encoding,
        }
    }

    /// True for the end-of-data signal raised by the `read*` variants.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("negative length {0} given")]
    NegativeLength(i64),
    #[error("negative limit {0} given")]
    NegativeLimit(i64),
    #[error("invalid limit: 0 for each_line")]
    ZeroLimit,
    #[error("invalid access mode {0}")]
    InvalidMode(String),
    #[error("invalid byte sequence in {encoding} at offset {offset}")]
    InvalidByteSequence { encoding: Encoding, offset: usize },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoError {
    #[error("not opened for reading")]
    NotOpenedForReading,
    #[error("not opened for writing")]
    NotOpenedForWriting,
    #[error("not modifiable string")]
    NotModifiable,
    #[error("not opened")]
    NotOpened,
    #[error("closed stream")]
    ClosedStream,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidValueError {
    #[error("invalid seek value {0}")]
    NegativePosition(i64),
    #[error("invalid whence {0}")]
    InvalidWhence(i32),
    #[error("negative length {0}")]
    NegativeLength(i64),
    #[error("offset {0} out of range")]
    OutOfRange(i64),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("byte 0x{byte:02X} at offset {offset} cannot be represented: {from} -> {to}")]
    Unrepresentable {
        from: Encoding,
        to: Encoding,
        byte: u8,
        offset: usize,
    },
    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),
}
