//! `std::io` adapters.
//!
//! These let a [`StringStream`] stand in wherever a reader, writer or
//! seekable stream is expected. Failures surface as `std::io::Error`s
//! wrapping the [`StreamError`] that caused them.

use std::io;

use crate::{
    error::{ErrorKind, IoError, StreamError},
    stream::{StringStream, Whence},
};

impl From<StreamError> for io::Error {
    fn from(err: StreamError) -> Self {
        let kind = match err.kind() {
            ErrorKind::Argument | ErrorKind::InvalidValue => io::ErrorKind::InvalidInput,
            ErrorKind::PermissionDenied => io::ErrorKind::PermissionDenied,
            ErrorKind::Eof => io::ErrorKind::UnexpectedEof,
            ErrorKind::Encoding => io::ErrorKind::InvalidData,
            ErrorKind::Io => match err {
                StreamError::Io(IoError::NotModifiable) => io::ErrorKind::ReadOnlyFilesystem,
                _ => io::ErrorKind::Other,
            },
        };
        io::Error::new(kind, err)
    }
}

impl io::Read for StringStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let len = i64::try_from(buf.len()).unwrap_or(i64::MAX);
        match StringStream::read(self, Some(len))? {
            Some(view) => {
                buf[..view.len()].copy_from_slice(&view);
                Ok(view.len())
            }
            None => Ok(0),
        }
    }
}

impl io::Write for StringStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(StringStream::write(self, buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        StringStream::flush(self);
        Ok(())
    }
}

impl io::Seek for StringStream {
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        let (offset, whence) = match pos {
            io::SeekFrom::Start(offset) => (
                i64::try_from(offset).map_err(|_| {
                    io::Error::new(io::ErrorKind::InvalidInput, "seek offset out of range")
                })?,
                Whence::Start,
            ),
            io::SeekFrom::Current(offset) => (offset, Whence::Current),
            io::SeekFrom::End(offset) => (offset, Whence::End),
        };
        let pos = StringStream::seek(self, offset, whence)?;
        Ok(pos as u64)
    }
}
