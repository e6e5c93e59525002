use alloc::vec::Vec;

use super::{StringStream, attached};
use crate::{
    error::{ArgumentError, Result, StreamError},
    scanner::{self, Separator},
    view::ByteView,
};

impl StringStream {
    /// Reads the next line.
    ///
    /// `limit` caps the line at that many bytes, widened to the end of a
    /// character split by the cap. `Some(0)` returns an empty view without
    /// moving. `None` is returned at end of data, whatever the separator or
    /// limit.
    ///
    /// ```rust
    /// use memstream::StringStream;
    ///
    /// let mut stream = StringStream::with_buffer("abcxyzdef");
    /// assert_eq!(stream.getline("xyz", None).unwrap().unwrap(), "abcxyz");
    /// assert_eq!(stream.pos(), 6);
    /// assert_eq!(stream.getline("xyz", None).unwrap().unwrap(), "def");
    /// assert_eq!(stream.getline("xyz", None).unwrap(), None);
    /// ```
    pub fn getline<'a>(
        &mut self,
        sep: impl Into<Separator<'a>>,
        limit: Option<i64>,
    ) -> Result<Option<ByteView>> {
        let sep = sep.into();
        self.mode.check_readable()?;
        let limit = match limit {
            Some(n) if n < 0 => return Err(ArgumentError::NegativeLimit(n).into()),
            Some(n) => Some(usize::try_from(n).unwrap_or(usize::MAX)),
            None => None,
        };

        let pos = self.cursor.pos;
        let cell = attached(self.buffer.as_ref())?.borrow();
        if pos >= cell.len() {
            return Ok(None);
        }
        if limit == Some(0) {
            return Ok(Some(ByteView::empty(self.encoding)));
        }

        let mode = sep.resolve(self.options.default_separator());
        let Some(line) = scanner::scan_line(cell.bytes(), pos, limit, mode, self.encoding) else {
            return Ok(None);
        };
        let view = cell.view(line.start, line.end, self.encoding);
        drop(cell);

        self.cursor.pos = line.end;
        self.cursor.next_line();
        Ok(Some(view))
    }

    /// Reads the next line using the configured separator.
    pub fn gets(&mut self) -> Result<Option<ByteView>> {
        self.getline(Separator::Default, None)
    }

    /// Like [`getline`](Self::getline), failing with [`StreamError::Eof`] at
    /// end of data.
    pub fn readline<'a>(
        &mut self,
        sep: impl Into<Separator<'a>>,
        limit: Option<i64>,
    ) -> Result<ByteView> {
        self.getline(sep, limit)?.ok_or(StreamError::Eof)
    }

    /// Reads all remaining lines.
    pub fn readlines<'a>(
        &mut self,
        sep: impl Into<Separator<'a>>,
        limit: Option<i64>,
    ) -> Result<Vec<ByteView>> {
        let sep = sep.into();
        check_iteration_limit(limit)?;
        let mut lines = Vec::new();
        while let Some(line) = self.getline(sep, limit)? {
            lines.push(line);
        }
        Ok(lines)
    }

    pub fn each_line<'a>(
        &mut self,
        sep: impl Into<Separator<'a>>,
        limit: Option<i64>,
        mut f: impl FnMut(ByteView),
    ) -> Result<()> {
        let sep = sep.into();
        check_iteration_limit(limit)?;
        while let Some(line) = self.getline(sep, limit)? {
            f(line);
        }
        Ok(())
    }

    /// Iterator over the remaining lines.
    ///
    /// Arguments are checked up front; the iterator itself cannot fail.
    pub fn lines<'a>(
        &mut self,
        sep: impl Into<Separator<'a>>,
        limit: Option<i64>,
    ) -> Result<Lines<'_, 'a>> {
        self.mode.check_readable()?;
        check_iteration_limit(limit)?;
        if let Some(n) = limit.filter(|n| *n < 0) {
            return Err(ArgumentError::NegativeLimit(n).into());
        }
        Ok(Lines {
            stream: self,
            sep: sep.into(),
            limit,
        })
    }
}

fn check_iteration_limit(limit: Option<i64>) -> Result<()> {
    if limit == Some(0) {
        return Err(ArgumentError::ZeroLimit.into());
    }
    Ok(())
}

/// Iterator returned by [`StringStream::lines`].
#[derive(Debug)]
pub struct Lines<'s, 'a> {
    stream: &'s mut StringStream,
    sep: Separator<'a>,
    limit: Option<i64>,
}

impl Iterator for Lines<'_, '_> {
    type Item = ByteView;

    fn next(&mut self) -> Option<ByteView> {
        self.stream.getline(self.sep, self.limit).ok().flatten()
    }
}
