use alloc::{rc::Rc, vec::Vec};
use core::{fmt, ops::Deref};

use bstr::{BStr, ByteSlice};

use crate::encoding::Encoding;

/// A read-only window over buffer storage.
///
/// Views share the bytes they were cut from instead of copying them. The
/// buffer copies its storage on the next write while any view is alive, so a
/// view's contents never change after it was produced.
#[derive(Clone)]
pub struct ByteView {
    storage: Rc<Vec<u8>>,
    start: usize,
    end: usize,
    encoding: Encoding,
}

impl ByteView {
    pub(crate) fn new(storage: Rc<Vec<u8>>, start: usize, end: usize, encoding: Encoding) -> Self {
        debug_assert!(start <= end && end <= storage.len(), "view out of bounds");
        Self {
            storage,
            start,
            end,
            encoding,
        }
    }

    #[must_use]
    pub fn empty(encoding: Encoding) -> Self {
        Self::new(Rc::new(Vec::new()), 0, 0, encoding)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage[self.start..self.end]
    }

    #[must_use]
    pub fn as_bstr(&self) -> &BStr {
        self.as_bytes().as_bstr()
    }

    #[must_use]
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    /// Whether both views are backed by the same storage allocation.
    #[must_use]
    pub fn shares_storage_with(&self, other: &ByteView) -> bool {
        Rc::ptr_eq(&self.storage, &other.storage)
    }
}

impl Deref for ByteView {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for ByteView {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl<T: AsRef<[u8]> + ?Sized> PartialEq<T> for ByteView {
    fn eq(&self, other: &T) -> bool {
        self.as_bytes() == other.as_ref()
    }
}

impl Eq for ByteView {}

impl fmt::Debug for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_bstr(), f)
    }
}

impl fmt::Display for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_bstr(), f)
    }
}
