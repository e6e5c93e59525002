//! Shared, growable byte storage.
//!
//! A [`Buffer`] is a reference-counted cell: cloning it, or duplicating a
//! stream attached to it, adds a sharer, and a mutation through any sharer is
//! visible to all of them. Inside the cell the bytes sit in an `Rc<Vec<u8>>`
//! so reads can hand out [`ByteView`]s without copying; a write made while
//! views are alive copies the storage first.

use alloc::{rc::Rc, string::String, vec::Vec};
use core::{
    cell::{Ref, RefCell, RefMut},
    fmt,
};

use bstr::ByteSlice;

use crate::{
    encoding::Encoding,
    error::{InvalidValueError, IoError, Result, StreamError},
    view::ByteView,
};

#[derive(Clone)]
pub struct Buffer {
    cell: Rc<RefCell<BufferCell>>,
}

pub(crate) struct BufferCell {
    storage: Rc<Vec<u8>>,
    encoding: Encoding,
    frozen: bool,
}

impl Buffer {
    /// An empty, mutable UTF-8 buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::with_encoding(Vec::new(), Encoding::Utf8)
    }

    #[must_use]
    pub fn with_encoding(bytes: impl Into<Vec<u8>>, encoding: Encoding) -> Self {
        Self {
            cell: Rc::new(RefCell::new(BufferCell {
                storage: Rc::new(bytes.into()),
                encoding,
                frozen: false,
            })),
        }
    }

    /// A buffer that rejects every write, resize and push-back.
    #[must_use]
    pub fn frozen(bytes: impl Into<Vec<u8>>, encoding: Encoding) -> Self {
        let buffer = Self::with_encoding(bytes, encoding);
        buffer.freeze();
        buffer
    }

    /// Makes the buffer immutable for every sharer. There is no way back.
    pub fn freeze(&self) {
        self.cell.borrow_mut().frozen = true;
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.cell.borrow().frozen
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cell.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn encoding(&self) -> Encoding {
        self.cell.borrow().encoding
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        self.cell.borrow().bytes().to_vec()
    }

    /// A view of the current contents that does not change with later writes.
    #[must_use]
    pub fn snapshot(&self) -> ByteView {
        let cell = self.cell.borrow();
        cell.view(0, cell.len(), cell.encoding)
    }

    /// Appends bytes at the end, outside of any stream cursor.
    pub fn append(&self, bytes: &[u8]) -> Result<()> {
        self.cell.borrow_mut().make_mut()?.extend_from_slice(bytes);
        Ok(())
    }

    /// Whether both handles refer to the same cell.
    #[must_use]
    pub fn ptr_eq(&self, other: &Buffer) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }

    /// Number of handles (streams and `Buffer` clones) sharing this cell.
    #[must_use]
    pub fn sharers(&self) -> usize {
        Rc::strong_count(&self.cell)
    }

    pub(crate) fn borrow(&self) -> Ref<'_, BufferCell> {
        self.cell.borrow()
    }

    pub(crate) fn borrow_mut(&self) -> RefMut<'_, BufferCell> {
        self.cell.borrow_mut()
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for Buffer {
    fn from(s: &str) -> Self {
        Self::with_encoding(s.as_bytes(), Encoding::Utf8)
    }
}

impl From<String> for Buffer {
    fn from(s: String) -> Self {
        Self::with_encoding(s.into_bytes(), Encoding::Utf8)
    }
}

impl From<&[u8]> for Buffer {
    fn from(bytes: &[u8]) -> Self {
        Self::with_encoding(bytes, Encoding::Binary)
    }
}

impl From<Vec<u8>> for Buffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::with_encoding(bytes, Encoding::Binary)
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cell = self.cell.borrow();
        f.debug_struct("Buffer")
            .field("bytes", &cell.bytes().as_bstr())
            .field("encoding", &cell.encoding)
            .field("frozen", &cell.frozen)
            .finish()
    }
}

impl BufferCell {
    pub(crate) fn bytes(&self) -> &[u8] {
        &self.storage
    }

    pub(crate) fn len(&self) -> usize {
        self.storage.len()
    }

    pub(crate) fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub(crate) fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub(crate) fn set_encoding(&mut self, encoding: Encoding) -> Result<()> {
        self.ensure_modifiable()?;
        self.encoding = encoding;
        Ok(())
    }

    pub(crate) fn view(&self, start: usize, end: usize, encoding: Encoding) -> ByteView {
        ByteView::new(Rc::clone(&self.storage), start, end, encoding)
    }

    pub(crate) fn ensure_modifiable(&self) -> Result<()> {
        if self.frozen {
            return Err(IoError::NotModifiable.into());
        }
        Ok(())
    }

    /// Marks the storage as about to mutate, copying it if views share it.
    pub(crate) fn make_mut(&mut self) -> Result<&mut Vec<u8>> {
        self.ensure_modifiable()?;
        Ok(Rc::make_mut(&mut self.storage))
    }

    /// Makes room for `len` bytes at `pos`, zero-filling any gap between the
    /// current end and `pos`.
    pub(crate) fn extend(&mut self, pos: usize, len: usize) -> Result<&mut Vec<u8>> {
        let end = pos.checked_add(len).ok_or_else(|| out_of_range(pos))?;
        let storage = self.make_mut()?;
        grow_zeroed(storage, end)?;
        Ok(storage)
    }

    /// Sets the length to exactly `len`, zero-filling when growing.
    pub(crate) fn resize(&mut self, len: usize) -> Result<()> {
        let storage = self.make_mut()?;
        grow_zeroed(storage, len)?;
        storage.truncate(len);
        Ok(())
    }
}

/// Zero-fills `storage` up to `len` bytes. Shorter lengths leave it alone.
///
/// A length that cannot be allocated is reported as out of range and the
/// storage is not changed.
pub(crate) fn grow_zeroed(storage: &mut Vec<u8>, len: usize) -> Result<()> {
    if let Some(additional) = len.checked_sub(storage.len()) {
        storage
            .try_reserve(additional)
            .map_err(|_| out_of_range(len))?;
        storage.resize(len, 0);
    }
    Ok(())
}

fn out_of_range(len: usize) -> StreamError {
    InvalidValueError::OutOfRange(i64::try_from(len).unwrap_or(i64::MAX)).into()
}
