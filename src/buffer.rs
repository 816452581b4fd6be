//! Growable byte buffers that documents are built into.
//!
//! A [`Buffer`] is exclusively owned by whoever holds it and grows on demand up to a hard
//! ceiling. Once a document has been finalized, its storage is handed off with
//! [`Buffer::release`] into a [`SharedBuffer`], which any number of
//! [`Document`](crate::Document)s may alias. Borrowed, read-only views of BSON bytes are plain
//! `&[u8]` / [`&RawDocument`](crate::RawDocument) values and cannot be written through.

use std::{fmt, sync::Arc};

use crate::{
    error::{Error, ErrorKind, Result},
    size::BUFFER_MAX_SIZE,
};

/// An exclusively owned, growable byte buffer with a maximum size guard.
///
/// Writes that would take the buffer past [`Buffer::max_size`] fail with
/// [`ErrorKind::BufferOverflow`]. Builders writing into a buffer do not surface each failure
/// individually; instead the first failure poisons the buffer, later writes are skipped, and the
/// error is reported when the document is finalized.
///
/// ```
/// use bson_builder::Buffer;
///
/// let mut buf = Buffer::new();
/// buf.append_i32(0)?;
/// buf.append(b"\x00")?;
/// buf.write_i32_at(0, buf.len() as i32)?;
/// assert_eq!(buf.as_bytes(), b"\x05\x00\x00\x00\x00");
/// # Ok::<(), bson_builder::error::Error>(())
/// ```
#[derive(Clone, PartialEq)]
pub struct Buffer {
    data: Vec<u8>,
    max_size: usize,
    error: Option<Error>,
}

impl Buffer {
    /// The capacity a buffer is allocated with when none is specified.
    pub const DEFAULT_CAPACITY: usize = 512;

    /// Creates an empty buffer with [`Buffer::DEFAULT_CAPACITY`] bytes preallocated.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates an empty buffer with at least `capacity` bytes preallocated.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_vec(Vec::with_capacity(capacity.min(BUFFER_MAX_SIZE)))
    }

    /// Seeds a buffer with existing bytes, keeping their allocation.
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self {
            data,
            max_size: BUFFER_MAX_SIZE,
            error: None,
        }
    }

    /// Sets the hard ceiling this buffer may grow to.
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    /// The hard ceiling this buffer may grow to.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// The number of bytes written so far.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The number of bytes the buffer can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// The bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// A pointer to the start of the underlying allocation.
    pub fn as_ptr(&self) -> *const u8 {
        self.data.as_ptr()
    }

    fn reserve(&mut self, additional: usize) -> Result<()> {
        let requested = self.data.len().saturating_add(additional);
        if requested > self.max_size {
            return Err(ErrorKind::BufferOverflow {
                requested,
                max: self.max_size,
            }
            .into());
        }
        self.data.try_reserve(additional).map_err(|_| {
            Error::from(ErrorKind::BufferOverflow {
                requested,
                max: self.max_size,
            })
        })
    }

    /// Writes `bytes` at the end of the buffer, growing it if needed.
    pub fn append(&mut self, bytes: &[u8]) -> Result<()> {
        self.reserve(bytes.len())?;
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    pub fn append_u8(&mut self, value: u8) -> Result<()> {
        self.append(&[value])
    }

    pub fn append_i32(&mut self, value: i32) -> Result<()> {
        self.append(&value.to_le_bytes())
    }

    pub fn append_i64(&mut self, value: i64) -> Result<()> {
        self.append(&value.to_le_bytes())
    }

    pub fn append_u64(&mut self, value: u64) -> Result<()> {
        self.append(&value.to_le_bytes())
    }

    pub fn append_f64(&mut self, value: f64) -> Result<()> {
        self.append(&value.to_le_bytes())
    }

    /// Writes `value` followed by a nul terminator.
    pub fn append_cstring(&mut self, value: &str) -> Result<()> {
        if value.as_bytes().contains(&0) {
            return Err(ErrorKind::InvalidFieldName {
                name: value.to_string(),
            }
            .into());
        }
        self.reserve(value.len() + 1)?;
        self.data.extend_from_slice(value.as_bytes());
        self.data.push(0);
        Ok(())
    }

    /// Writes `value` as a length-prefixed, nul-terminated BSON string.
    pub fn append_string(&mut self, value: &str) -> Result<()> {
        self.reserve(4 + value.len() + 1)?;
        self.data
            .extend_from_slice(&((value.len() + 1) as i32).to_le_bytes());
        self.data.extend_from_slice(value.as_bytes());
        self.data.push(0);
        Ok(())
    }

    /// Overwrites already-written bytes in place.
    pub fn write_at(&mut self, offset: usize, bytes: &[u8]) -> Result<()> {
        let end = offset.checked_add(bytes.len());
        match end {
            Some(end) if end <= self.data.len() => {
                self.data[offset..end].copy_from_slice(bytes);
                Ok(())
            }
            _ => Err(ErrorKind::OutOfBounds {
                offset,
                len: bytes.len(),
                buffer_len: self.data.len(),
            }
            .into()),
        }
    }

    /// Overwrites four already-written bytes with `value` in little-endian order.
    pub fn write_i32_at(&mut self, offset: usize, value: i32) -> Result<()> {
        self.write_at(offset, &value.to_le_bytes())
    }

    /// Discards everything past the first `len` bytes. Has no effect if the buffer is shorter.
    pub fn truncate(&mut self, len: usize) {
        self.data.truncate(len);
    }

    /// The error that poisoned this buffer, if any.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Returns the error that poisoned this buffer, if any.
    pub fn check(&self) -> Result<()> {
        match &self.error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    /// Marks the buffer as failed. Only the first error is kept.
    pub fn poison(&mut self, error: Error) {
        if self.error.is_none() {
            tracing::debug!(error = %error, len = self.data.len(), "buffer poisoned");
            self.error = Some(error);
        }
    }

    /// Runs a write, recording its failure instead of returning it. Once the buffer is
    /// poisoned, writes are skipped.
    pub(crate) fn sticky(&mut self, write: impl FnOnce(&mut Buffer) -> Result<()>) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = write(self) {
            self.poison(e);
        }
    }

    /// Takes the underlying bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Detaches the storage from this buffer so it can be shared read-only.
    pub fn release(self) -> SharedBuffer {
        SharedBuffer::from(self.data)
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("data", &hex::encode(&self.data))
            .field("max_size", &self.max_size)
            .field("error", &self.error)
            .finish()
    }
}

/// Reference-counted, read-only storage shared by finalized documents.
///
/// Cloning a `SharedBuffer` shares the allocation. The allocation is freed when the last clone
/// is dropped.
#[derive(Clone)]
pub struct SharedBuffer {
    data: Arc<Vec<u8>>,
}

impl SharedBuffer {
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// How many handles currently share this storage.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.data)
    }

    /// Whether this is the only handle to the storage.
    pub fn is_unique(&self) -> bool {
        self.ref_count() == 1
    }

    /// Whether both handles share the same allocation.
    pub fn ptr_eq(&self, other: &SharedBuffer) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Reclaims exclusive ownership of the storage, keeping its allocation, if this is the only
    /// handle. Otherwise the handle is returned unchanged.
    pub fn try_into_buffer(self) -> std::result::Result<Buffer, SharedBuffer> {
        Arc::try_unwrap(self.data)
            .map(Buffer::from_vec)
            .map_err(|data| SharedBuffer { data })
    }
}

impl From<Vec<u8>> for SharedBuffer {
    fn from(data: Vec<u8>) -> Self {
        Self {
            data: Arc::new(data),
        }
    }
}

impl fmt::Debug for SharedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedBuffer")
            .field("data", &hex::encode(self.data.as_slice()))
            .field("ref_count", &self.ref_count())
            .finish()
    }
}
