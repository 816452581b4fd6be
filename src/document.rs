//! A finalized, immutable BSON document with shared ownership of its bytes.

use std::{borrow::Borrow, fmt, ops::Deref};

use crate::{
    buffer::SharedBuffer,
    error::{Error, Result},
    raw::{BsonRef, RawDocument},
    size::SizeLimit,
    spec::ElementType,
};

/// An owned, finalized BSON document.
///
/// A `Document` is a byte range inside a [`SharedBuffer`]. It is usually the whole buffer (a
/// _rooted_ document), but a sub-document extracted with [`Document::shared_document`] keeps
/// pointing into its parent's storage instead of copying it. Cloning is cheap and shares the
/// storage; the bytes can no longer change once a `Document` exists.
///
/// All the read accessors of [`RawDocument`] are available through `Deref`.
///
/// ```
/// use bson_builder::{doc, Document};
///
/// let doc = doc! { "a" => { "b" => 1 } };
/// let a = doc.shared_document("a")?;
/// assert!(!a.is_rooted());
/// assert!(a.shares_buffer_with(&doc));
/// assert_eq!(a.get_i32("b")?, 1);
/// assert_eq!(Document::default().len(), 5);
/// # Ok::<(), bson_builder::error::Error>(())
/// ```
#[derive(Clone)]
pub struct Document {
    buf: SharedBuffer,
    start: usize,
    len: usize,
}

impl Document {
    /// The empty document, `{}`.
    pub fn new() -> Self {
        Self::copy_from(RawDocument::empty())
    }

    /// Takes ownership of encoded bytes after validating their framing and checking them against
    /// [`SizeLimit::Default`]. The allocation is kept.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_bytes_with_limit(data, SizeLimit::Default)
    }

    /// Like [`Document::from_bytes`], checking the length against `limit` instead.
    pub fn from_bytes_with_limit(data: Vec<u8>, limit: SizeLimit) -> Result<Self> {
        let len = RawDocument::from_bytes_with_limit(&data, limit)?.len();
        Ok(Self {
            buf: SharedBuffer::from(data),
            start: 0,
            len,
        })
    }

    /// Copies a borrowed document into a new allocation.
    pub(crate) fn copy_from(raw: &RawDocument) -> Self {
        Self {
            buf: SharedBuffer::from(raw.as_bytes().to_vec()),
            start: 0,
            len: raw.len(),
        }
    }

    /// Wraps a range of storage that already holds a finalized document.
    pub(crate) fn from_shared(buf: SharedBuffer, start: usize, len: usize) -> Self {
        debug_assert!(start + len <= buf.len());
        Self { buf, start, len }
    }

    pub(crate) fn into_parts(self) -> (SharedBuffer, usize, usize) {
        (self.buf, self.start, self.len)
    }

    /// The document as a borrowed view.
    pub fn as_raw(&self) -> &RawDocument {
        RawDocument::new_unchecked(&self.buf.as_bytes()[self.start..(self.start + self.len)])
    }

    /// Whether the document spans its entire backing storage.
    pub fn is_rooted(&self) -> bool {
        self.start == 0 && self.len == self.buf.len()
    }

    /// Whether this is the only handle to the backing storage.
    pub fn is_owned_uniquely(&self) -> bool {
        self.buf.is_unique()
    }

    /// Whether both documents are backed by the same allocation.
    pub fn shares_buffer_with(&self, other: &Document) -> bool {
        self.buf.ptr_eq(&other.buf)
    }

    /// The backing storage.
    pub fn shared_buffer(&self) -> &SharedBuffer {
        &self.buf
    }

    /// Extracts the embedded document or array stored under `key` without copying it. The result
    /// is a non-rooted document that shares this document's storage.
    pub fn shared_document(&self, key: impl AsRef<str>) -> Result<Document> {
        let key = key.as_ref();
        let sub = match self.as_raw().get(key).map_err(|e| e.with_key(key))? {
            Some(BsonRef::Document(d)) => d,
            Some(BsonRef::Array(a)) => a.as_doc(),
            Some(other) => {
                return Err(Error::value_access_unexpected_type(
                    other.element_type(),
                    ElementType::EmbeddedDocument,
                )
                .with_key(key));
            }
            None => return Err(Error::value_access_not_present().with_key(key)),
        };

        let start = sub.as_ptr() as usize - self.buf.as_bytes().as_ptr() as usize;
        Ok(Self::from_shared(self.buf.clone(), start, sub.len()))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for Document {
    type Target = RawDocument;

    fn deref(&self) -> &RawDocument {
        self.as_raw()
    }
}

impl AsRef<RawDocument> for Document {
    fn as_ref(&self) -> &RawDocument {
        self.as_raw()
    }
}

impl Borrow<RawDocument> for Document {
    fn borrow(&self) -> &RawDocument {
        self.as_raw()
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for Document {}

impl PartialEq<RawDocument> for Document {
    fn eq(&self, other: &RawDocument) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl TryFrom<Vec<u8>> for Document {
    type Error = Error;

    fn try_from(data: Vec<u8>) -> Result<Self> {
        Self::from_bytes(data)
    }
}

impl From<&RawDocument> for Document {
    fn from(raw: &RawDocument) -> Self {
        Self::copy_from(raw)
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("data", &hex::encode(self.as_bytes()))
            .field("rooted", &self.is_rooted())
            .finish()
    }
}

impl<'a> IntoIterator for &'a Document {
    type IntoIter = crate::raw::Iter<'a>;
    type Item = Result<crate::raw::Element<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_raw().iter()
    }
}
