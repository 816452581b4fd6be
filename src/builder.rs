//! Incremental construction of BSON documents and arrays.
//!
//! A [`DocumentBuilder`] writes one document into a [`Buffer`]: a four byte length placeholder,
//! then one element per `append` call, then the terminator and the real length once the builder
//! is finalized. Nested documents and arrays are written by child builders that borrow the
//! parent's buffer, so a parent cannot be appended to while one of its children is still open.
//!
//! ```
//! use bson_builder::DocumentBuilder;
//!
//! let mut builder = DocumentBuilder::new();
//! builder.append("a", 1).append("b", "two");
//! {
//!     let mut nested = builder.subobj_start("c");
//!     nested.append("d", true);
//! } // finalized when dropped
//! let doc = builder.obj()?;
//!
//! assert_eq!(doc.get_document("c")?.get_bool("d")?, true);
//! # Ok::<(), bson_builder::error::Error>(())
//! ```
//!
//! Appends never fail individually. If a write cannot be performed (the buffer would grow past
//! its ceiling, or a field name contains a nul byte), the buffer is poisoned, everything after
//! is skipped, and the error is returned by [`DocumentBuilder::obj`].

mod array;
mod sentinel;
mod writer;

use std::{fmt, mem};

pub use self::array::ArrayBuilder;

use crate::{
    binary::BinaryRef,
    buffer::Buffer,
    document::Document,
    error::{Error, ErrorKind, Result},
    number::{self, AppendNumber},
    oid::ObjectId,
    raw::{BsonRef, CodeWithScopeRef, DbPointerRef, Element, RawArray, RawDocument, RegexRef},
    size::SizeLimit,
    spec::{BinarySubtype, ElementType},
    DateTime,
    Timestamp,
};

/// The buffer a builder writes into: its own, or one lent to it by an enclosing builder or by
/// the caller.
enum BufferSlot<'a> {
    Owned(Buffer),
    Borrowed(&'a mut Buffer),
}

impl BufferSlot<'_> {
    fn get(&self) -> &Buffer {
        match self {
            BufferSlot::Owned(buf) => buf,
            BufferSlot::Borrowed(buf) => buf,
        }
    }

    fn get_mut(&mut self) -> &mut Buffer {
        match self {
            BufferSlot::Owned(buf) => buf,
            BufferSlot::Borrowed(buf) => buf,
        }
    }
}

/// Builds a single BSON document into a [`Buffer`].
///
/// Builders that own their buffer ([`DocumentBuilder::new`], [`DocumentBuilder::from_document`],
/// [`DocumentBuilder::from_raw`]) are turned into a [`Document`] with
/// [`obj`](DocumentBuilder::obj). Builders over a borrowed buffer (child builders,
/// [`DocumentBuilder::new_in`], [`DocumentBuilder::resume`]) are finalized in place by
/// [`done`](DocumentBuilder::done) or when dropped.
pub struct DocumentBuilder<'a> {
    slot: BufferSlot<'a>,

    /// Where this builder's length prefix lives.
    offset: usize,

    finished: bool,
}

impl DocumentBuilder<'static> {
    /// Creates a builder with its own buffer.
    pub fn new() -> Self {
        Self::with_capacity(Buffer::DEFAULT_CAPACITY)
    }

    /// Creates a builder with its own buffer, preallocating `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::open(BufferSlot::Owned(Buffer::with_capacity(capacity)))
    }

    /// Creates a builder that continues a finished document.
    ///
    /// When `doc` is the only handle to its storage, the builder takes that storage over and
    /// appends in place, so the document it produces starts at the same address as `doc` did.
    /// This holds for sub-documents obtained through [`Document::shared_document`] as well,
    /// once every other handle to the parent is gone. Otherwise the bytes are copied.
    pub fn from_document(doc: Document) -> Self {
        let (shared, start, len) = doc.into_parts();
        match shared.try_into_buffer() {
            Ok(mut buffer) => {
                tracing::trace!(start, len, "seeding builder in place");
                buffer.truncate(start + len - 1);
                Self {
                    slot: BufferSlot::Owned(buffer),
                    offset: start,
                    finished: false,
                }
            }
            Err(shared) => {
                let raw = RawDocument::new_unchecked(&shared.as_bytes()[start..(start + len)]);
                Self::from_raw(raw)
            }
        }
    }

    /// Creates a builder that continues a copy of `raw`.
    pub fn from_raw(raw: &RawDocument) -> Self {
        tracing::trace!(len = raw.len(), "seeding builder with a copy");
        let mut buffer = Buffer::with_capacity(raw.len().max(Buffer::DEFAULT_CAPACITY));
        buffer.sticky(|buf| buf.append(&raw.as_bytes()[..(raw.len() - 1)]));
        Self {
            slot: BufferSlot::Owned(buffer),
            offset: 0,
            finished: false,
        }
    }
}

impl<'a> DocumentBuilder<'a> {
    /// Creates a builder that writes a new document at the end of `buf`.
    pub fn new_in(buf: &'a mut Buffer) -> Self {
        Self::open(BufferSlot::Borrowed(buf))
    }

    /// Reopens the finished document that `buf` holds so more fields can be appended to it.
    pub fn resume(buf: &'a mut Buffer) -> Result<Self> {
        Self::resume_at(buf, 0)
    }

    /// Reopens the finished document that occupies `buf` from `offset` to its end.
    ///
    /// Everything before `offset` is left untouched. Fails if the bytes there are not a single
    /// complete document, or if the buffer is poisoned.
    pub fn resume_at(buf: &'a mut Buffer, offset: usize) -> Result<Self> {
        buf.check()?;
        let bytes = buf.as_bytes().get(offset..).ok_or_else(|| {
            Error::malformed_value(format!(
                "cannot resume at offset {} of a {} byte buffer",
                offset,
                buf.len()
            ))
        })?;
        let len = RawDocument::from_bytes_unlimited(bytes)?.len();

        tracing::trace!(offset, len, "resuming document");
        buf.truncate(offset + len - 1);
        Ok(Self {
            slot: BufferSlot::Borrowed(buf),
            offset,
            finished: false,
        })
    }

    fn open(mut slot: BufferSlot<'a>) -> Self {
        let buf = slot.get_mut();
        let offset = buf.len();
        buf.sticky(|buf| buf.append_i32(0));
        Self {
            slot,
            offset,
            finished: false,
        }
    }

    /// The buffer this builder writes into.
    pub fn buffer(&self) -> &Buffer {
        self.slot.get()
    }

    fn buffer_mut(&mut self) -> &mut Buffer {
        self.slot.get_mut()
    }

    /// Whether this builder owns its buffer.
    pub fn owned(&self) -> bool {
        matches!(self.slot, BufferSlot::Owned(_))
    }

    /// The number of bytes written for this document so far, including its length prefix.
    pub fn len(&self) -> usize {
        self.buffer().len() - self.offset
    }

    /// Whether no field has been appended.
    pub fn is_empty(&self) -> bool {
        self.len() <= 4
    }

    /// Whether a field named `name` has already been appended.
    pub fn has_field(&self, name: impl AsRef<str>) -> bool {
        let bytes = self.buffer().as_bytes();
        let fields = &bytes[(self.offset + 4).min(bytes.len())..];

        let mut doc = Vec::with_capacity(fields.len() + 5);
        doc.extend_from_slice(&((fields.len() + 5) as i32).to_le_bytes());
        doc.extend_from_slice(fields);
        doc.push(0);
        RawDocument::from_bytes_unlimited(&doc)
            .map(|doc| doc.contains_key(name))
            .unwrap_or(false)
    }

    /// Discards every field appended so far. Bytes written before this document started,
    /// including an enclosing builder's earlier fields, are kept.
    pub fn reset_to_empty(&mut self) -> &mut Self {
        let end = self.offset + 4;
        self.buffer_mut().truncate(end);
        self
    }

    /// Appends a field.
    ///
    /// `u32` values are stored as Int32 with their bit pattern preserved, so values above
    /// `i32::MAX` read back as negative numbers unless read as `u32` again.
    pub fn append<'v>(&mut self, name: impl AsRef<str>, value: impl Into<BsonRef<'v>>) -> &mut Self {
        let value = value.into();
        self.buffer_mut()
            .sticky(|buf| writer::write_element(buf, name.as_ref(), value));
        self
    }

    /// Appends a number as the most compact type for its Rust type. See [`crate::number`].
    pub fn append_number(&mut self, name: impl AsRef<str>, n: impl AppendNumber) -> &mut Self {
        self.append(name, n.narrow())
    }

    /// Appends an Int32 when `|n| < 2^30` and an Int64 otherwise.
    pub fn append_int_or_long(&mut self, name: impl AsRef<str>, n: i64) -> &mut Self {
        self.append(name, number::int_or_long(n))
    }

    pub fn append_null(&mut self, name: impl AsRef<str>) -> &mut Self {
        self.append(name, BsonRef::Null)
    }

    pub fn append_undefined(&mut self, name: impl AsRef<str>) -> &mut Self {
        self.append(name, BsonRef::Undefined)
    }

    pub fn append_min_key(&mut self, name: impl AsRef<str>) -> &mut Self {
        self.append(name, BsonRef::MinKey)
    }

    pub fn append_max_key(&mut self, name: impl AsRef<str>) -> &mut Self {
        self.append(name, BsonRef::MaxKey)
    }

    pub fn append_date(&mut self, name: impl AsRef<str>, date: DateTime) -> &mut Self {
        self.append(name, date)
    }

    pub fn append_timestamp(&mut self, name: impl AsRef<str>, ts: Timestamp) -> &mut Self {
        self.append(name, ts)
    }

    pub fn append_oid(&mut self, name: impl AsRef<str>, oid: ObjectId) -> &mut Self {
        self.append(name, oid)
    }

    pub fn append_bin_data(
        &mut self,
        name: impl AsRef<str>,
        subtype: BinarySubtype,
        bytes: &[u8],
    ) -> &mut Self {
        self.append(name, BinaryRef::new(subtype, bytes))
    }

    pub fn append_regex(&mut self, name: impl AsRef<str>, pattern: &str, options: &str) -> &mut Self {
        self.append(name, RegexRef { pattern, options })
    }

    pub fn append_code(&mut self, name: impl AsRef<str>, code: &str) -> &mut Self {
        self.append(name, BsonRef::JavaScriptCode(code))
    }

    pub fn append_symbol(&mut self, name: impl AsRef<str>, symbol: &str) -> &mut Self {
        self.append(name, BsonRef::Symbol(symbol))
    }

    pub fn append_code_with_scope(
        &mut self,
        name: impl AsRef<str>,
        code: &str,
        scope: &RawDocument,
    ) -> &mut Self {
        self.append(name, CodeWithScopeRef { code, scope })
    }

    pub fn append_db_pointer(
        &mut self,
        name: impl AsRef<str>,
        namespace: &str,
        id: ObjectId,
    ) -> &mut Self {
        self.append(name, DbPointerRef::new(namespace, id))
    }

    /// Appends a finished array.
    pub fn append_array(&mut self, name: impl AsRef<str>, array: &RawArray) -> &mut Self {
        self.append(name, array)
    }

    /// Copies an element, name included.
    pub fn append_element(&mut self, element: &Element<'_>) -> &mut Self {
        let bytes = element.as_bytes();
        self.buffer_mut().sticky(|buf| buf.append(bytes));
        self
    }

    /// Copies an element's value under a new name.
    pub fn append_as(&mut self, element: &Element<'_>, name: impl AsRef<str>) -> &mut Self {
        let (element_type, payload) = (element.element_type(), element.payload());
        self.buffer_mut()
            .sticky(|buf| writer::write_encoded(buf, element_type, name.as_ref(), payload));
        self
    }

    /// Copies every field of `doc`. A malformed field poisons the buffer.
    pub fn append_elements(&mut self, doc: &RawDocument) -> &mut Self {
        for element in doc {
            match element {
                Ok(element) => {
                    self.append_element(&element);
                }
                Err(e) => {
                    self.buffer_mut().poison(e);
                    break;
                }
            }
        }
        self
    }

    /// Starts an embedded document field. The returned builder must be finished (explicitly or
    /// by dropping it) before this one can be used again.
    pub fn subobj_start(&mut self, name: impl AsRef<str>) -> DocumentBuilder<'_> {
        let buf = self.buffer_mut();
        buf.sticky(|buf| writer::write_key(buf, ElementType::EmbeddedDocument, name.as_ref()));
        DocumentBuilder::open(BufferSlot::Borrowed(buf))
    }

    /// Starts an array field. The returned builder must be finished (explicitly or by dropping
    /// it) before this one can be used again.
    pub fn subarray_start(&mut self, name: impl AsRef<str>) -> ArrayBuilder<'_> {
        let buf = self.buffer_mut();
        buf.sticky(|buf| writer::write_key(buf, ElementType::Array, name.as_ref()));
        ArrayBuilder::from_document_builder(DocumentBuilder::open(BufferSlot::Borrowed(buf)))
    }

    /// Writes the terminator and patches the length prefix.
    fn finish(&mut self) {
        debug_assert!(!self.finished, "document finalized twice");
        self.finished = true;

        let offset = self.offset;
        self.buffer_mut().sticky(|buf| {
            buf.append_u8(0)?;
            let len = buf.len() - offset;
            let len = i32::try_from(len).map_err(|_| {
                Error::from(ErrorKind::BufferOverflow {
                    requested: len,
                    max: i32::MAX as usize,
                })
            })?;
            buf.write_i32_at(offset, len)
        });
    }

    /// Finalizes the document in place.
    pub fn done(mut self) {
        self.finish();
    }

    /// Finalizes the document and hands it off, checking it against [`SizeLimit::Default`].
    ///
    /// # Panics
    ///
    /// Panics if the builder does not own its buffer.
    pub fn obj(self) -> Result<Document> {
        self.obj_with_limit(SizeLimit::Default)
    }

    /// Finalizes the document and hands it off, checking it against `limit`.
    ///
    /// Fails with the error that poisoned the buffer if an append could not be performed, and
    /// with [`ErrorKind::ObjectTooLarge`] if the document exceeds `limit`.
    ///
    /// # Panics
    ///
    /// Panics if the builder does not own its buffer.
    pub fn obj_with_limit(mut self, limit: SizeLimit) -> Result<Document> {
        assert!(
            self.owned(),
            "obj() called on a builder that does not own its buffer"
        );
        self.finish();

        let empty = BufferSlot::Owned(Buffer::from_vec(Vec::new()));
        let BufferSlot::Owned(buffer) = mem::replace(&mut self.slot, empty) else {
            unreachable!("ownership checked above");
        };
        buffer.check()?;

        let len = buffer.len() - self.offset;
        if !limit.permits(len) {
            tracing::debug!(size = len, max = limit.max_size(), "rejected oversize document");
            return Err(Error::object_too_large(len, limit.max_size()));
        }
        Ok(Document::from_shared(buffer.release(), self.offset, len))
    }
}

impl Default for DocumentBuilder<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for DocumentBuilder<'_> {
    fn drop(&mut self) {
        if !self.finished && !self.owned() {
            self.finish();
        }
    }
}

impl fmt::Debug for DocumentBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentBuilder")
            .field("owned", &self.owned())
            .field("offset", &self.offset)
            .field("len", &self.len())
            .field("finished", &self.finished)
            .finish()
    }
}
