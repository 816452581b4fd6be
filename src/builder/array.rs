use std::fmt;

use crate::{
    buffer::Buffer,
    document::Document,
    error::Result,
    number::AppendNumber,
    raw::{BsonRef, Element},
    size::SizeLimit,
};

use super::DocumentBuilder;

/// Builds a BSON array: a document whose field names are the indices `"0"`, `"1"`, `"2"`...
///
/// Obtained from [`DocumentBuilder::subarray_start`] or created on its own with
/// [`ArrayBuilder::new`], in which case [`arr`](ArrayBuilder::arr) yields the array as a
/// [`Document`].
///
/// ```
/// use bson_builder::DocumentBuilder;
///
/// let mut builder = DocumentBuilder::new();
/// {
///     let mut array = builder.subarray_start("xs");
///     array.append(1).append("two");
///     array.fill_to(4);
///     assert_eq!(array.len(), 4);
/// }
/// let doc = builder.obj()?;
/// let xs = doc.get_array("xs")?;
/// assert_eq!(xs.get_str(1)?, "two");
/// assert!(xs.get(3)?.unwrap().is_null());
/// # Ok::<(), bson_builder::error::Error>(())
/// ```
pub struct ArrayBuilder<'a> {
    doc: DocumentBuilder<'a>,
    len: usize,
}

impl ArrayBuilder<'static> {
    /// Creates an array builder with its own buffer.
    pub fn new() -> Self {
        Self::from_document_builder(DocumentBuilder::new())
    }

    /// Creates an array builder with its own buffer, preallocating `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_document_builder(DocumentBuilder::with_capacity(capacity))
    }
}

impl<'a> ArrayBuilder<'a> {
    pub(super) fn from_document_builder(doc: DocumentBuilder<'a>) -> Self {
        Self { doc, len: 0 }
    }

    /// Creates an array builder that writes a new array at the end of `buf`.
    pub fn new_in(buf: &'a mut Buffer) -> Self {
        Self::from_document_builder(DocumentBuilder::new_in(buf))
    }

    fn next_index(&self) -> String {
        self.len.to_string()
    }

    /// Counts the value just written at the next index, unless the write was skipped or failed.
    fn commit(&mut self) {
        if self.doc.buffer().error().is_none() {
            self.len += 1;
        }
    }

    /// The number of values written so far. Appends made after the buffer was poisoned are not
    /// counted.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The buffer this builder writes into.
    pub fn buffer(&self) -> &Buffer {
        self.doc.buffer()
    }

    /// Whether this builder owns its buffer.
    pub fn owned(&self) -> bool {
        self.doc.owned()
    }

    /// Appends a value at the next index.
    pub fn append<'v>(&mut self, value: impl Into<BsonRef<'v>>) -> &mut Self {
        let index = self.next_index();
        self.doc.append(index, value);
        self.commit();
        self
    }

    /// Appends a number at the next index, narrowed like [`DocumentBuilder::append_number`].
    pub fn append_number(&mut self, n: impl AppendNumber) -> &mut Self {
        self.append(n.narrow())
    }

    /// Appends the value of `element` at the next index.
    pub fn append_element(&mut self, element: &Element<'_>) -> &mut Self {
        let index = self.next_index();
        self.doc.append_as(element, index);
        self.commit();
        self
    }

    pub fn append_null(&mut self) -> &mut Self {
        self.append(BsonRef::Null)
    }

    /// Appends nulls until the array holds `len` values. Does nothing if it already holds that
    /// many, and stops early once the buffer is poisoned.
    pub fn fill_to(&mut self, len: usize) -> &mut Self {
        while self.len < len && self.doc.buffer().error().is_none() {
            self.append_null();
        }
        self
    }

    /// Starts an embedded document at the next index.
    pub fn subobj_start(&mut self) -> DocumentBuilder<'_> {
        let index = self.next_index();
        let Self { doc, len } = self;
        let child = doc.subobj_start(index);
        if child.buffer().error().is_none() {
            *len += 1;
        }
        child
    }

    /// Starts an array at the next index.
    pub fn subarray_start(&mut self) -> ArrayBuilder<'_> {
        let index = self.next_index();
        let Self { doc, len } = self;
        let child = doc.subarray_start(index);
        if child.buffer().error().is_none() {
            *len += 1;
        }
        child
    }

    /// Discards every value appended so far.
    pub fn reset_to_empty(&mut self) -> &mut Self {
        self.doc.reset_to_empty();
        self.len = 0;
        self
    }

    /// Finalizes the array in place.
    pub fn done(self) {
        self.doc.done()
    }

    /// Finalizes the array and hands it off as a document, checking it against
    /// [`SizeLimit::Default`].
    ///
    /// # Panics
    ///
    /// Panics if the builder does not own its buffer.
    pub fn arr(self) -> Result<Document> {
        self.doc.obj()
    }

    /// Like [`ArrayBuilder::arr`], checking against `limit` instead.
    pub fn arr_with_limit(self, limit: SizeLimit) -> Result<Document> {
        self.doc.obj_with_limit(limit)
    }
}

impl Default for ArrayBuilder<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ArrayBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayBuilder")
            .field("doc", &self.doc)
            .field("len", &self.len)
            .finish()
    }
}
