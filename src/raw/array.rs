use crate::{
    binary::BinaryRef,
    error::{Error, Result},
    oid::ObjectId,
    spec::ElementType,
    DateTime,
    Timestamp,
};

use super::{BsonRef, Iter, RawDocument};

/// A slice of a BSON document containing a BSON array value (akin to [`std::str`]). This can be
/// retrieved from a [`RawDocument`] via [`RawDocument::get_array`].
///
/// This is an _unsized_ type, meaning that it must always be used behind a pointer like `&`.
///
/// An array is encoded as a document whose keys are `"0"`, `"1"`, `"2"`... Element access goes by
/// position, so keys are not compared.
#[derive(PartialEq)]
#[repr(transparent)]
pub struct RawArray {
    pub(crate) doc: RawDocument,
}

impl RawArray {
    pub(crate) fn from_doc(doc: &RawDocument) -> &RawArray {
        // SAFETY:
        //
        // The pointer is neither null nor dangling as it comes from a safe reference, and
        // `RawArray` is #[repr(transparent)] over `RawDocument`, so the two have the same layout.
        unsafe { &*(doc as *const RawDocument as *const RawArray) }
    }

    /// The array viewed as the document it is encoded as.
    pub fn as_doc(&self) -> &RawDocument {
        &self.doc
    }

    /// Gets a reference to the value at the given index.
    pub fn get(&self, index: usize) -> Result<Option<BsonRef<'_>>> {
        self.into_iter().nth(index).transpose()
    }

    /// The number of values, or an error if the elements are malformed.
    pub fn len(&self) -> Result<usize> {
        self.doc.n_fields()
    }

    pub fn is_empty(&self) -> bool {
        self.doc.is_empty()
    }

    fn get_with<'a, T>(
        &'a self,
        index: usize,
        expected_type: ElementType,
        f: impl FnOnce(BsonRef<'a>) -> Option<T>,
    ) -> Result<T> {
        let bson = self
            .get(index)
            .map_err(|e| e.with_key(index.to_string()))?
            .ok_or_else(|| Error::value_access_not_present().with_key(index.to_string()))?;
        match f(bson) {
            Some(t) => Ok(t),
            None => Err(
                Error::value_access_unexpected_type(bson.element_type(), expected_type)
                    .with_key(index.to_string()),
            ),
        }
    }

    pub fn get_f64(&self, index: usize) -> Result<f64> {
        self.get_with(index, ElementType::Double, BsonRef::as_f64)
    }

    pub fn get_str(&self, index: usize) -> Result<&str> {
        self.get_with(index, ElementType::String, BsonRef::as_str)
    }

    pub fn get_document(&self, index: usize) -> Result<&RawDocument> {
        self.get_with(index, ElementType::EmbeddedDocument, BsonRef::as_document)
    }

    pub fn get_array(&self, index: usize) -> Result<&RawArray> {
        self.get_with(index, ElementType::Array, BsonRef::as_array)
    }

    pub fn get_binary(&self, index: usize) -> Result<BinaryRef<'_>> {
        self.get_with(index, ElementType::Binary, BsonRef::as_binary)
    }

    pub fn get_object_id(&self, index: usize) -> Result<ObjectId> {
        self.get_with(index, ElementType::ObjectId, BsonRef::as_object_id)
    }

    pub fn get_bool(&self, index: usize) -> Result<bool> {
        self.get_with(index, ElementType::Boolean, BsonRef::as_bool)
    }

    pub fn get_datetime(&self, index: usize) -> Result<DateTime> {
        self.get_with(index, ElementType::DateTime, BsonRef::as_datetime)
    }

    pub fn get_timestamp(&self, index: usize) -> Result<Timestamp> {
        self.get_with(index, ElementType::Timestamp, BsonRef::as_timestamp)
    }

    pub fn get_i32(&self, index: usize) -> Result<i32> {
        self.get_with(index, ElementType::Int32, BsonRef::as_i32)
    }

    pub fn get_i64(&self, index: usize) -> Result<i64> {
        self.get_with(index, ElementType::Int64, BsonRef::as_i64)
    }

    /// Gets a reference to the raw bytes of the [`RawArray`].
    pub fn as_bytes(&self) -> &[u8] {
        self.doc.as_bytes()
    }
}

impl std::fmt::Debug for RawArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawArray")
            .field("data", &hex::encode(self.doc.as_bytes()))
            .finish()
    }
}

impl<'a> IntoIterator for &'a RawArray {
    type IntoIter = RawArrayIter<'a>;
    type Item = Result<BsonRef<'a>>;

    fn into_iter(self) -> RawArrayIter<'a> {
        RawArrayIter {
            inner: self.doc.iter(),
        }
    }
}

/// An iterator over borrowed raw BSON array values.
pub struct RawArrayIter<'a> {
    inner: Iter<'a>,
}

impl<'a> Iterator for RawArrayIter<'a> {
    type Item = Result<BsonRef<'a>>;

    fn next(&mut self) -> Option<Result<BsonRef<'a>>> {
        match self.inner.next() {
            Some(Ok(elem)) => Some(Ok(elem.value())),
            Some(Err(e)) => Some(Err(e)),
            None => None,
        }
    }
}
