use crate::{
    binary::BinaryRef,
    error::{Error, Result},
    oid::ObjectId,
    size::SizeLimit,
    spec::ElementType,
    DateTime,
    Document,
    Timestamp,
};

use super::{i32_from_slice, BsonRef, Element, Iter, RawArray, RegexRef, MIN_BSON_DOCUMENT_SIZE};

/// A slice of a BSON document (akin to [`std::str`]).
///
/// This is an _unsized_ type, meaning that it must always be used behind a pointer like `&`. It
/// never owns its bytes, and it cannot be used to write them.
///
/// Accessing elements within a [`RawDocument`] iterates over the bytes, so lookups are linear in
/// the number of fields. Because the contents are parsed during iteration instead of at creation
/// time, format errors can happen at any time during use.
///
/// ```
/// use bson_builder::RawDocument;
///
/// let doc = RawDocument::from_bytes(b"\x13\x00\x00\x00\x02hi\x00\x06\x00\x00\x00y'all\x00\x00")?;
/// let mut iter = doc.iter();
/// let elem = iter.next().unwrap()?;
/// assert_eq!(elem.key(), "hi");
/// assert_eq!(elem.as_str(), Some("y'all"));
/// assert!(iter.next().is_none());
/// # Ok::<(), bson_builder::error::Error>(())
/// ```
#[derive(PartialEq)]
#[repr(transparent)]
pub struct RawDocument {
    data: [u8],
}

impl RawDocument {
    /// Constructs a new [`RawDocument`], validating _only_ the
    /// following invariants:
    ///   * `data` is at least five bytes long (the minimum for a valid BSON document)
    ///   * the initial four bytes of `data` accurately represent the length of the bytes
    ///   * the last byte of `data` is a 0
    ///   * the length is within [`SizeLimit::Default`]
    ///
    /// The elements themselves are _not_ validated. If they do not conform to the BSON format,
    /// then method calls on the [`RawDocument`] will return errors where appropriate.
    pub fn from_bytes<D: AsRef<[u8]> + ?Sized>(data: &D) -> Result<&RawDocument> {
        Self::from_bytes_with_limit(data, SizeLimit::Default)
    }

    /// Like [`RawDocument::from_bytes`], checking the length against `limit` instead.
    pub fn from_bytes_with_limit<D: AsRef<[u8]> + ?Sized>(
        data: &D,
        limit: SizeLimit,
    ) -> Result<&RawDocument> {
        let doc = Self::from_bytes_unlimited(data)?;
        if !limit.permits(doc.len()) {
            tracing::debug!(size = doc.len(), max = limit.max_size(), "rejected oversize document");
            return Err(Error::object_too_large(doc.len(), limit.max_size()));
        }
        Ok(doc)
    }

    /// Embedded documents are bounded by their parent, so no limit applies to them.
    pub(crate) fn from_bytes_unlimited<D: AsRef<[u8]> + ?Sized>(data: &D) -> Result<&RawDocument> {
        let data = data.as_ref();

        if data.len() < MIN_BSON_DOCUMENT_SIZE {
            return Err(Error::malformed_value("document too short"));
        }

        let length = i32_from_slice(data)?;

        if data.len() as i64 != length as i64 {
            return Err(Error::malformed_value("document length incorrect"));
        }

        if data[data.len() - 1] != 0 {
            return Err(Error::malformed_value("document not null-terminated"));
        }

        Ok(RawDocument::new_unchecked(data))
    }

    /// Creates a new `RawDocument` referencing the provided data slice.
    pub(crate) fn new_unchecked<D: AsRef<[u8]> + ?Sized>(data: &D) -> &RawDocument {
        // SAFETY:
        //
        // The pointer is neither null nor dangling as it comes from a safe reference, and
        // `RawDocument` is #[repr(transparent)] over `[u8]`, so the two have the same layout.
        unsafe { &*(data.as_ref() as *const [u8] as *const RawDocument) }
    }

    /// The empty document, `{}`.
    pub fn empty() -> &'static RawDocument {
        RawDocument::new_unchecked(b"\x05\x00\x00\x00\x00")
    }

    /// Returns a reference to the encoded bytes, length prefix and terminator included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// The total encoded length of the document.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.data.len() == MIN_BSON_DOCUMENT_SIZE
    }

    /// A pointer to the first byte of the document.
    pub fn as_ptr(&self) -> *const u8 {
        self.data.as_ptr()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    /// Creates an owned, rooted copy of this document.
    pub fn to_document(&self) -> Document {
        Document::copy_from(self)
    }

    /// The number of fields, or an error if the elements are malformed.
    pub fn n_fields(&self) -> Result<usize> {
        self.iter().try_fold(0, |n, elem| elem.map(|_| n + 1))
    }

    /// The first field, if any.
    pub fn first_element(&self) -> Result<Option<Element<'_>>> {
        self.iter().next().transpose()
    }

    /// Gets the element with the given key by iterating until the key is found.
    pub fn get_element(&self, key: impl AsRef<str>) -> Result<Option<Element<'_>>> {
        let key = key.as_ref();
        for result in self.iter() {
            let elem = result?;
            if elem.key() == key {
                return Ok(Some(elem));
            }
        }
        Ok(None)
    }

    /// Gets the value corresponding to the given key by iterating until the key is found.
    pub fn get(&self, key: impl AsRef<str>) -> Result<Option<BsonRef<'_>>> {
        Ok(self.get_element(key)?.map(|elem| elem.value()))
    }

    /// Whether a field with the given key is present. Malformed elements count as absent.
    pub fn contains_key(&self, key: impl AsRef<str>) -> bool {
        matches!(self.get_element(key), Ok(Some(_)))
    }

    fn get_with<'a, T>(
        &'a self,
        key: impl AsRef<str>,
        expected_type: ElementType,
        f: impl FnOnce(BsonRef<'a>) -> Option<T>,
    ) -> Result<T> {
        let key = key.as_ref();

        let bson = self
            .get(key)
            .map_err(|e| e.with_key(key))?
            .ok_or_else(|| Error::value_access_not_present().with_key(key))?;
        match f(bson) {
            Some(t) => Ok(t),
            None => Err(
                Error::value_access_unexpected_type(bson.element_type(), expected_type)
                    .with_key(key),
            ),
        }
    }

    pub fn get_f64(&self, key: impl AsRef<str>) -> Result<f64> {
        self.get_with(key, ElementType::Double, BsonRef::as_f64)
    }

    pub fn get_str(&self, key: impl AsRef<str>) -> Result<&'_ str> {
        self.get_with(key, ElementType::String, BsonRef::as_str)
    }

    pub fn get_document(&self, key: impl AsRef<str>) -> Result<&'_ RawDocument> {
        self.get_with(key, ElementType::EmbeddedDocument, BsonRef::as_document)
    }

    pub fn get_array(&self, key: impl AsRef<str>) -> Result<&'_ RawArray> {
        self.get_with(key, ElementType::Array, BsonRef::as_array)
    }

    pub fn get_binary(&self, key: impl AsRef<str>) -> Result<BinaryRef<'_>> {
        self.get_with(key, ElementType::Binary, BsonRef::as_binary)
    }

    pub fn get_object_id(&self, key: impl AsRef<str>) -> Result<ObjectId> {
        self.get_with(key, ElementType::ObjectId, BsonRef::as_object_id)
    }

    pub fn get_bool(&self, key: impl AsRef<str>) -> Result<bool> {
        self.get_with(key, ElementType::Boolean, BsonRef::as_bool)
    }

    pub fn get_datetime(&self, key: impl AsRef<str>) -> Result<DateTime> {
        self.get_with(key, ElementType::DateTime, BsonRef::as_datetime)
    }

    pub fn get_regex(&self, key: impl AsRef<str>) -> Result<RegexRef<'_>> {
        self.get_with(key, ElementType::RegularExpression, BsonRef::as_regex)
    }

    pub fn get_timestamp(&self, key: impl AsRef<str>) -> Result<Timestamp> {
        self.get_with(key, ElementType::Timestamp, BsonRef::as_timestamp)
    }

    pub fn get_i32(&self, key: impl AsRef<str>) -> Result<i32> {
        self.get_with(key, ElementType::Int32, BsonRef::as_i32)
    }

    pub fn get_i64(&self, key: impl AsRef<str>) -> Result<i64> {
        self.get_with(key, ElementType::Int64, BsonRef::as_i64)
    }
}

impl std::fmt::Debug for RawDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawDocument")
            .field("data", &hex::encode(&self.data))
            .finish()
    }
}

impl AsRef<RawDocument> for RawDocument {
    fn as_ref(&self) -> &RawDocument {
        self
    }
}

impl AsRef<[u8]> for RawDocument {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl ToOwned for RawDocument {
    type Owned = Document;

    fn to_owned(&self) -> Self::Owned {
        self.to_document()
    }
}

impl<'a> IntoIterator for &'a RawDocument {
    type IntoIter = Iter<'a>;
    type Item = Result<Element<'a>>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}
