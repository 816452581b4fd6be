use crate::{
    binary::BinaryRef,
    error::{Error, Result},
    oid::ObjectId,
    spec::{BinarySubtype, ElementType},
    DateTime,
    Decimal128,
    Timestamp,
};

use super::{
    bool_from_slice,
    checked_add,
    f64_from_slice,
    i32_from_slice,
    i64_from_slice,
    read_lenencoded,
    read_nullterminated,
    BsonRef,
    CodeWithScopeRef,
    DbPointerRef,
    RawArray,
    RawDocument,
    RegexRef,
    MIN_BSON_DOCUMENT_SIZE,
    MIN_CODE_WITH_SCOPE_SIZE,
};

/// A single decoded field of a document: its name, its value, and the bytes it occupies.
///
/// The typed accessors mirror the widening rules of [`BsonRef`], so a value written through
/// any of the numeric narrowing entry points can be read back regardless of the BSON type that
/// was chosen for it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Element<'a> {
    key: &'a str,
    value: BsonRef<'a>,
    raw: &'a [u8],
    value_offset: usize,
}

impl<'a> Element<'a> {
    /// The field name.
    pub fn key(&self) -> &'a str {
        self.key
    }

    /// The decoded value.
    pub fn value(&self) -> BsonRef<'a> {
        self.value
    }

    pub fn element_type(&self) -> ElementType {
        self.value.element_type()
    }

    /// The complete encoded element: type tag, field name and payload.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.raw
    }

    /// The encoded payload only.
    pub fn payload(&self) -> &'a [u8] {
        &self.raw[self.value_offset..]
    }

    /// The number of bytes the element occupies in its document.
    pub fn size(&self) -> usize {
        self.raw.len()
    }

    pub fn is_number(&self) -> bool {
        self.element_type().is_number()
    }

    /// See [`BsonRef::number_long`].
    pub fn number_long(&self) -> i64 {
        self.value.number_long()
    }

    /// See [`BsonRef::number_int`].
    pub fn number_int(&self) -> i32 {
        self.value.number_int()
    }

    /// See [`BsonRef::number_double`].
    pub fn number_double(&self) -> f64 {
        self.value.number_double()
    }

    pub fn boolean(&self) -> Option<bool> {
        self.value.as_bool()
    }

    pub fn timestamp(&self) -> Option<Timestamp> {
        self.value.as_timestamp()
    }

    pub fn date(&self) -> Option<DateTime> {
        self.value.as_datetime()
    }

    pub fn as_str(&self) -> Option<&'a str> {
        self.value.as_str()
    }

    pub fn as_document(&self) -> Option<&'a RawDocument> {
        self.value.as_document()
    }

    pub fn as_array(&self) -> Option<&'a RawArray> {
        self.value.as_array()
    }
}

/// An iterator over the elements of a [`RawDocument`].
pub struct Iter<'a> {
    doc: &'a RawDocument,
    offset: usize,

    /// Whether the underlying doc is assumed to be valid or if an error has been encountered.
    /// After an error, all subsequent iterations will return None.
    valid: bool,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(doc: &'a RawDocument) -> Self {
        Self {
            doc,
            offset: 4,
            valid: true,
        }
    }

    fn bytes(&self) -> &'a [u8] {
        self.doc.as_bytes()
    }

    fn verify_enough_bytes(&self, start: usize, num_bytes: usize) -> Result<()> {
        let end = checked_add(start, num_bytes)?;
        if self.bytes().get(start..end).is_none() {
            return Err(Error::malformed_value(format!(
                "length exceeds remaining length of buffer: {} vs {}",
                num_bytes,
                self.bytes().len().saturating_sub(start)
            )));
        }
        Ok(())
    }

    fn next_oid(&self, starting_at: usize) -> Result<ObjectId> {
        self.verify_enough_bytes(starting_at, 12)?;
        let mut id = [0; 12];
        id.copy_from_slice(&self.bytes()[starting_at..(starting_at + 12)]);
        Ok(ObjectId::from_bytes(id))
    }

    fn next_document(&self, starting_at: usize) -> Result<&'a RawDocument> {
        self.verify_enough_bytes(starting_at, MIN_BSON_DOCUMENT_SIZE)?;
        let size = i32_from_slice(&self.bytes()[starting_at..])?;

        if size < MIN_BSON_DOCUMENT_SIZE as i32 {
            return Err(Error::malformed_value(format!(
                "document too small: {} bytes",
                size
            )));
        }

        self.verify_enough_bytes(starting_at, size as usize)?;
        RawDocument::from_bytes_unlimited(&self.bytes()[starting_at..(starting_at + size as usize)])
    }

    fn next_binary(&self, valueoffset: usize) -> Result<(BinaryRef<'a>, usize)> {
        let len = i32_from_slice(&self.bytes()[valueoffset..])?;
        let len = usize::try_from(len).map_err(Error::malformed_value)?;
        let data_start = valueoffset + 4 + 1;

        self.verify_enough_bytes(valueoffset + 4, len + 1)?;
        let subtype = BinarySubtype::from(self.bytes()[valueoffset + 4]);
        let bytes = match subtype {
            BinarySubtype::BinaryOld => {
                if len < 4 {
                    return Err(Error::malformed_value(
                        "old binary subtype has no inner declared length",
                    ));
                }
                let oldlength = i32_from_slice(&self.bytes()[data_start..])?;
                if checked_add(oldlength as usize, 4)? != len {
                    return Err(Error::malformed_value(
                        "old binary subtype has wrong inner declared length",
                    ));
                }
                &self.bytes()[(data_start + 4)..(data_start + len)]
            }
            _ => &self.bytes()[data_start..(data_start + len)],
        };
        Ok((BinaryRef { subtype, bytes }, 4 + 1 + len))
    }

    fn next_value(
        &self,
        element_type: ElementType,
        valueoffset: usize,
    ) -> Result<(BsonRef<'a>, usize)> {
        let bytes = self.bytes();
        Ok(match element_type {
            ElementType::Int32 => {
                let i = i32_from_slice(&bytes[valueoffset..])?;
                (BsonRef::Int32(i), 4)
            }
            ElementType::Int64 => {
                let i = i64_from_slice(&bytes[valueoffset..])?;
                (BsonRef::Int64(i), 8)
            }
            ElementType::Double => {
                let f = f64_from_slice(&bytes[valueoffset..])?;
                (BsonRef::Double(f), 8)
            }
            ElementType::String => {
                let s = read_lenencoded(&bytes[valueoffset..])?;
                (BsonRef::String(s), 4 + s.len() + 1)
            }
            ElementType::EmbeddedDocument => {
                let doc = self.next_document(valueoffset)?;
                (BsonRef::Document(doc), doc.as_bytes().len())
            }
            ElementType::Array => {
                let doc = self.next_document(valueoffset)?;
                (
                    BsonRef::Array(RawArray::from_doc(doc)),
                    doc.as_bytes().len(),
                )
            }
            ElementType::Binary => {
                let (binary, size) = self.next_binary(valueoffset)?;
                (BsonRef::Binary(binary), size)
            }
            ElementType::ObjectId => {
                let oid = self.next_oid(valueoffset)?;
                (BsonRef::ObjectId(oid), 12)
            }
            ElementType::Boolean => {
                let b = bool_from_slice(&bytes[valueoffset..])?;
                (BsonRef::Boolean(b), 1)
            }
            ElementType::DateTime => {
                let ms = i64_from_slice(&bytes[valueoffset..])?;
                (BsonRef::DateTime(DateTime::from_millis(ms)), 8)
            }
            ElementType::RegularExpression => {
                let pattern = read_nullterminated(&bytes[valueoffset..])?;
                let options = read_nullterminated(&bytes[(valueoffset + pattern.len() + 1)..])?;
                (
                    BsonRef::RegularExpression(RegexRef { pattern, options }),
                    pattern.len() + 1 + options.len() + 1,
                )
            }
            ElementType::Null => (BsonRef::Null, 0),
            ElementType::Undefined => (BsonRef::Undefined, 0),
            ElementType::Timestamp => {
                self.verify_enough_bytes(valueoffset, 8)?;
                let ts = Timestamp::from_le_bytes(
                    bytes[valueoffset..(valueoffset + 8)]
                        .try_into()
                        .map_err(Error::malformed_value)?,
                );
                (BsonRef::Timestamp(ts), 8)
            }
            ElementType::JavaScriptCode => {
                let code = read_lenencoded(&bytes[valueoffset..])?;
                (BsonRef::JavaScriptCode(code), 4 + code.len() + 1)
            }
            ElementType::JavaScriptCodeWithScope => {
                let length = i32_from_slice(&bytes[valueoffset..])?;

                if length < MIN_CODE_WITH_SCOPE_SIZE as i32 {
                    return Err(Error::malformed_value("code with scope length too small"));
                }
                let length = length as usize;

                self.verify_enough_bytes(valueoffset, length)?;
                let slice = &bytes[valueoffset..(valueoffset + length)];
                let code = read_lenencoded(&slice[4..])?;
                let scope_start = 4 + 4 + code.len() + 1;
                if scope_start >= slice.len() {
                    return Err(Error::malformed_value("code with scope has no scope"));
                }
                let scope = RawDocument::from_bytes_unlimited(&slice[scope_start..])?;
                (
                    BsonRef::JavaScriptCodeWithScope(CodeWithScopeRef { code, scope }),
                    length,
                )
            }
            ElementType::DbPointer => {
                let namespace = read_lenencoded(&bytes[valueoffset..])?;
                let id = self.next_oid(valueoffset + 4 + namespace.len() + 1)?;
                (
                    BsonRef::DbPointer(DbPointerRef { namespace, id }),
                    4 + namespace.len() + 1 + 12,
                )
            }
            ElementType::Symbol => {
                let s = read_lenencoded(&bytes[valueoffset..])?;
                (BsonRef::Symbol(s), 4 + s.len() + 1)
            }
            ElementType::Decimal128 => {
                self.verify_enough_bytes(valueoffset, 16)?;
                let mut raw = [0; 16];
                raw.copy_from_slice(&bytes[valueoffset..(valueoffset + 16)]);
                (BsonRef::Decimal128(Decimal128::from_bytes(raw)), 16)
            }
            ElementType::MinKey => (BsonRef::MinKey, 0),
            ElementType::MaxKey => (BsonRef::MaxKey, 0),
        })
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = Result<Element<'a>>;

    fn next(&mut self) -> Option<Result<Element<'a>>> {
        let bytes = self.bytes();
        if !self.valid {
            return None;
        } else if self.offset == bytes.len() - 1 {
            if bytes[self.offset] == 0 {
                // end of document marker
                return None;
            } else {
                self.valid = false;
                return Some(Err(Error::malformed_value("document not null terminated")));
            }
        } else if self.offset >= bytes.len() {
            self.valid = false;
            return Some(Err(Error::malformed_value("iteration overflowed document")));
        }

        let key = match read_nullterminated(&bytes[self.offset + 1..]) {
            Ok(k) => k,
            Err(e) => {
                self.valid = false;
                return Some(Err(e));
            }
        };

        let start = self.offset;
        let result = (|| -> Result<Element<'a>> {
            let value_start = 1 + key.len() + 1; // type specifier + key + \0
            let valueoffset = start + value_start;

            let tag = bytes[start];
            let element_type = ElementType::from(tag)
                .ok_or_else(|| Error::malformed_value(format!("invalid tag: {}", tag)))?;

            let (value, value_size) = self.next_value(element_type, valueoffset)?;
            self.verify_enough_bytes(valueoffset, value_size)?;

            let end = valueoffset + value_size;
            self.offset = end;
            Ok(Element {
                key,
                value,
                raw: &bytes[start..end],
                value_offset: value_start,
            })
        })()
        .map_err(|e| e.with_key(key));

        if result.is_err() {
            self.valid = false;
        }

        Some(result)
    }
}
