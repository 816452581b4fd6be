use crate::{
    binary::BinaryRef,
    oid::ObjectId,
    spec::ElementType,
    DateTime,
    Decimal128,
    Document,
    Timestamp,
};

use super::{RawArray, RawDocument};

/// A BSON value referencing raw bytes stored elsewhere.
///
/// This is both what iteration over a [`RawDocument`] yields and what the builders accept:
/// anything convertible into a `BsonRef` can be passed to
/// [`DocumentBuilder::append`](crate::DocumentBuilder::append).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BsonRef<'a> {
    /// 64-bit binary floating point
    Double(f64),
    /// UTF-8 string
    String(&'a str),
    /// Array
    Array(&'a RawArray),
    /// Embedded document
    Document(&'a RawDocument),
    /// Boolean value
    Boolean(bool),
    /// Null value
    Null,
    /// Regular expression
    RegularExpression(RegexRef<'a>),
    /// JavaScript code
    JavaScriptCode(&'a str),
    /// JavaScript code w/ scope
    JavaScriptCodeWithScope(CodeWithScopeRef<'a>),
    /// 32-bit signed integer
    Int32(i32),
    /// 64-bit signed integer
    Int64(i64),
    /// Timestamp
    Timestamp(Timestamp),
    /// Binary data
    Binary(BinaryRef<'a>),
    /// [ObjectId](http://dochub.mongodb.org/core/objectids)
    ObjectId(ObjectId),
    /// UTC datetime
    DateTime(DateTime),
    /// Symbol (Deprecated)
    Symbol(&'a str),
    /// [128-bit decimal floating point](https://github.com/mongodb/specifications/blob/master/source/bson-decimal128/decimal128.rst)
    Decimal128(Decimal128),
    /// Undefined value (Deprecated)
    Undefined,
    /// Max key
    MaxKey,
    /// Min key
    MinKey,
    /// DBPointer (Deprecated)
    DbPointer(DbPointerRef<'a>),
}

impl<'a> BsonRef<'a> {
    /// Get the [`ElementType`] of this value.
    pub fn element_type(&self) -> ElementType {
        match *self {
            BsonRef::Double(..) => ElementType::Double,
            BsonRef::String(..) => ElementType::String,
            BsonRef::Array(..) => ElementType::Array,
            BsonRef::Document(..) => ElementType::EmbeddedDocument,
            BsonRef::Boolean(..) => ElementType::Boolean,
            BsonRef::Null => ElementType::Null,
            BsonRef::RegularExpression(..) => ElementType::RegularExpression,
            BsonRef::JavaScriptCode(..) => ElementType::JavaScriptCode,
            BsonRef::JavaScriptCodeWithScope(..) => ElementType::JavaScriptCodeWithScope,
            BsonRef::Int32(..) => ElementType::Int32,
            BsonRef::Int64(..) => ElementType::Int64,
            BsonRef::Timestamp(..) => ElementType::Timestamp,
            BsonRef::Binary(..) => ElementType::Binary,
            BsonRef::ObjectId(..) => ElementType::ObjectId,
            BsonRef::DateTime(..) => ElementType::DateTime,
            BsonRef::Symbol(..) => ElementType::Symbol,
            BsonRef::Decimal128(..) => ElementType::Decimal128,
            BsonRef::Undefined => ElementType::Undefined,
            BsonRef::MaxKey => ElementType::MaxKey,
            BsonRef::MinKey => ElementType::MinKey,
            BsonRef::DbPointer(..) => ElementType::DbPointer,
        }
    }

    /// Gets the `f64` that's referenced or returns [`None`] if the referenced value isn't a BSON
    /// double.
    pub fn as_f64(self) -> Option<f64> {
        match self {
            BsonRef::Double(d) => Some(d),
            _ => None,
        }
    }

    /// Gets the `&str` that's referenced or returns [`None`] if the referenced value isn't a BSON
    /// String.
    pub fn as_str(self) -> Option<&'a str> {
        match self {
            BsonRef::String(s) => Some(s),
            _ => None,
        }
    }

    /// Gets the [`RawArray`] that's referenced or returns [`None`] if the referenced value
    /// isn't a BSON array.
    pub fn as_array(self) -> Option<&'a RawArray> {
        match self {
            BsonRef::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Gets the [`RawDocument`] that's referenced or returns [`None`] if the referenced value
    /// isn't a BSON document.
    pub fn as_document(self) -> Option<&'a RawDocument> {
        match self {
            BsonRef::Document(v) => Some(v),
            _ => None,
        }
    }

    /// Gets the `bool` that's referenced or returns [`None`] if the referenced value isn't a BSON
    /// boolean.
    pub fn as_bool(self) -> Option<bool> {
        match self {
            BsonRef::Boolean(v) => Some(v),
            _ => None,
        }
    }

    /// Gets the `i32` that's referenced or returns [`None`] if the referenced value isn't a BSON
    /// Int32.
    pub fn as_i32(self) -> Option<i32> {
        match self {
            BsonRef::Int32(v) => Some(v),
            _ => None,
        }
    }

    /// Gets the `i64` that's referenced or returns [`None`] if the referenced value isn't a BSON
    /// Int64.
    pub fn as_i64(self) -> Option<i64> {
        match self {
            BsonRef::Int64(v) => Some(v),
            _ => None,
        }
    }

    /// Gets the [`ObjectId`] that's referenced or returns [`None`] if the referenced value
    /// isn't a BSON ObjectID.
    pub fn as_object_id(self) -> Option<ObjectId> {
        match self {
            BsonRef::ObjectId(v) => Some(v),
            _ => None,
        }
    }

    /// Gets the [`BinaryRef`] that's referenced or returns [`None`] if the referenced value
    /// isn't a BSON binary.
    pub fn as_binary(self) -> Option<BinaryRef<'a>> {
        match self {
            BsonRef::Binary(v) => Some(v),
            _ => None,
        }
    }

    /// Gets the [`RegexRef`] that's referenced or returns [`None`] if the referenced value
    /// isn't a BSON regular expression.
    pub fn as_regex(self) -> Option<RegexRef<'a>> {
        match self {
            BsonRef::RegularExpression(v) => Some(v),
            _ => None,
        }
    }

    /// Gets the [`DateTime`] that's referenced or returns [`None`] if the referenced value
    /// isn't a BSON datetime.
    pub fn as_datetime(self) -> Option<DateTime> {
        match self {
            BsonRef::DateTime(v) => Some(v),
            _ => None,
        }
    }

    /// Gets the [`Timestamp`] that's referenced or returns [`None`] if the referenced value
    /// isn't a BSON timestamp.
    pub fn as_timestamp(self) -> Option<Timestamp> {
        match self {
            BsonRef::Timestamp(timestamp) => Some(timestamp),
            _ => None,
        }
    }

    /// Gets the [`Decimal128`] that's referenced or returns [`None`] if the referenced value
    /// isn't a BSON Decimal128.
    pub fn as_decimal128(self) -> Option<Decimal128> {
        match self {
            BsonRef::Decimal128(d) => Some(d),
            _ => None,
        }
    }

    /// Returns `true` if the referenced value is a BSON null.
    pub fn is_null(self) -> bool {
        matches!(self, BsonRef::Null)
    }

    /// Reads any numeric value widened (or truncated) to an `i64`. Doubles are converted with
    /// a saturating cast; non-numeric values and decimals read as `0`.
    pub fn number_long(self) -> i64 {
        match self {
            BsonRef::Int32(v) => v as i64,
            BsonRef::Int64(v) => v,
            BsonRef::Double(v) => v as i64,
            _ => 0,
        }
    }

    /// Reads any numeric value converted to an `i32`. Int64 values are truncated to their low
    /// 32 bits; non-numeric values and decimals read as `0`.
    pub fn number_int(self) -> i32 {
        match self {
            BsonRef::Int32(v) => v,
            BsonRef::Int64(v) => v as i32,
            BsonRef::Double(v) => v as i32,
            _ => 0,
        }
    }

    /// Reads any numeric value widened to an `f64`; non-numeric values and decimals read as
    /// `0.0`.
    pub fn number_double(self) -> f64 {
        match self {
            BsonRef::Int32(v) => v as f64,
            BsonRef::Int64(v) => v as f64,
            BsonRef::Double(v) => v,
            _ => 0.0,
        }
    }
}

impl From<i32> for BsonRef<'_> {
    fn from(i: i32) -> Self {
        BsonRef::Int32(i)
    }
}

/// Unsigned 32-bit values are always stored as a BSON Int32 holding the same bit pattern, so
/// values above `i32::MAX` read back as negative numbers. Existing documents depend on this
/// encoding.
impl From<u32> for BsonRef<'_> {
    fn from(u: u32) -> Self {
        BsonRef::Int32(u as i32)
    }
}

impl From<i64> for BsonRef<'_> {
    fn from(i: i64) -> Self {
        BsonRef::Int64(i)
    }
}

impl From<f64> for BsonRef<'_> {
    fn from(f: f64) -> Self {
        BsonRef::Double(f)
    }
}

impl From<bool> for BsonRef<'_> {
    fn from(b: bool) -> Self {
        BsonRef::Boolean(b)
    }
}

impl<'a> From<&'a str> for BsonRef<'a> {
    fn from(s: &'a str) -> Self {
        BsonRef::String(s)
    }
}

impl<'a> From<&'a String> for BsonRef<'a> {
    fn from(s: &'a String) -> Self {
        BsonRef::String(s.as_str())
    }
}

impl<'a> From<&'a RawDocument> for BsonRef<'a> {
    fn from(d: &'a RawDocument) -> Self {
        BsonRef::Document(d)
    }
}

impl<'a> From<&'a Document> for BsonRef<'a> {
    fn from(d: &'a Document) -> Self {
        BsonRef::Document(d.as_raw())
    }
}

impl<'a> From<&'a RawArray> for BsonRef<'a> {
    fn from(a: &'a RawArray) -> Self {
        BsonRef::Array(a)
    }
}

impl From<Timestamp> for BsonRef<'_> {
    fn from(ts: Timestamp) -> Self {
        BsonRef::Timestamp(ts)
    }
}

impl From<ObjectId> for BsonRef<'_> {
    fn from(oid: ObjectId) -> Self {
        BsonRef::ObjectId(oid)
    }
}

impl From<DateTime> for BsonRef<'_> {
    fn from(dt: DateTime) -> Self {
        BsonRef::DateTime(dt)
    }
}

impl From<Decimal128> for BsonRef<'_> {
    fn from(d: Decimal128) -> Self {
        BsonRef::Decimal128(d)
    }
}

impl<'a> From<BinaryRef<'a>> for BsonRef<'a> {
    fn from(b: BinaryRef<'a>) -> Self {
        BsonRef::Binary(b)
    }
}

impl<'a> From<RegexRef<'a>> for BsonRef<'a> {
    fn from(re: RegexRef<'a>) -> Self {
        BsonRef::RegularExpression(re)
    }
}

impl<'a> From<CodeWithScopeRef<'a>> for BsonRef<'a> {
    fn from(code_w_scope: CodeWithScopeRef<'a>) -> Self {
        BsonRef::JavaScriptCodeWithScope(code_w_scope)
    }
}

impl<'a> From<DbPointerRef<'a>> for BsonRef<'a> {
    fn from(dbp: DbPointerRef<'a>) -> Self {
        BsonRef::DbPointer(dbp)
    }
}

/// A BSON regex referencing raw bytes stored elsewhere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegexRef<'a> {
    /// The regex pattern to match.
    pub pattern: &'a str,

    /// The options for the regex.
    pub options: &'a str,
}

/// A BSON "code with scope" value referencing raw bytes stored elsewhere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CodeWithScopeRef<'a> {
    /// The JavaScript code.
    pub code: &'a str,

    /// The scope document containing variable bindings.
    pub scope: &'a RawDocument,
}

impl CodeWithScopeRef<'_> {
    /// The total length in bytes of the encoded value, including its own length prefix.
    pub(crate) fn len(self) -> i32 {
        4 + 4 + self.code.len() as i32 + 1 + self.scope.as_bytes().len() as i32
    }
}

/// A BSON DB pointer value referencing raw bytes stored elsewhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DbPointerRef<'a> {
    pub(crate) namespace: &'a str,
    pub(crate) id: ObjectId,
}

impl<'a> DbPointerRef<'a> {
    pub fn new(namespace: &'a str, id: ObjectId) -> Self {
        Self { namespace, id }
    }

    pub fn namespace(&self) -> &'a str {
        self.namespace
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }
}
