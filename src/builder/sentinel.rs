//! Sentinel values that sort below or above every value of a given type.
//!
//! Values of different types order by a canonical type rank (numbers, then strings, then
//! documents, arrays, binary, object ids, booleans, dates, timestamps, regular expressions, db
//! pointers, code, code with scope). The minimum of a type is the smallest value of that type;
//! the maximum is the smallest value of the next rank up, which bounds every value of the type
//! from above.

use crate::{
    binary::BinaryRef,
    oid::ObjectId,
    raw::{BsonRef, CodeWithScopeRef, DbPointerRef, RawArray, RawDocument, RegexRef},
    spec::ElementType,
    DateTime,
    Timestamp,
};

use super::DocumentBuilder;

fn empty_array() -> &'static RawArray {
    RawArray::from_doc(RawDocument::empty())
}

fn empty_code_with_scope() -> BsonRef<'static> {
    BsonRef::JavaScriptCodeWithScope(CodeWithScopeRef {
        code: "",
        scope: RawDocument::empty(),
    })
}

fn empty_db_pointer() -> BsonRef<'static> {
    BsonRef::DbPointer(DbPointerRef::new("", ObjectId::MIN))
}

/// The smallest value of `element_type`'s canonical type.
pub(crate) fn min_for_type(element_type: ElementType) -> BsonRef<'static> {
    match element_type {
        ElementType::Double
        | ElementType::Int32
        | ElementType::Int64
        | ElementType::Decimal128 => BsonRef::Double(f64::NAN),
        ElementType::String | ElementType::Symbol => BsonRef::String(""),
        ElementType::EmbeddedDocument => BsonRef::Document(RawDocument::empty()),
        ElementType::Array => BsonRef::Array(empty_array()),
        ElementType::Binary => BsonRef::Binary(BinaryRef::generic(&[])),
        ElementType::ObjectId => BsonRef::ObjectId(ObjectId::MIN),
        ElementType::Boolean => BsonRef::Boolean(false),
        ElementType::DateTime => BsonRef::DateTime(DateTime::MIN),
        ElementType::Timestamp => BsonRef::Timestamp(Timestamp::default()),
        ElementType::RegularExpression => BsonRef::RegularExpression(RegexRef {
            pattern: "",
            options: "",
        }),
        ElementType::DbPointer => empty_db_pointer(),
        ElementType::JavaScriptCode => BsonRef::JavaScriptCode(""),
        ElementType::JavaScriptCodeWithScope => empty_code_with_scope(),
        ElementType::Null => BsonRef::Null,
        ElementType::Undefined => BsonRef::Undefined,
        ElementType::MinKey => BsonRef::MinKey,
        ElementType::MaxKey => BsonRef::MaxKey,
    }
}

/// A value greater than every value of `element_type`'s canonical type.
pub(crate) fn max_for_type(element_type: ElementType) -> BsonRef<'static> {
    match element_type {
        ElementType::Double
        | ElementType::Int32
        | ElementType::Int64
        | ElementType::Decimal128 => BsonRef::Double(f64::INFINITY),
        ElementType::String | ElementType::Symbol => BsonRef::Document(RawDocument::empty()),
        ElementType::EmbeddedDocument => BsonRef::Array(empty_array()),
        ElementType::Array => BsonRef::Binary(BinaryRef::generic(&[])),
        ElementType::Binary => BsonRef::ObjectId(ObjectId::MIN),
        ElementType::ObjectId => BsonRef::ObjectId(ObjectId::MAX),
        ElementType::Boolean => BsonRef::Boolean(true),
        ElementType::DateTime => BsonRef::DateTime(DateTime::MAX),
        ElementType::Timestamp => BsonRef::Timestamp(Timestamp::MAX),
        ElementType::RegularExpression => empty_db_pointer(),
        ElementType::DbPointer => BsonRef::JavaScriptCode(""),
        ElementType::JavaScriptCode => empty_code_with_scope(),
        ElementType::JavaScriptCodeWithScope => BsonRef::MaxKey,
        ElementType::Null => BsonRef::Null,
        ElementType::Undefined => BsonRef::Undefined,
        ElementType::MinKey => BsonRef::MinKey,
        ElementType::MaxKey => BsonRef::MaxKey,
    }
}

impl DocumentBuilder<'_> {
    /// Appends the smallest value of `element_type`'s canonical type.
    pub fn append_min_for_type(
        &mut self,
        name: impl AsRef<str>,
        element_type: ElementType,
    ) -> &mut Self {
        self.append(name, min_for_type(element_type))
    }

    /// Appends a value that sorts after every value of `element_type`'s canonical type.
    ///
    /// ```
    /// use bson_builder::{spec::ElementType, DocumentBuilder, Timestamp};
    ///
    /// let mut builder = DocumentBuilder::new();
    /// builder.append_max_for_type("a", ElementType::Timestamp);
    /// let doc = builder.obj()?;
    /// assert_eq!(doc.get_timestamp("a")?, Timestamp::MAX);
    /// # Ok::<(), bson_builder::error::Error>(())
    /// ```
    pub fn append_max_for_type(
        &mut self,
        name: impl AsRef<str>,
        element_type: ElementType,
    ) -> &mut Self {
        self.append(name, max_for_type(element_type))
    }
}
