use pretty_assertions::assert_eq;

use crate::{
    binary::BinaryRef,
    oid::ObjectId,
    raw::{BsonRef, CodeWithScopeRef, DbPointerRef, RawArray, RawDocument, RegexRef},
    spec::ElementType,
    DateTime,
    DocumentBuilder,
    Timestamp,
};

const ALL_TYPES: [ElementType; 21] = [
    ElementType::Double,
    ElementType::String,
    ElementType::EmbeddedDocument,
    ElementType::Array,
    ElementType::Binary,
    ElementType::Undefined,
    ElementType::ObjectId,
    ElementType::Boolean,
    ElementType::DateTime,
    ElementType::Null,
    ElementType::RegularExpression,
    ElementType::DbPointer,
    ElementType::JavaScriptCode,
    ElementType::Symbol,
    ElementType::JavaScriptCodeWithScope,
    ElementType::Int32,
    ElementType::Timestamp,
    ElementType::Int64,
    ElementType::Decimal128,
    ElementType::MaxKey,
    ElementType::MinKey,
];

fn empty_array() -> &'static RawArray {
    RawArray::from_doc(RawDocument::empty())
}

fn empty_db_pointer() -> BsonRef<'static> {
    BsonRef::DbPointer(DbPointerRef::new("", ObjectId::MIN))
}

fn empty_code_with_scope() -> BsonRef<'static> {
    BsonRef::JavaScriptCodeWithScope(CodeWithScopeRef {
        code: "",
        scope: RawDocument::empty(),
    })
}

fn expected_min(element_type: ElementType) -> BsonRef<'static> {
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
        ElementType::DateTime => BsonRef::DateTime(DateTime::from_millis(i64::MIN)),
        ElementType::Timestamp => BsonRef::Timestamp(Timestamp {
            time: 0,
            increment: 0,
        }),
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

fn expected_max(element_type: ElementType) -> BsonRef<'static> {
    match element_type {
        ElementType::Double
        | ElementType::Int32
        | ElementType::Int64
        | ElementType::Decimal128 => BsonRef::Double(f64::INFINITY),
        ElementType::String | ElementType::Symbol => BsonRef::Document(RawDocument::empty()),
        ElementType::EmbeddedDocument => BsonRef::Array(empty_array()),
        ElementType::Array => BsonRef::Binary(BinaryRef::generic(&[])),
        ElementType::Binary => BsonRef::ObjectId(ObjectId::from_bytes([0; 12])),
        ElementType::ObjectId => BsonRef::ObjectId(ObjectId::from_bytes([0xff; 12])),
        ElementType::Boolean => BsonRef::Boolean(true),
        ElementType::DateTime => BsonRef::DateTime(DateTime::from_millis(i64::MAX)),
        ElementType::Timestamp => BsonRef::Timestamp(Timestamp {
            time: u32::MAX,
            increment: u32::MAX,
        }),
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

fn assert_same(actual: BsonRef<'_>, expected: BsonRef<'_>, element_type: ElementType) {
    match (actual, expected) {
        (BsonRef::Double(a), BsonRef::Double(e)) if e.is_nan() => {
            assert!(a.is_nan(), "min for {:?} should be NaN, got {}", element_type, a)
        }
        (actual, expected) => assert_eq!(actual, expected, "sentinel for {:?}", element_type),
    }
}

#[test]
fn min_for_every_type() {
    let mut builder = DocumentBuilder::new();
    for (i, element_type) in ALL_TYPES.iter().enumerate() {
        builder.append_min_for_type(i.to_string(), *element_type);
    }
    let doc = builder.obj().unwrap();

    for (i, element_type) in ALL_TYPES.iter().enumerate() {
        let actual = doc.get(i.to_string()).unwrap().unwrap();
        assert_same(actual, expected_min(*element_type), *element_type);
    }
}

#[test]
fn max_for_every_type() {
    let mut builder = DocumentBuilder::new();
    for (i, element_type) in ALL_TYPES.iter().enumerate() {
        builder.append_max_for_type(i.to_string(), *element_type);
    }
    let doc = builder.obj().unwrap();

    for (i, element_type) in ALL_TYPES.iter().enumerate() {
        let actual = doc.get(i.to_string()).unwrap().unwrap();
        assert_same(actual, expected_max(*element_type), *element_type);
    }
}

#[test]
fn numeric_types_share_sentinels() {
    let mut builder = DocumentBuilder::new();
    builder
        .append_min_for_type("min", ElementType::Decimal128)
        .append_max_for_type("max", ElementType::Int32);
    let doc = builder.obj().unwrap();

    assert!(doc.get_f64("min").unwrap().is_nan());
    assert_eq!(doc.get_f64("max").unwrap(), f64::INFINITY);
}

#[test]
fn timestamp_bounds() {
    let mut builder = DocumentBuilder::new();
    builder
        .append_min_for_type("min", ElementType::Timestamp)
        .append_max_for_type("max", ElementType::Timestamp);
    let doc = builder.obj().unwrap();

    assert!(doc.get_timestamp("min").unwrap().is_null());
    let max = doc.get_timestamp("max").unwrap();
    assert!(!max.is_null());
    assert_eq!(max, Timestamp::MAX);
}

#[test]
fn max_of_a_type_is_min_of_the_next() {
    let chain = [
        (ElementType::String, ElementType::EmbeddedDocument),
        (ElementType::EmbeddedDocument, ElementType::Array),
        (ElementType::Array, ElementType::Binary),
        (ElementType::Binary, ElementType::ObjectId),
        (ElementType::RegularExpression, ElementType::DbPointer),
        (ElementType::DbPointer, ElementType::JavaScriptCode),
        (ElementType::JavaScriptCode, ElementType::JavaScriptCodeWithScope),
    ];

    for (lower, upper) in chain {
        let mut builder = DocumentBuilder::new();
        builder
            .append_max_for_type("a", lower)
            .append_min_for_type("a", upper);
        let doc = builder.obj().unwrap();

        let mut iter = doc.iter();
        let max = iter.next().unwrap().unwrap();
        let min = iter.next().unwrap().unwrap();
        assert_eq!(max.as_bytes(), min.as_bytes(), "{:?} -> {:?}", lower, upper);
    }
}
