use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::{
    number::{MAX_ENCODABLE_DOUBLE, MAX_ENCODABLE_INT, MIN_ENCODABLE_DOUBLE, MIN_ENCODABLE_INT},
    spec::ElementType,
    Document,
    DocumentBuilder,
};

const MAX_INT: i64 = i32::MAX as i64;
const MIN_INT: i64 = i32::MIN as i64;

fn single(build: impl FnOnce(&mut DocumentBuilder<'static>)) -> Document {
    let mut builder = DocumentBuilder::new();
    build(&mut builder);
    let doc = builder.obj().unwrap();
    assert_eq!(doc.n_fields().unwrap(), 1);
    doc
}

fn element_type(doc: &Document) -> ElementType {
    doc.get_element("a").unwrap().unwrap().element_type()
}

fn number_long(doc: &Document) -> i64 {
    doc.get_element("a").unwrap().unwrap().number_long()
}

#[test]
fn append_unsigned_int() {
    let data = [
        0,
        100,
        MAX_ENCODABLE_INT as u32,
        MAX_ENCODABLE_INT as u32 + 1,
        i32::MAX as u32,
        i32::MAX as u32 + 1,
        u32::MAX,
    ];
    for v in data {
        let doc = single(|b| {
            b.append("a", v);
        });
        assert_eq!(number_long(&doc) as u32, v, "{}", v);
        assert_eq!(element_type(&doc), ElementType::Int32, "{}", v);

        let narrowed = single(|b| {
            b.append_number("a", v);
        });
        assert_eq!(narrowed, doc, "{}", v);
        assert_eq!(number_long(&narrowed) as u32, v, "{}", v);
    }
}

#[test]
fn append_int_or_long() {
    let bound = 1_i64 << 30;
    let data = [
        (0, ElementType::Int32),
        (-100, ElementType::Int32),
        (100, ElementType::Int32),
        (bound - 1, ElementType::Int32),
        (-(bound - 1), ElementType::Int32),
        (bound, ElementType::Int64),
        (-bound, ElementType::Int64),
        (MIN_INT, ElementType::Int64),
        (MAX_INT, ElementType::Int64),
        (MIN_INT - 1, ElementType::Int64),
        (MAX_INT + 1, ElementType::Int64),
        (i64::MIN, ElementType::Int64),
        (i64::MAX, ElementType::Int64),
    ];
    for (v, t) in data {
        let doc = single(|b| {
            b.append_int_or_long("a", v);
        });
        assert_eq!(number_long(&doc), v, "{}", v);
        assert_eq!(element_type(&doc), t, "{}", v);
    }
}

#[test]
fn append_number_usize() {
    let data = [
        (0, ElementType::Int32),
        (100, ElementType::Int32),
        (MAX_ENCODABLE_INT as usize, ElementType::Int32),
        (MAX_ENCODABLE_INT as usize + 1, ElementType::Int32),
        (i32::MAX as usize, ElementType::Int32),
        (i32::MAX as usize + 1, ElementType::Int64),
        (usize::MAX, ElementType::Int64),
    ];
    for (v, t) in data {
        let doc = single(|b| {
            b.append_number("a", v);
        });
        assert_eq!(number_long(&doc) as usize, v, "{}", v);
        assert_eq!(element_type(&doc), t, "{}", v);
    }
}

#[test]
fn append_number_long_long() {
    let data = [
        (0, ElementType::Int32),
        (-100, ElementType::Int32),
        (100, ElementType::Int32),
        (MIN_ENCODABLE_INT, ElementType::Int32),
        (MAX_ENCODABLE_INT, ElementType::Int32),
        (MIN_ENCODABLE_INT - 1, ElementType::Double),
        (MAX_ENCODABLE_INT + 1, ElementType::Double),
        (MIN_INT, ElementType::Double),
        (MAX_INT, ElementType::Double),
        (MIN_INT - 1, ElementType::Double),
        (MAX_INT + 1, ElementType::Double),
        (1 << 40, ElementType::Double),
        (MIN_ENCODABLE_DOUBLE, ElementType::Double),
        (MAX_ENCODABLE_DOUBLE, ElementType::Double),
        (MIN_ENCODABLE_DOUBLE - 1, ElementType::Int64),
        (MAX_ENCODABLE_DOUBLE + 1, ElementType::Int64),
        (i64::MIN, ElementType::Int64),
        (i64::MAX, ElementType::Int64),
    ];
    for (v, t) in data {
        let doc = single(|b| {
            b.append_number("a", v);
        });
        let elem = doc.get_element("a").unwrap().unwrap();
        if t == ElementType::Double {
            assert!((elem.number_double() - v as f64).abs() < 0.001, "{}", v);
        } else {
            assert_eq!(elem.number_long(), v, "{}", v);
        }
        assert_eq!(elem.element_type(), t, "{}", v);
    }
}

#[test]
fn append_number_passes_other_types_through() {
    let doc = single(|b| {
        b.append_number("a", 1 << 20);
    });
    assert_eq!(element_type(&doc), ElementType::Int32);

    let doc = single(|b| {
        b.append_number("a", 0.5);
    });
    assert_eq!(element_type(&doc), ElementType::Double);

    let doc = single(|b| {
        b.append_number("a", crate::Decimal128::from_bytes([1; 16]));
    });
    assert_eq!(element_type(&doc), ElementType::Decimal128);
}

#[test]
fn decimal_reads_back_only_as_decimal() {
    let dec = crate::Decimal128::from_bytes([7; 16]);
    let doc = single(|b| {
        b.append_number("a", dec);
    });
    let elem = doc.get_element("a").unwrap().unwrap();
    assert_eq!(elem.element_type(), ElementType::Decimal128);
    assert_eq!(elem.value().as_decimal128(), Some(dec));
    assert_eq!(elem.number_long(), 0);
    assert_eq!(elem.number_int(), 0);
    assert_eq!(elem.number_double(), 0.0);
}

#[test]
fn long_long_min_matches_direct_append() {
    let narrowed = single(|b| {
        b.append_number("a", i64::MIN);
    });
    let direct = single(|b| {
        b.append("a", i64::MIN);
    });
    assert_eq!(narrowed, direct);
    assert_eq!(number_long(&narrowed), i64::MIN);
}

#[test]
fn plain_i64_is_always_int64() {
    let doc = crate::doc! { "a" => 5_i64, "b" => (1_i64 << 40) };
    assert_eq!(doc.get_i64("a").unwrap(), 5);
    assert_eq!(doc.get_i64("b").unwrap(), 1 << 40);
}

proptest! {
    #[test]
    fn append_number_reads_back(v in any::<i64>()) {
        let doc = single(|b| {
            b.append_number("a", v);
        });
        let elem = doc.get_element("a").unwrap().unwrap();
        match elem.element_type() {
            ElementType::Double => prop_assert_eq!(elem.number_double() as i64, v),
            _ => prop_assert_eq!(elem.number_long(), v),
        }
    }

    #[test]
    fn type_choice_ignores_call_order(v in any::<i64>(), w in any::<i64>()) {
        let mut builder = DocumentBuilder::new();
        builder.append_number("a", v).append_number("b", w);
        let forward = builder.obj().unwrap();

        let mut builder = DocumentBuilder::new();
        builder.append_number("b", w).append_number("a", v);
        let backward = builder.obj().unwrap();

        for key in ["a", "b"] {
            prop_assert_eq!(
                forward.get_element(key).unwrap().unwrap().element_type(),
                backward.get_element(key).unwrap().unwrap().element_type()
            );
        }
    }
}
