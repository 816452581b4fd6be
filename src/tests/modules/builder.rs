use std::ptr;

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;

use crate::{
    error::ErrorKind,
    ArrayBuilder,
    Buffer,
    Document,
    DocumentBuilder,
    RawArray,
    RawDocument,
};

#[test]
fn empty_builder_makes_empty_document() {
    let doc = DocumentBuilder::new().obj().unwrap();
    assert_eq!(doc.as_bytes(), b"\x05\x00\x00\x00\x00");
    assert!(doc.is_rooted());
    assert_eq!(doc, Document::new());
}

#[test]
fn elements_are_tag_name_payload() {
    let mut builder = DocumentBuilder::new();
    builder.append("a", 1).append("b", "c").append("d", true);
    let doc = builder.obj().unwrap();

    let expected: &[u8] = b"\x19\x00\x00\x00\
        \x10a\x00\x01\x00\x00\x00\
        \x02b\x00\x02\x00\x00\x00c\x00\
        \x08d\x00\x01\
        \x00";
    assert_eq!(doc.as_bytes(), expected);
}

#[test]
fn nested_builders_share_the_buffer() {
    let mut builder = DocumentBuilder::new();
    builder.append("a", 1);
    {
        let mut sub = builder.subobj_start("sub");
        sub.append("b", 2);
        let mut arr = sub.subarray_start("arr");
        arr.append("x").append_number(3_i64);
        arr.done();
        sub.done();
    }
    builder.append("c", 4);
    let doc = builder.obj().unwrap();

    assert_eq!(
        doc,
        doc! { "a" => 1, "sub" => { "b" => 2, "arr" => ["x", 3] }, "c" => 4 }
    );
}

#[test]
fn dropped_child_is_finalized() {
    let mut builder = DocumentBuilder::new();
    {
        let mut sub = builder.subobj_start("sub");
        sub.append("b", 2);
    }
    let doc = builder.obj().unwrap();
    assert_eq!(doc.get_document("sub").unwrap().get_i32("b").unwrap(), 2);
}

#[test]
fn reset_to_empty_clears_fields() {
    let mut builder = DocumentBuilder::new();
    builder.append("a", 3);
    builder.reset_to_empty();
    assert!(builder.is_empty());
    assert_eq!(builder.obj().unwrap(), Document::new());
}

#[test]
fn reset_to_empty_for_nested_builder_only_resets_inner_obj() {
    let mut builder = DocumentBuilder::new();
    builder.append("a", 3);
    {
        let mut inner = builder.subobj_start("nestedObj");
        inner.append("b", 4);
        inner.reset_to_empty();
        inner.done();
    }
    assert_eq!(builder.obj().unwrap(), doc! { "a" => 3, "nestedObj" => {} });
}

#[test]
fn moving_an_owning_builder_works() {
    let mut initial = DocumentBuilder::new();
    initial.append("a", 1);

    let mut builder = initial;
    assert!(builder.owned());
    builder.append("b", 2).append("c", 3);
    assert_eq!(
        builder.obj().unwrap(),
        doc! { "a" => 1, "b" => 2, "c" => 3 }
    );
}

#[test]
fn moving_a_non_owning_builder_works() {
    let mut outer = DocumentBuilder::new();
    let outer_buffer: *const Buffer = outer.buffer();
    {
        let mut initial = outer.subobj_start("nested");
        initial.append("a", 1);

        let mut builder = initial;
        assert!(!builder.owned());
        assert!(ptr::eq(builder.buffer(), outer_buffer));

        builder.append("b", 2).append("c", 3);
    }

    assert_eq!(
        outer.obj().unwrap(),
        doc! { "nested" => { "a" => 1, "b" => 2, "c" => 3 } }
    );
}

#[test]
fn moving_an_array_builder_works() {
    let mut builder = DocumentBuilder::new();
    builder.append("a", 1);
    {
        let mut initial = builder.subarray_start("array");
        initial.append(1).append("2");

        let mut moved = initial;
        moved.append(3).append("4");
        moved.done();
    }
    assert_eq!(
        builder.obj().unwrap(),
        doc! { "a" => 1, "array" => [1, "2", 3, "4"] }
    );
}

#[test]
fn array_builder_fills_with_nulls() {
    let mut arr = ArrayBuilder::new();
    arr.append("first");
    arr.fill_to(3);
    arr.fill_to(2);
    assert_eq!(arr.len(), 3);
    let arr = arr.arr().unwrap();

    assert_eq!(arr.n_fields().unwrap(), 3);
    assert!(arr.get("2").unwrap().unwrap().is_null());
}

#[test]
fn array_len_stops_counting_once_poisoned() {
    // Length prefix plus five `null` elements of three bytes each.
    let mut buf = Buffer::new().with_max_size(19);
    {
        let mut arr = ArrayBuilder::new_in(&mut buf);
        arr.fill_to(100);
        assert_eq!(arr.len(), 5);

        arr.append(1).append_null().append_number(2_i64);
        assert_eq!(arr.len(), 5);

        drop(arr.subobj_start());
        drop(arr.subarray_start());
        assert_eq!(arr.len(), 5);

        arr.fill_to(6);
        assert_eq!(arr.len(), 5);
    }
    assert_matches!(
        buf.check().unwrap_err().kind,
        ErrorKind::BufferOverflow { max: 19, .. }
    );
}

#[test]
fn builder_in_caller_buffer() {
    let mut buf = Buffer::new();
    buf.append(b"prefix").unwrap();
    {
        let mut builder = DocumentBuilder::new_in(&mut buf);
        builder.append("a", 1);
    }
    let doc = RawDocument::from_bytes(&buf.as_bytes()[6..]).unwrap();
    assert_eq!(doc.get_i32("a").unwrap(), 1);
    assert_eq!(&buf.as_bytes()[..6], b"prefix");
}

#[test]
fn len_and_has_field_track_progress() {
    let mut builder = DocumentBuilder::new();
    assert_eq!(builder.len(), 4);
    assert!(builder.is_empty());

    builder.append("a", 1);
    assert_eq!(builder.len(), 11);
    assert!(builder.has_field("a"));
    assert!(!builder.has_field("b"));
}

#[test]
fn copying_elements() {
    let source = doc! { "a" => 1, "b" => { "c" => "d" }, "e" => [true] };
    let mut builder = DocumentBuilder::new();
    builder.append_elements(&source);
    assert_eq!(builder.obj().unwrap(), source);

    let mut builder = DocumentBuilder::new();
    let b = source.get_element("b").unwrap().unwrap();
    builder.append_element(&b).append_as(&b, "renamed");
    assert_eq!(
        builder.obj().unwrap(),
        doc! { "b" => { "c" => "d" }, "renamed" => { "c" => "d" } }
    );

    let mut arr = ArrayBuilder::new();
    arr.append_element(&b);
    assert_eq!(arr.arr().unwrap(), doc! { "0" => { "c" => "d" } });
}

#[test]
fn appending_documents_and_arrays() {
    let inner = doc! { "x" => 1 };
    let list = crate::array![1, 2];
    let mut builder = DocumentBuilder::new();
    builder
        .append("doc", &inner)
        .append("raw", inner.as_raw())
        .append_array("list", RawArray::from_doc(list.as_raw()));
    let doc = builder.obj().unwrap();

    assert_eq!(doc.get_document("doc").unwrap(), inner.as_raw());
    assert_eq!(doc.get_document("raw").unwrap(), inner.as_raw());
    assert_eq!(doc.get_array("list").unwrap().get_i32(1).unwrap(), 2);
}

#[test]
fn unsigned_values_keep_their_bits() {
    let mut builder = DocumentBuilder::new();
    builder.append("a", u32::MAX);
    let doc = builder.obj().unwrap();
    let elem = doc.get_element("a").unwrap().unwrap();
    assert_eq!(elem.value().as_i32(), Some(-1));
    assert_eq!(elem.number_long() as u32, u32::MAX);
}

#[test]
fn interior_nul_in_name_fails_at_finalize() {
    let mut builder = DocumentBuilder::new();
    builder.append("a\0b", 1).append("c", 2);
    assert_matches!(
        builder.obj().unwrap_err().kind,
        ErrorKind::InvalidFieldName { ref name } if name == "a\0b"
    );
}

#[test]
#[should_panic(expected = "does not own its buffer")]
fn obj_on_a_borrowed_builder_panics() {
    let mut buf = Buffer::new();
    let builder = DocumentBuilder::new_in(&mut buf);
    let _ = builder.obj();
}
