use pretty_assertions::assert_eq;

use crate::{Buffer, DocumentBuilder, RawDocument};

#[test]
fn resume_building() {
    let mut buf = Buffer::new();
    {
        let mut first = DocumentBuilder::new_in(&mut buf);
        first.append("a", "b");
    }
    {
        let mut second = DocumentBuilder::resume(&mut buf).unwrap();
        second.append("c", "d");
    }

    let expected = doc! { "a" => "b", "c" => "d" };
    assert_eq!(buf.as_bytes(), expected.as_bytes());
}

#[test]
fn resume_building_with_nesting() {
    let mut buf = Buffer::new();
    {
        let mut first = DocumentBuilder::new_in(&mut buf);
        first.append("ll", &doc! { "f" => { "cc" => "dd" } });
    }
    let nested_before = {
        let doc = RawDocument::from_bytes(buf.as_bytes()).unwrap();
        doc.get_document("ll").unwrap().as_bytes().to_vec()
    };
    {
        let mut second = DocumentBuilder::resume(&mut buf).unwrap();
        second.append("a", &doc! { "c" => 3 });
    }

    let obj = RawDocument::from_bytes(buf.as_bytes()).unwrap();
    assert_eq!(
        obj.to_document(),
        doc! { "ll" => { "f" => { "cc" => "dd" } }, "a" => { "c" => 3 } }
    );
    assert_eq!(obj.get_document("ll").unwrap().as_bytes(), nested_before.as_slice());
}

#[test]
fn resume_with_nested_builder() {
    let mut buf = Buffer::new();
    DocumentBuilder::new_in(&mut buf).done();
    {
        let mut resumed = DocumentBuilder::resume(&mut buf).unwrap();
        let mut sub = resumed.subobj_start("sub");
        sub.append("x", 1);
    }
    assert_eq!(buf.as_bytes(), doc! { "sub" => { "x" => 1 } }.as_bytes());
}

#[test]
fn resume_at_leaves_leading_bytes_alone() {
    let mut buf = Buffer::new();
    buf.append(b"head").unwrap();
    DocumentBuilder::new_in(&mut buf).append("a", 1);
    {
        let mut resumed = DocumentBuilder::resume_at(&mut buf, 4).unwrap();
        resumed.append("b", 2);
    }
    assert_eq!(&buf.as_bytes()[..4], b"head");
    assert_eq!(
        &buf.as_bytes()[4..],
        doc! { "a" => 1, "b" => 2 }.as_bytes()
    );
}

#[test]
fn resume_rejects_unfinished_bytes() {
    let mut buf = Buffer::new();
    buf.append(b"\x09\x00\x00\x00\x00").unwrap();
    assert!(DocumentBuilder::resume(&mut buf).unwrap_err().is_malformed_value());
    assert!(DocumentBuilder::resume_at(&mut buf, 9).is_err());
    assert_eq!(buf.len(), 5);
}

#[test]
fn re_finalizing_is_byte_identical_to_one_pass() {
    let mut one_pass = DocumentBuilder::new();
    one_pass.append("a", "b").append("c", "d");
    let one_pass = one_pass.obj().unwrap();

    let mut first = DocumentBuilder::new();
    first.append("a", "b");
    let first = first.obj().unwrap();
    let mut second = DocumentBuilder::from_document(first);
    second.append("c", "d");

    assert_eq!(second.obj().unwrap().as_bytes(), one_pass.as_bytes());
}
