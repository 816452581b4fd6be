use pretty_assertions::assert_eq;

use crate::{spec::ElementType, Document, DocumentBuilder};

#[test]
fn empty_literals() {
    assert_eq!(doc! {}, Document::new());
    assert_eq!(array![], Document::new());

    let empty = doc! {};
    assert_eq!(empty.as_bytes(), b"\x05\x00\x00\x00\x00");
}

#[test]
fn literal_matches_builder() {
    let mut builder = DocumentBuilder::new();
    builder.append("a", 1).append("b", "two").append("c", -3.5);
    {
        let mut sub = builder.subobj_start("d");
        sub.append("e", true);
    }
    {
        let mut sub = builder.subarray_start("f");
        sub.append(1).append("x");
    }
    let built = builder.obj().unwrap();

    let literal = doc! {
        "a" => 1,
        "b" => "two",
        "c" => (-3.5),
        "d" => { "e" => true },
        "f" => [1, "x"],
    };
    assert_eq!(literal, built);
}

#[test]
fn nesting() {
    let doc = doc! {
        "a" => [[], {}, [{ "b" => [1, 2] }]],
        "c" => { "d" => { "e" => {} } },
    };

    let a = doc.get_array("a").unwrap();
    assert_eq!(a.len().unwrap(), 3);
    assert!(a.get_array(0).unwrap().is_empty());
    assert!(a.get_document(1).unwrap().is_empty());
    let b = a
        .get_array(2)
        .unwrap()
        .get_document(0)
        .unwrap()
        .get_array("b")
        .unwrap();
    assert_eq!(b.get_i32(1).unwrap(), 2);

    let e = doc
        .get_document("c")
        .unwrap()
        .get_document("d")
        .unwrap()
        .get_document("e")
        .unwrap();
    assert!(e.is_empty());
}

#[test]
fn values_are_expressions() {
    let name = String::from("dynamic");
    let n = 40_i64;
    let doc = doc! {
        "name" => (&name),
        "n" => (n + 2),
        "key".to_string() => 1,
    };

    assert_eq!(doc.get_str("name").unwrap(), "dynamic");
    assert_eq!(doc.get_i64("n").unwrap(), 42);
    assert_eq!(doc.get_i32("key").unwrap(), 1);
}

#[test]
fn arrays_are_keyed_by_index() {
    let arr = array![true, 2.5, "three"];
    let keys: Vec<&str> = arr.iter().map(|e| e.unwrap().key()).collect();
    assert_eq!(keys, vec!["0", "1", "2"]);

    let types: Vec<ElementType> = arr.iter().map(|e| e.unwrap().element_type()).collect();
    assert_eq!(
        types,
        vec![ElementType::Boolean, ElementType::Double, ElementType::String]
    );
}

#[test]
fn trailing_commas() {
    assert_eq!(doc! { "a" => 1, }, doc! { "a" => 1 });
    assert_eq!(array![1,], array![1]);
}

#[test]
#[should_panic(expected = "invalid document literal")]
fn nul_in_key_panics() {
    doc! { "a\0b" => 1 };
}
