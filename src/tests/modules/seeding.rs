use std::mem;

use pretty_assertions::assert_eq;

use crate::{Document, DocumentBuilder};

fn append_b(mut builder: DocumentBuilder<'static>) -> Document {
    builder.append("b", 1);
    builder.obj().unwrap()
}

#[test]
fn rooted_unshared_owned_moved() {
    let mut orig = doc! { "a" => 1 };
    let orig_ptr = orig.as_ptr();
    assert!(orig.is_rooted());

    let obj = append_b(DocumentBuilder::from_document(mem::take(&mut orig)));

    assert_eq!(orig, Document::new());
    assert_eq!(obj, doc! { "a" => 1, "b" => 1 });
    assert_eq!(obj.as_ptr(), orig_ptr);
}

#[test]
fn rooted_shared_owned_copied() {
    let orig = doc! { "a" => 1 };
    let orig_ptr = orig.as_ptr();

    let obj = append_b(DocumentBuilder::from_document(orig.clone()));

    assert_eq!(orig, doc! { "a" => 1 });
    assert_eq!(obj, doc! { "a" => 1, "b" => 1 });
    assert_ne!(obj.as_ptr(), orig_ptr);
    assert!(orig.is_owned_uniquely());
}

#[test]
fn rooted_unowned_copied() {
    let holder = doc! { "a" => 1 };
    let orig = holder.as_raw();
    let orig_ptr = orig.as_ptr();

    let obj = append_b(DocumentBuilder::from_raw(orig));

    assert_eq!(orig.to_document(), doc! { "a" => 1 });
    assert_eq!(obj, doc! { "a" => 1, "b" => 1 });
    assert_ne!(obj.as_ptr(), orig_ptr);
}

#[test]
fn nonrooted_unshared_owned_moved() {
    let holder = doc! { "" => { "a" => 1 } };
    let mut orig = holder.shared_document("").unwrap();
    let orig_ptr = orig.as_ptr();
    drop(holder);
    assert!(!orig.is_rooted());
    assert!(orig.is_owned_uniquely());

    let obj = append_b(DocumentBuilder::from_document(mem::take(&mut orig)));

    assert_eq!(orig, Document::new());
    assert_eq!(obj, doc! { "a" => 1, "b" => 1 });
    assert_eq!(obj.as_ptr(), orig_ptr);
}

#[test]
fn nonrooted_shared_owned_copied() {
    let holder = doc! { "" => { "a" => 1 } };
    let orig = holder.shared_document("").unwrap();
    let orig_ptr = orig.as_ptr();
    drop(holder);

    let obj = append_b(DocumentBuilder::from_document(orig.clone()));

    assert_eq!(orig, doc! { "a" => 1 });
    assert_eq!(obj, doc! { "a" => 1, "b" => 1 });
    assert_ne!(obj.as_ptr(), orig_ptr);
}

#[test]
fn nonrooted_unowned_copied() {
    let holder = doc! { "" => { "a" => 1 } };
    let orig = holder.get_document("").unwrap();
    let orig_ptr = orig.as_ptr();

    let obj = append_b(DocumentBuilder::from_raw(orig));

    assert_eq!(orig.to_document(), doc! { "a" => 1 });
    assert_eq!(obj, doc! { "a" => 1, "b" => 1 });
    assert_ne!(obj.as_ptr(), orig_ptr);
}

#[test]
fn moved_but_shared_is_copied() {
    let holder = doc! { "" => { "a" => 1 } };
    let mut orig = holder.shared_document("").unwrap();
    let orig_ptr = orig.as_ptr();

    // the parent still holds the storage, so moving does not hand it over
    let obj = append_b(DocumentBuilder::from_document(mem::take(&mut orig)));

    assert_eq!(obj, doc! { "a" => 1, "b" => 1 });
    assert_ne!(obj.as_ptr(), orig_ptr);
    assert_eq!(holder, doc! { "" => { "a" => 1 } });
    assert!(holder.is_owned_uniquely());
}
