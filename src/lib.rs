//! BSON is a binary format in which zero or more key/value pairs are stored as a single entity.
//! We call this entity a document.
//!
//! This library builds BSON documents incrementally, directly in their binary form, and reads
//! them back without decoding them up front. It also provides [`FieldRef`], an editable
//! representation of dotted field paths such as `"a.b.0"`.
//!
//! ## Building documents
//!
//! A [`DocumentBuilder`] appends fields one at a time into a growable [`Buffer`]. Nested
//! documents and arrays are written in place by child builders, and numbers can be narrowed to
//! the most compact BSON type that holds them (see [`number`]).
//!
//! ```rust
//! use bson_builder::{DocumentBuilder, spec::ElementType};
//!
//! let mut builder = DocumentBuilder::new();
//! builder.append("name", "widget").append_number("count", 3_i64);
//! {
//!     let mut sizes = builder.subarray_start("sizes");
//!     sizes.append(1.5).append(2.5);
//! }
//! let doc = builder.obj()?;
//!
//! assert_eq!(doc.get_str("name")?, "widget");
//! assert_eq!(doc.get_element("count")?.unwrap().element_type(), ElementType::Int32);
//! assert_eq!(doc.get_array("sizes")?.get_f64(1)?, 2.5);
//! # Ok::<(), bson_builder::error::Error>(())
//! ```
//!
//! The [`doc!`] and [`array!`] macros build literals through the same builders.
//!
//! ## Ownership
//!
//! A finished [`Document`] shares its bytes with every clone of it and with sub-documents
//! extracted from it. Handing a document back to [`DocumentBuilder::from_document`] continues
//! it in place when nothing else shares its bytes, and copies them otherwise. A borrowed
//! [`RawDocument`] can be read and copied, never written.
//!
//! ## Size limits
//!
//! Finished documents are checked against a [`SizeLimit`], 16 MiB unless a larger limit is
//! requested. Buffers themselves never grow past [`BUFFER_MAX_SIZE`].

#![cfg_attr(docsrs, feature(doc_cfg))]

#[macro_use]
mod macros;
mod binary;
mod buffer;
mod builder;
mod datetime;
mod decimal128;
mod document;
pub mod error;
mod field_ref;
pub mod number;
pub mod oid;
pub mod raw;
mod size;
pub mod spec;
mod timestamp;


pub use self::{
    binary::BinaryRef,
    buffer::{Buffer, SharedBuffer},
    builder::{ArrayBuilder, DocumentBuilder},
    datetime::DateTime,
    decimal128::Decimal128,
    document::Document,
    field_ref::FieldRef,
    number::AppendNumber,
    raw::{BsonRef, Element, RawArray, RawDocument},
    size::{SizeLimit, BSON_OBJ_MAX_USER_SIZE, BUFFER_MAX_SIZE},
    timestamp::Timestamp,
};
