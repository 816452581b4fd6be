//! Borrowed, read-only views over BSON bytes.
//!
//! [`RawDocument`] and [`RawArray`] are unsized types over `[u8]` (akin to [`str`]) that are
//! always used behind a reference. They never own their bytes: a `&RawDocument` can point into
//! a stack array, a [`Buffer`](crate::Buffer), or the storage of a [`Document`](crate::Document).
//! Elements are decoded lazily during iteration, so format errors can surface on access.
//!
//! ```rust
//! use bson_builder::RawDocument;
//!
//! // See http://bsonspec.org/spec.html for details on the binary encoding of BSON.
//! let bytes = b"\x13\x00\x00\x00\x02hi\x00\x06\x00\x00\x00y'all\x00\x00";
//! let doc = RawDocument::from_bytes(bytes)?;
//! assert_eq!(doc.get_str("hi")?, "y'all");
//! # Ok::<(), bson_builder::error::Error>(())
//! ```

mod array;
mod bson_ref;
mod document;
mod iter;

use crate::error::{Error, ErrorKind, Result};

pub use self::{
    array::{RawArray, RawArrayIter},
    bson_ref::{BsonRef, CodeWithScopeRef, DbPointerRef, RegexRef},
    document::RawDocument,
    iter::{Element, Iter},
};

pub(crate) const MIN_BSON_STRING_SIZE: usize = 4 + 1; // 4 bytes for length, one byte for null terminator
pub(crate) const MIN_BSON_DOCUMENT_SIZE: usize = 4 + 1; // 4 bytes for length, one byte for null terminator
pub(crate) const MIN_CODE_WITH_SCOPE_SIZE: usize =
    4 + MIN_BSON_STRING_SIZE + MIN_BSON_DOCUMENT_SIZE;

/// Given a u8 slice, return an f64 calculated from the first eight bytes in
/// little endian order.
fn f64_from_slice(val: &[u8]) -> Result<f64> {
    let arr = val
        .get(0..8)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| {
            Error::malformed_value(format!(
                "expected 8 bytes to read double, instead got {}",
                val.len()
            ))
        })?;
    Ok(f64::from_le_bytes(arr))
}

/// Given a u8 slice, return an i32 calculated from the first four bytes in
/// little endian order.
pub(crate) fn i32_from_slice(val: &[u8]) -> Result<i32> {
    let arr: [u8; 4] = val
        .get(0..4)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| {
            Error::malformed_value(format!(
                "expected 4 bytes to read i32, instead got {}",
                val.len()
            ))
        })?;
    Ok(i32::from_le_bytes(arr))
}

/// Given an u8 slice, return an i64 calculated from the first 8 bytes in
/// little endian order.
fn i64_from_slice(val: &[u8]) -> Result<i64> {
    let arr = val
        .get(0..8)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| {
            Error::malformed_value(format!(
                "expected 8 bytes to read i64, instead got {}",
                val.len()
            ))
        })?;
    Ok(i64::from_le_bytes(arr))
}

fn u8_from_slice(val: &[u8]) -> Result<u8> {
    val.first().copied().ok_or_else(|| {
        Error::malformed_value("expected 1 byte to read u8, instead got 0")
    })
}

fn bool_from_slice(val: &[u8]) -> Result<bool> {
    let val = u8_from_slice(val)?;
    if val > 1 {
        return Err(Error::malformed_value(format!(
            "boolean must be stored as 0 or 1, got {}",
            val
        )));
    }

    Ok(val != 0)
}

fn read_nullterminated(buf: &[u8]) -> Result<&str> {
    let mut splits = buf.splitn(2, |x| *x == 0);
    let value = splits
        .next()
        .ok_or_else(|| Error::malformed_value("no value"))?;
    if splits.next().is_some() {
        try_to_str(value)
    } else {
        Err(Error::malformed_value("expected null terminator"))
    }
}

/// Returns the total encoded length (prefix included) of the length-encoded string at the start
/// of `buf`.
fn read_len(buf: &[u8]) -> Result<usize> {
    if buf.len() < 4 {
        return Err(Error::malformed_value(format!(
            "expected buffer with string to contain at least 4 bytes, but it only has {}",
            buf.len()
        )));
    }

    let length = i32_from_slice(&buf[..4])?;
    let end = checked_add(usize_try_from_i32(length)?, 4)?;

    if end < MIN_BSON_STRING_SIZE {
        return Err(Error::malformed_value(format!(
            "BSON length encoded string needs to be at least {} bytes, instead got {}",
            MIN_BSON_STRING_SIZE, end
        )));
    }

    if buf.len() < end {
        return Err(Error::malformed_value(format!(
            "expected buffer to contain at least {} bytes, but it only has {}",
            end,
            buf.len()
        )));
    }

    if buf[end - 1] != 0 {
        return Err(Error::malformed_value("expected string to be null-terminated"));
    }

    Ok(end)
}

fn read_lenencoded(buf: &[u8]) -> Result<&str> {
    let end = read_len(buf)?;

    // exclude length-prefix and null byte suffix
    try_to_str(&buf[4..(end - 1)])
}

fn try_to_str(data: &[u8]) -> Result<&str> {
    simdutf8::basic::from_utf8(data).map_err(|_| ErrorKind::Utf8Encoding.into())
}

fn usize_try_from_i32(i: i32) -> Result<usize> {
    usize::try_from(i).map_err(Error::malformed_value)
}

fn checked_add(lhs: usize, rhs: usize) -> Result<usize> {
    lhs.checked_add(rhs)
        .ok_or_else(|| Error::malformed_value("attempted to add with overflow"))
}
