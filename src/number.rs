//! Numeric narrowing: choosing the BSON numeric type a value is stored as.
//!
//! [`DocumentBuilder::append_number`](crate::DocumentBuilder::append_number) picks the most
//! compact type for its argument according to the argument's Rust type:
//!
//! | Argument | Stored as |
//! |---|---|
//! | `i32` | Int32 |
//! | `u32` | Int32, bit pattern preserved |
//! | `f64` | Double |
//! | [`Decimal128`] | Decimal128 |
//! | `usize` | Int32 up to `i32::MAX`, Int64 above |
//! | `i64` | Int32 up to [`MAX_ENCODABLE_INT`] in magnitude, Double up to [`MAX_ENCODABLE_DOUBLE`], Int64 above |
//!
//! The `i64` Double band loses nothing within the 53 bit mantissa, and documents written this way
//! must keep reading back identically, so the bands are fixed.
//!
//! [`DocumentBuilder::append_int_or_long`](crate::DocumentBuilder::append_int_or_long) has no
//! Double band; see [`int_or_long`].

use crate::{raw::BsonRef, Decimal128};

/// The largest magnitude an `i64` may have to be stored as an Int32 by `append_number`.
pub const MAX_ENCODABLE_INT: i64 = (1 << 30) - 1;

/// The smallest value an `i64` may have to be stored as an Int32 by `append_number`.
pub const MIN_ENCODABLE_INT: i64 = -MAX_ENCODABLE_INT;

/// The largest magnitude an `i64` may have to be stored as a Double by `append_number`: every
/// integer up to it fits in the mantissa of an `f64`.
pub const MAX_ENCODABLE_DOUBLE: i64 = (1 << f64::MANTISSA_DIGITS) - 1;

/// The smallest value an `i64` may have to be stored as a Double by `append_number`.
pub const MIN_ENCODABLE_DOUBLE: i64 = -MAX_ENCODABLE_DOUBLE;

/// Magnitudes strictly below this are stored as Int32 by [`int_or_long`].
const INT_OR_LONG_BOUND: u64 = 1 << 30;

/// A numeric type that `append_number` knows how to narrow.
pub trait AppendNumber: Copy {
    /// The value encoded as the most compact BSON numeric type for `Self`.
    fn narrow(self) -> BsonRef<'static>;
}

impl AppendNumber for i32 {
    fn narrow(self) -> BsonRef<'static> {
        BsonRef::Int32(self)
    }
}

/// Stored as Int32 with the bit pattern preserved, like
/// [`DocumentBuilder::append`](crate::DocumentBuilder::append) does for `u32`.
impl AppendNumber for u32 {
    fn narrow(self) -> BsonRef<'static> {
        BsonRef::Int32(self as i32)
    }
}

impl AppendNumber for f64 {
    fn narrow(self) -> BsonRef<'static> {
        BsonRef::Double(self)
    }
}

/// Stored unchanged. Decimals have no numeric read-back:
/// [`BsonRef::number_long`], [`BsonRef::number_int`] and [`BsonRef::number_double`] read them as
/// zero, so read them with [`BsonRef::as_decimal128`] instead.
impl AppendNumber for Decimal128 {
    fn narrow(self) -> BsonRef<'static> {
        BsonRef::Decimal128(self)
    }
}

impl AppendNumber for usize {
    fn narrow(self) -> BsonRef<'static> {
        match i32::try_from(self) {
            Ok(n) => BsonRef::Int32(n),
            // values past i64::MAX keep their bit pattern
            Err(_) => BsonRef::Int64(self as i64),
        }
    }
}

impl AppendNumber for i64 {
    fn narrow(self) -> BsonRef<'static> {
        let magnitude = self.unsigned_abs();
        if magnitude <= MAX_ENCODABLE_INT as u64 {
            BsonRef::Int32(self as i32)
        } else if magnitude <= MAX_ENCODABLE_DOUBLE as u64 {
            BsonRef::Double(self as f64)
        } else {
            BsonRef::Int64(self)
        }
    }
}

/// Int32 when `|n| < 2^30`, Int64 otherwise.
pub fn int_or_long(n: i64) -> BsonRef<'static> {
    if n.unsigned_abs() < INT_OR_LONG_BOUND {
        BsonRef::Int32(n as i32)
    } else {
        BsonRef::Int64(n)
    }
}
