//! Module containing functionality related to BSON ObjectIds.

use std::{fmt, str::FromStr};

use crate::error::{Error, ErrorKind, Result};

/// A wrapper around a raw 12-byte ObjectId.
///
/// ```
/// use bson_builder::oid::ObjectId;
///
/// let oid = ObjectId::parse_str("56e1fc72e0c917e9c4714161")?;
/// assert_eq!(oid.to_hex(), "56e1fc72e0c917e9c4714161");
/// # Ok::<(), bson_builder::error::Error>(())
/// ```
#[derive(Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash, Default)]
pub struct ObjectId {
    id: [u8; 12],
}

impl ObjectId {
    /// The smallest ObjectId, all zero bytes.
    pub const MIN: Self = Self { id: [0; 12] };

    /// The greatest ObjectId, all `0xFF` bytes.
    pub const MAX: Self = Self { id: [0xFF; 12] };

    /// Constructs a new ObjectId wrapper around the raw byte representation.
    pub const fn from_bytes(bytes: [u8; 12]) -> ObjectId {
        ObjectId { id: bytes }
    }

    /// Creates an ObjectId using a 12-byte (24-char) hexadecimal string.
    pub fn parse_str(s: impl AsRef<str>) -> Result<ObjectId> {
        let s = s.as_ref();

        let bytes: Vec<u8> = hex::decode(s.as_bytes())?;
        if bytes.len() != 12 {
            Err(ErrorKind::InvalidHex {
                message: format!("ObjectId hex string {s:?} must decode to exactly 12 bytes"),
            }
            .into())
        } else {
            let mut byte_array: [u8; 12] = [0; 12];
            byte_array[..].copy_from_slice(&bytes[..]);
            Ok(ObjectId::from_bytes(byte_array))
        }
    }

    /// Returns the raw byte representation of an ObjectId.
    pub const fn bytes(&self) -> [u8; 12] {
        self.id
    }

    /// Convert this [`ObjectId`] to its hex string representation.
    pub fn to_hex(self) -> String {
        hex::encode(self.id)
    }
}

impl FromStr for ObjectId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_str(s)
    }
}

impl From<[u8; 12]> for ObjectId {
    fn from(bytes: [u8; 12]) -> Self {
        Self { id: bytes }
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectId").field(&self.to_hex()).finish()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ObjectId {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}
