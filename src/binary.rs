use std::fmt;

use crate::spec::BinarySubtype;

/// A borrowed BSON binary value.
#[derive(Clone, Copy, PartialEq)]
pub struct BinaryRef<'a> {
    /// The subtype of the binary value.
    pub subtype: BinarySubtype,

    /// The binary bytes.
    pub bytes: &'a [u8],
}

impl<'a> BinaryRef<'a> {
    /// A binary value of the given subtype.
    pub fn new(subtype: BinarySubtype, bytes: &'a [u8]) -> Self {
        Self { subtype, bytes }
    }

    /// A [`BinarySubtype::Generic`] binary value.
    pub fn generic(bytes: &'a [u8]) -> Self {
        Self::new(BinarySubtype::Generic, bytes)
    }

    /// The length of the encoded payload, which for [`BinarySubtype::BinaryOld`] includes the
    /// inner length prefix.
    pub(crate) fn len(&self) -> i32 {
        match self.subtype {
            BinarySubtype::BinaryOld => self.bytes.len() as i32 + 4,
            _ => self.bytes.len() as i32,
        }
    }
}

impl fmt::Debug for BinaryRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryRef")
            .field("subtype", &self.subtype)
            .field("bytes", &hex::encode(self.bytes))
            .finish()
    }
}

impl fmt::Display for BinaryRef<'_> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(
            fmt,
            "Binary({:#x}, {})",
            u8::from(self.subtype),
            hex::encode(self.bytes)
        )
    }
}
