use std::fmt;

/// Represents a BSON timestamp value.
///
/// The wire encoding is a little-endian `u64` whose upper four bytes hold `time` and whose lower
/// four bytes hold `increment`.
#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestamp {
    /// The number of seconds since the Unix epoch.
    pub time: u32,

    /// An incrementing value to order timestamps with the same number of seconds in the `time`
    /// field.
    pub increment: u32,
}

impl Timestamp {
    /// The greatest representable timestamp, used as an upper-bound sentinel.
    pub const MAX: Self = Self {
        time: u32::MAX,
        increment: u32::MAX,
    };

    /// Whether both halves of the timestamp are zero.
    pub fn is_null(&self) -> bool {
        self.time == 0 && self.increment == 0
    }

    pub(crate) fn to_le_bytes(self) -> [u8; 8] {
        let upper = (self.time as u64) << 32;
        let lower = self.increment as u64;

        (upper | lower).to_le_bytes()
    }

    pub(crate) fn from_le_bytes(bytes: [u8; 8]) -> Self {
        let ts = u64::from_le_bytes(bytes);

        Timestamp {
            time: (ts >> 32) as u32,
            increment: (ts & 0xFFFF_FFFF) as u32,
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "Timestamp({}, {})", self.time, self.increment)
    }
}
