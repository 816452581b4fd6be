//! Contains the error-related types for the `bson_builder` crate.

use thiserror::Error;

use crate::spec::ElementType;

/// The result type for all methods that can return an error in the `bson_builder` crate.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that can occur in the `bson_builder` crate.
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,

    /// The document key associated with the error, if any.
    pub key: Option<String>,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(key) = self.key.as_deref() {
            write!(f, "Error at key \"{key}\": ")?;
        }

        write!(f, "{}", self.kind)
    }
}

/// The types of errors that can occur in the `bson_builder` crate.
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A finished document is larger than the size limit it was built or read under.
    #[error("BSONObj size: {size} (0x{size:x}) is invalid. Size must be between 0 and {max}")]
    #[non_exhaustive]
    ObjectTooLarge { size: usize, max: usize },

    /// A write would have grown a buffer past its hard ceiling.
    #[error("attempted to grow a buffer to {requested} bytes, past the {max} byte limit")]
    #[non_exhaustive]
    BufferOverflow { requested: usize, max: usize },

    /// An in-place write was addressed outside of the bytes written so far.
    #[error("write of {len} bytes at offset {offset} is outside of a buffer of length {buffer_len}")]
    #[non_exhaustive]
    OutOfBounds {
        offset: usize,
        len: usize,
        buffer_len: usize,
    },

    /// Malformed BSON bytes were encountered.
    #[error("Malformed BSON: {message}")]
    #[non_exhaustive]
    MalformedValue { message: String },

    /// Invalid UTF-8 bytes were encountered.
    #[error("Invalid UTF-8")]
    Utf8Encoding,

    /// A hex string could not be decoded.
    #[error("Invalid hex string: {message}")]
    #[non_exhaustive]
    InvalidHex { message: String },

    /// A field name could not be written as a BSON cstring.
    #[error("field name {name:?} contains an interior nul byte")]
    #[non_exhaustive]
    InvalidFieldName { name: String },

    /// An error occurred when attempting to access a value in a document.
    #[error("An error occurred when attempting to access a document value: {kind}")]
    #[non_exhaustive]
    ValueAccess {
        /// The kind of error that occurred.
        kind: ValueAccessErrorKind,
    },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self { kind, key: None }
    }
}

impl From<hex::FromHexError> for Error {
    fn from(value: hex::FromHexError) -> Self {
        ErrorKind::InvalidHex {
            message: value.to_string(),
        }
        .into()
    }
}

/// The types of errors that can occur when attempting to access a value in a document.
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum ValueAccessErrorKind {
    /// No value for the specified key was present in the document.
    #[error("The key was not present in the document")]
    NotPresent,

    /// The type of the value in the document did not match the requested type.
    #[error("Expected type {expected:?}, got type {actual:?}")]
    #[non_exhaustive]
    UnexpectedType {
        /// The actual type of the value.
        actual: ElementType,

        /// The expected type of the value.
        expected: ElementType,
    },
}

impl Error {
    pub(crate) fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub(crate) fn value_access_not_present() -> Self {
        ErrorKind::ValueAccess {
            kind: ValueAccessErrorKind::NotPresent,
        }
        .into()
    }

    pub(crate) fn value_access_unexpected_type(actual: ElementType, expected: ElementType) -> Self {
        ErrorKind::ValueAccess {
            kind: ValueAccessErrorKind::UnexpectedType { actual, expected },
        }
        .into()
    }

    pub(crate) fn malformed_value(message: impl ToString) -> Self {
        ErrorKind::MalformedValue {
            message: message.to_string(),
        }
        .into()
    }

    pub(crate) fn object_too_large(size: usize, max: usize) -> Self {
        ErrorKind::ObjectTooLarge { size, max }.into()
    }

    /// Whether this error reports a document over its size limit.
    pub fn is_object_too_large(&self) -> bool {
        matches!(self.kind, ErrorKind::ObjectTooLarge { .. })
    }

    #[cfg(test)]
    pub(crate) fn is_value_access_not_present(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::ValueAccess {
                kind: ValueAccessErrorKind::NotPresent,
                ..
            }
        )
    }

    #[cfg(test)]
    pub(crate) fn is_value_access_unexpected_type(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::ValueAccess {
                kind: ValueAccessErrorKind::UnexpectedType { .. },
                ..
            }
        )
    }

    #[cfg(test)]
    pub(crate) fn is_malformed_value(&self) -> bool {
        matches!(self.kind, ErrorKind::MalformedValue { .. })
    }
}
