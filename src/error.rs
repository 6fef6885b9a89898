//! The top-level error type returned by every public entry point.
//!
//! Lower-level modules (`bytes`, `codec`) keep their own narrow `Error`
//! enums and are folded into this one with `From`, the same layering the
//! teacher uses to turn `bits::Error` into a `read::Error::ReadBits(_)`
//! variant rather than flattening everything into one enum up front.

use crate::{bytes, codec};
use std::{error, fmt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Ran out of bytes while decoding a column blob or the outer envelope.
    Truncated,
    /// A column's header codec id doesn't belong to the family `field`
    /// expects (e.g. a string codec where a float column was required).
    CodecMismatch {
        field: &'static str,
        expected: &'static str,
        found: u32,
    },
    /// A required map key was absent.
    MissingField { key: &'static str },
    /// A present key held a MessagePack type that cannot be converted to
    /// what `key` needs.
    TypeMismatch {
        key: &'static str,
        wanted: &'static str,
        got: &'static str,
    },
    /// A list field's length disagreed with the count it must agree with.
    LengthMismatch {
        field: &'static str,
        expected: usize,
        got: usize,
    },
    /// An index field pointed outside the valid range for what it indexes.
    IndexOutOfRange {
        field: &'static str,
        value: i32,
        max: usize,
    },
    /// `mmtfVersion` names a major version this crate cannot read.
    UnsupportedVersion { found: String, max_supported: u32 },
    /// A fixed-width string field (`chainIdList` et al.) received a value
    /// too long for its column width.
    FieldTooLong { field: &'static str, limit: usize },
    /// `depositionDate`/`releaseDate` did not parse as `YYYY-MM-DD`.
    InvalidDateFormat { key: &'static str },
    /// Cross-field consistency check failed; `reason` names which one.
    Inconsistent { reason: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated => write!(f, "unexpected end of input"),
            Self::CodecMismatch {
                field,
                expected,
                found,
            } => write!(
                f,
                "field `{field}` expected a {expected} codec, found codec id {found}"
            ),
            Self::MissingField { key } => write!(f, "missing required field `{key}`"),
            Self::TypeMismatch { key, wanted, got } => {
                write!(f, "field `{key}` expected {wanted}, found {got}")
            }
            Self::LengthMismatch {
                field,
                expected,
                got,
            } => write!(
                f,
                "field `{field}` has length {got}, expected {expected}"
            ),
            Self::IndexOutOfRange { field, value, max } => write!(
                f,
                "field `{field}` contains index {value}, which is out of range for a maximum of {max}"
            ),
            Self::UnsupportedVersion {
                found,
                max_supported,
            } => write!(
                f,
                "mmtfVersion `{found}` is newer than the highest supported major version {max_supported}"
            ),
            Self::FieldTooLong { field, limit } => {
                write!(f, "field `{field}` exceeds its fixed width of {limit}")
            }
            Self::InvalidDateFormat { key } => {
                write!(f, "field `{key}` is not a valid YYYY-MM-DD date")
            }
            Self::Inconsistent { reason } => write!(f, "inconsistent structure: {reason}"),
        }
    }
}

impl error::Error for Error {}

impl From<bytes::Error> for Error {
    fn from(err: bytes::Error) -> Self {
        match err {
            bytes::Error::Truncated => Self::Truncated,
            bytes::Error::FieldTooLong { limit, .. } => Self::FieldTooLong {
                field: "<column>",
                limit,
            },
        }
    }
}

impl From<codec::Error> for Error {
    fn from(err: codec::Error) -> Self {
        match err {
            codec::Error::Truncated => Self::Truncated,
            codec::Error::CodecMismatch { expected, found } => Self::CodecMismatch {
                field: "<column>",
                expected,
                found,
            },
            codec::Error::FieldTooLong { limit, .. } => Self::FieldTooLong {
                field: "<column>",
                limit,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_are_non_empty() {
        let errs = [
            Error::Truncated,
            Error::MissingField { key: "xCoordList" },
            Error::TypeMismatch {
                key: "numAtoms",
                wanted: "i32",
                got: "string",
            },
        ];
        for e in errs {
            assert!(!e.to_string().is_empty());
        }
    }

    #[test]
    fn wraps_lower_level_errors() {
        let err: Error = bytes::Error::Truncated.into();
        assert_eq!(err, Error::Truncated);
    }
}
