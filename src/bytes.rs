//! Big-endian integer I/O and fixed-width string packing.
//!
//! Every MMTF column blob is built out of these two primitives: big-endian
//! integers at known widths, and NUL-padded fixed-width strings (used for
//! `chainIdList`/`chainNameList`). Kept deliberately small and dependency-free,
//! the same way the teacher's `bits::Cursor` stays a thin wrapper over a byte
//! slice with narrow, `Result`-returning methods.

use std::{error, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    Truncated,
    FieldTooLong { limit: usize, actual: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated => write!(f, "unexpected end of input"),
            Self::FieldTooLong { limit, actual } => {
                write!(f, "string of length {actual} exceeds fixed width {limit}")
            }
        }
    }
}

impl error::Error for Error {}

/// A fixed-width big-endian integer. Implemented for the scalar widths the
/// column codecs need (8/16/32-bit, signed and unsigned).
pub trait BigEndian: Sized + Copy {
    const WIDTH: usize;

    fn read_be(bytes: &[u8]) -> Self;
    fn write_be(self, out: &mut Vec<u8>);
}

macro_rules! impl_big_endian {
    ($ty:ty, $width:expr) => {
        impl BigEndian for $ty {
            const WIDTH: usize = $width;

            fn read_be(bytes: &[u8]) -> Self {
                let mut buf = [0u8; $width];
                buf.copy_from_slice(&bytes[..$width]);
                <$ty>::from_be_bytes(buf)
            }

            fn write_be(self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_be_bytes());
            }
        }
    };
}

impl_big_endian!(u8, 1);
impl_big_endian!(i8, 1);
impl_big_endian!(u16, 2);
impl_big_endian!(i16, 2);
impl_big_endian!(u32, 4);
impl_big_endian!(i32, 4);

/// Read a single big-endian value at `offset`.
pub fn read_be<T: BigEndian>(bytes: &[u8], offset: usize) -> Result<T, Error> {
    if offset + T::WIDTH > bytes.len() {
        return Err(Error::Truncated);
    }
    Ok(T::read_be(&bytes[offset..]))
}

/// Append a single big-endian value.
pub fn write_be<T: BigEndian>(value: T, out: &mut Vec<u8>) {
    value.write_be(out);
}

/// A forward-only cursor over a byte slice, used to thread a position
/// through a sequence of `read_be` calls without repeating offset bookkeeping.
#[derive(Debug, Clone, Copy)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn read<T: BigEndian>(&mut self) -> Result<T, Error> {
        let value = read_be(self.bytes, self.pos)?;
        self.pos += T::WIDTH;
        Ok(value)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], Error> {
        if self.pos + len > self.bytes.len() {
            return Err(Error::Truncated);
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }
}

/// Pack strings left-justified into `width`-byte, NUL-padded cells.
pub fn pack_fixed(values: &[String], width: usize) -> Result<Vec<u8>, Error> {
    let mut out = Vec::with_capacity(values.len() * width);
    for value in values {
        let bytes = value.as_bytes();
        if bytes.len() > width {
            return Err(Error::FieldTooLong {
                limit: width,
                actual: bytes.len(),
            });
        }
        out.extend_from_slice(bytes);
        out.resize(out.len() + (width - bytes.len()), 0u8);
    }
    Ok(out)
}

/// Unpack `width`-byte NUL-padded cells, trimming trailing `0x00`.
pub fn unpack_fixed(bytes: &[u8], width: usize) -> Result<Vec<String>, Error> {
    if width == 0 {
        return if bytes.is_empty() {
            Ok(Vec::new())
        } else {
            Err(Error::Truncated)
        };
    }
    if bytes.len() % width != 0 {
        return Err(Error::Truncated);
    }
    Ok(bytes
        .chunks(width)
        .map(|cell| {
            let trimmed_len = cell.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
            String::from_utf8_lossy(&cell[..trimmed_len]).into_owned()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_write_roundtrip() {
        let mut out = Vec::new();
        write_be::<u32>(0x0102_0304, &mut out);
        write_be::<i16>(-1, &mut out);
        assert_eq!(out, vec![0x01, 0x02, 0x03, 0x04, 0xff, 0xff]);

        let mut r = Reader::new(&out);
        assert_eq!(r.read::<u32>().unwrap(), 0x0102_0304);
        assert_eq!(r.read::<i16>().unwrap(), -1);
        assert!(r.is_at_end());
    }

    #[test]
    fn read_truncated() {
        let bytes = [0u8; 2];
        assert_eq!(read_be::<u32>(&bytes, 0), Err(Error::Truncated));
    }

    #[test]
    fn fixed_width_strings_roundtrip() {
        let values = vec!["B".to_string(), "AA".to_string(), String::new()];
        let packed = pack_fixed(&values, 4).unwrap();
        assert_eq!(packed.len(), 12);
        let unpacked = unpack_fixed(&packed, 4).unwrap();
        assert_eq!(unpacked, values);
    }

    #[test]
    fn fixed_width_overflow() {
        let values = vec!["TOOLONG".to_string()];
        assert_eq!(
            pack_fixed(&values, 4),
            Err(Error::FieldTooLong {
                limit: 4,
                actual: 7
            })
        );
    }
}
