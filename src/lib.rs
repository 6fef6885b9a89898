//! Reader/writer for the Macromolecular Transmission Format (MMTF)
//!
//! A file is a MessagePack map whose numeric fields are packed with a small
//! family of domain-specific column codecs (delta, run-length, recursive
//! index, fixed-point quantization, fixed-width string packing). This crate
//! parses such maps into a canonical [`Structure`], validates its internal
//! consistency, and re-serializes it to a byte-compatible artifact.

/// Big-endian integer I/O and fixed-width string packing.
pub mod bytes;
/// The binary column codecs (types 1-16).
pub mod codec;
/// The top-level error type.
pub mod error;
/// The field dispatcher: wiring `Structure` to/from a MessagePack map.
pub mod fields;
/// The generic MessagePack envelope (`MapReader`/`MapWriter`).
pub mod map;
/// The six opaque pass-through extension maps.
pub mod properties;
/// The typed record layouts (`Structure`, `GroupType`, `Entity`, ...).
pub mod structure;
/// The cross-field consistency validator.
pub mod validate;

pub use error::Error;
pub use fields::EncodeOptions;
pub use map::MapReader as MapView;
pub use structure::{BioAssembly, Entity, GroupType, Structure, Transform};
pub use validate::{validate, validate_with, ValidationError};

use std::io::{Read, Write};
use std::path::Path;

impl From<rmpv::decode::Error> for Error {
    fn from(_: rmpv::decode::Error) -> Self {
        Error::Truncated
    }
}

impl From<std::io::Error> for Error {
    fn from(_: std::io::Error) -> Self {
        Error::Truncated
    }
}

/// Decode a `Structure` from an in-memory MessagePack buffer.
pub fn decode_from_buffer(input: &[u8]) -> Result<Structure, Error> {
    let mut cursor = input;
    let value = rmpv::decode::read_value(&mut cursor)?;
    let (structure, _diagnostics) = fields::decode_structure(value)?;
    Ok(structure)
}

/// Decode a `Structure` from any `Read` stream.
pub fn decode_from_stream<R: Read>(mut input: R) -> Result<Structure, Error> {
    let value = rmpv::decode::read_value(&mut input)?;
    let (structure, _diagnostics) = fields::decode_structure(value)?;
    Ok(structure)
}

/// Decode a `Structure` from a file path.
pub fn decode_from_file<P: AsRef<Path>>(path: P) -> Result<Structure, Error> {
    let file = std::fs::File::open(path)?;
    decode_from_stream(std::io::BufReader::new(file))
}

/// Encode a `Structure` to an in-memory buffer. Fails `Inconsistent` (via
/// [`validate`]) before attempting to serialize anything, since encode is a
/// hard gate on consistency (§4.5).
pub fn encode_to_buffer(structure: &Structure, opts: &EncodeOptions) -> Result<Vec<u8>, Error> {
    validate_with(structure, opts.chain_name_max_length)?;
    let value = fields::encode_structure(structure, opts);
    let mut out = Vec::new();
    rmpv::encode::write_value(&mut out, &value).map_err(|_| Error::Inconsistent {
        reason: "failed to serialize MessagePack value".to_string(),
    })?;
    Ok(out)
}

/// Encode a `Structure` to any `Write` stream.
pub fn encode_to_stream<W: Write>(
    structure: &Structure,
    opts: &EncodeOptions,
    mut output: W,
) -> Result<(), Error> {
    let bytes = encode_to_buffer(structure, opts)?;
    output.write_all(&bytes)?;
    Ok(())
}

/// Encode a `Structure` to a file path.
pub fn encode_to_file<P: AsRef<Path>>(
    structure: &Structure,
    opts: &EncodeOptions,
    path: P,
) -> Result<(), Error> {
    let file = std::fs::File::create(path)?;
    encode_to_stream(structure, opts, std::io::BufWriter::new(file))
}

/// Open a buffer as a [`MapView`] without materializing a full `Structure`,
/// for callers that only need piecewise access to known or unknown keys.
pub fn map_decoder_from_buffer(input: &[u8]) -> Result<MapView, Error> {
    let mut cursor = input;
    let value = rmpv::decode::read_value(&mut cursor)?;
    MapView::from_value(value)
}

/// Open a stream as a [`MapView`].
pub fn map_decoder_from_stream<R: Read>(mut input: R) -> Result<MapView, Error> {
    let value = rmpv::decode::read_value(&mut input)?;
    MapView::from_value(value)
}

/// Open a file as a [`MapView`].
pub fn map_decoder_from_file<P: AsRef<Path>>(path: P) -> Result<MapView, Error> {
    let file = std::fs::File::open(path)?;
    map_decoder_from_stream(std::io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_structure_round_trips_through_buffer() {
        let s = Structure::default();
        let opts = EncodeOptions::default();
        let bytes = encode_to_buffer(&s, &opts).unwrap();
        let decoded = decode_from_buffer(&bytes).unwrap();
        assert_eq!(decoded.mmtf_version, s.mmtf_version);
        assert_eq!(decoded.num_atoms, 0);
    }

    #[test]
    fn inconsistent_structure_fails_to_encode() {
        let mut s = Structure::default();
        s.num_atoms = 5; // no coordinate columns to match
        let opts = EncodeOptions::default();
        assert!(encode_to_buffer(&s, &opts).is_err());
    }

    #[test]
    fn version_gate_rejects_future_major() {
        let mut s = Structure::default();
        s.mmtf_version = "99.0".to_string();
        let opts = EncodeOptions::default();
        // bypass validate's gate entirely: build the bytes directly and
        // attempt decode, which is where the version gate actually lives.
        let value = fields::encode_structure(&s, &opts);
        let mut bytes = Vec::new();
        rmpv::encode::write_value(&mut bytes, &value).unwrap();
        assert!(matches!(
            decode_from_buffer(&bytes),
            Err(Error::UnsupportedVersion { .. })
        ));
    }
}
