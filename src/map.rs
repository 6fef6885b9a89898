//! The MessagePack envelope: a thin, generic layer over a string-keyed map
//! that knows how to pull typed values and binary columns out by key, and
//! to put them back. Grounded on `examples/original_source/include/mmtf/map_decoder.hpp`'s
//! `MapDecoder` (`decode`, `copy_decode`, `checkExtraKeys`), translated from
//! its throw-on-required/warn-on-mismatch policy into `Result` plus a
//! collected `Vec<Diagnostic>` (§1 ambient-stack logging).
//!
//! The field *policy* — which codec a key defaults to, whether it's
//! required — lives in `crate::fields`; this module only knows how to move
//! bytes into and out of an `rmpv::Value::Map`.

use crate::{codec, error::Error};
use std::collections::HashSet;

/// A non-fatal observation made while reading a map. Collected rather than
/// printed, since a library has no business writing to stderr on a caller's
/// behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    UnknownKey(String),
    NonStringKey,
    UnexpectedType {
        key: String,
        wanted: &'static str,
        got: &'static str,
    },
}

pub(crate) fn type_name(value: &rmpv::Value) -> &'static str {
    match value {
        rmpv::Value::Nil => "nil",
        rmpv::Value::Boolean(_) => "bool",
        rmpv::Value::Integer(_) => "integer",
        rmpv::Value::F32(_) | rmpv::Value::F64(_) => "float",
        rmpv::Value::String(_) => "string",
        rmpv::Value::Binary(_) => "binary",
        rmpv::Value::Array(_) => "array",
        rmpv::Value::Map(_) => "map",
        rmpv::Value::Ext(..) => "ext",
    }
}

/// Reads typed fields out of a decoded MessagePack map, tracking which
/// keys have been consumed so `check_extra_keys` can report the rest.
pub struct MapReader {
    entries: Vec<(String, rmpv::Value)>,
    touched: HashSet<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl MapReader {
    pub fn from_value(value: rmpv::Value) -> Result<Self, Error> {
        let rmpv::Value::Map(raw_entries) = value else {
            return Err(Error::TypeMismatch {
                key: "<root>",
                wanted: "map",
                got: type_name(&value),
            });
        };
        let mut entries = Vec::with_capacity(raw_entries.len());
        let mut diagnostics = Vec::new();
        for (k, v) in raw_entries {
            match k {
                rmpv::Value::String(s) if s.is_str() => {
                    entries.push((s.into_str().unwrap_or_default(), v));
                }
                _ => diagnostics.push(Diagnostic::NonStringKey),
            }
        }
        Ok(Self {
            entries,
            touched: HashSet::new(),
            diagnostics,
        })
    }

    fn find(&mut self, key: &str) -> Option<&rmpv::Value> {
        self.touched.insert(key.to_string());
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    fn require(&mut self, key: &'static str) -> Result<&rmpv::Value, Error> {
        self.find(key).ok_or(Error::MissingField { key })
    }

    pub fn string(&mut self, key: &'static str, required: bool) -> Result<Option<String>, Error> {
        if !required && !self.contains(key) {
            self.find(key);
            return Ok(None);
        }
        let value = self.require(key)?;
        match value.as_str() {
            Some(s) => Ok(Some(s.to_string())),
            None => Err(Error::TypeMismatch {
                key,
                wanted: "string",
                got: type_name(value),
            }),
        }
    }

    pub fn i32(&mut self, key: &'static str, required: bool, default: i32) -> Result<i32, Error> {
        if !required && !self.contains(key) {
            self.find(key);
            return Ok(default);
        }
        let value = self.require(key)?;
        value.as_i64().map(|v| v as i32).ok_or(Error::TypeMismatch {
            key,
            wanted: "integer",
            got: type_name(value),
        })
    }

    pub fn f64(&mut self, key: &'static str) -> Result<Option<f64>, Error> {
        if !self.contains(key) {
            self.find(key);
            return Ok(None);
        }
        let value = self.require(key)?;
        value.as_f64().map(Some).ok_or(Error::TypeMismatch {
            key,
            wanted: "float",
            got: type_name(value),
        })
    }

    pub fn string_array(&mut self, key: &'static str) -> Result<Vec<String>, Error> {
        if !self.contains(key) {
            self.find(key);
            return Ok(Vec::new());
        }
        let value = self.require(key)?;
        let rmpv::Value::Array(items) = value else {
            return Err(Error::TypeMismatch {
                key,
                wanted: "array",
                got: type_name(value),
            });
        };
        items
            .iter()
            .map(|v| {
                v.as_str().map(str::to_string).ok_or(Error::TypeMismatch {
                    key,
                    wanted: "string",
                    got: type_name(v),
                })
            })
            .collect()
    }

    pub fn i32_array(&mut self, key: &'static str, required: bool) -> Result<Vec<i32>, Error> {
        if !required && !self.contains(key) {
            self.find(key);
            return Ok(Vec::new());
        }
        let value = self.require(key)?;
        let rmpv::Value::Array(items) = value else {
            return Err(Error::TypeMismatch {
                key,
                wanted: "array",
                got: type_name(value),
            });
        };
        items
            .iter()
            .map(|v| {
                v.as_i64()
                    .map(|n| n as i32)
                    .ok_or(Error::TypeMismatch {
                        key,
                        wanted: "integer",
                        got: type_name(v),
                    })
            })
            .collect()
    }

    pub fn f64_array(&mut self, key: &'static str) -> Result<Vec<f64>, Error> {
        if !self.contains(key) {
            self.find(key);
            return Ok(Vec::new());
        }
        let value = self.require(key)?;
        let rmpv::Value::Array(items) = value else {
            return Err(Error::TypeMismatch {
                key,
                wanted: "array",
                got: type_name(value),
            });
        };
        items
            .iter()
            .map(|v| {
                v.as_f64().ok_or(Error::TypeMismatch {
                    key,
                    wanted: "float",
                    got: type_name(v),
                })
            })
            .collect()
    }

    /// The raw array entries behind a key holding an array of maps
    /// (`groupList`, `entityList`, `bioAssemblyList`) — callers decode each
    /// element with their own nested `MapReader`.
    pub fn array_of_maps(&mut self, key: &'static str, required: bool) -> Result<Vec<rmpv::Value>, Error> {
        if !required && !self.contains(key) {
            self.find(key);
            return Ok(Vec::new());
        }
        let value = self.require(key)?;
        let rmpv::Value::Array(items) = value else {
            return Err(Error::TypeMismatch {
                key,
                wanted: "array",
                got: type_name(value),
            });
        };
        Ok(items.clone())
    }

    fn binary(&mut self, key: &'static str) -> Result<Option<&[u8]>, Error> {
        if !self.contains(key) {
            self.find(key);
            return Ok(None);
        }
        let value = self.require(key)?;
        match value {
            rmpv::Value::Binary(bytes) => Ok(Some(bytes)),
            other => Err(Error::TypeMismatch {
                key,
                wanted: "binary",
                got: type_name(other),
            }),
        }
    }

    pub fn float_column(&mut self, key: &'static str, required: bool) -> Result<Vec<f32>, Error> {
        match self.binary(key)? {
            None => Ok(Vec::new()),
            Some(bytes) if bytes.is_empty() && !required => Ok(Vec::new()),
            Some(bytes) => codec::decode_float_column(bytes).map_err(|e| promote(e, key)),
        }
    }

    pub fn int_column(&mut self, key: &'static str, required: bool) -> Result<Vec<i32>, Error> {
        match self.binary(key)? {
            None => Ok(Vec::new()),
            Some(bytes) if bytes.is_empty() && !required => Ok(Vec::new()),
            Some(bytes) => codec::decode_int_column(bytes).map_err(|e| promote(e, key)),
        }
    }

    pub fn char_column(&mut self, key: &'static str) -> Result<Vec<u8>, Error> {
        match self.binary(key)? {
            None => Ok(Vec::new()),
            Some(bytes) => codec::decode_char_column(bytes).map_err(|e| promote(e, key)),
        }
    }

    pub fn string_column(&mut self, key: &'static str, required: bool) -> Result<Vec<String>, Error> {
        match self.binary(key)? {
            None => Ok(Vec::new()),
            Some(bytes) if bytes.is_empty() && !required => Ok(Vec::new()),
            Some(bytes) => codec::decode_string_column(bytes).map_err(|e| promote(e, key)),
        }
    }

    /// Preserve the value verbatim, as `MapDecoder::copy_decode` does onto
    /// the C++ zone; here it's just a clone since `rmpv::Value` owns its data.
    pub fn copy_decode(&mut self, key: &'static str) -> rmpv::Value {
        self.find(key).cloned().unwrap_or(rmpv::Value::Map(Vec::new()))
    }

    /// Any key still unconsumed after every known field has been read.
    pub fn check_extra_keys(&mut self) {
        let unknown: Vec<String> = self
            .entries
            .iter()
            .map(|(k, _)| k.clone())
            .filter(|k| !self.touched.contains(k))
            .collect();
        self.diagnostics
            .extend(unknown.into_iter().map(Diagnostic::UnknownKey));
    }
}

fn promote(err: codec::Error, key: &'static str) -> Error {
    match err {
        codec::Error::Truncated => Error::Truncated,
        codec::Error::CodecMismatch { expected, found } => Error::CodecMismatch {
            field: key,
            expected,
            found,
        },
        codec::Error::FieldTooLong { limit, .. } => Error::FieldTooLong { field: key, limit },
    }
}

/// Accumulates `(String, Value)` pairs for re-encoding, skipping any field
/// whose value is the default sentinel (empty/absent), per §4.4's "inverse
/// table" and §7's "field present but empty is treated as absent" rule.
#[derive(Debug, Default)]
pub struct MapWriter {
    entries: Vec<(rmpv::Value, rmpv::Value)>,
}

impl MapWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn string(&mut self, key: &'static str, value: &str) {
        self.entries.push((key.into(), value.into()));
    }

    pub fn opt_string(&mut self, key: &'static str, value: &Option<String>) {
        if let Some(v) = value {
            self.string(key, v);
        }
    }

    pub fn i32(&mut self, key: &'static str, value: i32) {
        self.entries.push((key.into(), value.into()));
    }

    pub fn opt_f64(&mut self, key: &'static str, value: Option<f64>) {
        if let Some(v) = value {
            self.entries.push((key.into(), v.into()));
        }
    }

    pub fn string_array(&mut self, key: &'static str, values: &[String]) {
        if values.is_empty() {
            return;
        }
        let items = values.iter().map(|s| rmpv::Value::from(s.as_str())).collect();
        self.entries.push((key.into(), rmpv::Value::Array(items)));
    }

    pub fn i32_array(&mut self, key: &'static str, values: &[i32]) {
        if values.is_empty() {
            return;
        }
        let items = values.iter().map(|&v| rmpv::Value::from(v)).collect();
        self.entries.push((key.into(), rmpv::Value::Array(items)));
    }

    pub fn f64_array(&mut self, key: &'static str, values: &[f64]) {
        if values.is_empty() {
            return;
        }
        let items = values.iter().map(|&v| rmpv::Value::from(v)).collect();
        self.entries.push((key.into(), rmpv::Value::Array(items)));
    }

    pub fn array_of_maps(&mut self, key: &'static str, maps: Vec<rmpv::Value>) {
        if maps.is_empty() {
            return;
        }
        self.entries.push((key.into(), rmpv::Value::Array(maps)));
    }

    pub fn binary(&mut self, key: &'static str, blob: Vec<u8>, elements_present: bool) {
        if !elements_present {
            return;
        }
        self.entries.push((key.into(), rmpv::Value::Binary(blob)));
    }

    pub fn copy_decode(&mut self, key: &'static str, value: rmpv::Value) {
        if !crate::properties::is_empty(&value) {
            self.entries.push((key.into(), value));
        }
    }

    #[must_use]
    pub fn finish(self) -> rmpv::Value {
        rmpv::Value::Map(self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_map() -> rmpv::Value {
        rmpv::Value::Map(vec![
            ("mmtfVersion".into(), "1.0".into()),
            ("numAtoms".into(), 3.into()),
            ("mystery".into(), true.into()),
        ])
    }

    #[test]
    fn required_missing_key_errors() {
        let mut r = MapReader::from_value(sample_map()).unwrap();
        let err = r.string("mmtfProducer", true).unwrap_err();
        assert_eq!(err, Error::MissingField { key: "mmtfProducer" });
    }

    #[test]
    fn type_mismatch_on_wrong_type() {
        let mut r = MapReader::from_value(sample_map()).unwrap();
        let err = r.string("numAtoms", true).unwrap_err();
        assert_eq!(
            err,
            Error::TypeMismatch {
                key: "numAtoms",
                wanted: "string",
                got: "integer"
            }
        );
    }

    #[test]
    fn unknown_keys_are_diagnosed_not_fatal() {
        let mut r = MapReader::from_value(sample_map()).unwrap();
        r.string("mmtfVersion", true).unwrap();
        r.i32("numAtoms", true, 0).unwrap();
        r.check_extra_keys();
        assert!(r
            .diagnostics
            .contains(&Diagnostic::UnknownKey("mystery".to_string())));
    }

    #[test]
    fn writer_omits_empty_fields() {
        let mut w = MapWriter::new();
        w.i32_array("groupsPerChain", &[]);
        w.i32("numAtoms", 0);
        let rmpv::Value::Map(entries) = w.finish() else {
            panic!("not a map");
        };
        assert_eq!(entries.len(), 1);
    }
}
