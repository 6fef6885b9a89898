//! The six opaque extension sub-maps (§4.6). None of their contents are
//! interpreted by the core; they are deep-copied onto the `Structure` on
//! decode and re-embedded in canonical key order on encode, exactly as
//! `examples/original_source/include/mmtf/map_decoder.hpp`'s `copy_decode`
//! preserves a `msgpack::object` verbatim onto the parser's zone.

/// Canonical key order used when re-embedding the six property maps, per
/// §4.6. Encode always emits them in this order regardless of the order
/// they appeared on decode.
pub const CANONICAL_ORDER: [&str; 6] = [
    "bondProperties",
    "atomProperties",
    "groupProperties",
    "chainProperties",
    "modelProperties",
    "extraProperties",
];

/// A property map is "absent" if it was never populated; an empty map is
/// indistinguishable from an absent one and is omitted on encode, matching
/// the field dispatcher's general "value equals default sentinel" rule.
#[must_use]
pub fn is_empty(value: &rmpv::Value) -> bool {
    matches!(value, rmpv::Value::Map(entries) if entries.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_map_is_empty() {
        assert!(is_empty(&rmpv::Value::Map(Vec::new())));
    }

    #[test]
    fn populated_map_is_not_empty() {
        let value = rmpv::Value::Map(vec![("k".into(), rmpv::Value::Boolean(true))]);
        assert!(!is_empty(&value));
    }

    #[test]
    fn canonical_order_matches_spec() {
        assert_eq!(
            CANONICAL_ORDER,
            [
                "bondProperties",
                "atomProperties",
                "groupProperties",
                "chainProperties",
                "modelProperties",
                "extraProperties",
            ]
        );
    }
}
