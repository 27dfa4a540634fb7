//! Canonical serialization for graph fingerprints.
//!
//! Values are serialized to compact JSON and hashed with xxh64. Callers are
//! responsible for feeding ordered data (sorted `Vec`s or `BTreeMap`s); a
//! `HashMap` would make the hash depend on iteration order.

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Serialize a value to canonical JSON bytes for hashing.
///
/// # Panics
///
/// Panics if `value` cannot be represented as JSON, e.g. a map with
/// non-string keys. Every fingerprint input in this crate is string-keyed.
pub fn to_canonical_bytes<T: Serialize + ?Sized>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).expect("fingerprint input must serialize to JSON")
}

/// Compute the canonical xxh64 hash of a serializable value.
pub fn canonical_hash<T: Serialize + ?Sized>(value: &T) -> u64 {
    xxh64(&to_canonical_bytes(value), 0)
}

/// Compute the canonical hash and return it as a 16-digit hex string.
pub fn canonical_hash_hex<T: Serialize + ?Sized>(value: &T) -> String {
    format!("{:016x}", canonical_hash(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_determinism() {
        let edges = vec![("Goblin", "Bones"), ("Cow", "Cowhide")];
        assert_eq!(canonical_hash(&edges), canonical_hash(&edges));
    }

    #[test]
    fn test_order_sensitive() {
        let a = vec!["a", "b"];
        let b = vec!["b", "a"];
        assert_ne!(canonical_hash(&a), canonical_hash(&b));
    }

    #[test]
    fn test_btreemap_insertion_order_irrelevant() {
        let mut first = BTreeMap::new();
        first.insert("type", "item");
        first.insert("members", "no");

        let mut second = BTreeMap::new();
        second.insert("members", "no");
        second.insert("type", "item");

        assert_eq!(canonical_hash_hex(&first), canonical_hash_hex(&second));
    }

    #[test]
    fn test_hex_is_fixed_width() {
        assert_eq!(canonical_hash_hex(&()).len(), 16);
    }
}
