//! Collection aliases used throughout the transpiler.
//!
//! Node and scope ids are small integers and names are short identifiers,
//! so FxHash is used everywhere DoS resistance does not matter.

use std::hash::BuildHasherDefault;

use indexmap::IndexMap;
use rustc_hash::FxHasher;

/// Re-export FxHashMap for convenience.
pub type FxMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// A set that uses FxHash for fast hashing.
pub type FxSet<T> = rustc_hash::FxHashSet<T>;

/// An insertion-ordered map.
///
/// Used wherever iteration order leaks into generated text (class members,
/// scope bindings), so output stays deterministic across runs.
pub type OrderedMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordered_map_preserves_order() {
        let mut map: OrderedMap<&str, i32> = OrderedMap::default();
        map.insert("c", 3);
        map.insert("a", 1);
        map.insert("b", 2);

        let keys: Vec<_> = map.keys().copied().collect();
        assert_eq!(keys, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_ordered_map_update_keeps_slot() {
        let mut map: OrderedMap<&str, i32> = OrderedMap::default();
        map.insert("a", 1);
        map.insert("b", 2);
        let old = map.insert("a", 3);
        assert_eq!(old, Some(1));
        assert_eq!(map.get_index(0), Some((&"a", &3)));
        assert_eq!(map.len(), 2);
    }
}
