//! Shared option handles with reference identity
//!
//! [`ResolveOptions`] is how callers hand configuration to the factory.
//! Clones of a handle share identity; handles built separately from equal
//! JSON do not. The factory's fast path and every resolver's override cache
//! key on that identity.

use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::rc::{Rc, Weak};

use serde_json::{Map, Value};

/// Immutable, reference-counted resolver options.
#[derive(Clone)]
pub struct ResolveOptions(Rc<Value>);

impl ResolveOptions {
    pub fn new(value: Value) -> Self {
        Self(Rc::new(value))
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Whether both handles refer to the same options object.
    pub fn ptr_eq(&self, other: &ResolveOptions) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn address(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }
}

impl Deref for ResolveOptions {
    type Target = Value;

    fn deref(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for ResolveOptions {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for ResolveOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ResolveOptions").field(&*self.0).finish()
    }
}

/// One-level merge: keys of `overrides` replace keys of `base`.
///
/// Nested objects are taken whole from whichever side wins. Non-object
/// inputs contribute no keys.
pub fn shallow_merge(base: &Value, overrides: &Value) -> Value {
    let mut merged = Map::new();
    for source in [base, overrides] {
        if let Value::Object(map) = source {
            for (key, value) in map {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    Value::Object(merged)
}

/// Entry count at which an [`IdentityMap`] first prunes dropped keys.
const PRUNE_THRESHOLD: usize = 16;

/// Map keyed by [`ResolveOptions`] identity.
///
/// Each entry holds a `Weak` to its key, which keeps the allocation (and
/// so the address) reserved until the entry is pruned. A dropped handle can
/// never alias a live one.
pub(crate) struct IdentityMap<V> {
    entries: HashMap<usize, (Weak<Value>, V)>,
    prune_at: usize,
}

impl<V> IdentityMap<V> {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
            prune_at: PRUNE_THRESHOLD,
        }
    }

    pub(crate) fn get(&self, key: &ResolveOptions) -> Option<&V> {
        self.entries.get(&key.address()).map(|(_, value)| value)
    }

    /// Insert, first pruning entries whose handles have all been dropped
    /// once the map has doubled since the last prune.
    pub(crate) fn insert(&mut self, key: &ResolveOptions, value: V) {
        if self.entries.len() >= self.prune_at {
            self.entries.retain(|_, (weak, _)| weak.strong_count() > 0);
            self.prune_at = (self.entries.len() * 2).max(PRUNE_THRESHOLD);
        }
        self.entries
            .insert(key.address(), (Rc::downgrade(&key.0), value));
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_clones_share_identity() {
        let a = ResolveOptions::new(json!({"x": 1}));
        let b = a.clone();
        let c = ResolveOptions::new(json!({"x": 1}));

        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
        assert_eq!(a.value(), c.value());
    }

    #[test]
    fn test_shallow_merge_override_wins() {
        let merged = shallow_merge(
            &json!({"a": 1, "nested": {"x": 1, "y": 2}}),
            &json!({"b": 2, "nested": {"x": 3}}),
        );
        assert_eq!(merged, json!({"a": 1, "b": 2, "nested": {"x": 3}}));
    }

    #[test]
    fn test_shallow_merge_ignores_non_objects() {
        assert_eq!(shallow_merge(&json!({"a": 1}), &Value::Null), json!({"a": 1}));
        assert_eq!(shallow_merge(&json!("x"), &json!({"b": 2})), json!({"b": 2}));
    }

    #[test]
    fn test_identity_map_distinguishes_equal_content() {
        let a = ResolveOptions::new(json!({}));
        let b = ResolveOptions::new(json!({}));

        let mut map = IdentityMap::new();
        map.insert(&a, "a");

        assert_eq!(map.get(&a), Some(&"a"));
        assert_eq!(map.get(&a.clone()), Some(&"a"));
        assert_eq!(map.get(&b), None);
    }

    #[test]
    fn test_identity_map_prunes_dropped_keys() {
        let mut map = IdentityMap::new();
        for i in 0..PRUNE_THRESHOLD {
            let short_lived = ResolveOptions::new(json!({"tmp": i}));
            map.insert(&short_lived, i);
        }
        assert_eq!(map.len(), PRUNE_THRESHOLD);

        let kept = ResolveOptions::new(json!({}));
        map.insert(&kept, 99);

        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&kept), Some(&99));
    }

    #[test]
    fn test_identity_map_stays_bounded_with_dropped_keys() {
        let mut map = IdentityMap::new();
        for i in 0..10 * PRUNE_THRESHOLD {
            let short_lived = ResolveOptions::new(json!({"tmp": i}));
            map.insert(&short_lived, i);
        }
        assert!(map.len() <= PRUNE_THRESHOLD);
    }

    #[test]
    fn test_identity_map_keeps_live_keys_when_pruning() {
        let live: Vec<_> = (0..PRUNE_THRESHOLD)
            .map(|i| ResolveOptions::new(json!({"live": i})))
            .collect();
        let mut map = IdentityMap::new();
        for (i, key) in live.iter().enumerate() {
            map.insert(key, i);
        }

        let extra = ResolveOptions::new(json!({}));
        map.insert(&extra, PRUNE_THRESHOLD);

        assert_eq!(map.len(), PRUNE_THRESHOLD + 1);
        assert_eq!(map.get(&live[0]), Some(&0));
    }
}
