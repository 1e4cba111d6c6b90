//! Two-level resolver cache
//!
//! Lookups try the identity level first (the exact options handle seen
//! before, no serialization), then the content level keyed by
//! `"<namespace>|<serialized options>"`. `serde_json` writes object keys in
//! sorted order, so the content key does not depend on key order. Numbers
//! keep their parsed spelling: `1` and `1.0` give different keys.
//!
//! Entries are never evicted: the set of distinct resolve configurations in
//! a build is small.

use std::collections::HashMap;
use std::rc::Rc;

use crate::error::Result;
use crate::options::{IdentityMap, ResolveOptions};
use crate::resolver::Resolver;

/// Lookup counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Served from the identity level
    pub identity_hits: usize,
    /// Served from the content level
    pub content_hits: usize,
    /// Not cached; a resolver had to be constructed
    pub misses: usize,
}

/// Content key for `options` in `namespace`.
pub fn content_key(namespace: &str, options: &ResolveOptions) -> Result<String> {
    Ok(format!(
        "{}|{}",
        namespace,
        serde_json::to_string(options.value())?
    ))
}

pub struct ResolverCache<H> {
    by_identity: HashMap<String, IdentityMap<Rc<Resolver<H>>>>,
    by_content: HashMap<String, Rc<Resolver<H>>>,
    stats: CacheStats,
}

impl<H> Default for ResolverCache<H> {
    fn default() -> Self {
        Self {
            by_identity: HashMap::new(),
            by_content: HashMap::new(),
            stats: CacheStats::default(),
        }
    }
}

impl<H> ResolverCache<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the exact `options` handle.
    pub fn lookup_identity(
        &mut self,
        namespace: &str,
        options: &ResolveOptions,
    ) -> Option<Rc<Resolver<H>>> {
        let hit = self
            .by_identity
            .get(namespace)
            .and_then(|map| map.get(options))
            .cloned();
        if hit.is_some() {
            self.stats.identity_hits += 1;
        }
        hit
    }

    /// Look up by content key, indexing a hit under `options` for next time.
    ///
    /// A miss is counted; the caller is expected to construct and
    /// [`insert`](Self::insert).
    pub fn lookup_content(
        &mut self,
        namespace: &str,
        options: &ResolveOptions,
        key: &str,
    ) -> Option<Rc<Resolver<H>>> {
        match self.by_content.get(key).cloned() {
            Some(resolver) => {
                self.stats.content_hits += 1;
                self.index_identity(namespace, options, Rc::clone(&resolver));
                Some(resolver)
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Store a freshly constructed resolver under both levels.
    ///
    /// If `key` was filled in the meantime the existing resolver is kept and
    /// returned, so each content key maps to exactly one resolver.
    pub fn insert(
        &mut self,
        namespace: &str,
        options: &ResolveOptions,
        key: String,
        resolver: Rc<Resolver<H>>,
    ) -> Rc<Resolver<H>> {
        let stored = Rc::clone(self.by_content.entry(key).or_insert(resolver));
        self.index_identity(namespace, options, Rc::clone(&stored));
        stored
    }

    fn index_identity(&mut self, namespace: &str, options: &ResolveOptions, resolver: Rc<Resolver<H>>) {
        self.by_identity
            .entry(namespace.to_string())
            .or_insert_with(IdentityMap::new)
            .insert(options, resolver);
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Number of distinct resolvers held.
    pub fn len(&self) -> usize {
        self.by_content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_content_key_prefixes_namespace() {
        let options = ResolveOptions::new(json!({"extensions": [".js"]}));
        assert_eq!(
            content_key("normal", &options).unwrap(),
            r#"normal|{"extensions":[".js"]}"#
        );
    }

    #[test]
    fn test_content_key_ignores_key_order() {
        let a = ResolveOptions::new(serde_json::from_str(r#"{"a":1,"b":2}"#).unwrap());
        let b = ResolveOptions::new(serde_json::from_str(r#"{"b":2,"a":1}"#).unwrap());
        assert_eq!(content_key("n", &a).unwrap(), content_key("n", &b).unwrap());
    }

    #[test]
    fn test_content_key_differs_by_namespace() {
        let options = ResolveOptions::new(json!({}));
        assert_ne!(
            content_key("normal", &options).unwrap(),
            content_key("loader", &options).unwrap()
        );
    }

    #[test]
    fn test_content_key_keeps_float_spelling() {
        let int = ResolveOptions::new(json!({"v": 1}));
        let float = ResolveOptions::new(json!({"v": 1.0}));

        assert_eq!(content_key("n", &int).unwrap(), r#"n|{"v":1}"#);
        assert_eq!(content_key("n", &float).unwrap(), r#"n|{"v":1.0}"#);
    }

    #[test]
    fn test_empty_cache_counts_miss() {
        let mut cache: ResolverCache<()> = ResolverCache::new();
        let options = ResolveOptions::new(json!({}));
        let key = content_key("normal", &options).unwrap();

        assert!(cache.lookup_identity("normal", &options).is_none());
        assert!(cache.lookup_content("normal", &options, &key).is_none());
        assert_eq!(
            cache.stats(),
            CacheStats {
                identity_hits: 0,
                content_hits: 0,
                misses: 1,
            }
        );
        assert!(cache.is_empty());
    }
}
