//! In-process result cache.

use std::collections::HashMap;

use parking_lot::RwLock;

use super::{CacheKey, ResultCache};
use crate::Term;

/// A [`ResultCache`] backed by a locked hash map.
///
/// Entries live as long as the cache. Scope one instance to a policy
/// evaluation to get per-query caching, or share one across evaluations.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<CacheKey, Term>>,
}

impl MemoryCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of cached results.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Removes all entries.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl ResultCache for MemoryCache {
    fn get(&self, key: &CacheKey) -> Option<Term> {
        self.entries.read().get(key).cloned()
    }

    fn put(&self, key: CacheKey, value: Term) {
        self.entries.write().entry(key).or_insert(value);
    }
}
