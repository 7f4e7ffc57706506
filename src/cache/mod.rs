//! Result caching for builtin calls.
//!
//! The host engine owns the cache; the bridge only needs [`ResultCache`]'s
//! `get` and `put`. Only successful results are stored, and entries are
//! never updated or invalidated by the bridge.

mod key;
mod memory;

pub use key::{CacheKey, OperationKind};
pub use memory::MemoryCache;

use crate::Term;

/// Cache store consulted before and populated after backend calls.
pub trait ResultCache: Send + Sync {
    /// Returns the cached result for `key`.
    fn get(&self, key: &CacheKey) -> Option<Term>;

    /// Stores a successful result.
    fn put(&self, key: CacheKey, value: Term);
}

/// A cache that never stores anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

impl ResultCache for NoopCache {
    fn get(&self, _key: &CacheKey) -> Option<Term> {
        None
    }

    fn put(&self, _key: CacheKey, _value: Term) {}
}
