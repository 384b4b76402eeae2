//! Typed handle over one Moka cache.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use moka::sync::Cache;

use super::config::{CacheConfig, Expiry};

/// Bounds every cached key type satisfies.
pub trait CacheKey: Hash + Eq + Send + Sync + 'static {}
impl<T: Hash + Eq + Send + Sync + 'static> CacheKey for T {}

/// Bounds every cached value type satisfies.
pub trait CacheValue: Clone + Send + Sync + 'static {}
impl<T: Clone + Send + Sync + 'static> CacheValue for T {}

/// Named cache. Clones share entries.
pub struct TypedCache<K: CacheKey, V: CacheValue> {
    inner: Cache<K, V>,
    name: Arc<str>,
}

impl<K: CacheKey, V: CacheValue> Clone for TypedCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            name: self.name.clone(),
        }
    }
}

impl<K: CacheKey, V: CacheValue> TypedCache<K, V> {
    pub fn new(name: &str, config: CacheConfig) -> Self {
        let builder = Cache::builder().name(name).max_capacity(config.max_capacity);
        let inner = match config.expiry {
            Expiry::AfterWrite(ttl) => builder.time_to_live(ttl).build(),
            Expiry::AfterIdle(tti) => builder.time_to_idle(tti).build(),
        };

        Self {
            inner,
            name: name.into(),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.get(key)
    }

    pub fn insert(&self, key: K, value: V) {
        self.inner.insert(key, value);
    }

    pub fn invalidate(&self, key: &K) {
        self.inner.invalidate(key);
    }

    /// Cached value, or the one `init` builds. Concurrent callers for the
    /// same key all get the single value that was inserted.
    pub fn get_or_insert_with(&self, key: K, init: impl FnOnce() -> V) -> V {
        self.inner.get_with(key, init)
    }
}

impl<K: CacheKey, V: CacheValue> fmt::Debug for TypedCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypedCache({}, ~{} entries)", self.name, self.inner.entry_count())
    }
}
