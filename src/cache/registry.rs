//! Named cache registry.

use std::any::{Any, type_name};
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use super::typed::{CacheKey, CacheValue};
use super::{CacheConfig, TypedCache};

type Slot = Arc<dyn Any + Send + Sync>;

/// Hands out caches by name.
///
/// Two repositories built over the same registry and asking for the same
/// name share entries.
#[derive(Clone, Default)]
pub struct CacheRegistry {
    caches: Arc<Mutex<HashMap<&'static str, Slot>>>,
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache registered under `name`, created with `config` on first use.
    ///
    /// # Panics
    /// If `name` was first registered with other key or value types.
    pub fn get_or_create<K: CacheKey, V: CacheValue>(
        &self,
        name: &'static str,
        config: CacheConfig,
    ) -> TypedCache<K, V> {
        let mut caches = self.caches.lock();
        let slot = caches.entry(name).or_insert_with(|| {
            debug!("Creating cache {} ({:?})", name, config);
            Arc::new(TypedCache::<K, V>::new(name, config)) as Slot
        });

        match slot.downcast_ref::<TypedCache<K, V>>() {
            Some(cache) => cache.clone(),
            None => panic!(
                "cache {} requested as {} but holds another type",
                name,
                type_name::<TypedCache<K, V>>()
            ),
        }
    }

    pub fn cache_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.caches.lock().keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.cache_names()).finish()
    }
}
