//! Thread-safe cache handle
//!
//! [`Cache`] serialises every operation on a [`CacheStore`] behind one mutex,
//! so no caller can observe a key in the map that is missing from the recency
//! order. Hook events are emitted after the lock is released.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::cache::store::{CacheStore, Lookup, Weigher};
use crate::cache::{CacheBackend, CacheStats};
use crate::config::CacheConfig;
use crate::events::{Event, EventHook, TracingHook};

// == Cache ==
/// Bounded, thread-safe key/value cache with per-entry expiration and LRU eviction.
///
/// ```
/// # use image_cache::{Cache, CacheConfig};
/// let cache: Cache<String, Vec<u8>> = Cache::new(CacheConfig::default());
/// cache.insert("logo.png".to_string(), vec![1, 2, 3]);
/// assert_eq!(cache.get(&"logo.png".to_string()), Some(vec![1, 2, 3]));
/// ```
pub struct Cache<K, V> {
    store: Mutex<CacheStore<K, V>>,
    hook: Arc<dyn EventHook<K>>,
}

impl<K, V> Cache<K, V>
where
    K: Hash + Eq + Clone + Debug + Send + Sync + 'static,
    V: Clone + Send,
{
    /// Creates a cache that reports to `tracing`.
    ///
    /// Entries carry no cost here, so `config.max_total_cost` is only honoured
    /// by caches built with a weigher.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_hook(config, Arc::new(TracingHook))
    }

    /// Creates a cache whose cost ceiling weighs values with `weigher`.
    pub fn with_weigher(config: CacheConfig, weigher: Weigher<V>) -> Self {
        Self::with_weigher_and_hook(config, weigher, Arc::new(TracingHook))
    }
}

impl<K, V> Default for Cache<K, V>
where
    K: Hash + Eq + Clone + Debug + Send + Sync + 'static,
    V: Clone + Send,
{
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl<K, V> Cache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync,
    V: Clone + Send,
{
    /// Creates a cache that reports to the given hook.
    pub fn with_hook(config: CacheConfig, hook: Arc<dyn EventHook<K>>) -> Self {
        Self::from_store(CacheStore::new(&config), hook)
    }

    /// Creates a cache with a cost weigher that reports to the given hook.
    pub fn with_weigher_and_hook(
        config: CacheConfig,
        weigher: Weigher<V>,
        hook: Arc<dyn EventHook<K>>,
    ) -> Self {
        Self::from_store(CacheStore::with_weigher(&config, weigher), hook)
    }

    /// Wraps an already configured store.
    pub fn from_store(store: CacheStore<K, V>, hook: Arc<dyn EventHook<K>>) -> Self {
        Self {
            store: Mutex::new(store),
            hook,
        }
    }

    // == Insert ==
    /// Stores `value` under `key`, replacing any previous entry and its recency.
    pub fn insert(&self, key: K, value: V) {
        let outcome = self.store.lock().insert(key.clone(), value);

        for victim in &outcome.evicted {
            self.hook.on_event(&Event::Evicted { key: victim });
        }
        self.hook.on_event(&Event::Inserted {
            key: &key,
            replaced: outcome.replaced,
        });
    }

    // == Get ==
    /// Returns the value if present and fresh, refreshing its lifetime and recency.
    pub fn get(&self, key: &K) -> Option<V> {
        let lookup = self.store.lock().get(key);

        let event = match &lookup {
            Lookup::Hit(_) => Event::Hit { key },
            Lookup::Miss => Event::Miss { key },
            Lookup::Expired => Event::Expired { key },
        };
        self.hook.on_event(&event);
        lookup.into_value()
    }

    /// True if a fresh entry exists, without counting as a use.
    pub fn contains_key(&self, key: &K) -> bool {
        self.store.lock().contains_key(key)
    }

    // == Reset ==
    /// Removes stale entries only, or every entry when `stale_only` is false.
    ///
    /// Returns the number of entries removed.
    pub fn reset(&self, stale_only: bool) -> usize {
        let removed = self.store.lock().reset(stale_only);
        self.hook.on_event(&Event::Purged {
            removed,
            stale_only,
        });
        removed
    }

    /// Same as `reset(true)`.
    pub fn purge_stale(&self) -> usize {
        self.reset(true)
    }

    /// Same as `reset(false)`.
    pub fn clear(&self) -> usize {
        self.reset(false)
    }

    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.store.lock().capacity()
    }

    /// Snapshot of the current statistics.
    pub fn stats(&self) -> CacheStats {
        self.store.lock().stats()
    }
}

impl<K, V> CacheBackend<K, V> for Cache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync,
    V: Clone + Send,
{
    fn read(&self, key: &K) -> Option<V> {
        self.get(key)
    }

    fn write(&self, key: K, value: V) {
        self.insert(key, value)
    }
}
