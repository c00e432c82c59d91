//! Cache Module
//!
//! Provides in-memory caching with lazy expiration, read-refresh and LRU eviction.

mod entry;
mod lru;
mod shared;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

use std::sync::Arc;

// Re-export public types
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use shared::Cache;
pub use stats::CacheStats;
pub use store::{CacheStore, InsertOutcome, Lookup, Weigher};

// == Cache Backend ==
/// Read/write capability the [`CachingLoader`](crate::loader::CachingLoader) needs.
///
/// [`Cache`] is the in-process implementation; any other store (on-disk,
/// distributed) can be substituted by implementing these two methods.
pub trait CacheBackend<K, V>: Send + Sync {
    /// Returns the value for `key` if present and fresh.
    fn read(&self, key: &K) -> Option<V>;

    /// Stores `value` under `key`.
    fn write(&self, key: K, value: V);
}

impl<K, V, T> CacheBackend<K, V> for Arc<T>
where
    T: CacheBackend<K, V> + ?Sized,
{
    fn read(&self, key: &K) -> Option<V> {
        (**self).read(key)
    }

    fn write(&self, key: K, value: V) {
        (**self).write(key, value)
    }
}
