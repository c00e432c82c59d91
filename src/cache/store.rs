//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and lazy expiration.
//! The store is single-threaded; [`Cache`](crate::cache::Cache) wraps it in a lock.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cache::{CacheEntry, CacheStats, LruTracker};
use crate::config::CacheConfig;

/// Computes the cost of a value for the optional cost ceiling.
pub type Weigher<V> = Arc<dyn Fn(&V) -> usize + Send + Sync>;

// == Lookup ==
/// Result of a read against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<V> {
    /// Fresh value found; its lifetime and recency were refreshed
    Hit(V),
    /// No entry for the key
    Miss,
    /// A stale entry was found and removed
    Expired,
}

impl<V> Lookup<V> {
    pub fn into_value(self) -> Option<V> {
        match self {
            Lookup::Hit(value) => Some(value),
            Lookup::Miss | Lookup::Expired => None,
        }
    }
}

// == Insert Outcome ==
/// What an insert did besides storing the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertOutcome<K> {
    /// The key already existed and its entry was replaced
    pub replaced: bool,
    /// Keys evicted to make room, oldest first
    pub evicted: Vec<K>,
}

// == Cache Store ==
/// Cache storage with LRU eviction, read-refresh and lazy staleness.
pub struct CacheStore<K, V> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker<K>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
    /// Lifetime given to inserted and refreshed entries
    entry_lifetime: Duration,
    /// Soft ceiling on `total_cost`
    max_total_cost: Option<usize>,
    total_cost: usize,
    weigher: Option<Weigher<V>>,
}

impl<K, V> CacheStore<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates a new CacheStore from the given configuration.
    ///
    /// Without a weigher every entry costs 0, so `max_total_cost` has no effect.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: HashMap::with_capacity(config.capacity.min(1024)),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            capacity: config.capacity.max(1),
            entry_lifetime: config.entry_lifetime,
            max_total_cost: config.max_total_cost,
            total_cost: 0,
            weigher: None,
        }
    }

    /// Creates a store that weighs each value for the cost ceiling.
    pub fn with_weigher(config: &CacheConfig, weigher: Weigher<V>) -> Self {
        Self {
            weigher: Some(weigher),
            ..Self::new(config)
        }
    }

    // == Insert ==
    /// Stores `value` under `key` with a fresh lifetime, as the most recently used key.
    ///
    /// A new key arriving at a full cache first evicts the least recently used entry.
    /// Replacing an existing key never evicts another entry.
    pub fn insert(&mut self, key: K, value: V) -> InsertOutcome<K> {
        let cost = self.weigher.as_ref().map_or(0, |weigh| weigh(&value));

        let replaced = match self.entries.remove(&key) {
            Some(old) => {
                self.total_cost -= old.cost;
                true
            }
            None => false,
        };

        let mut evicted = Vec::new();
        if !replaced && self.entries.len() >= self.capacity {
            evicted.extend(self.evict_one(None));
        }

        self.entries
            .insert(key.clone(), CacheEntry::new(value, self.entry_lifetime, cost));
        self.total_cost += cost;
        self.lru.touch(&key);

        if !replaced {
            if let Some(max_cost) = self.max_total_cost {
                while self.total_cost > max_cost {
                    match self.evict_one(Some(&key)) {
                        Some(victim) => evicted.push(victim),
                        None => break,
                    }
                }
            }
        }

        InsertOutcome { replaced, evicted }
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// A fresh hit is refreshed: its lifetime restarts and it becomes the most
    /// recently used key. A stale entry is removed and reported as `Expired`.
    pub fn get(&mut self, key: &K) -> Lookup<V> {
        let Some(entry) = self.entries.get_mut(key) else {
            self.stats.record_miss();
            return Lookup::Miss;
        };

        if entry.is_stale() {
            self.discard(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            return Lookup::Expired;
        }

        entry.refresh(self.entry_lifetime);
        let value = entry.value.clone();
        self.lru.touch(key);
        self.stats.record_hit();
        Lookup::Hit(value)
    }

    /// True if a fresh entry exists. Does not refresh or remove anything.
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.get(key).is_some_and(|entry| !entry.is_stale())
    }

    // == Reset ==
    /// Removes stale entries (`stale_only`) or everything.
    ///
    /// Returns the number of entries removed. A stale-only pass leaves fresh
    /// entries and their recency order untouched.
    pub fn reset(&mut self, stale_only: bool) -> usize {
        if !stale_only {
            let removed = self.entries.len();
            self.entries.clear();
            self.lru.clear();
            self.total_cost = 0;
            return removed;
        }

        let now = Instant::now();
        let stale_keys: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_stale_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &stale_keys {
            self.discard(key);
        }
        self.stats.record_expirations(stale_keys.len());
        stale_keys.len()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.total_entries = self.entries.len();
        stats.total_cost = self.total_cost;
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn total_cost(&self) -> usize {
        self.total_cost
    }

    /// Keys from least to most recently used.
    pub fn keys_by_recency(&self) -> Vec<K> {
        self.lru.iter().cloned().collect()
    }

    /// Checks that every stored key is tracked exactly once and vice versa.
    pub fn is_consistent(&self) -> bool {
        self.entries.len() == self.lru.len()
            && self.entries.len() <= self.capacity
            && self.lru.iter().all(|key| self.entries.contains_key(key))
            && self.entries.values().map(|e| e.cost).sum::<usize>() == self.total_cost
    }

    fn discard(&mut self, key: &K) {
        if let Some(entry) = self.entries.remove(key) {
            self.total_cost -= entry.cost;
        }
        self.lru.remove(key);
    }

    fn evict_one(&mut self, keep: Option<&K>) -> Option<K> {
        let victim = match keep {
            Some(keep) => self.lru.evict_oldest_except(keep),
            None => self.lru.evict_oldest(),
        }?;
        if let Some(entry) = self.entries.remove(&victim) {
            self.total_cost -= entry.cost;
        }
        self.stats.record_eviction();
        Some(victim)
    }
}
