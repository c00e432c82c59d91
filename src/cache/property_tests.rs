//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the store's read, update, capacity and recency rules
//! against arbitrary keys, values and operation sequences.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::cache::{Cache, CacheStore, Lookup};
use crate::config::CacheConfig;
use crate::events::{EventHook, NoopHook};

// == Test Configuration ==
const TEST_CAPACITY: usize = 100;

// == Strategies ==
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9_]{1,12}"
}

fn value_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..64)
}

fn unique_keys(keys: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    keys.into_iter().filter(|k| seen.insert(k.clone())).collect()
}

fn store(capacity: usize) -> CacheStore<String, Vec<u8>> {
    CacheStore::new(&CacheConfig::new().capacity(capacity))
}

#[derive(Debug, Clone)]
enum CacheOp {
    Insert { key: String, value: Vec<u8> },
    Get { key: String },
    PurgeStale,
    Clear,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    // Small key space so operations collide
    let key = "[a-h]";
    prop_oneof![
        4 => (key, value_strategy()).prop_map(|(key, value)| CacheOp::Insert { key, value }),
        4 => key.prop_map(|key| CacheOp::Get { key }),
        1 => Just(CacheOp::PurgeStale),
        1 => Just(CacheOp::Clear),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Storing a pair and reading it back before expiry returns the stored value.
    #[test]
    fn prop_read_after_write(key in key_strategy(), value in value_strategy()) {
        let mut store = store(TEST_CAPACITY);

        store.insert(key.clone(), value.clone());

        prop_assert_eq!(store.get(&key), Lookup::Hit(value));
    }

    // The second of two inserts under one key wins and the key is stored once.
    #[test]
    fn prop_update_keeps_latest(
        key in key_strategy(),
        first in value_strategy(),
        second in value_strategy()
    ) {
        let mut store = store(TEST_CAPACITY);

        store.insert(key.clone(), first);
        store.insert(key.clone(), second.clone());

        prop_assert_eq!(store.get(&key), Lookup::Hit(second));
        prop_assert_eq!(store.len(), 1);
    }

    // No sequence of inserts grows the store past its capacity.
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 1..200)
    ) {
        let capacity = 50;
        let mut store = store(capacity);

        for (key, value) in entries {
            store.insert(key, value);
            prop_assert!(store.len() <= capacity, "size {} exceeds {}", store.len(), capacity);
        }
    }

    // Filling the store and adding a new key evicts exactly the first key inserted.
    #[test]
    fn prop_lru_eviction_order(
        keys in prop::collection::vec(key_strategy(), 2..12),
        new_key in key_strategy(),
        new_value in value_strategy()
    ) {
        let keys = unique_keys(keys);
        prop_assume!(keys.len() >= 2);
        prop_assume!(!keys.contains(&new_key));

        let mut store = store(keys.len());
        for key in &keys {
            store.insert(key.clone(), key.as_bytes().to_vec());
        }

        let outcome = store.insert(new_key.clone(), new_value);

        prop_assert_eq!(outcome.evicted, vec![keys[0].clone()]);
        prop_assert_eq!(store.len(), keys.len());
        prop_assert_eq!(store.get(&keys[0]), Lookup::Miss);
        for key in keys.iter().skip(1) {
            prop_assert_eq!(store.get(key), Lookup::Hit(key.as_bytes().to_vec()));
        }
    }

    // A read moves a key off the eviction front; the next oldest goes instead.
    #[test]
    fn prop_lru_access_tracking(
        keys in prop::collection::vec(key_strategy(), 3..10),
        new_key in key_strategy()
    ) {
        let keys = unique_keys(keys);
        prop_assume!(keys.len() >= 3);
        prop_assume!(!keys.contains(&new_key));

        let mut store = store(keys.len());
        for key in &keys {
            store.insert(key.clone(), Vec::new());
        }

        let _ = store.get(&keys[0]);
        store.insert(new_key.clone(), Vec::new());

        prop_assert!(store.contains_key(&keys[0]), "touched key was evicted");
        prop_assert!(!store.contains_key(&keys[1]), "next oldest key survived");
        prop_assert!(store.contains_key(&new_key));
    }

    // Arbitrary operation sequences keep entries and recency order in step and
    // agree with a simple model of the cache contents.
    #[test]
    fn prop_operations_match_model(ops in prop::collection::vec(cache_op_strategy(), 1..100)) {
        let capacity = 5;
        let mut store = store(capacity);
        let mut model: HashMap<String, Vec<u8>> = HashMap::new();
        let mut order: Vec<String> = Vec::new();

        for op in ops {
            match op {
                CacheOp::Insert { key, value } => {
                    let exists = model.contains_key(&key);
                    if !exists && model.len() >= capacity {
                        let victim = order.remove(0);
                        model.remove(&victim);
                    }
                    order.retain(|k| k != &key);
                    order.push(key.clone());
                    model.insert(key.clone(), value.clone());
                    store.insert(key, value);
                }
                CacheOp::Get { key } => {
                    let expected = model.get(&key).cloned();
                    if expected.is_some() {
                        order.retain(|k| k != &key);
                        order.push(key.clone());
                    }
                    prop_assert_eq!(store.get(&key).into_value(), expected);
                }
                CacheOp::PurgeStale => {
                    // Nothing is stale under the 12h default lifetime
                    prop_assert_eq!(store.reset(true), 0);
                }
                CacheOp::Clear => {
                    model.clear();
                    order.clear();
                    store.reset(false);
                }
            }

            prop_assert!(store.is_consistent());
            prop_assert_eq!(store.keys_by_recency(), order.clone());
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    // Concurrent inserts and reads through the shared handle never break the
    // capacity bound and never return a value other than one written for the key.
    #[test]
    fn prop_concurrent_operation_correctness(
        ops in prop::collection::vec(cache_op_strategy(), 10..60)
    ) {
        let hook: Arc<dyn EventHook<String>> = Arc::new(NoopHook);
        let cache: Arc<Cache<String, Vec<u8>>> =
            Arc::new(Cache::with_hook(CacheConfig::new().capacity(4), hook));

        let written: HashMap<String, HashSet<Vec<u8>>> = ops.iter().fold(HashMap::new(), |mut acc, op| {
            if let CacheOp::Insert { key, value } = op {
                acc.entry(key.clone()).or_default().insert(value.clone());
            }
            acc
        });

        let handles: Vec<_> = ops
            .into_iter()
            .map(|op| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || match op {
                    CacheOp::Insert { key, value } => {
                        cache.insert(key, value);
                        None
                    }
                    CacheOp::Get { key } => cache.get(&key).map(|value| (key, value)),
                    CacheOp::PurgeStale => {
                        cache.purge_stale();
                        None
                    }
                    CacheOp::Clear => {
                        cache.clear();
                        None
                    }
                })
            })
            .collect();

        for handle in handles {
            if let Some((key, value)) = handle.join().expect("worker thread panicked") {
                prop_assert!(
                    written.get(&key).is_some_and(|values| values.contains(&value)),
                    "read a value never written for {}",
                    key
                );
            }
        }

        prop_assert!(cache.len() <= 4);
    }
}
