//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache contract over arbitrary operation sequences.

use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;

use crate::cache::{TtlCache, NO_EXPIRATION};

// == Test Configuration ==
const TEST_DEFAULT_TTL: Duration = Duration::from_secs(300);

// == Strategies ==
/// Generates cache keys shaped like the data layer's keys
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,12}(-[a-z0-9]{1,12})?".prop_map(|s| s)
}

/// Generates cache values
fn valid_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,64}".prop_map(|s| s)
}

/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    SetForever { key: String, value: String },
    Get { key: String },
    Delete { key: String },
    Sweep,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (valid_key_strategy(), valid_value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        (valid_key_strategy(), valid_value_strategy())
            .prop_map(|(key, value)| CacheOp::SetForever { key, value }),
        valid_key_strategy().prop_map(|key| CacheOp::Get { key }),
        valid_key_strategy().prop_map(|key| CacheOp::Delete { key }),
        Just(CacheOp::Sweep),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // With nothing expiring, the cache behaves exactly like a map.
    #[test]
    fn prop_matches_model_map(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let cache = TtlCache::new(TEST_DEFAULT_TTL);
        let mut model: HashMap<String, String> = HashMap::new();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    cache.set(key.clone(), value.clone());
                    model.insert(key, value);
                }
                CacheOp::SetForever { key, value } => {
                    cache.set_with_ttl(key.clone(), value.clone(), NO_EXPIRATION);
                    model.insert(key, value);
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(cache.get(&key), model.get(&key).cloned());
                }
                CacheOp::Delete { key } => {
                    cache.delete(&key);
                    model.remove(&key);
                }
                CacheOp::Sweep => {
                    prop_assert_eq!(cache.delete_expired(), 0);
                }
            }
        }

        prop_assert_eq!(cache.len(), model.len());
    }

    // Hits and misses add up to the number of reads performed.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let cache = TtlCache::new(TEST_DEFAULT_TTL);
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => cache.set(key, value),
                CacheOp::SetForever { key, value } => cache.set_with_ttl(key, value, NO_EXPIRATION),
                CacheOp::Get { key } => match cache.get(&key) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                CacheOp::Delete { key } => cache.delete(&key),
                CacheOp::Sweep => {
                    cache.delete_expired();
                }
            }
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.total_entries, cache.len(), "Total entries mismatch");
    }

    // After a delete, the key reads as absent.
    #[test]
    fn prop_delete_removes_entry(key in valid_key_strategy(), value in valid_value_strategy()) {
        let cache = TtlCache::new(TEST_DEFAULT_TTL);

        cache.set(key.clone(), value);
        prop_assert!(cache.get(&key).is_some(), "Key should exist before delete");

        cache.delete(&key);
        prop_assert!(cache.get(&key).is_none(), "Key should not exist after delete");
    }
}

// Separate proptest block with fewer cases for time-sensitive TTL tests
proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]

    // A sweep removes exactly the expired entries and leaves the rest readable.
    #[test]
    fn prop_sweep_convergence(
        short_keys in prop::collection::hash_set(valid_key_strategy(), 1..10),
        long_keys in prop::collection::hash_set(valid_key_strategy(), 1..10),
    ) {
        let long_keys: Vec<String> = long_keys.difference(&short_keys).cloned().collect();
        let cache = TtlCache::new(TEST_DEFAULT_TTL);

        for key in &short_keys {
            cache.set_with_ttl(key.clone(), key.clone(), Duration::from_millis(20));
        }
        for key in &long_keys {
            cache.set(key.clone(), key.clone());
        }

        sleep(Duration::from_millis(50));

        let removed = cache.delete_expired();
        prop_assert_eq!(removed, short_keys.len());
        prop_assert_eq!(cache.len(), long_keys.len());

        for key in &short_keys {
            prop_assert!(cache.get(key).is_none());
        }
        for key in &long_keys {
            prop_assert_eq!(cache.get(key), Some(key.clone()));
        }
    }

    // Entries without expiration outlive any default TTL.
    #[test]
    fn prop_never_expire(key in valid_key_strategy(), value in valid_value_strategy()) {
        let cache = TtlCache::new(Duration::from_millis(10));

        cache.set_with_ttl(key.clone(), value.clone(), NO_EXPIRATION);
        sleep(Duration::from_millis(30));
        cache.delete_expired();

        prop_assert_eq!(cache.get(&key), Some(value));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // Concurrent writers only ever publish whole values; readers never observe
    // anything that was not written for that key.
    #[test]
    fn prop_concurrent_operation_correctness(
        operations in prop::collection::vec(cache_op_strategy(), 10..50)
    ) {
        let cache = Arc::new(TtlCache::new(TEST_DEFAULT_TTL));
        let written: Arc<parking_lot::Mutex<HashMap<String, Vec<String>>>> = Arc::default();

        for op in &operations {
            if let CacheOp::Set { key, value } | CacheOp::SetForever { key, value } = op {
                written.lock().entry(key.clone()).or_default().push(value.clone());
            }
        }

        let handles: Vec<_> = operations
            .into_iter()
            .map(|op| {
                let cache = Arc::clone(&cache);
                let written = Arc::clone(&written);
                std::thread::spawn(move || match op {
                    CacheOp::Set { key, value } => {
                        cache.set(key, value);
                        Ok(())
                    }
                    CacheOp::SetForever { key, value } => {
                        cache.set_with_ttl(key, value, NO_EXPIRATION);
                        Ok(())
                    }
                    CacheOp::Get { key } => match cache.get(&key) {
                        Some(value) => {
                            let known = written
                                .lock()
                                .get(&key)
                                .map(|values| values.contains(&value))
                                .unwrap_or(false);
                            if known {
                                Ok(())
                            } else {
                                Err(format!("unexpected value {value:?} for {key:?}"))
                            }
                        }
                        None => Ok(()),
                    },
                    CacheOp::Delete { key } => {
                        cache.delete(&key);
                        Ok(())
                    }
                    CacheOp::Sweep => {
                        cache.delete_expired();
                        Ok(())
                    }
                })
            })
            .collect();

        for handle in handles {
            let result = handle.join().expect("worker should not panic");
            prop_assert!(result.is_ok(), "Concurrent operation failed: {:?}", result);
        }

        let hit_rate = cache.stats().hit_rate();
        prop_assert!((0.0..=1.0).contains(&hit_rate));
    }
}
