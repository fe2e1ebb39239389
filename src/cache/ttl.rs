//! TTL Cache Module
//!
//! Thread-safe map from string keys to values with per-entry expiration and an
//! optional background sweep task.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::cache::{CacheCounters, CacheEntry, CacheStats};
use crate::tasks::{spawn_sweep_task, SweepHandle};

/// Passing this as a TTL stores an entry that never expires.
pub const NO_EXPIRATION: Duration = Duration::ZERO;

// == TTL Cache ==
/// In-memory cache with time-based expiration.
///
/// Reads take the shared lock and never mutate the map: an expired entry is
/// reported as absent but stays in place until [`TtlCache::delete_expired`]
/// runs or the key is overwritten.
///
/// Every key also carries a write generation, bumped by each set or delete.
/// A caller filling the cache from slower storage records the generation
/// before reading and hands it to [`TtlCache::set_if_generation`], which
/// refuses the fill if the key was written in between.
pub struct TtlCache<V> {
    /// Key-value storage
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    /// Write generation per key, 0 for keys never written. Only locked
    /// while `entries` is write-locked or on its own.
    generations: Mutex<HashMap<String, u64>>,
    /// TTL applied by [`TtlCache::set`]
    default_ttl: Duration,
    counters: CacheCounters,
    sweeper: Mutex<Option<SweepHandle>>,
    finalized: AtomicBool,
}

impl<V> std::fmt::Debug for TtlCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("entries", &self.entries.read().len())
            .field("default_ttl", &self.default_ttl)
            .field("finalized", &self.finalized.load(Ordering::Relaxed))
            .finish()
    }
}

impl<V: Clone + Send + Sync + 'static> TtlCache<V> {
    // == Constructor ==
    /// Creates a cache without a sweep task.
    ///
    /// Expired entries are still hidden from reads; they are only reclaimed
    /// by explicit calls to [`TtlCache::delete_expired`].
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            generations: Mutex::new(HashMap::new()),
            default_ttl,
            counters: CacheCounters::default(),
            sweeper: Mutex::new(None),
            finalized: AtomicBool::new(false),
        }
    }

    /// Creates a shared cache and attaches a sweep task running every `interval`.
    ///
    /// Must be called from within a tokio runtime. A zero interval disables
    /// the sweep task.
    pub fn start(default_ttl: Duration, interval: Duration) -> Arc<Self> {
        let cache = Arc::new(Self::new(default_ttl));

        if interval.is_zero() {
            warn!("Eviction interval is zero, expired entries will not be swept");
            return cache;
        }

        let handle = spawn_sweep_task(Arc::downgrade(&cache), interval);
        *cache.sweeper.lock() = Some(handle);

        cache
    }

    // == Get ==
    /// Returns a copy of the value if the key is present and not expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let value = {
            let entries = self.entries.read();
            entries
                .get(key)
                .filter(|entry| !entry.is_expired_at(now))
                .map(|entry| entry.value.clone())
        };

        match value {
            Some(_) => self.counters.record_hit(),
            None => self.counters.record_miss(),
        }

        value
    }

    // == Set ==
    /// Stores a value using the cache's default TTL.
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    /// Stores a value with an explicit TTL; [`NO_EXPIRATION`] never expires.
    pub fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        let entry = CacheEntry::new(value, ttl);

        let mut entries = self.entries.write();
        self.bump_generation(&key);
        entries.insert(key, entry);
    }

    /// Stores a value with the default TTL unless `key` has been set or
    /// deleted since [`TtlCache::generation`] returned `generation`.
    ///
    /// Returns whether the value was stored. A successful fill does not bump
    /// the generation.
    pub fn set_if_generation(&self, key: impl Into<String>, generation: u64, value: V) -> bool {
        let key = key.into();
        let entry = CacheEntry::new(value, self.default_ttl);

        let mut entries = self.entries.write();
        if self.generation(&key) != generation {
            return false;
        }
        entries.insert(key, entry);
        true
    }

    // == Generation ==
    /// Current write generation of `key`.
    pub fn generation(&self, key: &str) -> u64 {
        self.generations.lock().get(key).copied().unwrap_or(0)
    }

    fn bump_generation(&self, key: &str) {
        let mut generations = self.generations.lock();
        let generation = generations.entry(key.to_string()).or_insert(0);
        *generation = generation.wrapping_add(1);
    }

    // == Delete ==
    /// Removes the key if present; no-op otherwise.
    pub fn delete(&self, key: &str) {
        let mut entries = self.entries.write();
        self.bump_generation(key);
        entries.remove(key);
    }

    // == Clear ==
    /// Replaces the whole entry map with an empty one.
    pub fn clear(&self) {
        *self.entries.write() = HashMap::new();
    }

    // == Delete Expired ==
    /// Removes every expired entry and returns how many were removed.
    pub fn delete_expired(&self) -> usize {
        let now = Instant::now();
        let removed = {
            let mut entries = self.entries.write();
            let before = entries.len();
            entries.retain(|_, entry| !entry.is_expired_at(now));
            before - entries.len()
        };

        self.counters.record_swept(removed);
        removed
    }

    // == Finalize ==
    /// Stops the sweep task and drops every entry.
    ///
    /// Only the first call has an effect.
    pub fn finalize(&self) {
        if self.finalized.swap(true, Ordering::AcqRel) {
            debug!("Cache already finalized");
            return;
        }

        if let Some(handle) = self.sweeper.lock().take() {
            handle.stop();
        }
        self.clear();

        info!("Cache finalized");
    }

    /// Returns true once [`TtlCache::finalize`] has run.
    pub fn is_finalized(&self) -> bool {
        self.finalized.load(Ordering::Acquire)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot(self.len())
    }

    /// Returns the default TTL used by [`TtlCache::set`].
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    // == Length ==
    /// Number of entries physically present, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    // == Is Empty ==
    /// Returns true if the map holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
