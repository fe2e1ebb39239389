//! Cache-aside data access layer
//!
//! [`CachedDatabase`] fronts the embedded [`Store`] with the shared
//! [`TtlCache`]. Reads check the cache first and fill it from the store on a
//! miss. Writes go to the store first; the cache is only touched after the
//! write transaction has committed, so it never holds a value the store does
//! not.
//!
//! A fill is tagged with the key's write generation taken before the store
//! read. If a writer updates or invalidates the key in the meantime, the fill
//! is dropped instead of overwriting the newer state with what the reader saw.
//!
//! Store I/O never happens while a cache lock is held. Cache updates for a
//! write run after its commit but before the next write transaction starts.

mod common;
mod content;
pub mod keys;
mod projects;
mod setup;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};

use crate::cache::TtlCache;
use crate::error::{AppError, Result};
use crate::store::{BucketMut, Store, StoreError};

pub use keys::{CacheKey, Cacheable, CachedRecord};
pub use setup::DEFAULT_THEME;

/// Cache shared by every record kind.
pub type RecordCache = TtlCache<CachedRecord>;

/// Bucket names in the store.
pub mod buckets {
    /// Singleton records: user, menu, configuration and credentials
    pub const COMMON: &str = "common";
    pub const PROJECTS: &str = "projects";
    pub const CONTENT: &str = "content";
    pub const ROUTES: &str = "routes";
    pub const THEMES: &str = "themes";

    pub const ALL: [&str; 5] = [COMMON, PROJECTS, CONTENT, ROUTES, THEMES];
}

// == Cached Database ==
#[derive(Debug, Clone)]
pub struct CachedDatabase {
    store: Arc<Store>,
    cache: Arc<RecordCache>,
}

impl CachedDatabase {
    pub fn new(store: Arc<Store>, cache: Arc<RecordCache>) -> Self {
        Self { store, cache }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn cache(&self) -> &Arc<RecordCache> {
        &self.cache
    }

    // == Read helpers ==
    /// Cache-aside read of a single record stored under `bucket/id`.
    fn load<T>(&self, key: &CacheKey<T>, bucket: &'static str, id: &str) -> Result<T>
    where
        T: Cacheable + DeserializeOwned + Clone,
    {
        if let Some(value) = self.cache.get_record(key) {
            return Ok(value);
        }

        let generation = self.cache.record_generation(key);
        let raw = self
            .store
            .view(|tx| tx.bucket(bucket)?.get(id))
            .map_err(|e| storage_error("get", bucket, id, e))?
            .ok_or_else(|| not_found(bucket, id))?;

        let value: T = serde_json::from_slice(&raw)
            .map_err(|e| storage_error("decode", bucket, id, e.into()))?;

        self.fill(key, generation, value.clone());
        Ok(value)
    }

    /// Reads every record of `bucket` in key order.
    ///
    /// One undecodable entry fails the whole read.
    fn load_all<T: DeserializeOwned>(&self, bucket: &'static str) -> Result<Vec<(String, T)>> {
        self.store
            .view(|tx| {
                tx.bucket(bucket)?
                    .entries()?
                    .into_iter()
                    .map(|(id, raw)| -> std::result::Result<(String, T), StoreError> {
                        let value = serde_json::from_slice(&raw)?;
                        Ok((id, value))
                    })
                    .collect()
            })
            .map_err(|e| storage_error("list", bucket, "*", e))
    }

    /// Cache-aside read of a whole bucket.
    ///
    /// Only non-empty results are cached, so a bucket read before it was
    /// seeded is not remembered as empty.
    fn load_collection<C>(&self, key: &CacheKey<C>, bucket: &'static str) -> Result<C>
    where
        C: Cacheable + Collection + Clone,
        C::Item: DeserializeOwned,
    {
        if let Some(value) = self.cache.get_record(key) {
            return Ok(value);
        }

        let generation = self.cache.record_generation(key);
        let collection = C::from_entries(self.load_all(bucket)?);
        if !collection.is_empty() {
            self.fill(key, generation, collection.clone());
        }
        Ok(collection)
    }

    fn fill<T: Cacheable>(&self, key: &CacheKey<T>, generation: u64, value: T) {
        if !self.cache.fill_record(key, generation, value) {
            debug!(key = key.as_str(), "Key written during read, fill dropped");
        }
    }

    // == Write helpers ==
    // `cached` runs after a successful commit while writes are still
    // serialized, so cache updates land in commit order.

    /// Writes `value` under `bucket/id` in its own transaction.
    fn save<T: Serialize>(
        &self,
        op: &'static str,
        bucket: &'static str,
        id: &str,
        value: &T,
        cached: impl FnOnce(),
    ) -> Result<()> {
        self.store
            .update_then(|tx| put_json(&tx.bucket(bucket)?, id, value), |_| cached())
            .map_err(|e| storage_error(op, bucket, id, e))
    }

    /// Writes `value` under `bucket/id` only if the key is free.
    fn insert_new<T: Serialize>(
        &self,
        op: &'static str,
        bucket: &'static str,
        id: &str,
        value: &T,
        cached: impl FnOnce(),
    ) -> Result<bool> {
        self.store
            .update_then(
                |tx| {
                    let raw = serde_json::to_vec(value)?;
                    tx.bucket(bucket)?.insert_new(id, &raw)
                },
                |inserted| {
                    if *inserted {
                        cached()
                    }
                },
            )
            .map_err(|e| storage_error(op, bucket, id, e))
    }

    /// Removes `bucket/id`. Returns false if it was not there.
    fn remove(
        &self,
        op: &'static str,
        bucket: &'static str,
        id: &str,
        cached: impl FnOnce(),
    ) -> Result<bool> {
        self.store
            .update_then(|tx| tx.bucket(bucket)?.delete(id), |_| cached())
            .map_err(|e| storage_error(op, bucket, id, e))
    }

    /// Read-modify-write of one record inside a single write transaction.
    ///
    /// `edit` returns whether it changed the record; unchanged records are
    /// neither written back nor re-cached. An error from `edit` aborts
    /// without writing.
    fn modify<T, F>(
        &self,
        op: &'static str,
        key: &CacheKey<T>,
        bucket: &'static str,
        id: &str,
        edit: F,
    ) -> Result<T>
    where
        T: Cacheable + Serialize + DeserializeOwned + Clone,
        F: FnOnce(&mut T) -> Result<bool>,
    {
        let outcome = self
            .store
            .update_then(
                |tx| -> std::result::Result<Result<(T, bool)>, StoreError> {
                    let records = tx.bucket(bucket)?;
                    let Some(raw) = records.get(id)? else {
                        return Ok(Err(not_found(bucket, id)));
                    };

                    let mut record: T = serde_json::from_slice(&raw)?;
                    match edit(&mut record) {
                        Ok(true) => {
                            put_json(&records, id, &record)?;
                            Ok(Ok((record, true)))
                        }
                        Ok(false) => Ok(Ok((record, false))),
                        Err(e) => Ok(Err(e)),
                    }
                },
                |outcome| {
                    if let Ok((record, true)) = outcome {
                        self.cache.set_record(key, record.clone());
                    }
                },
            )
            .map_err(|e| storage_error(op, bucket, id, e))?;

        let (record, _) = outcome?;
        Ok(record)
    }
}

// == Collections ==
/// Bucket-wide results that are cached as a unit.
trait Collection {
    type Item;

    fn from_entries(entries: Vec<(String, Self::Item)>) -> Self;
    fn is_empty(&self) -> bool;
}

/// Values in key order.
impl<T> Collection for Vec<T> {
    type Item = T;

    fn from_entries(entries: Vec<(String, T)>) -> Self {
        entries.into_iter().map(|(_, value)| value).collect()
    }

    fn is_empty(&self) -> bool {
        <[T]>::is_empty(self)
    }
}

/// Keyed by the bucket key.
impl<T> Collection for BTreeMap<String, T> {
    type Item = T;

    fn from_entries(entries: Vec<(String, T)>) -> Self {
        entries.into_iter().collect()
    }

    fn is_empty(&self) -> bool {
        BTreeMap::is_empty(self)
    }
}

fn put_json<T: Serialize>(
    bucket: &BucketMut<'_>,
    id: &str,
    value: &T,
) -> std::result::Result<(), StoreError> {
    let raw = serde_json::to_vec(value)?;
    bucket.put(id, &raw)
}

/// Logs a store failure once, where it happened, and wraps it.
fn storage_error(op: &'static str, bucket: &str, key: &str, err: StoreError) -> AppError {
    error!(op, bucket, key, error = %err, "Storage operation failed");
    AppError::Storage(err)
}

fn not_found(bucket: &str, id: &str) -> AppError {
    debug!(bucket, key = id, "Record not found");
    AppError::NotFound(format!("No record '{}' in {}", id, bucket))
}

fn require_slug(kind: &str, slug: &str) -> Result<()> {
    if slug.trim().is_empty() {
        return Err(AppError::Validation(format!("{} has no slug", kind)));
    }
    Ok(())
}
