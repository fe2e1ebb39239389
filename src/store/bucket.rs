//! Bucket handles scoped to a transaction.

use rusqlite::{params, Connection, OptionalExtension};

use super::StoreError;

/// Read access to one bucket inside a transaction.
#[derive(Clone, Copy)]
pub struct Bucket<'tx> {
    conn: &'tx Connection,
    name: &'tx str,
}

impl<'tx> Bucket<'tx> {
    pub(super) fn new(conn: &'tx Connection, name: &'tx str) -> Self {
        Self { conn, name }
    }

    /// Returns the raw value stored under `key`.
    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let value = self
            .conn
            .prepare_cached("SELECT value FROM entries WHERE bucket = ?1 AND key = ?2")?
            .query_row(params![self.name, key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    /// All entries of the bucket in ascending key order.
    pub fn entries(&self) -> Result<Vec<(String, Vec<u8>)>, StoreError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT key, value FROM entries WHERE bucket = ?1 ORDER BY key")?;
        let rows = stmt.query_map([self.name], |row| Ok((row.get(0)?, row.get(1)?)))?;
        let entries: Vec<(String, Vec<u8>)> = rows.collect::<Result<_, _>>()?;
        Ok(entries)
    }
}

/// Read-write access to one bucket inside a write transaction.
#[derive(Clone, Copy)]
pub struct BucketMut<'tx> {
    inner: Bucket<'tx>,
}

impl<'tx> BucketMut<'tx> {
    pub(super) fn new(inner: Bucket<'tx>) -> Self {
        Self { inner }
    }

    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.inner.get(key)
    }

    /// Inserts or overwrites `key`.
    pub fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.inner
            .conn
            .prepare_cached(
                "INSERT INTO entries (bucket, key, value) VALUES (?1, ?2, ?3)
                 ON CONFLICT (bucket, key) DO UPDATE SET value = excluded.value",
            )?
            .execute(params![self.inner.name, key, value])?;
        Ok(())
    }

    /// Inserts `key` only if it is absent. Returns false when the key was taken.
    pub fn insert_new(&self, key: &str, value: &[u8]) -> Result<bool, StoreError> {
        let inserted = self
            .inner
            .conn
            .prepare_cached("INSERT OR IGNORE INTO entries (bucket, key, value) VALUES (?1, ?2, ?3)")?
            .execute(params![self.inner.name, key, value])?;
        Ok(inserted == 1)
    }

    /// Removes every entry, keeping the bucket itself.
    pub fn clear(&self) -> Result<usize, StoreError> {
        let removed = self
            .inner
            .conn
            .prepare_cached("DELETE FROM entries WHERE bucket = ?1")?
            .execute([self.inner.name])?;
        Ok(removed)
    }

    /// Removes `key`. Returns true if it was present.
    pub fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let removed = self
            .inner
            .conn
            .prepare_cached("DELETE FROM entries WHERE bucket = ?1 AND key = ?2")?
            .execute(params![self.inner.name, key])?;
        Ok(removed > 0)
    }
}
