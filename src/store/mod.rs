//! Embedded Store Module
//!
//! Durable, transactional key-value storage organised into named buckets,
//! backed by an embedded SQLite database.
//!
//! Every bucket is an independent keyspace. Keys iterate in byte order. Read
//! transactions see one consistent snapshot for their whole duration; write
//! transactions are serialized and commit atomically.

mod bucket;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use rusqlite::{Connection, OpenFlags, OptionalExtension, Transaction, TransactionBehavior};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

pub use bucket::{Bucket, BucketMut};

// == Store Error ==
/// Failures raised by the embedded store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The underlying SQLite call failed
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The bucket was never created
    #[error("bucket not found: {0}")]
    MissingBucket(String),

    /// The store has been closed
    #[error("store is closed")]
    Closed,

    /// A stored record could not be encoded or decoded
    #[error("record codec: {0}")]
    Codec(#[from] serde_json::Error),

    /// The database directory could not be prepared
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS buckets (
        name TEXT PRIMARY KEY NOT NULL
    );
    CREATE TABLE IF NOT EXISTS entries (
        bucket TEXT NOT NULL,
        key    TEXT NOT NULL,
        value  BLOB NOT NULL,
        PRIMARY KEY (bucket, key)
    ) WITHOUT ROWID;
";

/// How long a connection waits on a lock held by another one.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Idle read connections kept open between transactions.
const READ_POOL_SIZE: usize = 4;

// == Store ==
/// Handle to the embedded database.
///
/// Writes go through one dedicated connection and are serialized. Each read
/// transaction runs on its own pooled connection, so readers never wait for
/// each other.
pub struct Store {
    /// Path or URI every connection is opened from
    location: PathBuf,
    writer: Mutex<Option<Connection>>,
    readers: Mutex<Vec<Connection>>,
    closed: AtomicBool,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("location", &self.location)
            .field("open", &self.is_open())
            .finish()
    }
}

impl Store {
    // == Constructors ==
    /// Opens (or creates) the database file at `path`.
    ///
    /// The file is switched to WAL mode, so readers keep their snapshot while
    /// a write is in progress.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
            row.get::<_, String>(0)
        })?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        info!("Opened store at {}", path.display());
        Self::with_writer(path.to_path_buf(), conn)
    }

    /// Opens a private in-memory database.
    ///
    /// Connections share it through a uniquely named `memdb` file. It has no
    /// WAL, so a reader arriving during a write waits for the commit.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let location = PathBuf::from(format!("file:/showcase-{}?vfs=memdb", Uuid::new_v4()));
        let conn = Connection::open(&location)?;
        Self::with_writer(location, conn)
    }

    fn with_writer(location: PathBuf, conn: Connection) -> Result<Self, StoreError> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            location,
            writer: Mutex::new(Some(conn)),
            readers: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        })
    }

    // == Read connections ==
    fn checkout_reader(&self) -> Result<Connection, StoreError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        if let Some(conn) = self.readers.lock().pop() {
            return Ok(conn);
        }

        debug!("Opening read connection");
        let conn = Connection::open_with_flags(
            &self.location,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update(None, "query_only", true)?;
        Ok(conn)
    }

    fn checkin_reader(&self, conn: Connection) {
        let mut idle = self.readers.lock();
        if !self.closed.load(Ordering::Acquire) && idle.len() < READ_POOL_SIZE {
            idle.push(conn);
        }
    }

    // == View ==
    /// Runs `f` inside a read transaction.
    ///
    /// The closure sees one snapshot throughout and nothing it does is
    /// persisted.
    pub fn view<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&ReadTx<'_>) -> Result<T, E>,
        E: From<StoreError>,
    {
        let mut conn = self.checkout_reader()?;
        let tx = ReadTx {
            tx: conn
                .transaction_with_behavior(TransactionBehavior::Deferred)
                .map_err(StoreError::from)?,
        };

        let out = f(&tx);
        // Dropping the transaction rolls it back.
        drop(tx);
        self.checkin_reader(conn);
        out
    }

    // == Update ==
    /// Runs `f` inside a write transaction.
    ///
    /// The transaction commits when `f` returns `Ok` and rolls back otherwise.
    /// Any number of writes performed by `f` become visible together.
    pub fn update<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&WriteTx<'_>) -> Result<T, E>,
        E: From<StoreError>,
    {
        self.update_then(f, |_| ())
    }

    /// Like [`Store::update`], then runs `committed` on the result once the
    /// commit succeeded and before the next write transaction can begin.
    ///
    /// `committed` must not call back into the store's write side.
    pub fn update_then<T, E, F, C>(&self, f: F, committed: C) -> Result<T, E>
    where
        F: FnOnce(&WriteTx<'_>) -> Result<T, E>,
        C: FnOnce(&T),
        E: From<StoreError>,
    {
        let mut guard = self.writer.lock();
        let conn = guard.as_mut().ok_or(StoreError::Closed)?;
        let tx = WriteTx {
            tx: conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(StoreError::from)?,
        };

        let out = f(&tx)?;
        tx.tx.commit().map_err(StoreError::from)?;
        committed(&out);
        Ok(out)
    }

    // == Close ==
    /// Closes the database; later operations fail with [`StoreError::Closed`].
    ///
    /// Read transactions already running finish on their own connection,
    /// which is dropped instead of returned to the pool.
    pub fn close(&self) -> Result<(), StoreError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            debug!("Store already closed");
            return Ok(());
        }

        self.readers.lock().clear();
        if let Some(conn) = self.writer.lock().take() {
            conn.close().map_err(|(_, e)| StoreError::Sqlite(e))?;
        }

        info!("Store closed");
        Ok(())
    }

    /// Returns true while the database is open.
    pub fn is_open(&self) -> bool {
        !self.closed.load(Ordering::Acquire)
    }
}

// == Transactions ==
/// Read-only view of the store.
pub struct ReadTx<'conn> {
    tx: Transaction<'conn>,
}

impl ReadTx<'_> {
    /// Opens an existing bucket for reading.
    pub fn bucket<'tx>(&'tx self, name: &'tx str) -> Result<Bucket<'tx>, StoreError> {
        open_bucket(&self.tx, name)
    }
}

/// Read-write view of the store.
pub struct WriteTx<'conn> {
    tx: Transaction<'conn>,
}

impl WriteTx<'_> {
    /// Opens an existing bucket for reading and writing.
    pub fn bucket<'tx>(&'tx self, name: &'tx str) -> Result<BucketMut<'tx>, StoreError> {
        open_bucket(&self.tx, name).map(BucketMut::new)
    }

    /// Creates the bucket unless it already exists.
    pub fn create_bucket_if_not_exists<'tx>(
        &'tx self,
        name: &'tx str,
    ) -> Result<BucketMut<'tx>, StoreError> {
        self.tx.execute(
            "INSERT OR IGNORE INTO buckets (name) VALUES (?1)",
            [name],
        )?;
        Ok(BucketMut::new(Bucket::new(&self.tx, name)))
    }
}

fn bucket_exists(conn: &Connection, name: &str) -> Result<bool, StoreError> {
    let found = conn
        .query_row("SELECT 1 FROM buckets WHERE name = ?1", [name], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

fn open_bucket<'tx>(conn: &'tx Connection, name: &'tx str) -> Result<Bucket<'tx>, StoreError> {
    if bucket_exists(conn, name)? {
        Ok(Bucket::new(conn, name))
    } else {
        Err(StoreError::MissingBucket(name.to_string()))
    }
}
