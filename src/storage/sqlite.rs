//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the RecordStore trait.

use crate::config::StoreLocation;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{RecordStore, StorageError, StorageResult};
use crate::storage::Record;
use rusqlite::{params, Connection};
use std::sync::Mutex;

/// SQLite storage backend
///
/// The connection is opened lazily and reopened on the next operation if it was
/// never established, so a store that is unreachable at startup can recover
/// without restarting the process.
pub struct SqliteStore {
    location: StoreLocation,
    conn: Mutex<Option<Connection>>,
}

impl SqliteStore {
    /// Creates a store for the given location without connecting yet
    pub fn new(location: StoreLocation) -> Self {
        Self {
            location,
            conn: Mutex::new(None),
        }
    }

    /// Creates a private in-memory store
    pub fn in_memory() -> Self {
        Self::new(StoreLocation::Memory)
    }

    /// Returns the location this store reads and writes
    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    fn open_connection(&self) -> StorageResult<Connection> {
        let open_error = |source| StorageError::Open {
            location: self.location.to_string(),
            source,
        };

        let conn = match &self.location {
            StoreLocation::File(path) => {
                let conn = Connection::open(path).map_err(open_error)?;
                conn.execute_batch(
                    "
                    PRAGMA journal_mode = WAL;
                    PRAGMA synchronous = NORMAL;
                ",
                )?;
                conn
            }
            StoreLocation::Memory => Connection::open_in_memory().map_err(open_error)?,
        };

        initialize_schema(&conn)?;
        tracing::debug!("Opened record store at {}", self.location);

        Ok(conn)
    }

    /// Runs `f` against the shared connection, opening it first if needed
    fn with_conn<T, F>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&mut Connection) -> rusqlite::Result<T>,
    {
        let mut guard = self.conn.lock().unwrap_or_else(|poisoned| {
            // A panic mid-operation may leave the connection in any state; reopen it
            tracing::warn!("Record store lock was poisoned, reopening the connection");
            self.conn.clear_poison();
            let mut guard = poisoned.into_inner();
            *guard = None;
            guard
        });

        let mut conn = match guard.take() {
            Some(conn) => conn,
            None => self.open_connection()?,
        };
        let result = f(&mut conn);
        *guard = Some(conn);

        Ok(result?)
    }
}

fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

impl RecordStore for SqliteStore {
    fn init(&self) -> StorageResult<()> {
        self.with_conn(|conn| initialize_schema(conn))
    }

    fn append(&self, batch: &[Record]) -> StorageResult<usize> {
        if batch.is_empty() {
            return Ok(0);
        }

        self.with_conn(|conn| {
            // Dropping an uncommitted transaction rolls it back
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare_cached(
                    "INSERT INTO scraped_data (title, price, availability) VALUES (?1, ?2, ?3)",
                )?;
                for record in batch {
                    stmt.execute(params![record.title, record.price, record.availability])?;
                }
            }
            tx.commit()?;
            Ok(batch.len())
        })
    }

    fn clear_all(&self) -> StorageResult<u64> {
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM scraped_data", [])?;
            Ok(removed as u64)
        })
    }

    fn list(&self, offset: u64, limit: u64) -> StorageResult<Vec<Record>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT title, price, availability FROM scraped_data
                 ORDER BY id ASC LIMIT ?1 OFFSET ?2",
            )?;

            let rows = stmt.query_map(params![to_sql_int(limit), to_sql_int(offset)], |row| {
                Ok(Record {
                    title: row.get(0)?,
                    price: row.get(1)?,
                    availability: row.get(2)?,
                })
            })?;

            let records = rows.collect::<Result<Vec<_>, _>>()?;
            Ok(records)
        })
    }

    fn count(&self) -> StorageResult<u64> {
        self.with_conn(|conn| {
            let count: i64 =
                conn.query_row("SELECT COUNT(*) FROM scraped_data", [], |row| row.get(0))?;
            Ok(count.max(0) as u64)
        })
    }

    fn ping(&self) -> StorageResult<()> {
        self.with_conn(|conn| conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0)))
            .map(|_| ())
    }
}
