//! Storage traits and error types
//!
//! This module defines the trait interface for record store backends and
//! associated error types.

use crate::storage::Record;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Cannot open store at {location}: {source}")]
    Open {
        location: String,
        source: rusqlite::Error,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for record store implementations
///
/// The store is shared between the running crawl (the only appender), the
/// control plane (clearing), and any number of concurrent readers, so every
/// method takes `&self` and implementations synchronize internally.
pub trait RecordStore: Send + Sync {
    /// Ensures the record schema exists; safe to call repeatedly
    fn init(&self) -> StorageResult<()>;

    /// Appends every record in `batch` as one unit
    ///
    /// Either all records are stored or none are. Returns the number written.
    fn append(&self, batch: &[Record]) -> StorageResult<usize>;

    /// Deletes every stored record, returning how many were removed
    fn clear_all(&self) -> StorageResult<u64>;

    /// Reads up to `limit` records in insertion order, skipping `offset`
    fn list(&self, offset: u64, limit: u64) -> StorageResult<Vec<Record>>;

    /// Counts all stored records
    fn count(&self) -> StorageResult<u64>;

    /// Checks that the store is reachable
    fn ping(&self) -> StorageResult<()>;
}
