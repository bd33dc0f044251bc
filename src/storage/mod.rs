//! Storage module for persisting harvested records
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - All-or-nothing batch appends from the crawl engine
//! - Ordered, offset-paginated reads for the query facade
//! - Wholesale clearing of the record table

mod schema;
mod sqlite;
mod traits;

pub use schema::{initialize_schema, RECORDS_TABLE};
pub use sqlite::SqliteStore;
pub use traits::{RecordStore, StorageError, StorageResult};

use serde::{Deserialize, Serialize};

/// One catalog entry as displayed on the source page
///
/// Values are kept as display text: the price retains its currency symbol and
/// the availability its original wording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub title: String,
    pub price: String,
    pub availability: String,
}

impl Record {
    pub fn new(
        title: impl Into<String>,
        price: impl Into<String>,
        availability: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            price: price.into(),
            availability: availability.into(),
        }
    }
}
