//! Database schema definitions
//!
//! This module contains the SQL schema for the record store.

/// Name of the append-only record table
pub const RECORDS_TABLE: &str = "scraped_data";

/// SQL schema for the database
///
/// The identity column carries insertion order for paginated reads.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS scraped_data (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    price TEXT NOT NULL,
    availability TEXT NOT NULL
);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
