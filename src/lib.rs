//! Catalog Harvester: a single-job catalog crawler with a live control plane
//!
//! This crate crawls a paginated catalog site page by page, extracts one batch of
//! records per page, and appends each batch to a SQLite store as it goes. A small
//! HTTP surface lets concurrent callers start the crawl, poll its status, page
//! through the stored records, and clear them.

pub mod config;
pub mod controller;
pub mod crawler;
pub mod query;
pub mod server;
pub mod state;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;

use thiserror::Error;

/// Main error type for startup and serving
#[derive(Debug, Error)]
pub enum HarvesterError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

/// Errors raised while retrieving a page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },
}

impl FetchError {
    /// Returns true if a later attempt at the same URL may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Http { source, .. } => source.is_connect() || source.is_timeout(),
            Self::Status { status, .. } => *status == 429 || *status >= 500,
        }
    }
}

/// Errors raised when a fetched page lacks the expected structure
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Item {index} on {url} has no {field}")]
    MissingField {
        url: String,
        index: usize,
        field: &'static str,
    },

    #[error("Next-page control on {url} has no link")]
    MissingNextLink { url: String },

    #[error("Invalid next-page link '{href}' on {url}: {source}")]
    InvalidNextLink {
        url: String,
        href: String,
        source: ::url::ParseError,
    },
}

/// Any failure that aborts a crawl run
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Persistence failed: {0}")]
    Storage(#[from] storage::StorageError),
}

/// Result type alias for startup and serving
pub type Result<T> = std::result::Result<T, HarvesterError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, StoreLocation};
pub use controller::{JobController, StartOutcome};
pub use crawler::{CrawlEngine, CrawlSummary, HttpFetcher, PageFetcher, RecordExtractor};
pub use query::QueryFacade;
pub use server::AppState;
pub use state::{JobPhase, JobStatus};
pub use storage::{Record, RecordStore, SqliteStore, StorageError};
