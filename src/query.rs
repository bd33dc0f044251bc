//! Read-only access to harvested records
//!
//! Reads see whatever is committed when they run; a crawl may be appending at
//! the same time.

use crate::storage::{Record, RecordStore, StorageResult};
use std::sync::Arc;

/// Page size used when the caller gives none or an unusable one
pub const DEFAULT_PER_PAGE: u64 = 20;

/// Paginated record reads over a shared store
#[derive(Clone)]
pub struct QueryFacade {
    store: Arc<dyn RecordStore>,
    max_per_page: u64,
}

impl QueryFacade {
    pub fn new(store: Arc<dyn RecordStore>, max_per_page: u64) -> Self {
        Self {
            store,
            max_per_page: max_per_page.max(1),
        }
    }

    /// Returns page `page` (1-based) of `per_page` records in insertion order
    ///
    /// A page of 0 reads as 1, a `per_page` of 0 reads as the default, and
    /// `per_page` is capped at the configured maximum. Pages past the end are
    /// empty.
    pub fn list(&self, page: u64, per_page: u64) -> StorageResult<Vec<Record>> {
        let (offset, limit) = self.window(page, per_page);
        self.store.list(offset, limit)
    }

    /// Counts every stored record
    pub fn count(&self) -> StorageResult<u64> {
        self.store.count()
    }

    /// Checks that the underlying store answers
    pub fn ping(&self) -> StorageResult<()> {
        self.store.ping()
    }

    fn window(&self, page: u64, per_page: u64) -> (u64, u64) {
        let page = page.max(1);
        let per_page = match per_page {
            0 => DEFAULT_PER_PAGE,
            n => n,
        }
        .min(self.max_per_page);

        ((page - 1).saturating_mul(per_page), per_page)
    }
}
