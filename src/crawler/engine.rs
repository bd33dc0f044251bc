//! Crawl engine - the page-by-page traversal loop
//!
//! One run walks the catalog's pagination chain from the start URL:
//! fetch a page, extract its records, append them as one batch, then follow the
//! "next" link. Pages are strictly sequential; page N is stored before page N+1
//! is requested.

use crate::crawler::{PageFetcher, RecordExtractor};
use crate::storage::RecordStore;
use crate::CrawlError;
use serde::Serialize;
use std::sync::Arc;
use url::Url;

/// Totals of a successful run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrawlSummary {
    pub pages_crawled: u64,
    pub records_saved: u64,
}

/// Drives fetch → extract → persist → advance until the last page
#[derive(Clone)]
pub struct CrawlEngine {
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<RecordExtractor>,
    store: Arc<dyn RecordStore>,
}

impl CrawlEngine {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        extractor: Arc<RecordExtractor>,
        store: Arc<dyn RecordStore>,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            store,
        }
    }

    /// Crawls from `start_url` until a page has no next-page control
    ///
    /// The pagination chain is assumed to be acyclic; there is no revisit check
    /// and no page limit. Any fetch, extraction, or store error aborts the run,
    /// leaving the batches of earlier pages in place.
    pub async fn run(&self, start_url: Url) -> Result<CrawlSummary, CrawlError> {
        tracing::info!("Starting crawl at {}", start_url);

        let mut summary = CrawlSummary::default();
        let start_time = std::time::Instant::now();
        let mut current = start_url;

        loop {
            let page = self.fetcher.fetch(&current).await?;
            let extracted = self.extractor.extract(&page)?;

            if !extracted.records.is_empty() {
                let written = self.store.append(&extracted.records)?;
                summary.records_saved += written as u64;
            }
            summary.pages_crawled += 1;

            tracing::info!(
                "Page {} ({}): saved {} records, {} total",
                summary.pages_crawled,
                page.url,
                extracted.records.len(),
                summary.records_saved
            );

            match extracted.next_page {
                Some(next) => current = next,
                None => {
                    tracing::debug!("No next-page control on {}", page.url);
                    break;
                }
            }
        }

        tracing::info!(
            "Crawl completed: {} pages, {} records in {:?}",
            summary.pages_crawled,
            summary.records_saved,
            start_time.elapsed()
        );

        Ok(summary)
    }
}
