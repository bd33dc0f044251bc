//! Shared fixtures for unit tests

use crate::crawler::{FetchedPage, PageFetcher};
use crate::storage::{Record, RecordStore, SqliteStore, StorageError, StorageResult};
use crate::FetchError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;
use url::Url;

/// Renders a catalog page in the reference site's markup
pub fn catalog_page(items: &[(&str, &str, &str)], next: Option<&str>) -> String {
    let mut html = String::from("<html><body><section><ol class=\"row\">");
    for (title, price, availability) in items {
        html.push_str(&format!(
            r#"<li><article class="product_pod">
                <h3><a href="catalogue/book.html" title="{title}">{title}</a></h3>
                <div class="product_price">
                    <p class="price_color">{price}</p>
                    <p class="instock availability"><i class="icon-ok"></i> {availability} </p>
                </div>
            </article></li>"#
        ));
    }
    html.push_str("</ol>");
    if let Some(href) = next {
        html.push_str(&format!(
            r#"<ul class="pager"><li class="current">Page</li><li class="next"><a href="{href}">next</a></li></ul>"#
        ));
    }
    html.push_str("</section></body></html>");
    html
}

/// Serves canned pages by URL and counts calls
///
/// While a gate is installed, every fetch waits for [`StubFetcher::open_gate`].
/// A stepped gate lets exactly one fetch through per opening.
#[derive(Default)]
pub struct StubFetcher {
    pages: HashMap<String, String>,
    calls: AtomicUsize,
    gate: Option<Semaphore>,
    stepped: bool,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, body: String) -> Self {
        self.pages.insert(url.to_string(), body);
        self
    }

    pub fn gated(mut self) -> Self {
        self.gate = Some(Semaphore::new(0));
        self
    }

    pub fn stepped(mut self) -> Self {
        self.stepped = true;
        self.gated()
    }

    pub fn open_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            // Permits return on drop, so one opening lets every fetch through
            if let Ok(permit) = gate.acquire().await {
                if self.stepped {
                    permit.forget();
                }
            }
        }

        match self.pages.get(url.as_str()) {
            Some(body) => Ok(FetchedPage {
                url: url.clone(),
                body: body.clone(),
            }),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

/// Builds a chain of `pages.len()` linked catalog pages under `base`
///
/// Page `n` (1-based) carries `pages[n - 1]` records titled `p<n>-<i>`.
pub fn linked_site(base: &str, pages: &[usize]) -> StubFetcher {
    let mut fetcher = StubFetcher::new();
    for (i, count) in pages.iter().enumerate() {
        let number = i + 1;
        let titles: Vec<String> = (0..*count).map(|j| format!("p{}-{}", number, j)).collect();
        let items: Vec<(&str, &str, &str)> = titles
            .iter()
            .map(|t| (t.as_str(), "£10.00", "In stock"))
            .collect();
        let next = (number < pages.len()).then(|| format!("page-{}.html", number + 1));
        fetcher = fetcher.with_page(
            &format!("{}/page-{}.html", base, number),
            catalog_page(&items, next.as_deref()),
        );
    }
    fetcher
}

/// In-memory store whose N-th append (1-based) fails
pub struct FailingStore {
    inner: SqliteStore,
    fail_on: usize,
    appends: AtomicUsize,
}

impl FailingStore {
    pub fn new(fail_on: usize) -> Self {
        Self {
            inner: SqliteStore::in_memory(),
            fail_on,
            appends: AtomicUsize::new(0),
        }
    }
}

impl RecordStore for FailingStore {
    fn init(&self) -> StorageResult<()> {
        self.inner.init()
    }

    fn append(&self, batch: &[Record]) -> StorageResult<usize> {
        let call = self.appends.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_on {
            return Err(StorageError::Sqlite(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_FULL),
                Some("database or disk is full".to_string()),
            )));
        }
        self.inner.append(batch)
    }

    fn clear_all(&self) -> StorageResult<u64> {
        self.inner.clear_all()
    }

    fn list(&self, offset: u64, limit: u64) -> StorageResult<Vec<Record>> {
        self.inner.list(offset, limit)
    }

    fn count(&self) -> StorageResult<u64> {
        self.inner.count()
    }

    fn ping(&self) -> StorageResult<()> {
        self.inner.ping()
    }
}
