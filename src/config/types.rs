use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// Main configuration structure for the harvester
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
}

/// HTTP control-plane configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to listen on (all interfaces)
    pub port: u16,

    /// Upper bound applied to the `per_page` query parameter
    #[serde(rename = "max-per-page")]
    pub max_per_page: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            max_per_page: 100,
        }
    }
}

/// Record store configuration
///
/// A full `url` wins over the discrete `directory`/`name` pair.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub directory: String,
    pub name: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            directory: ".".to_string(),
            name: "library_db".to_string(),
        }
    }
}

/// Where the record store lives, resolved once from [`DatabaseConfig`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    Memory,
}

impl fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Memory => write!(f, ":memory:"),
        }
    }
}

impl DatabaseConfig {
    /// Resolves the configured shape into one canonical store location
    ///
    /// Accepted URL forms: `sqlite::memory:`, `:memory:`, `sqlite://<path>`,
    /// `sqlite:<path>`, or a bare filesystem path.
    pub fn location(&self) -> StoreLocation {
        match self.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) => parse_database_url(url),
            None => StoreLocation::File(
                PathBuf::from(&self.directory).join(format!("{}.sqlite3", self.name)),
            ),
        }
    }
}

fn parse_database_url(url: &str) -> StoreLocation {
    if url == ":memory:" || url == "sqlite::memory:" {
        return StoreLocation::Memory;
    }

    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);

    StoreLocation::File(PathBuf::from(path))
}

/// Crawl job configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// First catalog page; every run starts here
    #[serde(rename = "start-url")]
    pub start_url: String,

    /// Expected catalog size, reported to the dashboard for progress display
    #[serde(rename = "total-target")]
    pub total_target: u64,

    /// Extra attempts for a page after a transient fetch failure
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Delay between fetch attempts (milliseconds)
    #[serde(rename = "retry-delay-ms")]
    pub retry_delay_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            start_url: "https://books.toscrape.com/index.html".to_string(),
            total_target: 1000,
            max_retries: 2,
            retry_delay_ms: 1000,
            request_timeout_secs: 30,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "CatalogHarvester".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// CSS selectors used to pull records out of a catalog page
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// One match per record-bearing element
    pub item: String,

    /// Title element, relative to the item
    pub title: String,

    /// Attribute holding the full title; element text is used when absent
    #[serde(rename = "title-attribute")]
    pub title_attribute: Option<String>,

    pub price: String,

    pub availability: String,

    /// Anchor of the "next page" control, relative to the document
    pub next: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            item: "article.product_pod".to_string(),
            title: "h3 a".to_string(),
            title_attribute: Some("title".to_string()),
            price: ".price_color".to_string(),
            availability: ".availability".to_string(),
            next: "li.next a".to_string(),
        }
    }
}
