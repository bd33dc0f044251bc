//! Crawler module for catalog traversal
//!
//! This module contains the core crawling logic, including:
//! - The page fetcher seam and its HTTP implementation (with retry logic)
//! - Record and next-link extraction from fetched documents
//! - The sequential fetch → extract → persist → advance loop

mod engine;
mod extractor;
mod fetcher;

pub use engine::{CrawlEngine, CrawlSummary};
pub use extractor::{ExtractedPage, RecordExtractor};
pub use fetcher::{build_http_client, FetchedPage, HttpFetcher, PageFetcher};
