//! Record extraction from catalog pages
//!
//! This module turns a fetched document into:
//! - The batch of records on the page, in document order
//! - The absolute URL of the next page, if the page has a "next" control

use crate::config::ExtractorConfig;
use crate::crawler::FetchedPage;
use crate::storage::Record;
use crate::{ConfigError, ExtractionError};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Everything the crawl engine needs from one page
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedPage {
    pub records: Vec<Record>,
    pub next_page: Option<Url>,
}

/// Compiled selectors for one catalog layout
#[derive(Debug, Clone)]
pub struct RecordExtractor {
    item: Selector,
    title: Selector,
    title_attribute: Option<String>,
    price: Selector,
    availability: Selector,
    next: Selector,
}

fn compile(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

/// Collects an element's text with runs of whitespace collapsed to one space
fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

impl RecordExtractor {
    /// Compiles the configured selectors
    pub fn from_config(config: &ExtractorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            item: compile(&config.item)?,
            title: compile(&config.title)?,
            title_attribute: config.title_attribute.clone(),
            price: compile(&config.price)?,
            availability: compile(&config.availability)?,
            next: compile(&config.next)?,
        })
    }

    /// Extracts the records and next-page link from a fetched page
    ///
    /// # Extraction Rules
    ///
    /// - Records come out in top-to-bottom document order
    /// - Every record needs a non-empty title, price and availability; one
    ///   missing field fails the whole page
    /// - The first "next" control wins; its `href` is resolved against the
    ///   page URL
    pub fn extract(&self, page: &FetchedPage) -> Result<ExtractedPage, ExtractionError> {
        let document = Html::parse_document(&page.body);

        let records = document
            .select(&self.item)
            .enumerate()
            .map(|(index, item)| self.extract_record(&page.url, index, item))
            .collect::<Result<Vec<_>, _>>()?;

        let next_page = self.extract_next_link(&document, &page.url)?;

        Ok(ExtractedPage { records, next_page })
    }

    fn extract_record(
        &self,
        url: &Url,
        index: usize,
        item: ElementRef<'_>,
    ) -> Result<Record, ExtractionError> {
        let missing = |field| ExtractionError::MissingField {
            url: url.to_string(),
            index,
            field,
        };

        let title = item
            .select(&self.title)
            .next()
            .map(|element| {
                self.title_attribute
                    .as_deref()
                    .and_then(|attr| element.value().attr(attr))
                    .map(|value| value.trim().to_string())
                    .filter(|value| !value.is_empty())
                    .unwrap_or_else(|| element_text(&element))
            })
            .filter(|title| !title.is_empty())
            .ok_or_else(|| missing("title"))?;

        let price = self
            .first_text(&item, &self.price)
            .ok_or_else(|| missing("price"))?;

        let availability = self
            .first_text(&item, &self.availability)
            .ok_or_else(|| missing("availability"))?;

        Ok(Record {
            title,
            price,
            availability,
        })
    }

    fn first_text(&self, item: &ElementRef<'_>, selector: &Selector) -> Option<String> {
        item.select(selector)
            .next()
            .map(|element| element_text(&element))
            .filter(|text| !text.is_empty())
    }

    fn extract_next_link(
        &self,
        document: &Html,
        base_url: &Url,
    ) -> Result<Option<Url>, ExtractionError> {
        let Some(control) = document.select(&self.next).next() else {
            return Ok(None);
        };

        let href = control
            .value()
            .attr("href")
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .ok_or_else(|| ExtractionError::MissingNextLink {
                url: base_url.to_string(),
            })?;

        base_url
            .join(href)
            .map(Some)
            .map_err(|source| ExtractionError::InvalidNextLink {
                url: base_url.to_string(),
                href: href.to_string(),
                source,
            })
    }
}
