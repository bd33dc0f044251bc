//! Integration tests for the harvester
//!
//! These tests use wiremock to serve a small paginated catalog and run the full
//! crawl through the real HTTP fetcher into a file-backed SQLite store.

use catalog_harvester::config::{Config, StoreLocation};
use catalog_harvester::server::AppState;
use catalog_harvester::storage::{RecordStore, SqliteStore};
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Renders one catalog page with the given books and optional next link
fn catalog_page(books: &[(&str, &str)], next: Option<&str>) -> String {
    let mut html = String::from("<html><body><ol class=\"row\">");
    for (title, price) in books {
        html.push_str(&format!(
            r#"<li><article class="product_pod">
                <h3><a href="book.html" title="{title}">{title}</a></h3>
                <p class="price_color">{price}</p>
                <p class="instock availability">
                    In stock
                </p>
            </article></li>"#
        ));
    }
    html.push_str("</ol>");
    if let Some(href) = next {
        html.push_str(&format!(
            r#"<ul class="pager"><li class="next"><a href="{href}">next</a></li></ul>"#
        ));
    }
    html.push_str("</body></html>");
    html
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Three linked pages holding 2, 1 and 2 books
async fn three_page_catalog() -> MockServer {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/catalogue/page-1.html",
        catalog_page(
            &[("A Light in the Attic", "£51.77"), ("Tipping the Velvet", "£53.74")],
            Some("page-2.html"),
        ),
    )
    .await;
    mount_page(
        &server,
        "/catalogue/page-2.html",
        catalog_page(&[("Soumission", "£50.10")], Some("page-3.html")),
    )
    .await;
    mount_page(
        &server,
        "/catalogue/page-3.html",
        catalog_page(
            &[("Sharp Objects", "£47.82"), ("Sapiens", "£54.23")],
            None,
        ),
    )
    .await;
    server
}

fn test_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.crawl.start_url = format!("{}/catalogue/page-1.html", server.uri());
    config.crawl.max_retries = 0;
    config.crawl.retry_delay_ms = 10;
    config.crawl.request_timeout_secs = 5;
    config
}

fn file_store(dir: &TempDir) -> Arc<SqliteStore> {
    let store = SqliteStore::new(StoreLocation::File(dir.path().join("library_db.sqlite3")));
    store.init().expect("Failed to initialize store");
    Arc::new(store)
}

#[tokio::test]
async fn test_full_crawl_over_http() {
    let server = three_page_catalog().await;
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = file_store(&dir);

    let state = AppState::from_config(&test_config(&server), store.clone())
        .expect("Failed to build app state");

    state.controller.start();
    state.controller.join().await;

    let status = state.controller.status();
    assert!(!status.is_running);
    assert_eq!(status.last_result, "finished");
    assert_eq!(status.current_count, 5);
    assert_eq!(status.pages_crawled, 3);

    let titles: Vec<String> = state
        .query
        .list(1, 20)
        .expect("Failed to list records")
        .into_iter()
        .map(|r| r.title)
        .collect();
    assert_eq!(
        titles,
        vec![
            "A Light in the Attic",
            "Tipping the Velvet",
            "Soumission",
            "Sharp Objects",
            "Sapiens"
        ]
    );
    assert!(state.query.list(2, 20).unwrap().is_empty());

    let first = &state.query.list(1, 1).unwrap()[0];
    assert_eq!(first.price, "£51.77");
    assert_eq!(first.availability, "In stock");
}

#[tokio::test]
async fn test_records_persist_across_store_reopen() {
    let server = three_page_catalog().await;
    let dir = TempDir::new().expect("Failed to create temp dir");

    {
        let state = AppState::from_config(&test_config(&server), file_store(&dir)).unwrap();
        state.controller.start();
        state.controller.join().await;
    }

    let reopened = file_store(&dir);
    assert_eq!(reopened.count().unwrap(), 5);
}

#[tokio::test]
async fn test_broken_link_fails_after_saving_earlier_pages() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/catalogue/page-1.html",
        catalog_page(&[("Only Book", "£10.00")], Some("page-2.html")),
    )
    .await;
    // page-2.html is not mounted; wiremock answers 404

    let dir = TempDir::new().unwrap();
    let state = AppState::from_config(&test_config(&server), file_store(&dir)).unwrap();

    state.controller.start();
    state.controller.join().await;

    let status = state.controller.status();
    assert!(status.last_result.starts_with("error: "));
    assert!(status.last_result.contains("404"));
    assert_eq!(status.current_count, 1);
}

#[tokio::test]
async fn test_clear_then_recrawl() {
    let server = three_page_catalog().await;
    let dir = TempDir::new().unwrap();
    let state = AppState::from_config(&test_config(&server), file_store(&dir)).unwrap();

    state.controller.start();
    state.controller.join().await;
    assert_eq!(state.controller.clear().unwrap(), 5);
    assert_eq!(state.controller.status().last_result, "");

    state.controller.start();
    state.controller.join().await;
    assert_eq!(state.controller.status().current_count, 5);
}
