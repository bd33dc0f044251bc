//! HTTP control plane
//!
//! Thin axum layer over the job controller and the query facade. Handlers never
//! await the crawl; they only read state or flip it through the controller.

mod routes;

pub use routes::{DataParams, StatusMessage};

use crate::config::Config;
use crate::controller::JobController;
use crate::crawler::{CrawlEngine, HttpFetcher, RecordExtractor};
use crate::query::QueryFacade;
use crate::storage::RecordStore;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use url::Url;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub controller: JobController,
    pub query: QueryFacade,
}

impl AppState {
    /// Wires the HTTP fetcher, extractor, engine and controller over `store`
    pub fn from_config(
        config: &Config,
        store: Arc<dyn RecordStore>,
    ) -> crate::Result<Self> {
        let fetcher = HttpFetcher::from_config(&config.crawl, &config.user_agent)?;
        let extractor = RecordExtractor::from_config(&config.extractor)?;
        let start_url = Url::parse(&config.crawl.start_url).map_err(|e| {
            crate::ConfigError::InvalidUrl(format!(
                "Invalid start URL '{}': {}",
                config.crawl.start_url, e
            ))
        })?;

        let engine = CrawlEngine::new(Arc::new(fetcher), Arc::new(extractor), store.clone());
        let query = QueryFacade::new(store.clone(), config.server.max_per_page);
        let controller = JobController::new(
            engine,
            query.clone(),
            store,
            start_url,
            config.crawl.total_target,
        );

        Ok(Self { controller, query })
    }
}

/// Build the Axum application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index_handler))
        .route("/api/data", get(routes::data_handler))
        .route("/api/status", get(routes::status_handler))
        .route("/start", get(routes::start_handler))
        .route("/clear", post(routes::clear_handler))
        .route("/health", get(routes::health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the control plane until Ctrl-C, then waits for an in-flight crawl
pub async fn serve(addr: SocketAddr, state: AppState) -> crate::Result<()> {
    let controller = state.controller.clone();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if controller.is_running() {
        tracing::info!("Waiting for the running crawl to finish");
    }
    controller.join().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
