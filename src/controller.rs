//! Job controller - single-flight lifecycle of the crawl job
//!
//! The controller owns the job state and a watch channel mirroring whether a run
//! is active. All phase changes happen under one mutex: the "already running?"
//! check and the move to `Running` are a single critical section, and so are
//! leaving `Running` and recording the outcome.

use crate::crawler::{CrawlEngine, CrawlSummary};
use crate::query::QueryFacade;
use crate::state::{JobState, JobStatus};
use crate::storage::{RecordStore, StorageResult};
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use url::Url;

/// What a call to [`JobController::start`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    AlreadyRunning,
}

/// Cloneable handle to the process-wide crawl job
#[derive(Clone)]
pub struct JobController {
    inner: Arc<Inner>,
}

struct Inner {
    engine: CrawlEngine,
    start_url: Url,
    total_target: u64,
    query: QueryFacade,
    store: Arc<dyn RecordStore>,
    state: Mutex<JobState>,
    /// `true` while a run is active; only written with `state` locked
    running: watch::Sender<bool>,
}

impl JobController {
    pub fn new(
        engine: CrawlEngine,
        query: QueryFacade,
        store: Arc<dyn RecordStore>,
        start_url: Url,
        total_target: u64,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                engine,
                start_url,
                total_target,
                query,
                store,
                state: Mutex::new(JobState::default()),
                running: watch::Sender::new(false),
            }),
        }
    }

    /// Launches a crawl unless one is already in flight
    ///
    /// Never waits for the crawl. Must be called from within a tokio runtime.
    pub fn start(&self) -> StartOutcome {
        let mut state = self.inner.lock_state();
        if !state.try_begin(Utc::now()) {
            tracing::debug!("Start requested while a crawl is running, ignoring");
            return StartOutcome::AlreadyRunning;
        }

        self.inner.running.send_replace(true);
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move { inner.supervise_run().await });
        drop(state);

        tracing::info!("Crawl job started from {}", self.inner.start_url);
        StartOutcome::Started
    }

    /// Snapshot of the job merged with a live record count
    ///
    /// A store that cannot be read reports a count of 0.
    pub fn status(&self) -> JobStatus {
        let current_count = self.inner.query.count().unwrap_or_else(|e| {
            tracing::warn!("Falling back to a zero record count: {}", e);
            0
        });
        let state = self.inner.lock_state().clone();
        JobStatus::compose(&state, self.inner.total_target, current_count)
    }

    /// Deletes every stored record and forgets the last result
    ///
    /// Allowed during a run: the crawl keeps appending to the emptied store.
    pub fn clear(&self) -> StorageResult<u64> {
        let removed = self.inner.store.clear_all()?;
        self.inner.lock_state().reset_result();
        tracing::info!("Cleared {} records", removed);
        Ok(removed)
    }

    pub fn is_running(&self) -> bool {
        self.inner.lock_state().phase.is_running()
    }

    /// Waits until no run is active
    ///
    /// Any number of callers may wait at once; all of them return when the
    /// current run records its outcome.
    pub async fn join(&self) {
        let mut running = self.inner.running.subscribe();
        // The sender lives in `inner`, which `self` keeps alive
        let _ = running.wait_for(|active| !*active).await;
    }
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, JobState> {
        // The state is always left consistent, so a poisoned lock is still usable
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs the engine as a child task and records how it ended
    async fn supervise_run(self: Arc<Self>) {
        let engine = self.engine.clone();
        let start_url = self.start_url.clone();

        let outcome: Result<CrawlSummary, String> =
            match tokio::spawn(async move { engine.run(start_url).await }).await {
                Ok(Ok(summary)) => Ok(summary),
                Ok(Err(e)) => Err(e.to_string()),
                Err(e) if e.is_panic() => Err("crawl task panicked".to_string()),
                Err(_) => Err("crawl task was cancelled".to_string()),
            };

        match &outcome {
            Ok(summary) => tracing::info!(
                "Crawl job finished: {} pages, {} records",
                summary.pages_crawled,
                summary.records_saved
            ),
            Err(reason) => tracing::error!("Crawl job failed: {}", reason),
        }

        let mut state = self.lock_state();
        state.complete(outcome, Utc::now());
        self.running.send_replace(false);
        tracing::debug!("Crawl job is now {}", state.phase);
    }
}
