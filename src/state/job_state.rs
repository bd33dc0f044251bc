/// Job state definitions for the crawl lifecycle
///
/// This module defines the phases a crawl job moves through and the status
/// snapshot reported to the control plane.
use crate::crawler::CrawlSummary;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Where the job currently is in its lifecycle
///
/// `Idle → Running → {Finished, Failed}`; clearing moves a terminal phase back
/// to `Idle`. There is no final phase, the job can be started again at any time
/// it is not running.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum JobPhase {
    /// No run yet, or the last result was cleared
    #[default]
    Idle,

    /// A crawl is in flight
    Running,

    /// The last run reached the final page
    Finished,

    /// The last run stopped on an error
    Failed(String),
}

impl JobPhase {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// Returns true if this phase reports the outcome of a completed run
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Failed(_))
    }

    /// Wire form of the last result: `""`, `"finished"` or `"error: <reason>"`
    pub fn last_result(&self) -> String {
        match self {
            Self::Idle | Self::Running => String::new(),
            Self::Finished => "finished".to_string(),
            Self::Failed(reason) => format!("error: {}", reason),
        }
    }
}

impl fmt::Display for JobPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Finished => write!(f, "finished"),
            Self::Failed(reason) => write!(f, "failed ({})", reason),
        }
    }
}

/// The single mutable job record owned by the controller
#[derive(Debug, Clone, Default)]
pub struct JobState {
    pub phase: JobPhase,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub last_summary: Option<CrawlSummary>,
}

impl JobState {
    /// Moves to `Running` unless a run is already active
    ///
    /// Returns false, changing nothing, when already running.
    pub fn try_begin(&mut self, now: DateTime<Utc>) -> bool {
        if self.phase.is_running() {
            return false;
        }

        self.phase = JobPhase::Running;
        self.started_at = Some(now);
        self.finished_at = None;
        self.last_summary = None;
        true
    }

    /// Records the outcome of the active run and leaves `Running`
    ///
    /// Phase and outcome change together, so no reader sees a terminal result
    /// while the run is still marked active.
    pub fn complete(&mut self, outcome: Result<CrawlSummary, String>, now: DateTime<Utc>) {
        self.finished_at = Some(now);
        match outcome {
            Ok(summary) => {
                self.phase = JobPhase::Finished;
                self.last_summary = Some(summary);
            }
            Err(reason) => {
                self.phase = JobPhase::Failed(reason);
            }
        }
    }

    /// Forgets the last result; an active run is left alone
    pub fn reset_result(&mut self) {
        if self.phase.is_terminal() {
            self.phase = JobPhase::Idle;
            self.last_summary = None;
        }
    }
}

/// Status snapshot served at `/api/status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobStatus {
    pub is_running: bool,
    pub last_result: String,
    pub total_target: u64,
    pub current_count: u64,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub pages_crawled: u64,
    pub records_saved: u64,
}

impl JobStatus {
    /// Composes the job state with a separately read record count
    pub fn compose(state: &JobState, total_target: u64, current_count: u64) -> Self {
        let summary = state.last_summary.unwrap_or_default();
        Self {
            is_running: state.phase.is_running(),
            last_result: state.phase.last_result(),
            total_target,
            current_count,
            started_at: state.started_at,
            finished_at: state.finished_at,
            pages_crawled: summary.pages_crawled,
            records_saved: summary.records_saved,
        }
    }
}
