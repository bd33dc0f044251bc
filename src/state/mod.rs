//! State module for tracking the crawl job
//!
//! # Components
//!
//! - `JobPhase`: Tagged lifecycle phase (idle, running, finished, failed)
//! - `JobState`: The controller-owned record of the current or last run
//! - `JobStatus`: The serialized snapshot merged with a live record count

mod job_state;

// Re-export main types
pub use job_state::{JobPhase, JobState, JobStatus};
