//! Global memory shared by all vertex invocations of a job
//!
//! Memory is read-only while vertices execute. The computer advances it
//! between supersteps, so every invocation in one superstep sees the same view.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Job-wide iteration state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    job_id: String,
    iteration: usize,
    #[serde(with = "humantime_serde")]
    runtime: Duration,
}

impl Memory {
    /// Create memory for a fresh job
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            iteration: 0,
            runtime: Duration::ZERO,
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Current superstep number (0-indexed)
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Check if this is the first superstep
    pub fn is_initial_iteration(&self) -> bool {
        self.iteration == 0
    }

    /// Wall time spent in completed supersteps
    pub fn runtime(&self) -> Duration {
        self.runtime
    }

    /// Move to the next superstep, accounting for the time the last one took
    pub(crate) fn advance(&mut self, elapsed: Duration) {
        self.iteration += 1;
        self.runtime = self.runtime.saturating_add(elapsed);
    }

    /// Memory positioned at an arbitrary superstep
    pub fn at_iteration(job_id: impl Into<String>, iteration: usize) -> Self {
        Self {
            iteration,
            ..Self::new(job_id)
        }
    }
}
