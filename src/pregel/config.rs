//! Graph computer configuration
//!
//! Configuration for the local computer including worker count,
//! parallelism, and timeouts.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Local graph computer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputerConfig {
    /// Maximum supersteps before forced termination
    pub max_supersteps: usize,

    /// Number of worker partitions, each with its own program replica
    pub workers: usize,

    /// Maximum concurrent vertex invocations
    pub parallelism: usize,

    /// Timeout for an individual vertex invocation
    #[serde(with = "humantime_serde")]
    pub vertex_timeout: Duration,

    /// Timeout for the entire job
    #[serde(with = "humantime_serde")]
    pub job_timeout: Duration,

    /// Enable per-vertex tracing
    pub tracing_enabled: bool,
}

impl Default for ComputerConfig {
    fn default() -> Self {
        Self {
            max_supersteps: 100,
            workers: num_cpus::get(),
            parallelism: num_cpus::get(),
            vertex_timeout: Duration::from_secs(60),
            job_timeout: Duration::from_secs(3600), // 1 hour total
            tracing_enabled: true,
        }
    }
}

impl ComputerConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum supersteps
    pub fn with_max_supersteps(mut self, max: usize) -> Self {
        self.max_supersteps = max;
        self
    }

    /// Set worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Set parallelism level
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism.max(1);
        self
    }

    /// Set vertex timeout
    pub fn with_vertex_timeout(mut self, timeout: Duration) -> Self {
        self.vertex_timeout = timeout;
        self
    }

    /// Set job timeout
    pub fn with_job_timeout(mut self, timeout: Duration) -> Self {
        self.job_timeout = timeout;
        self
    }

    /// Enable or disable tracing
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.tracing_enabled = enabled;
        self
    }
}
