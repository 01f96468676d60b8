//! MetricsRecorder trait for dependency injection
//!
//! Lets the data source and the pipeline report retries and pass outcomes
//! without knowing about the Prometheus registry. Tests use [`NoopMetrics`].

use std::sync::Arc;

/// Trait for recording exporter self-metrics.
///
/// All methods are no-op by default, allowing partial implementation.
/// Implementations must be thread-safe (Send + Sync).
#[allow(unused_variables)]
pub trait MetricsRecorder: Send + Sync {
    /// A query attempt failed and is about to be retried
    fn inc_query_retry(&self, query: &str) {}

    /// A collection pass finished with `outcome` ("success" or "error")
    fn observe_scrape(&self, outcome: &str, duration_secs: f64) {}
}

/// Noop metrics implementation for testing.
pub struct NoopMetrics;

impl MetricsRecorder for NoopMetrics {}

impl NoopMetrics {
    pub fn new() -> Self {
        Self
    }

    pub fn arc() -> Arc<dyn MetricsRecorder> {
        Arc::new(Self::new())
    }
}

impl Default for NoopMetrics {
    fn default() -> Self {
        Self::new()
    }
}
