//! Exporter self-metrics
//!
//! Health of the exporter itself, rendered after the collected samples.

use prometheus::proto::MetricFamily;
use prometheus::{CounterVec, Gauge, Opts, Registry};

use super::MetricsRecorder;
use crate::errors::Result;

/// Exporter metrics container
pub struct ExporterMetrics {
    /// Internal Prometheus registry
    registry: Registry,

    /// Duration of the last collection pass
    pub scrape_duration_seconds: Gauge,
    /// Collection passes by outcome (success, error)
    pub scrapes_total: CounterVec,
    /// Query retries by query name
    pub query_retries_total: CounterVec,
    /// Exporter uptime in seconds
    pub uptime_seconds: Gauge,
}

impl ExporterMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let scrape_duration_seconds = Gauge::new(
            "hrms_exporter_scrape_duration_seconds",
            "Duration of the last metrics collection pass in seconds",
        )?;

        let scrapes_total = CounterVec::new(
            Opts::new(
                "hrms_exporter_scrapes_total",
                "Total number of collection passes by outcome",
            ),
            &["outcome"],
        )?;

        let query_retries_total = CounterVec::new(
            Opts::new(
                "hrms_exporter_query_retries_total",
                "Total number of retried monitoring queries",
            ),
            &["query"],
        )?;

        let uptime_seconds = Gauge::new(
            "hrms_exporter_uptime_seconds",
            "Exporter uptime in seconds",
        )?;

        registry.register(Box::new(scrape_duration_seconds.clone()))?;
        registry.register(Box::new(scrapes_total.clone()))?;
        registry.register(Box::new(query_retries_total.clone()))?;
        registry.register(Box::new(uptime_seconds.clone()))?;

        Ok(Self {
            registry,
            scrape_duration_seconds,
            scrapes_total,
            query_retries_total,
            uptime_seconds,
        })
    }

    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }
}

impl MetricsRecorder for ExporterMetrics {
    fn inc_query_retry(&self, query: &str) {
        self.query_retries_total.with_label_values(&[query]).inc();
    }

    fn observe_scrape(&self, outcome: &str, duration_secs: f64) {
        self.scrapes_total.with_label_values(&[outcome]).inc();
        self.scrape_duration_seconds.set(duration_secs);
    }
}
