//! Prometheus metrics module
//!
//! - [`exposition`]: collected samples to text format
//! - [`ExporterMetrics`]: the exporter's own health metrics
//! - [`MetricsRecorder`]: injection seam used by the data source and pipeline

pub mod exposition;
mod registry;
mod traits;

pub use exposition::{CONTENT_TYPE, encode, gather_samples, render};
pub use registry::ExporterMetrics;
pub use traits::{MetricsRecorder, NoopMetrics};
