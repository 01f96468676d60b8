//! Collection pipeline
//!
//! Runs the fixed list of monitoring queries on each scrape and translates
//! every result row into typed, labeled samples. The query/metric mapping is
//! a declarative table in [`queries`]; [`CollectionPipeline::collect`] is the
//! only place where a failed pass is turned into the error sentinel.

#[macro_use]
mod macros;
mod pipeline;
pub mod queries;
mod sample;

pub use pipeline::{CollectionPipeline, error_sentinel, translate};
pub use queries::{
    COLLECTION_PLAN, ENDPOINT_PERFORMANCE, EXPORTER_ERROR_METRIC, LabelDef, LabelSource, MetricDef,
    PERFORMANCE_SNAPSHOT, QueryBlock, SECURITY_EVENTS, TENANT_ACTIVITY, TOP_ENDPOINTS,
};
pub use sample::{MetricKind, MetricSample};
