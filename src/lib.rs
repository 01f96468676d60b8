//! HRMS exporter - PostgreSQL monitoring schema to Prometheus
//!
//! On every scrape the exporter runs a fixed list of read-only queries
//! against the `monitoring` schema and republishes the rows as gauges and
//! counters.
//!
//! # Architecture
//! - `source`: single-connection data source with reconnect and bounded retry
//! - `collector`: declarative query/metric table and the collection pass
//! - `metrics`: exposition rendering and exporter self-metrics
//! - `api`: HTTP handlers
//! - `config`: static configuration and command-line arguments
//! - `runtime`: startup, serving and shutdown
//! - `system`: logging

pub mod api;
pub mod collector;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod runtime;
pub mod source;
pub mod system;
