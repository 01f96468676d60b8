use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

use super::queries::{COLLECTION_PLAN, EXPORTER_ERROR_HELP, EXPORTER_ERROR_METRIC};
use super::{LabelSource, MetricKind, MetricSample, QueryBlock};
use crate::errors::Result;
use crate::metrics::MetricsRecorder;
use crate::source::{DataSource, ResultRow};

/// Runs the collection plan against a data source, once per scrape.
pub struct CollectionPipeline {
    source: Arc<dyn DataSource>,
    plan: &'static [QueryBlock],
    metrics: Arc<dyn MetricsRecorder>,
}

impl CollectionPipeline {
    pub fn new(source: Arc<dyn DataSource>, metrics: Arc<dyn MetricsRecorder>) -> Self {
        Self::with_plan(source, COLLECTION_PLAN, metrics)
    }

    pub fn with_plan(
        source: Arc<dyn DataSource>,
        plan: &'static [QueryBlock],
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Self {
        Self {
            source,
            plan,
            metrics,
        }
    }

    pub fn source(&self) -> &Arc<dyn DataSource> {
        &self.source
    }

    /// One pass over the plan. The first query that fails aborts the pass.
    pub async fn run_pass(&self) -> Result<Vec<MetricSample>> {
        let mut samples = Vec::new();
        for block in self.plan {
            let rows = self.source.execute(&block.query).await?;
            samples.extend(translate(block, &rows));
        }
        Ok(samples)
    }

    /// Samples for one scrape. Never fails: a failed pass yields exactly the
    /// error sentinel instead.
    pub async fn collect(&self) -> Vec<MetricSample> {
        let started = Instant::now();
        let outcome = self.run_pass().await;
        let elapsed = started.elapsed().as_secs_f64();

        match outcome {
            Ok(samples) => {
                self.metrics.observe_scrape("success", elapsed);
                debug!(
                    "Metrics collection completed: {} samples in {:.3}s",
                    samples.len(),
                    elapsed
                );
                samples
            }
            Err(e) => {
                self.metrics.observe_scrape("error", elapsed);
                error!("Error collecting metrics: {}", e);
                vec![error_sentinel()]
            }
        }
    }
}

/// Turn the rows of one query into samples, one per metric per row.
///
/// Rows beyond the query's declared bound are dropped. An empty result set
/// produces nothing.
pub fn translate(block: &QueryBlock, rows: &[ResultRow]) -> Vec<MetricSample> {
    let rows = match block.query.max_rows {
        Some(max) if rows.len() > max => &rows[..max],
        _ => rows,
    };

    block
        .metrics
        .iter()
        .flat_map(|metric| {
            rows.iter().map(move |row| MetricSample {
                name: metric.name,
                kind: metric.kind,
                help: metric.help,
                labels: metric
                    .labels
                    .iter()
                    .map(|label| {
                        let value = match label.source {
                            LabelSource::Column(column) => row.label(column),
                            LabelSource::Fixed(value) => value.to_string(),
                        };
                        (label.name, value)
                    })
                    .collect(),
                value: row.number(metric.value_column),
            })
        })
        .collect()
}

pub fn error_sentinel() -> MetricSample {
    MetricSample {
        name: EXPORTER_ERROR_METRIC,
        kind: MetricKind::Gauge,
        help: EXPORTER_ERROR_HELP,
        labels: Vec::new(),
        value: 1.0,
    }
}
