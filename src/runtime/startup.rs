use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

use crate::collector::CollectionPipeline;
use crate::config::StaticConfig;
use crate::metrics::{ExporterMetrics, MetricsRecorder};
use crate::source::{DataSource, DataSourceAdapter, PgConnector, RetryPolicy};

pub struct StartupContext {
    pub adapter: Arc<DataSourceAdapter>,
    pub pipeline: Arc<CollectionPipeline>,
    pub exporter_metrics: Arc<ExporterMetrics>,
}

/// 准备服务器启动的上下文
///
/// Builds the adapter and the pipeline and opens the first connection. A
/// database that cannot be reached here is fatal.
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let exporter_metrics =
        Arc::new(ExporterMetrics::new().context("Failed to create exporter metrics")?);
    let recorder: Arc<dyn MetricsRecorder> = exporter_metrics.clone();

    let connector =
        PgConnector::from_config(&config.database).context("Invalid database configuration")?;
    let policy = RetryPolicy::from(&config.database);
    debug!(
        "Retry policy: {} attempts, {:?} backoff, statement timeout {}ms",
        policy.max_attempts, policy.backoff, config.database.statement_timeout_ms
    );

    let adapter = Arc::new(DataSourceAdapter::new(connector, policy, recorder.clone()));
    adapter
        .connect()
        .await
        .context("Failed to connect to the monitoring database")?;

    let source: Arc<dyn DataSource> = adapter.clone();
    let pipeline = Arc::new(CollectionPipeline::new(source, recorder));

    info!("Pre-startup completed in {:?}", start_time.elapsed());

    Ok(StartupContext {
        adapter,
        pipeline,
        exporter_metrics,
    })
}
