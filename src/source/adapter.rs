use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::{Connection, Connector, DataSource, PING, QuerySpec, ResultRow};
use crate::config::DatabaseConfig;
use crate::errors::{ExporterError, Result};
use crate::metrics::MetricsRecorder;

/// 重试配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per query, including the first one.
    pub max_attempts: u32,
    /// Fixed pause between two attempts.
    pub backoff: Duration,
}

impl From<&DatabaseConfig> for RetryPolicy {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            backoff: config.retry_backoff(),
        }
    }
}

/// Single-connection data source with reconnect and bounded retry.
///
/// The connection slot is behind an async mutex, so overlapping scrapes are
/// serialised on it rather than run in parallel.
pub struct DataSourceAdapter {
    connector: Box<dyn Connector>,
    policy: RetryPolicy,
    connection: Mutex<Option<Box<dyn Connection>>>,
    metrics: Arc<dyn MetricsRecorder>,
}

impl DataSourceAdapter {
    pub fn new(
        connector: impl Connector + 'static,
        policy: RetryPolicy,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Self {
        Self {
            connector: Box::new(connector),
            policy,
            connection: Mutex::new(None),
            metrics,
        }
    }

    /// Open the connection eagerly. Used at startup, where failing to reach
    /// the database is fatal.
    pub async fn connect(&self) -> Result<()> {
        let mut slot = self.connection.lock().await;
        if let Some(stale) = slot.take() {
            stale.close().await;
        }
        *slot = Some(self.open().await?);
        Ok(())
    }

    /// Whether a connection is currently held.
    pub async fn is_connected(&self) -> bool {
        self.connection
            .lock()
            .await
            .as_ref()
            .is_some_and(|c| !c.is_closed())
    }

    /// Drop the held connection, if any.
    pub async fn close(&self) {
        if let Some(conn) = self.connection.lock().await.take() {
            conn.close().await;
        }
    }

    async fn open(&self) -> Result<Box<dyn Connection>> {
        let conn = self.connector.connect().await?;
        info!("Connected to monitoring database at {}", self.connector.target());
        Ok(conn)
    }

    /// One attempt: reuse the held connection when it is still open,
    /// otherwise open a new one. A failed connection is closed and dropped.
    ///
    /// The connection stays in the slot while the query runs, so a caller
    /// that gives up mid-query does not lose it.
    async fn attempt(
        &self,
        slot: &mut Option<Box<dyn Connection>>,
        query: &QuerySpec,
    ) -> Result<Vec<ResultRow>> {
        if slot.as_ref().is_some_and(|conn| conn.is_closed()) {
            debug!("Held connection is closed, reconnecting");
            if let Some(stale) = slot.take() {
                stale.close().await;
            }
        }
        if slot.is_none() {
            *slot = Some(self.open().await?);
        }
        let Some(conn) = slot.as_ref() else {
            return Err(ExporterError::database_connection("no connection available"));
        };

        let result = conn.fetch(query).await;
        match result {
            Ok(rows) => Ok(rows),
            Err(e) => {
                if let Some(failed) = slot.take() {
                    failed.close().await;
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl DataSource for DataSourceAdapter {
    async fn execute(&self, query: &QuerySpec) -> Result<Vec<ResultRow>> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut slot = self.connection.lock().await;
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            match self.attempt(&mut slot, query).await {
                Ok(rows) => {
                    if attempt > 1 {
                        debug!(
                            "Query '{}' succeeded on attempt {}/{}",
                            query.name, attempt, max_attempts
                        );
                    }
                    return Ok(rows);
                }
                Err(e) => {
                    warn!(
                        "Query '{}' failed (attempt {}/{}): {}",
                        query.name, attempt, max_attempts, e
                    );
                    last_error = Some(e);
                    if attempt < max_attempts {
                        self.metrics.inc_query_retry(query.name);
                        sleep(self.policy.backoff).await;
                    }
                }
            }
        }

        let cause = last_error.map_or_else(|| "no attempt made".to_string(), |e| e.to_string());
        Err(ExporterError::retries_exhausted(format!(
            "query '{}' failed after {} attempts: {}",
            query.name, max_attempts, cause
        )))
    }

    /// Single attempt of the readiness query, without retries or backoff.
    async fn check(&self) -> Result<()> {
        let mut slot = self.connection.lock().await;
        self.attempt(&mut slot, &PING).await.map(|_| ())
    }
}
