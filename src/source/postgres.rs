//! PostgreSQL connector
//!
//! Each connection is a sqlx pool capped at one physical connection, opened
//! with a read-only session and a server-side statement timeout. No explicit
//! transactions are used, so every statement runs in autocommit.

use async_trait::async_trait;
use sea_orm::sqlx::Row;
use sea_orm::sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgRow};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

use super::{ColumnKind, ColumnSpec, Connection, Connector, QuerySpec, ResultRow, Scalar};
use crate::config::DatabaseConfig;
use crate::errors::{ExporterError, Result};

const APPLICATION_NAME: &str = "hrms-exporter";

pub struct PgConnector {
    options: PgConnectOptions,
    connect_timeout: Duration,
    target: String,
}

impl PgConnector {
    pub fn from_config(config: &DatabaseConfig) -> Result<Self> {
        let options = PgConnectOptions::from_str(&config.url)
            .map_err(|e| ExporterError::database_config(format!("invalid database URL: {}", e)))?
            .application_name(APPLICATION_NAME)
            .options(session_options(config.statement_timeout()));

        Ok(Self {
            options,
            connect_timeout: config.connect_timeout(),
            target: config.host_display(),
        })
    }
}

/// Startup parameters applied to every session.
fn session_options(statement_timeout: Duration) -> [(&'static str, String); 2] {
    [
        ("statement_timeout", format!("{}ms", statement_timeout.as_millis())),
        ("default_transaction_read_only", "on".to_string()),
    ]
}

#[async_trait]
impl Connector for PgConnector {
    async fn connect(&self) -> Result<Box<dyn Connection>> {
        let connect = PgPoolOptions::new()
            .max_connections(1)
            .min_connections(0)
            .acquire_timeout(self.connect_timeout)
            .test_before_acquire(false)
            .connect_with(self.options.clone());

        let pool = tokio::time::timeout(self.connect_timeout, connect)
            .await
            .map_err(|_| {
                ExporterError::database_connection(format!(
                    "connecting to {} timed out after {:?}",
                    self.target, self.connect_timeout
                ))
            })?
            .map_err(|e| {
                ExporterError::database_connection(format!(
                    "failed to connect to {}: {}",
                    self.target, e
                ))
            })?;

        Ok(Box::new(PgMonitoringConnection { pool }))
    }

    fn target(&self) -> String {
        self.target.clone()
    }
}

struct PgMonitoringConnection {
    pool: PgPool,
}

#[async_trait]
impl Connection for PgMonitoringConnection {
    fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    async fn fetch(&self, query: &QuerySpec) -> Result<Vec<ResultRow>> {
        let rows = sea_orm::sqlx::query(query.sql)
            .fetch_all(&self.pool)
            .await?;
        debug!("Query '{}' returned {} rows", query.name, rows.len());

        rows.iter().map(|row| decode_row(row, query.columns)).collect()
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Decode the declared columns of one row; anything undeclared is ignored.
fn decode_row(row: &PgRow, columns: &[ColumnSpec]) -> Result<ResultRow> {
    let mut decoded = ResultRow::new();
    for column in columns {
        let value = match column.kind {
            ColumnKind::Number => Scalar::from(row.try_get::<Option<f64>, _>(column.name)?),
            ColumnKind::Text => Scalar::from(row.try_get::<Option<String>, _>(column.name)?),
        };
        decoded.insert(column.name, value);
    }
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_options() {
        let options = session_options(Duration::from_millis(5000));
        assert_eq!(options[0], ("statement_timeout", "5000ms".to_string()));
        assert_eq!(options[1], ("default_transaction_read_only", "on".to_string()));
    }

    #[test]
    fn test_session_options_follow_config() {
        let config = DatabaseConfig {
            statement_timeout_ms: 750,
            ..DatabaseConfig::default()
        };
        let options = session_options(config.statement_timeout());
        assert_eq!(options[0].1, "750ms");
    }

    #[test]
    fn test_bad_url_error_message() {
        let config = DatabaseConfig {
            url: "not a url".to_string(),
            ..DatabaseConfig::default()
        };
        let err = PgConnector::from_config(&config).err().unwrap();
        assert!(err.message().starts_with("invalid database URL"));
    }

    #[test]
    fn test_from_config_hides_credentials_in_target() {
        let connector = PgConnector::from_config(&DatabaseConfig::default()).unwrap();
        assert_eq!(connector.target(), "localhost:5432/hrms_master");
    }

    #[test]
    fn test_from_config_rejects_bad_url() {
        let config = DatabaseConfig {
            url: "not a url".to_string(),
            ..DatabaseConfig::default()
        };
        assert!(matches!(
            PgConnector::from_config(&config),
            Err(ExporterError::DatabaseConfig(_))
        ));
    }
}
