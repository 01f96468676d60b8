//! Data source adapter
//!
//! Owns the single connection to the monitored database and runs the
//! monitoring queries against it, reconnecting and retrying on failure.
//!
//! - [`Connector`] opens connections (PostgreSQL in production, scripted
//!   fakes in tests)
//! - [`Connection`] runs one [`QuerySpec`] and decodes its rows
//! - [`DataSourceAdapter`] holds at most one live connection and applies the
//!   [`RetryPolicy`]

mod adapter;
pub mod postgres;
mod query;
mod row;

use async_trait::async_trait;

use crate::errors::Result;

pub use adapter::{DataSourceAdapter, RetryPolicy};
pub use postgres::PgConnector;
pub use query::{ColumnKind, ColumnSpec, PING, QuerySpec};
pub use row::{ResultRow, Scalar, UNKNOWN_LABEL};

/// Anything the collection pipeline can run queries against.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Run `query` and return its rows. Fails only once the source has given
    /// up on the query.
    async fn execute(&self, query: &QuerySpec) -> Result<Vec<ResultRow>>;

    /// Readiness check: run [`PING`] once.
    async fn check(&self) -> Result<()> {
        self.execute(&PING).await.map(|_| ())
    }
}

/// Opens fresh connections to the monitored database.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn Connection>>;

    /// Target description for log lines, without credentials.
    fn target(&self) -> String;
}

/// One live connection.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Whether the connection is known to be unusable.
    fn is_closed(&self) -> bool;

    async fn fetch(&self, query: &QuerySpec) -> Result<Vec<ResultRow>>;

    /// Release the underlying resources. Never fails.
    async fn close(&self) {}
}
