//! Scripted in-memory database shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use hrms_exporter::errors::{ExporterError, Result};
use hrms_exporter::source::{Connection, Connector, QuerySpec, ResultRow, RetryPolicy};

/// Policy with the production attempt count and a negligible backoff.
pub fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        backoff: Duration::from_millis(1),
    }
}

#[derive(Default)]
pub struct FakeDatabase {
    rows: Mutex<HashMap<&'static str, Vec<ResultRow>>>,
    fail_fetches: AtomicU32,
    fail_connects: AtomicU32,
    always_fail: AtomicBool,
    epoch: AtomicU32,
    fetch_delay_ms: AtomicU64,
    pub connects: AtomicU32,
    pub fetches: AtomicU32,
    pub closes: AtomicU32,
}

impl FakeDatabase {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_rows(&self, query: &'static str, rows: Vec<ResultRow>) {
        self.rows.lock().unwrap().insert(query, rows);
    }

    /// The next `n` fetches fail.
    pub fn fail_next_fetches(&self, n: u32) {
        self.fail_fetches.store(n, Ordering::SeqCst);
    }

    /// The next `n` connection attempts fail.
    pub fn fail_next_connects(&self, n: u32) {
        self.fail_connects.store(n, Ordering::SeqCst);
    }

    /// Every connect and fetch fails from now on.
    pub fn fail_always(&self) {
        self.always_fail.store(true, Ordering::SeqCst);
    }

    /// Every fetch waits this long before answering.
    pub fn set_fetch_delay(&self, delay: Duration) {
        self.fetch_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// Mark every open connection as closed by the server.
    pub fn sever_connections(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }

    pub fn connects(&self) -> u32 {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn fetches(&self) -> u32 {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> u32 {
        self.closes.load(Ordering::SeqCst)
    }

    fn should_fail(&self, counter: &AtomicU32) -> bool {
        self.always_fail.load(Ordering::SeqCst)
            || counter
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
    }
}

pub struct FakeConnector(pub Arc<FakeDatabase>);

#[async_trait]
impl Connector for FakeConnector {
    async fn connect(&self) -> Result<Box<dyn Connection>> {
        self.0.connects.fetch_add(1, Ordering::SeqCst);
        if self.0.should_fail(&self.0.fail_connects) {
            return Err(ExporterError::database_connection("connection refused"));
        }
        Ok(Box::new(FakeConnection {
            db: self.0.clone(),
            epoch: self.0.epoch.load(Ordering::SeqCst),
            closed: AtomicBool::new(false),
        }))
    }

    fn target(&self) -> String {
        "fake:5432/hrms_master".to_string()
    }
}

struct FakeConnection {
    db: Arc<FakeDatabase>,
    epoch: u32,
    closed: AtomicBool,
}

#[async_trait]
impl Connection for FakeConnection {
    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst) || self.db.epoch.load(Ordering::SeqCst) != self.epoch
    }

    async fn fetch(&self, query: &QuerySpec) -> Result<Vec<ResultRow>> {
        self.db.fetches.fetch_add(1, Ordering::SeqCst);
        let delay = self.db.fetch_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.db.should_fail(&self.db.fail_fetches) {
            return Err(ExporterError::query_failed(format!(
                "server closed the connection during '{}'",
                query.name
            )));
        }
        Ok(self
            .db
            .rows
            .lock()
            .unwrap()
            .get(query.name)
            .cloned()
            .unwrap_or_default())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.db.closes.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn performance_row() -> ResultRow {
    ResultRow::new()
        .with("cache_hit_ratio", 97.5)
        .with("active_connections", 12i64)
        .with("idle_connections", 3i64)
        .with("total_connections", 15i64)
        .with("transactions_per_sec", 450.2)
        .with("queries_per_sec", 900.1)
        .with("avg_query_time_ms", 2.3)
        .with("slow_queries_count", 1i64)
        .with("deadlocks_count", 0i64)
        .with("rollback_ratio", 0.01)
}

pub fn endpoint_row(endpoint: &str, requests: f64) -> ResultRow {
    ResultRow::new()
        .with("endpoint", endpoint)
        .with("request_count", requests)
        .with("avg_response_time", 42.0)
        .with("error_5xx", 1.0)
        .with("error_4xx", 2.0)
}
