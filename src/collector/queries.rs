//! The fixed collection plan: four monitoring queries and the metrics each
//! one produces.

use super::MetricKind;
use crate::source::{ColumnSpec, QuerySpec};

/// Where a label value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSource {
    /// Read from a text column, `unknown` when null.
    Column(&'static str),
    /// Constant value.
    Fixed(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelDef {
    pub name: &'static str,
    pub source: LabelSource,
}

impl LabelDef {
    /// Label named after the column it is read from.
    pub const fn column(name: &'static str) -> Self {
        Self {
            name,
            source: LabelSource::Column(name),
        }
    }

    pub const fn fixed(name: &'static str, value: &'static str) -> Self {
        Self {
            name,
            source: LabelSource::Fixed(value),
        }
    }
}

/// One metric produced per result row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricDef {
    pub name: &'static str,
    pub help: &'static str,
    pub kind: MetricKind,
    pub value_column: &'static str,
    pub labels: &'static [LabelDef],
}

/// A query together with the metrics derived from its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryBlock {
    pub query: QuerySpec,
    pub metrics: &'static [MetricDef],
}

pub const PERFORMANCE_SNAPSHOT: QueryBlock = QueryBlock {
    query: QuerySpec {
        name: "performance_snapshot",
        sql: "SELECT \
                cache_hit_ratio::float8 AS cache_hit_ratio, \
                active_connections::float8 AS active_connections, \
                idle_connections::float8 AS idle_connections, \
                total_connections::float8 AS total_connections, \
                transactions_per_sec::float8 AS transactions_per_sec, \
                queries_per_sec::float8 AS queries_per_sec, \
                avg_query_time_ms::float8 AS avg_query_time_ms, \
                slow_queries_count::float8 AS slow_queries_count, \
                deadlocks_count::float8 AS deadlocks_count, \
                rollback_ratio::float8 AS rollback_ratio \
              FROM monitoring.get_dashboard_metrics() \
              LIMIT 1",
        columns: &[
            ColumnSpec::number("cache_hit_ratio"),
            ColumnSpec::number("active_connections"),
            ColumnSpec::number("idle_connections"),
            ColumnSpec::number("total_connections"),
            ColumnSpec::number("transactions_per_sec"),
            ColumnSpec::number("queries_per_sec"),
            ColumnSpec::number("avg_query_time_ms"),
            ColumnSpec::number("slow_queries_count"),
            ColumnSpec::number("deadlocks_count"),
            ColumnSpec::number("rollback_ratio"),
        ],
        max_rows: Some(1),
    },
    metrics: &[
        gauge!(
            "hrms_db_cache_hit_ratio",
            "PostgreSQL cache hit ratio percentage",
            "cache_hit_ratio"
        ),
        gauge!(
            "hrms_db_connections_active",
            "Number of active database connections",
            "active_connections"
        ),
        gauge!(
            "hrms_db_connections_idle",
            "Number of idle database connections",
            "idle_connections"
        ),
        gauge!(
            "hrms_db_connections_total",
            "Total number of database connections",
            "total_connections"
        ),
        gauge!(
            "hrms_db_transactions_per_second",
            "Database transactions per second",
            "transactions_per_sec"
        ),
        gauge!(
            "hrms_db_queries_per_second",
            "Database queries per second",
            "queries_per_sec"
        ),
        gauge!(
            "hrms_db_avg_query_time_ms",
            "Average query execution time in milliseconds",
            "avg_query_time_ms"
        ),
        gauge!(
            "hrms_db_slow_queries_count",
            "Number of slow queries (>100ms)",
            "slow_queries_count"
        ),
        gauge!(
            "hrms_db_deadlocks_total",
            "Total number of deadlocks detected",
            "deadlocks_count"
        ),
        gauge!(
            "hrms_db_rollback_ratio",
            "Ratio of rolled back transactions",
            "rollback_ratio"
        ),
    ],
};

pub const TENANT_ACTIVITY: QueryBlock = QueryBlock {
    query: QuerySpec {
        name: "tenant_activity",
        sql: "SELECT \
                COUNT(DISTINCT tenant_id)::float8 AS active_tenants, \
                SUM(requests_count)::float8 AS total_requests, \
                AVG(avg_response_time_ms)::float8 AS avg_response_time, \
                SUM(error_count)::float8 AS total_errors \
              FROM monitoring.tenant_activity \
              WHERE recorded_at > NOW() - INTERVAL '5 minutes'",
        columns: &[
            ColumnSpec::number("active_tenants"),
            ColumnSpec::number("total_requests"),
            ColumnSpec::number("avg_response_time"),
            ColumnSpec::number("total_errors"),
        ],
        max_rows: Some(1),
    },
    metrics: &[
        gauge!(
            "hrms_active_tenants_total",
            "Number of active tenants in last 5 minutes",
            "active_tenants"
        ),
        counter!(
            "hrms_tenant_requests_total",
            "Total requests across all tenants (last 5 min)",
            "total_requests"
        ),
        gauge!(
            "hrms_tenant_avg_response_time_ms",
            "Average response time across all tenants",
            "avg_response_time"
        ),
        counter!(
            "hrms_tenant_errors_total",
            "Total errors across all tenants (last 5 min)",
            "total_errors"
        ),
    ],
};

/// Most requested endpoints kept per pass.
pub const TOP_ENDPOINTS: usize = 20;

pub const ENDPOINT_PERFORMANCE: QueryBlock = QueryBlock {
    query: QuerySpec {
        name: "endpoint_performance",
        sql: "SELECT \
                COALESCE(NULLIF(endpoint::text, ''), 'unknown') AS endpoint, \
                COUNT(*)::float8 AS request_count, \
                AVG(response_time_ms)::float8 AS avg_response_time, \
                SUM(CASE WHEN status_code >= 500 THEN 1 ELSE 0 END)::float8 AS error_5xx, \
                SUM(CASE WHEN status_code >= 400 AND status_code < 500 THEN 1 ELSE 0 END)::float8 AS error_4xx \
              FROM monitoring.api_performance \
              WHERE recorded_at > NOW() - INTERVAL '5 minutes' \
              GROUP BY 1 \
              ORDER BY request_count DESC \
              LIMIT 20",
        columns: &[
            ColumnSpec::text("endpoint"),
            ColumnSpec::number("request_count"),
            ColumnSpec::number("avg_response_time"),
            ColumnSpec::number("error_5xx"),
            ColumnSpec::number("error_4xx"),
        ],
        max_rows: Some(TOP_ENDPOINTS),
    },
    metrics: &[
        gauge!(
            "hrms_api_endpoint_requests",
            "Request count per API endpoint (last 5 min)",
            "request_count",
            [LabelDef::column("endpoint")]
        ),
        gauge!(
            "hrms_api_endpoint_response_time_ms",
            "Average response time per endpoint",
            "avg_response_time",
            [LabelDef::column("endpoint")]
        ),
        gauge!(
            "hrms_api_endpoint_errors",
            "Error count per endpoint",
            "error_5xx",
            [LabelDef::column("endpoint"), LabelDef::fixed("type", "5xx")]
        ),
        gauge!(
            "hrms_api_endpoint_errors",
            "Error count per endpoint",
            "error_4xx",
            [LabelDef::column("endpoint"), LabelDef::fixed("type", "4xx")]
        ),
    ],
};

pub const SECURITY_EVENTS: QueryBlock = QueryBlock {
    query: QuerySpec {
        name: "security_events",
        sql: "SELECT \
                COALESCE(NULLIF(event_type::text, ''), 'unknown') AS event_type, \
                COUNT(*)::float8 AS event_count \
              FROM monitoring.security_events \
              WHERE recorded_at > NOW() - INTERVAL '1 hour' \
              GROUP BY 1",
        columns: &[
            ColumnSpec::text("event_type"),
            ColumnSpec::number("event_count"),
        ],
        max_rows: None,
    },
    metrics: &[counter!(
        "hrms_security_events_total",
        "Security events by type (last hour)",
        "event_count",
        [LabelDef::column("event_type")]
    )],
};

/// Queries run by every pass, in order.
pub const COLLECTION_PLAN: &[QueryBlock] = &[
    PERFORMANCE_SNAPSHOT,
    TENANT_ACTIVITY,
    ENDPOINT_PERFORMANCE,
    SECURITY_EVENTS,
];

/// Emitted instead of everything else when a pass fails.
pub const EXPORTER_ERROR_METRIC: &str = "hrms_exporter_error";
pub const EXPORTER_ERROR_HELP: &str = "Exporter error occurred";
