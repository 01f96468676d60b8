//! Declaration helpers for the metric table.

/// Declare a gauge read from one column.
///
/// Usage:
/// ```ignore
/// gauge!("hrms_db_connections_idle", "Number of idle database connections", "idle_connections")
/// gauge!("hrms_api_endpoint_requests", "...", "request_count", [LabelDef::column("endpoint")])
/// ```
macro_rules! gauge {
    ($name:literal, $help:literal, $column:literal) => {
        gauge!($name, $help, $column, [])
    };
    ($name:literal, $help:literal, $column:literal, [$($label:expr),* $(,)?]) => {
        $crate::collector::MetricDef {
            name: $name,
            help: $help,
            kind: $crate::collector::MetricKind::Gauge,
            value_column: $column,
            labels: &[$($label),*],
        }
    };
}

/// Declare a counter read from one column.
///
/// Usage:
/// ```ignore
/// counter!("hrms_tenant_errors_total", "Total errors across all tenants (last 5 min)", "total_errors")
/// ```
macro_rules! counter {
    ($name:literal, $help:literal, $column:literal) => {
        counter!($name, $help, $column, [])
    };
    ($name:literal, $help:literal, $column:literal, [$($label:expr),* $(,)?]) => {
        $crate::collector::MetricDef {
            name: $name,
            help: $help,
            kind: $crate::collector::MetricKind::Counter,
            value_column: $column,
            labels: &[$($label),*],
        }
    };
}
