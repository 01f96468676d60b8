mod health;
mod metrics;

pub use health::{AppStartTime, HealthResponse, HealthService, health_routes};
pub use metrics::{MetricsService, metrics_routes};
