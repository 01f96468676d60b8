use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, trace};

use crate::collector::CollectionPipeline;
use crate::source::DataSource;

/// Upper bound on the readiness probe, including the wait for the connection.
const READINESS_TIMEOUT: Duration = Duration::from_secs(5);

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

impl AppStartTime {
    pub fn now() -> Self {
        Self {
            start_datetime: chrono::Utc::now(),
        }
    }

    pub fn uptime_seconds(&self) -> f64 {
        (chrono::Utc::now() - self.start_datetime)
            .num_milliseconds()
            .max(0) as f64
            / 1000.0
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub uptime_seconds: u64,
    pub response_time_ms: u64,
}

pub struct HealthService;

impl HealthService {
    /// 就绪检查：通过数据源执行一次探测查询
    pub async fn readiness_check(
        pipeline: web::Data<Arc<CollectionPipeline>>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received readiness check request");

        let probe = tokio::time::timeout(READINESS_TIMEOUT, pipeline.source().check()).await;
        let (healthy, error) = match probe {
            Ok(Ok(_)) => (true, None),
            Ok(Err(e)) => {
                error!("Readiness check failed: {}", e);
                (false, Some(e.to_string()))
            }
            Err(_) => {
                error!("Readiness check timed out after {:?}", READINESS_TIMEOUT);
                (false, Some("timeout".to_string()))
            }
        };

        let body = HealthResponse {
            status: if healthy { "ready" } else { "unavailable" }.to_string(),
            database: if healthy { "healthy" } else { "unhealthy" }.to_string(),
            error,
            uptime_seconds: app_start_time.uptime_seconds() as u64,
            response_time_ms: start_time.elapsed().as_millis() as u64,
        };

        if healthy {
            HttpResponse::Ok().json(body)
        } else {
            HttpResponse::ServiceUnavailable().json(body)
        }
    }

    // 活跃性检查，进程存活即可
    pub async fn liveness_check() -> impl Responder {
        trace!("Received liveness check request");

        HttpResponse::NoContent().finish()
    }
}

/// Health 路由配置
pub fn health_routes() -> actix_web::Scope {
    web::scope("")
        .route("/ready", web::get().to(HealthService::readiness_check))
        .route("/ready", web::head().to(HealthService::readiness_check))
        .route("/live", web::get().to(HealthService::liveness_check))
        .route("/live", web::head().to(HealthService::liveness_check))
}
