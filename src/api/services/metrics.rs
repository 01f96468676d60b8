//! Prometheus metrics endpoint
//!
//! Every request runs one collection pass and returns its samples, followed
//! by the exporter's own metrics.

use actix_web::{HttpResponse, Responder, web};
use std::sync::Arc;
use tracing::{error, trace};

use super::AppStartTime;
use crate::collector::CollectionPipeline;
use crate::metrics::{CONTENT_TYPE, ExporterMetrics, render};

const INDEX_PAGE: &str = "<html>\
<head><title>HRMS Exporter</title></head>\
<body>\
<h1>HRMS Exporter</h1>\
<p><a href=\"/metrics\">Metrics</a></p>\
</body>\
</html>";

/// Metrics service handler
pub struct MetricsService;

impl MetricsService {
    /// Handle metrics export request
    pub async fn metrics(
        pipeline: web::Data<Arc<CollectionPipeline>>,
        exporter_metrics: web::Data<Arc<ExporterMetrics>>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        trace!("Received scrape request");
        exporter_metrics
            .uptime_seconds
            .set(app_start_time.uptime_seconds());

        let samples = pipeline.collect().await;

        match render(&samples, exporter_metrics.gather()) {
            Ok(body) => HttpResponse::Ok().content_type(CONTENT_TYPE).body(body),
            Err(e) => {
                error!("Failed to encode metrics: {}", e);
                HttpResponse::InternalServerError()
                    .content_type("text/plain")
                    .body(e.to_string())
            }
        }
    }

    pub async fn index() -> impl Responder {
        HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(INDEX_PAGE)
    }
}

/// Metrics 路由配置
pub fn metrics_routes() -> actix_web::Scope {
    web::scope("")
        .route("/metrics", web::get().to(MetricsService::metrics))
        .route("/", web::get().to(MetricsService::index))
}
