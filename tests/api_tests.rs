mod common;

use actix_web::http::{Method, StatusCode};
use actix_web::{App, test, web};
use std::sync::Arc;

use common::{FakeConnector, FakeDatabase, endpoint_row, fast_policy, performance_row};
use hrms_exporter::api::{self, services::AppStartTime};
use hrms_exporter::collector::CollectionPipeline;
use hrms_exporter::metrics::{ExporterMetrics, MetricsRecorder};
use hrms_exporter::source::{DataSourceAdapter, ResultRow};

struct Harness {
    pipeline: Arc<CollectionPipeline>,
    exporter_metrics: Arc<ExporterMetrics>,
}

fn harness(db: &Arc<FakeDatabase>) -> Harness {
    let exporter_metrics = Arc::new(ExporterMetrics::new().unwrap());
    let recorder: Arc<dyn MetricsRecorder> = exporter_metrics.clone();
    let adapter = DataSourceAdapter::new(FakeConnector(db.clone()), fast_policy(), recorder.clone());
    Harness {
        pipeline: Arc::new(CollectionPipeline::new(Arc::new(adapter), recorder)),
        exporter_metrics,
    }
}

macro_rules! app {
    ($harness:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($harness.pipeline.clone()))
                .app_data(web::Data::new($harness.exporter_metrics.clone()))
                .app_data(web::Data::new(AppStartTime::now()))
                .configure(api::configure),
        )
        .await
    };
}

async fn scrape(db: &Arc<FakeDatabase>) -> (StatusCode, String, String) {
    let harness = harness(db);
    let app = app!(harness);
    let req = test::TestRequest::get().uri("/metrics").to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let body = test::read_body(resp).await;
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

#[actix_rt::test]
async fn test_metrics_endpoint_exposes_samples() {
    let db = FakeDatabase::new();
    db.set_rows("performance_snapshot", vec![performance_row()]);
    db.set_rows("endpoint_performance", vec![endpoint_row("/api/v1/employees", 10.0)]);
    db.set_rows(
        "security_events",
        vec![
            ResultRow::new()
                .with("event_type", "login_failed")
                .with("event_count", 7i64),
        ],
    );

    let (status, content_type, body) = scrape(&db).await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("text/plain"));
    assert!(body.contains("# TYPE hrms_db_cache_hit_ratio gauge"));
    assert!(body.contains("hrms_db_cache_hit_ratio 97.5"));
    assert!(body.contains("hrms_db_connections_active 12"));
    assert!(body.contains("# TYPE hrms_security_events_total counter"));
    assert!(body.contains("hrms_security_events_total{event_type=\"login_failed\"} 7"));
    assert!(body.contains("hrms_api_endpoint_errors{endpoint=\"/api/v1/employees\",type=\"5xx\"} 1"));
    assert!(body.contains("hrms_api_endpoint_errors{endpoint=\"/api/v1/employees\",type=\"4xx\"} 2"));
    assert!(!body.contains("hrms_exporter_error"));
    // own metrics follow the collected ones
    assert!(body.contains("hrms_exporter_scrapes_total{outcome=\"success\"} 1"));
    assert!(body.contains("# TYPE hrms_exporter_uptime_seconds gauge"));
}

#[actix_rt::test]
async fn test_metrics_endpoint_reports_sentinel_on_failure() {
    let db = FakeDatabase::new();
    db.fail_always();

    let (status, _, body) = scrape(&db).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("# TYPE hrms_exporter_error gauge"));
    assert!(body.contains("hrms_exporter_error 1"));
    assert!(!body.contains("hrms_db_"));
    assert!(body.contains("hrms_exporter_scrapes_total{outcome=\"error\"} 1"));
}

#[actix_rt::test]
async fn test_liveness_probe() {
    let db = FakeDatabase::new();
    db.fail_always();
    let harness = harness(&db);
    let app = app!(harness);

    let req = test::TestRequest::get().uri("/health/live").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::default()
        .method(Method::HEAD)
        .uri("/health/live")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[actix_rt::test]
async fn test_readiness_probe_healthy() {
    let db = FakeDatabase::new();
    let harness = harness(&db);
    let app = app!(harness);

    let req = test::TestRequest::get().uri("/health/ready").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ready");
    assert_eq!(body["database"], "healthy");
    assert!(body.get("error").is_none());
}

#[actix_rt::test]
async fn test_readiness_probe_unavailable() {
    let db = FakeDatabase::new();
    db.fail_always();
    let harness = harness(&db);
    let app = app!(harness);

    let req = test::TestRequest::get().uri("/health/ready").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "unavailable");
    assert_eq!(body["database"], "unhealthy");
    assert!(body["error"].as_str().unwrap().contains("connection refused"));
}

#[actix_rt::test]
async fn test_readiness_probe_does_not_retry() {
    let db = FakeDatabase::new();
    db.fail_next_fetches(1);
    let harness = harness(&db);
    let app = app!(harness);

    let req = test::TestRequest::get().uri("/health/ready").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(db.fetches(), 1);
    assert_eq!(
        harness
            .exporter_metrics
            .query_retries_total
            .with_label_values(&["ping"])
            .get(),
        0.0
    );

    let req = test::TestRequest::get().uri("/health/ready").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_index_page_links_to_metrics() {
    let db = FakeDatabase::new();
    let harness = harness(&db);
    let app = app!(harness);

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    let body = String::from_utf8(body.to_vec()).unwrap();
    assert!(body.contains("<a href=\"/metrics\">Metrics</a>"));
}

#[actix_rt::test]
async fn test_unknown_path_is_not_found() {
    let db = FakeDatabase::new();
    let harness = harness(&db);
    let app = app!(harness);

    let req = test::TestRequest::get().uri("/nope").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
