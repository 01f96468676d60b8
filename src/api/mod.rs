//! HTTP surface: `/metrics`, `/` and `/health/{live,ready}`.

pub mod services;

use actix_web::web;

use services::{health_routes, metrics_routes};

/// Register every route on an app. The catch-all metrics scope goes last.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/health").service(health_routes()))
        .service(metrics_routes());
}
