//! Server mode
//!
//! Wires the collection pipeline into an actix-web server and runs it until a
//! termination signal arrives.

use actix_web::{App, HttpServer, middleware::DefaultHeaders, web};
use anyhow::{Context, Result};
use tracing::info;

use super::shutdown::wait_for_shutdown_signal;
use super::startup::prepare_server_startup;
use crate::api::{self, services::AppStartTime};
use crate::config::StaticConfig;

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: StaticConfig) -> Result<()> {
    let app_start_time = AppStartTime::now();

    info!(
        "Starting HRMS Metrics Exporter on port {}",
        config.server.port
    );
    info!(
        "Metrics refresh interval: {}s",
        config.collector.refresh_interval_secs
    );
    info!("Database: {}", config.database_display());

    let startup = prepare_server_startup(&config).await?;
    let adapter = startup.adapter.clone();
    let pipeline = startup.pipeline.clone();
    let exporter_metrics = startup.exporter_metrics.clone();

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    let workers = config.server.workers.clamp(1, 32);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pipeline.clone()))
            .app_data(web::Data::new(exporter_metrics.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .wrap(DefaultHeaders::new().add(("Cache-Control", "no-cache, no-store, must-revalidate")))
            .configure(api::configure)
    })
    .workers(workers)
    .disable_signals()
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    info!("✓ Exporter started successfully on port {}", config.server.port);
    info!(
        "✓ Metrics available at http://localhost:{}/metrics",
        config.server.port
    );

    let handle = server.handle();
    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        handle.stop(true).await;
    });

    server.await.context("HTTP server terminated with an error")?;

    adapter.close().await;
    info!("Exporter stopped");
    Ok(())
}
