//! seatmap HTTP server binary.
//!
//! Loads configuration, fetches the initial dataset, and serves the REST API.
//!
//! # Usage
//!
//! ```bash
//! # Live webhook feeds
//! cargo run --bin seatmap-server
//!
//! # Local fixture files (capacity.json, candidate_sites.json, travel_times.json)
//! SEATMAP_FIXTURES_DIR=./fixtures cargo run --bin seatmap-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`, `PORT`: bind address (default 0.0.0.0:8080)
//! - `SEATMAP_CONFIG`: path of a TOML config file
//! - `SEATMAP_UPSTREAM_URL`, `SEATMAP_FIXTURES_DIR`: where feeds come from
//! - `RUST_LOG`: log level (default: info)

use std::env;
use std::net::SocketAddr;

use anyhow::Context;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use seatmap::config::AppConfig;
use seatmap::http::{create_router, AppState};
use seatmap::services::{reload_dataset, DatasetHandle};
use seatmap::upstream::source_from_settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting seatmap server v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load().context("Failed to load configuration")?;
    let source = source_from_settings(&config.upstream).context("Failed to set up upstream source")?;

    let dataset = DatasetHandle::empty();
    let state = AppState::new(config, source, dataset);

    // A failed initial load is not fatal; POST /v1/dataset/reload retries.
    match reload_dataset(
        state.source.as_ref(),
        &state.config.simulation.region,
        &state.dataset,
        &state.sessions,
    )
    .await
    {
        Ok(report) => {
            let dataset = state.dataset.current();
            info!(
                fingerprint = %report.fingerprint,
                schools = dataset.schools.len(),
                samples = dataset.samples.len(),
                sites = dataset.sites.len(),
                "Initial dataset loaded"
            );
            for feed in report.failed_feeds() {
                warn!(%feed, "Feed unavailable at startup");
            }
        }
        Err(e) => warn!("Initial dataset load failed, serving an empty dataset: {}", e),
    }

    let addr: SocketAddr = format!("{}:{}", state.config.server.host, state.config.server.port)
        .parse()
        .context("Invalid bind address")?;

    let app = create_router(state);

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
