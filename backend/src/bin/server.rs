//! Cardio risk HTTP server binary
//!
//! Loads the model artifact once, builds the router and serves requests.
//!
//! # Usage
//!
//! ```bash
//! MODEL_PATH=model/cardio_xgb.json cargo run --bin cardio-server
//! ```
//!
//! # Environment Variables
//!
//! - `CARDIO_CONFIG`: path to a `cardio.toml` file
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8000)
//! - `MODEL_PATH`: XGBoost JSON model (default: model/cardio_xgb.json)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use cardio_risk::config::ServiceConfig;
use cardio_risk::http::{create_router, AppState};
use cardio_risk::model::{load_classifier, Classifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
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

    info!("Starting cardio risk prediction server");

    let config = ServiceConfig::load().context("Failed to load configuration")?;
    let addr = config.bind_address()?;

    // A missing or malformed model is fatal; no request is served without it.
    let ensemble = load_classifier(&config.model.path).with_context(|| {
        format!("Failed to load model from {}", config.model.path.display())
    })?;
    let summary = ensemble.summary();
    info!(
        "Model ready: {} / {} with {} trees",
        summary.booster, summary.objective, summary.num_trees
    );

    let state = AppState::new(Arc::new(ensemble)).with_body_limit(config.server.body_limit_bytes);
    let app = create_router(state);

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
