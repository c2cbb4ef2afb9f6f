//! # zkpa-api server
//!
//! Loads and validates key material from `ZKPA_CONFIG` and the `ZKPA_*`
//! variables, then serves the attestation API on `PORT`.

use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use zkpa_api::{AppConfig, AppState};
use zkpa_zkp::PipelineConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let pipeline = PipelineConfig::load(None).context("loading pipeline configuration")?;
    let config = AppConfig::from_env().context("reading server configuration")?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = zkpa_api::app(AppState::with_config(pipeline, config));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("zkpa-api listening on {addr}");
    axum::serve(listener, app.into_make_service())
        .await
        .context("server error")?;
    Ok(())
}
