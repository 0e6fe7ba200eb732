//! fatwa-proxy entry point.
//!
//! Serves `/api/search` and `/api/youtube` over HTTP with the configured
//! Google credentials attached server-side.

use anyhow::Result;
use fatwa_core::AppConfig;
use fatwa_proxy::{AppState, router};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(
        bind = %config.bind_addr,
        search_configured = config.require_search_credentials().is_ok(),
        youtube_configured = config.require_youtube_api_key().is_ok(),
        "Starting fatwa-proxy"
    );

    let listener = TcpListener::bind(&config.bind_addr).await?;
    let app = router(AppState::new(config)?);
    axum::serve(listener, app).await?;

    Ok(())
}
