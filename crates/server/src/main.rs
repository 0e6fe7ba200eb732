//! fatwa-mcp server entry point.
//!
//! Boots the MCP server on stdio transport. Logging goes to stderr to avoid
//! interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use fatwa_client::{ProxyClient, ProxyConfig};
use fatwa_core::AppConfig;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod session;
mod tools;

use session::{Caches, Session};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(
        proxy = %config.proxy_base_url,
        page_size = config.page_size,
        channels = config.channels.len(),
        "Starting fatwa-mcp server on stdio transport"
    );

    let caches = Caches::new(config.cache_ttl());
    let _sweepers = config.sweep_interval().map(|every| caches.spawn_sweepers(every));

    let proxy = Arc::new(ProxyClient::new(ProxyConfig::from(&config))?);
    let session = Session::new(&config, &caches, proxy.clone(), proxy);

    let handler = handler::FatwaServer::new(session, caches);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
