//! Credential-hiding proxy in front of the Google Custom Search and YouTube
//! Data APIs.
//!
//! The aggregators never hold API keys. They call `/api/search` and
//! `/api/youtube` here, and this service attaches the keys and normalizes
//! upstream failures into the two error shapes the client understands.

pub mod error;
pub mod routes;
pub mod upstream;

use std::sync::Arc;

use axum::{Router, routing::get};
use fatwa_core::AppConfig;

pub use error::{ApiError, SearchFailure, VideoFailure};

/// Shared state of every route.
#[derive(Debug, Clone)]
pub struct AppState {
    pub http: reqwest::Client,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { http, config: Arc::new(config) })
    }

    /// Absolute upstream URL for `path` under the configured Google base.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.config.google_base_url.trim_end_matches('/'))
    }
}

/// Build the proxy router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/api/search", get(routes::search::search))
        .route("/api/youtube", get(routes::youtube::youtube))
        .with_state(state)
}
