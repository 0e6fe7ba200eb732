//! HTTP client for the credential-hiding search/video proxy.
//!
//! ### Endpoints
//!
//! - `GET /api/search?q&site&start` returns `{items, searchInformation}` or
//!   `{error: {message, code, reason}}`.
//! - `GET /api/youtube?q&channelId&maxResults` returns `{items}` or
//!   `{error: "QUOTA_EXCEEDED" | message}`.
//!
//! Failures are classified from the proxy's reason tag or sentinel, never
//! from free-form message text.

pub mod error;
pub mod request;
pub mod response;

pub use error::ProviderError;
pub use request::{SearchRequest, VideoRequest};
pub use response::{SearchInformation, SearchPage};

use std::time::{Duration, Instant};

use async_trait::async_trait;
use fatwa_core::{AppConfig, VideoResult};
use reqwest::header;

use crate::provider::{SearchProvider, VideoProvider};

/// Default proxy base URL.
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "fatwa-search/0.1";

/// Proxy client configuration.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Base URL of the proxy (default: http://127.0.0.1:3000).
    pub base_url: String,
    /// Request timeout (default: 20s).
    pub timeout: Duration,
    /// User-agent string (default: fatwa-search/0.x).
    pub user_agent: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&AppConfig> for ProxyConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.proxy_base_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Proxy API client.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    http: reqwest::Client,
    base_url: url::Url,
}

impl ProxyClient {
    /// Create a new proxy client with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, ProviderError> {
        let base_url = url::Url::parse(&config.base_url)
            .map_err(|e| ProviderError::InvalidQuery(format!("invalid proxy URL {}: {e}", config.base_url)))?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<url::Url, ProviderError> {
        self.base_url
            .join(path)
            .map_err(|e| ProviderError::InvalidQuery(format!("invalid endpoint {path}: {e}")))
    }

    /// Run one site search through the proxy.
    pub async fn search(&self, req: &SearchRequest) -> Result<SearchPage, ProviderError> {
        req.validate()?;

        let start = Instant::now();
        tracing::debug!(site = req.site.as_deref(), start = req.start, "querying search proxy");

        let http_response = self
            .http
            .get(self.endpoint("/api/search")?)
            .header(header::ACCEPT, "application/json")
            .query(req)
            .send()
            .await?;

        let status = http_response.status();
        let bytes = http_response.bytes().await?;

        if !status.is_success() {
            let err = response::search_error(status.as_u16(), &bytes);
            tracing::debug!(status = status.as_u16(), error = %err, "search proxy returned an error");
            return Err(err);
        }

        let raw: response::SearchApiResponse =
            serde_json::from_slice(&bytes).map_err(|e| ProviderError::Parse(e.to_string()))?;
        let page = SearchPage::from(raw);

        tracing::debug!(
            elapsed = ?start.elapsed(),
            results = page.results.len(),
            total = page.info.as_ref().and_then(|i| i.total_results.as_deref()),
            "search proxy call completed"
        );

        Ok(page)
    }

    /// Fetch recent videos for one channel through the proxy.
    pub async fn channel_videos(&self, req: &VideoRequest) -> Result<Vec<VideoResult>, ProviderError> {
        req.validate()?;

        let start = Instant::now();
        let http_response = self
            .http
            .get(self.endpoint("/api/youtube")?)
            .header(header::ACCEPT, "application/json")
            .query(req)
            .send()
            .await?;

        let status = http_response.status();
        let bytes = http_response.bytes().await?;

        if !status.is_success() {
            return Err(response::video_error(status.as_u16(), &bytes));
        }

        let raw: response::VideoApiResponse =
            serde_json::from_slice(&bytes).map_err(|e| ProviderError::Parse(e.to_string()))?;
        let videos = raw.into_videos();

        tracing::debug!(
            channel = %req.channel_id,
            elapsed = ?start.elapsed(),
            videos = videos.len(),
            "video proxy call completed"
        );

        Ok(videos)
    }
}

#[async_trait]
impl SearchProvider for ProxyClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchPage, ProviderError> {
        ProxyClient::search(self, request).await
    }
}

#[async_trait]
impl VideoProvider for ProxyClient {
    async fn channel_videos(&self, request: &VideoRequest) -> Result<Vec<VideoResult>, ProviderError> {
        ProxyClient::channel_videos(self, request).await
    }
}
