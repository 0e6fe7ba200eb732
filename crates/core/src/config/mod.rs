//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (FATWA_*)
//! 2. TOML config file (if FATWA_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::messages::Language;

mod validation;

pub use validation::ConfigError;

/// Scholar sites searched by default.
pub const DEFAULT_SITES: [&str; 10] = [
    "binothaimeen.net",
    "alfawzan.af.org.sa",
    "lohaidan.af.org.sa",
    "binbaz.org.sa",
    "al-badr.net",
    "obied-aljabri.com",
    "aletioupi.com",
    "miraath.net",
    "al-albany.com",
    "rabee.net",
];

/// YouTube channel roster, in paging order.
pub const DEFAULT_CHANNELS: [&str; 21] = [
    "UCFjzJYgxHjk44AFoEwwgPjg",
    "UCi7vzSJrU3beV_6Sdgpowng",
    "UCMgtvQNueoOwjAgo-fMF-lQ",
    "UCphY7uVzua2z_Mq1oZcOXGA",
    "UCQPQtAxx45gjN44ZOw4cqmw",
    "UCtF3YygTiodnYSw8vD3UJtQ",
    "UCP44H-iDsDp-_wV85QKkdVA",
    "UCPPQcw5SA1yeQHttDbdxXGw",
    "UC-V7X5AL2krPtSanQEbCbAQ",
    "UCwMocSKEbLav6SZvwzTvDbQ",
    "UC6u5aFIhKDOC_WYKVLBw8Dg",
    "UCS-XgiMGKaiQsZNkgwsDbYg",
    "UCWSfNmixfPlKg9OCoqghwwg",
    "UCiiJRwQ0MUaQo8ZZuf18pPw",
    "UCO_MLsqOIoqYXbSXfyqluxw",
    "UCYbR2Su3mqwl88US4eyrQdg",
    "UCLHZET13eDxW-z1tSKTAdVg",
    "UCXI4M81wRAVYlFPw7V1l3Mw",
    "UCYZkmbBbVMWxB1gyioTPLIA",
    "UCleHL3J-q13VVmy7_WwFLCw",
    "UC0ljB6Xfg9RWjFWNb4JO-IQ",
];

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (FATWA_*)
/// 2. TOML config file (if FATWA_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the search/video proxy the aggregators call.
    ///
    /// Set via FATWA_PROXY_BASE_URL environment variable.
    #[serde(default = "default_proxy_base_url")]
    pub proxy_base_url: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via FATWA_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via FATWA_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Results per search page, and channels per video page.
    ///
    /// Set via FATWA_PAGE_SIZE environment variable.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Videos requested from each channel per round.
    ///
    /// Set via FATWA_VIDEOS_PER_CHANNEL environment variable.
    #[serde(default = "default_videos_per_channel")]
    pub videos_per_channel: u8,

    /// Lifetime of cached result sets in seconds.
    ///
    /// Set via FATWA_CACHE_TTL_SECS environment variable.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Seconds between cache sweeps; 0 disables the sweeper.
    ///
    /// Set via FATWA_CACHE_SWEEP_INTERVAL_SECS environment variable.
    #[serde(default = "default_cache_sweep_interval_secs")]
    pub cache_sweep_interval_secs: u64,

    /// Display language for notices.
    ///
    /// Set via FATWA_LANGUAGE environment variable (`en` or `ar`).
    #[serde(default)]
    pub language: Language,

    /// Regular sites searched when a query does not name its own.
    ///
    /// Set via FATWA_SITES environment variable (e.g. `[a.com, b.org]`).
    #[serde(default = "default_sites")]
    pub sites: Vec<String>,

    /// YouTube channel roster.
    ///
    /// Set via FATWA_CHANNELS environment variable.
    #[serde(default = "default_channels")]
    pub channels: Vec<String>,

    /// Address the proxy listens on.
    ///
    /// Set via FATWA_BIND_ADDR environment variable.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Google API base URL used by the proxy.
    ///
    /// Set via FATWA_GOOGLE_BASE_URL environment variable.
    #[serde(default = "default_google_base_url")]
    pub google_base_url: String,

    /// Google Custom Search API key (proxy only).
    ///
    /// Set via FATWA_GOOGLE_API_KEY environment variable.
    #[serde(default)]
    pub google_api_key: Option<String>,

    /// Google Programmable Search engine id (proxy only).
    ///
    /// Set via FATWA_SEARCH_ENGINE_ID environment variable.
    #[serde(default)]
    pub search_engine_id: Option<String>,

    /// YouTube Data API key (proxy only).
    ///
    /// Set via FATWA_YOUTUBE_API_KEY environment variable.
    #[serde(default)]
    pub youtube_api_key: Option<String>,
}

fn default_proxy_base_url() -> String {
    "http://127.0.0.1:3000".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_user_agent() -> String {
    "fatwa-search/0.1".into()
}

fn default_page_size() -> u32 {
    10
}

fn default_videos_per_channel() -> u8 {
    5
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_cache_sweep_interval_secs() -> u64 {
    60
}

fn default_sites() -> Vec<String> {
    DEFAULT_SITES.iter().map(|s| s.to_string()).collect()
}

fn default_channels() -> Vec<String> {
    DEFAULT_CHANNELS.iter().map(|s| s.to_string()).collect()
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".into()
}

fn default_google_base_url() -> String {
    "https://www.googleapis.com".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            proxy_base_url: default_proxy_base_url(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            page_size: default_page_size(),
            videos_per_channel: default_videos_per_channel(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_sweep_interval_secs: default_cache_sweep_interval_secs(),
            language: Language::default(),
            sites: default_sites(),
            channels: default_channels(),
            bind_addr: default_bind_addr(),
            google_base_url: default_google_base_url(),
            google_api_key: None,
            search_engine_id: None,
            youtube_api_key: None,
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Sweep interval, or `None` when sweeping is disabled.
    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.cache_sweep_interval_secs > 0).then(|| Duration::from_secs(self.cache_sweep_interval_secs))
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `FATWA_`
    /// 2. TOML file from `FATWA_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("FATWA_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("FATWA_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Google credentials for the search endpoint.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the API key or engine id is not set.
    pub fn require_search_credentials(&self) -> Result<(&str, &str), ConfigError> {
        let key = self.google_api_key.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "google_api_key".into(),
            hint: "Set FATWA_GOOGLE_API_KEY environment variable".into(),
        })?;
        let cx = self.search_engine_id.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "search_engine_id".into(),
            hint: "Set FATWA_SEARCH_ENGINE_ID environment variable".into(),
        })?;
        Ok((key, cx))
    }

    /// YouTube key for the video endpoint.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the YouTube API key is not set.
    pub fn require_youtube_api_key(&self) -> Result<&str, ConfigError> {
        self.youtube_api_key.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "youtube_api_key".into(),
            hint: "Set FATWA_YOUTUBE_API_KEY environment variable".into(),
        })
    }
}
