//! Result types produced by the proxy and held by sessions and caches.
//!
//! Both are immutable once received.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single web search hit.
///
/// `link` is the identity of a result within a result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub link: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub snippet: String,
}

impl SearchResult {
    /// Authority component of `link`, if it parses as a URL with a host.
    pub fn hostname(&self) -> Option<String> {
        url::Url::parse(&self.link)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
    }
}

/// A single video from a channel search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoResult {
    pub video_id: String,
    pub title: String,
    pub channel_id: String,
    pub channel_title: String,
    pub published_at: DateTime<Utc>,
    pub thumbnail_url: String,
}

impl VideoResult {
    pub fn watch_url(&self) -> String {
        format!("https://youtube.com/watch?v={}", self.video_id)
    }

    pub fn embed_url(&self) -> String {
        format!("https://www.youtube.com/embed/{}", self.video_id)
    }
}
