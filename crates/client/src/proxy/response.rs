//! Proxy response types and normalization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fatwa_core::{SearchResult, VideoResult};

use crate::proxy::ProviderError;

/// Sentinel the video endpoint uses for an exhausted quota.
pub const QUOTA_SENTINEL: &str = "QUOTA_EXCEEDED";

/// Raw success body of `GET /api/search`.
#[derive(Debug, Deserialize)]
pub struct SearchApiResponse {
    #[serde(default)]
    pub items: Vec<SearchResult>,
    #[serde(default, rename = "searchInformation")]
    pub search_information: Option<SearchInformation>,
}

/// Upstream result metadata. Logged, never cached.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SearchInformation {
    #[serde(default, rename = "totalResults")]
    pub total_results: Option<String>,
    #[serde(default, rename = "searchTime")]
    pub search_time: Option<f64>,
}

/// Normalized search response.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub results: Vec<SearchResult>,
    pub info: Option<SearchInformation>,
}

impl From<SearchApiResponse> for SearchPage {
    fn from(raw: SearchApiResponse) -> Self {
        SearchPage { results: raw.items, info: raw.search_information }
    }
}

/// Error envelope shared by both endpoints.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

/// `{message, code, reason}` from the search endpoint, or a bare string
/// from the video endpoint.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ErrorBody {
    Detailed {
        message: String,
        #[serde(default)]
        code: Option<u16>,
        #[serde(default)]
        reason: Option<String>,
    },
    Message(String),
}

impl ErrorBody {
    fn message(&self) -> &str {
        match self {
            ErrorBody::Detailed { message, .. } => message,
            ErrorBody::Message(message) => message,
        }
    }

    fn reason(&self) -> Option<&str> {
        match self {
            ErrorBody::Detailed { reason, .. } => reason.as_deref(),
            ErrorBody::Message(_) => None,
        }
    }
}

fn parse_error_body(body: &[u8]) -> Option<ErrorBody> {
    serde_json::from_slice::<ErrorEnvelope>(body).ok().map(|envelope| envelope.error)
}

/// Classify a failed search response by its reason tag, falling back to
/// the HTTP status.
pub(crate) fn search_error(status: u16, body: &[u8]) -> ProviderError {
    let error = parse_error_body(body);
    let message = error
        .as_ref()
        .map(|e| e.message().to_string())
        .unwrap_or_else(|| format!("HTTP {status}"));

    match (error.as_ref().and_then(ErrorBody::reason), status) {
        (Some("QUOTA_EXCEEDED"), _) | (None, 429) => ProviderError::QuotaExceeded,
        (Some("INVALID_QUERY"), _) | (None, 400) => ProviderError::InvalidQuery(message),
        (Some("NOT_CONFIGURED"), _) => ProviderError::NotConfigured(message),
        (Some("TIMEOUT"), _) | (None, 408 | 504) => ProviderError::Timeout,
        _ => ProviderError::Http { status, message },
    }
}

/// Classify a failed video response. Only the exact quota sentinel counts
/// as a quota failure.
pub(crate) fn video_error(status: u16, body: &[u8]) -> ProviderError {
    match parse_error_body(body) {
        Some(ErrorBody::Message(message)) if message == QUOTA_SENTINEL => ProviderError::QuotaExceeded,
        Some(error) if status == 400 => ProviderError::InvalidQuery(error.message().to_string()),
        Some(error) => ProviderError::Http { status, message: error.message().to_string() },
        None => ProviderError::Http { status, message: format!("HTTP {status}") },
    }
}

/// Raw success body of `GET /api/youtube`.
#[derive(Debug, Deserialize)]
pub struct VideoApiResponse {
    #[serde(default)]
    pub items: Vec<RawVideoItem>,
}

#[derive(Debug, Deserialize)]
pub struct RawVideoItem {
    #[serde(default)]
    pub id: RawVideoId,
    #[serde(default)]
    pub snippet: RawSnippet,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawVideoId {
    #[serde(default, rename = "videoId")]
    pub video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub channel_title: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub thumbnails: RawThumbnails,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawThumbnails {
    #[serde(default)]
    pub medium: Option<RawThumbnail>,
    #[serde(default)]
    pub high: Option<RawThumbnail>,
    #[serde(default, rename = "default")]
    pub fallback: Option<RawThumbnail>,
}

#[derive(Debug, Deserialize)]
pub struct RawThumbnail {
    pub url: String,
}

impl RawVideoItem {
    /// Normalize one item. Channel and playlist hits carry no `videoId`
    /// and yield `None`, as do items without a publish time.
    pub fn into_video(self) -> Option<VideoResult> {
        let video_id = self.id.video_id?;
        let published_at = self.snippet.published_at?;
        let thumbnails = self.snippet.thumbnails;
        let thumbnail_url = thumbnails
            .medium
            .or(thumbnails.high)
            .or(thumbnails.fallback)
            .map(|t| t.url)
            .unwrap_or_default();

        Some(VideoResult {
            video_id,
            title: self.snippet.title,
            channel_id: self.snippet.channel_id,
            channel_title: self.snippet.channel_title,
            published_at,
            thumbnail_url,
        })
    }
}

impl VideoApiResponse {
    pub fn into_videos(self) -> Vec<VideoResult> {
        self.items.into_iter().filter_map(RawVideoItem::into_video).collect()
    }
}
