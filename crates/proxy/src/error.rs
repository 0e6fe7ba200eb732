//! Proxy failures and their two wire shapes.
//!
//! `/api/search` answers `{error: {message, code, reason?}}`; `/api/youtube`
//! answers `{error: "<message>"}` with the bare quota sentinel.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Sentinel the video endpoint returns for an exhausted quota.
pub const QUOTA_SENTINEL: &str = "QUOTA_EXCEEDED";

pub const SEARCH_NOT_CONFIGURED: &str = "Search API credentials are not configured";
pub const YOUTUBE_NOT_CONFIGURED: &str = "YouTube API credentials are not configured";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidQuery(&'static str),

    #[error("{0}")]
    NotConfigured(&'static str),

    #[error("API quota exceeded")]
    QuotaExceeded,

    #[error("Upstream request timed out")]
    Timeout,

    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            ApiError::NotConfigured(_) | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::QuotaExceeded => StatusCode::FORBIDDEN,
            ApiError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Upstream { status, .. } => *status,
        }
    }

    /// Machine-readable tag carried by search failures.
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            ApiError::InvalidQuery(_) => Some("INVALID_QUERY"),
            ApiError::NotConfigured(_) => Some("NOT_CONFIGURED"),
            ApiError::QuotaExceeded => Some(QUOTA_SENTINEL),
            ApiError::Timeout => Some("TIMEOUT"),
            ApiError::Upstream { .. } | ApiError::Internal => None,
        }
    }

    /// Classify a transport failure talking to Google.
    ///
    /// The request URL carries the API key, so it is stripped before logging.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            tracing::warn!("upstream request timed out");
            return ApiError::Timeout;
        }
        tracing::error!(error = %err.without_url(), "upstream request failed");
        ApiError::Internal
    }
}

#[derive(Debug, Serialize)]
struct DetailedBody {
    message: String,
    code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'static str>,
}

/// Failure of `/api/search`.
#[derive(Debug)]
pub struct SearchFailure(pub ApiError);

impl From<ApiError> for SearchFailure {
    fn from(err: ApiError) -> Self {
        Self(err)
    }
}

impl IntoResponse for SearchFailure {
    fn into_response(self) -> Response {
        let status = self.0.status();
        let reason = self.0.reason();
        tracing::warn!(status = status.as_u16(), reason, error = %self.0, "search request failed");
        let body = DetailedBody { message: self.0.to_string(), code: status.as_u16(), reason };
        (status, Json(json!({ "error": body }))).into_response()
    }
}

/// Failure of `/api/youtube`.
#[derive(Debug)]
pub struct VideoFailure(pub ApiError);

impl From<ApiError> for VideoFailure {
    fn from(err: ApiError) -> Self {
        Self(err)
    }
}

impl IntoResponse for VideoFailure {
    fn into_response(self) -> Response {
        let status = self.0.status();
        tracing::warn!(status = status.as_u16(), error = %self.0, "video request failed");
        let message = match self.0 {
            ApiError::QuotaExceeded => QUOTA_SENTINEL.to_string(),
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
