//! Google API responses and their error envelope.

use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;

/// Upstream reasons that mean the quota is spent.
const QUOTA_REASONS: [&str; 4] = ["quotaExceeded", "dailyLimitExceeded", "rateLimitExceeded", "userRateLimitExceeded"];

/// Body of any Google API response. Items are passed through untouched.
#[derive(Debug, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub error: Option<GoogleError>,
    #[serde(default)]
    pub items: Vec<Value>,
    #[serde(default, rename = "searchInformation")]
    pub search_information: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GoogleError {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<GoogleErrorItem>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GoogleErrorItem {
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl GoogleError {
    pub fn is_quota(&self) -> bool {
        self.errors.iter().any(|item| {
            item.reason.as_deref().is_some_and(|reason| QUOTA_REASONS.contains(&reason))
                || item.message.as_deref().is_some_and(|message| message.to_ascii_lowercase().contains("quota"))
        })
    }

    /// Pass a non-quota failure through with its own status and message.
    pub fn into_upstream(self, fallback: &str) -> ApiError {
        let status = self
            .code
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        ApiError::Upstream { status, message: self.message.unwrap_or_else(|| fallback.to_string()) }
    }
}

/// Send a request and parse the body, whatever the status.
pub async fn fetch(request: reqwest::RequestBuilder) -> Result<Envelope, ApiError> {
    let response = request.send().await.map_err(ApiError::from_transport)?;
    let status = response.status();
    let body = response.bytes().await.map_err(ApiError::from_transport)?;

    serde_json::from_slice(&body).map_err(|e| {
        tracing::error!(status = status.as_u16(), error = %e, "upstream returned a malformed body");
        ApiError::Internal
    })
}
