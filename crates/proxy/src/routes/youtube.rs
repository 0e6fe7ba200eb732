//! `GET /api/youtube`: YouTube Data API search within one channel.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{optional, required};
use crate::error::{ApiError, VideoFailure, YOUTUBE_NOT_CONFIGURED};
use crate::{AppState, upstream};

const DEFAULT_MAX_RESULTS: u8 = 5;

#[derive(Debug, Default, Deserialize)]
pub struct YoutubeParams {
    pub q: Option<String>,
    #[serde(rename = "channelId")]
    pub channel_id: Option<String>,
    #[serde(rename = "maxResults")]
    pub max_results: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct YoutubeBody {
    pub items: Vec<Value>,
}

pub async fn youtube(
    State(state): State<AppState>, Query(params): Query<YoutubeParams>,
) -> Result<Json<YoutubeBody>, VideoFailure> {
    let query = required(params.q.as_deref(), "Query parameter is required")?;
    let channel_id = required(params.channel_id.as_deref(), "Channel ID is required")?;
    let max_results = match optional(params.max_results.as_deref()) {
        None => DEFAULT_MAX_RESULTS,
        Some(raw) => raw
            .parse::<u8>()
            .ok()
            .filter(|n| (1..=50).contains(n))
            .ok_or(ApiError::InvalidQuery("maxResults must be between 1 and 50"))?,
    };
    let key = state
        .config
        .require_youtube_api_key()
        .map_err(|_| ApiError::NotConfigured(YOUTUBE_NOT_CONFIGURED))?;
    tracing::debug!(channel_id, max_results, "forwarding video search");

    let max_results = max_results.to_string();
    let request = state.http.get(state.endpoint("youtube/v3/search")).query(&[
        ("part", "snippet"),
        ("type", "video"),
        ("q", query),
        ("channelId", channel_id),
        ("maxResults", max_results.as_str()),
        ("key", key),
    ]);
    let envelope = upstream::fetch(request).await?;

    if let Some(error) = envelope.error {
        if error.code == Some(StatusCode::FORBIDDEN.as_u16()) && error.is_quota() {
            return Err(ApiError::QuotaExceeded.into());
        }
        return Err(error.into_upstream("YouTube API error").into());
    }

    Ok(Json(YoutubeBody { items: envelope.items }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use fatwa_core::AppConfig;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::routes::testing::{API_KEY, app, configured, get_json};

    #[tokio::test]
    async fn test_missing_channel() {
        let (status, json) = get_json(app(configured("http://127.0.0.1:9")), "/api/youtube?q=tawheed").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Channel ID is required");
    }

    #[tokio::test]
    async fn test_not_configured() {
        let (status, json) = get_json(app(AppConfig::default()), "/api/youtube?q=tawheed&channelId=UC1").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "YouTube API credentials are not configured");
    }

    #[tokio::test]
    async fn test_forwards_channel_search() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/youtube/v3/search"))
            .and(query_param("part", "snippet"))
            .and(query_param("type", "video"))
            .and(query_param("q", "tawheed"))
            .and(query_param("channelId", "UC1"))
            .and(query_param("maxResults", "5"))
            .and(query_param("key", API_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "kind": "youtube#searchListResponse",
                "items": [{"id": {"videoId": "abc"}, "snippet": {"title": "Tawheed"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (status, json) = get_json(app(configured(&server.uri())), "/api/youtube?q=tawheed&channelId=UC1").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["items"][0]["id"]["videoId"], "abc");
        assert!(json.get("kind").is_none());
    }

    #[tokio::test]
    async fn test_quota_sentinel() {
        let server = MockServer::start().await;
        Mock::given(path("/youtube/v3/search"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": {"code": 403, "message": "quota", "errors": [{"reason": "quotaExceeded"}]}
            })))
            .mount(&server)
            .await;

        let (status, json) = get_json(app(configured(&server.uri())), "/api/youtube?q=tawheed&channelId=UC1").await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["error"], "QUOTA_EXCEEDED");
    }

    #[tokio::test]
    async fn test_other_forbidden_is_not_quota() {
        let server = MockServer::start().await;
        Mock::given(path("/youtube/v3/search"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": {
                    "code": 403,
                    "message": "The caller does not have permission",
                    "errors": [{"reason": "forbidden"}]
                }
            })))
            .mount(&server)
            .await;

        let (status, json) = get_json(app(configured(&server.uri())), "/api/youtube?q=tawheed&channelId=UC1").await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["error"], "The caller does not have permission");
    }

    #[tokio::test]
    async fn test_invalid_max_results() {
        let (status, json) =
            get_json(app(configured("http://127.0.0.1:9")), "/api/youtube?q=tawheed&channelId=UC1&maxResults=99").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "maxResults must be between 1 and 50");
    }
}
