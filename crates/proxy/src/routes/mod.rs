//! HTTP routes of the proxy.

pub mod search;
pub mod youtube;

use axum::Json;
use serde_json::{Value, json};

use crate::error::ApiError;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "service": "fatwa-proxy", "version": env!("CARGO_PKG_VERSION") }))
}

/// Non-blank value of a required parameter.
pub(crate) fn required<'a>(value: Option<&'a str>, message: &'static str) -> Result<&'a str, ApiError> {
    value.map(str::trim).filter(|v| !v.is_empty()).ok_or(ApiError::InvalidQuery(message))
}

/// Non-blank value of an optional parameter.
pub(crate) fn optional(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
pub(crate) mod testing {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
    };
    use fatwa_core::AppConfig;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::{AppState, router};

    pub const API_KEY: &str = "secret-key";

    /// Fully configured proxy pointed at `base`.
    pub fn configured(base: &str) -> AppConfig {
        AppConfig {
            google_base_url: base.to_string(),
            google_api_key: Some(API_KEY.into()),
            search_engine_id: Some("engine-1".into()),
            youtube_api_key: Some(API_KEY.into()),
            ..Default::default()
        }
    }

    pub fn app(config: AppConfig) -> Router {
        router(AppState::new(config).unwrap())
    }

    pub async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let (status, body) = get(app, uri).await;
        (status, serde_json::from_str(&body).unwrap())
    }
}
