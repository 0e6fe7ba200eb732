//! `GET /api/search`: Google Custom Search behind the proxy.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{optional, required};
use crate::error::{ApiError, SEARCH_NOT_CONFIGURED, SearchFailure};
use crate::{AppState, upstream};

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub site: Option<String>,
    pub start: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchBody {
    pub items: Vec<Value>,
    #[serde(rename = "searchInformation", skip_serializing_if = "Option::is_none")]
    pub search_information: Option<Value>,
}

pub async fn search(
    State(state): State<AppState>, Query(params): Query<SearchParams>,
) -> Result<Json<SearchBody>, SearchFailure> {
    let query = required(params.q.as_deref(), "Query parameter is required")?;
    let start = match optional(params.start.as_deref()) {
        None => 1,
        Some(raw) => raw
            .parse::<u32>()
            .ok()
            .filter(|start| *start >= 1)
            .ok_or(ApiError::InvalidQuery("start must be a positive integer"))?,
    };
    let (key, cx) = state
        .config
        .require_search_credentials()
        .map_err(|_| ApiError::NotConfigured(SEARCH_NOT_CONFIGURED))?;

    let site = optional(params.site.as_deref());
    let text = match site {
        Some(site) => format!("site:{site} {query}"),
        None => query.to_string(),
    };
    tracing::debug!(site, start, "forwarding search");

    let start = start.to_string();
    let request = state
        .http
        .get(state.endpoint("customsearch/v1"))
        .query(&[("key", key), ("cx", cx), ("q", text.as_str()), ("start", start.as_str())]);
    let envelope = upstream::fetch(request).await?;

    if let Some(error) = envelope.error {
        if error.is_quota() {
            return Err(ApiError::QuotaExceeded.into());
        }
        return Err(error.into_upstream("Search API error").into());
    }

    Ok(Json(SearchBody { items: envelope.items, search_information: envelope.search_information }))
}
