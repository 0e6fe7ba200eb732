//! video_search, video_search_more and video_results tool implementations.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use fatwa_client::{ChannelFacet, RoundReport};
use fatwa_core::{Error, FilterSet, RoundOutcome, VideoResult};

use super::{Status, json_result};
use crate::error::video_error;
use crate::session::Session;

/// Input parameters for video_search tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct VideoSearchParams {
    /// Search query (required).
    pub query: String,

    /// Only show videos from these channel ids.
    #[serde(default)]
    pub filters: Vec<String>,
}

/// Input parameters for video_search_more and video_results tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct VideoViewParams {
    /// Only show videos from these channel ids.
    #[serde(default)]
    pub filters: Vec<String>,
}

/// A video with its player links.
#[derive(Debug, Clone, Serialize)]
pub struct VideoEntry {
    #[serde(flatten)]
    pub video: VideoResult,
    pub watch_url: String,
    pub embed_url: String,
}

impl From<VideoResult> for VideoEntry {
    fn from(video: VideoResult) -> Self {
        Self { watch_url: video.watch_url(), embed_url: video.embed_url(), video }
    }
}

/// Output structure for the video tools.
#[derive(Debug, Clone, Serialize)]
pub struct VideoSearchOutput {
    pub status: Status,
    pub results: Vec<VideoEntry>,
    pub total: usize,
    pub has_more: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_cache: Option<bool>,
    /// Channels available as filters.
    pub facets: Vec<ChannelFacet>,
}

async fn render(session: &Session, report: Option<&RoundReport>, filters: Vec<String>) -> VideoSearchOutput {
    let selection = FilterSet::new(filters);
    let snapshot = session.video.snapshot().await;
    VideoSearchOutput {
        status: if report.is_some() { Status::Completed } else { Status::Current },
        results: selection.apply(&snapshot.results).into_iter().map(VideoEntry::from).collect(),
        total: snapshot.results.len(),
        has_more: snapshot.has_more,
        from_cache: report.map(|r| r.from_cache),
        facets: session.video.facets().await,
    }
}

async fn respond(
    session: &Session, outcome: Result<RoundOutcome<RoundReport>, Error>, filters: Vec<String>,
) -> Result<CallToolResult, McpError> {
    match outcome.map_err(video_error)? {
        RoundOutcome::Completed(report) => json_result(&render(session, Some(&report), filters).await),
        RoundOutcome::Superseded => json_result(&Status::superseded()),
    }
}

/// Implementation of the video_search tool.
pub async fn search_impl(session: &Session, params: VideoSearchParams) -> Result<CallToolResult, McpError> {
    let outcome = session.video.new_search(&params.query).await;
    respond(session, outcome, params.filters).await
}

/// Implementation of the video_search_more tool.
pub async fn more_impl(session: &Session, params: VideoViewParams) -> Result<CallToolResult, McpError> {
    let outcome = session.video.load_more().await;
    respond(session, outcome, params.filters).await
}

/// Implementation of the video_results tool.
pub async fn results_impl(session: &Session, params: VideoViewParams) -> Result<CallToolResult, McpError> {
    if session.video.active_query().await.is_none() {
        return Err(video_error(Error::NoActiveSearch));
    }
    json_result(&render(session, None, params.filters).await)
}
