//! MCP tool implementations.
//!
//! This module contains all tools exposed by the fatwa-mcp server.

pub mod cache;
pub mod site_search;
pub mod video_search;

pub use site_search::{SiteSearchParams, SiteViewParams};
pub use video_search::{VideoSearchParams, VideoViewParams};

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

use fatwa_core::Language;

use crate::error::serialize_error;

/// Whether a view reflects a round that just completed, the unchanged
/// current state, or a round that lost to a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Completed,
    Current,
    Superseded,
}

/// Payload returned for a superseded round.
#[derive(Debug, Clone, Serialize)]
pub struct SupersededOutput {
    pub status: Status,
}

impl Status {
    pub fn superseded() -> SupersededOutput {
        SupersededOutput { status: Status::Superseded }
    }
}

pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output).map_err(|e| serialize_error(&e))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

pub(crate) fn parse_language(code: &str) -> Result<Language, McpError> {
    Ok(code.parse::<Language>()?)
}
