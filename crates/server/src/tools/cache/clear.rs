//! cache_clear tool implementation.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::session::Caches;
use crate::tools::json_result;

/// Which namespace to clear.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CacheTarget {
    Search,
    Video,
    #[default]
    All,
}

/// Parameters for the cache_clear tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CacheClearParams {
    /// Namespace to clear: search, video or all (default).
    #[serde(default)]
    pub target: Option<CacheTarget>,
}

/// Output from the cache_clear tool.
#[derive(Debug, Clone, Serialize)]
pub struct CacheClearOutput {
    /// Entries dropped from the search namespace.
    pub search: usize,
    /// Entries dropped from the video namespace.
    pub video: usize,
}

/// Implementation of the cache_clear tool.
pub fn clear_impl(caches: &Caches, params: CacheClearParams) -> Result<CallToolResult, McpError> {
    let target = params.target.unwrap_or_default();
    let mut output = CacheClearOutput { search: 0, video: 0 };

    if matches!(target, CacheTarget::Search | CacheTarget::All) {
        output.search = caches.search.size();
        caches.search.clear();
    }
    if matches!(target, CacheTarget::Video | CacheTarget::All) {
        output.video = caches.video.size();
        caches.video.clear();
    }

    tracing::info!(?target, search = output.search, video = output.video, "cleared result caches");
    json_result(&output)
}
