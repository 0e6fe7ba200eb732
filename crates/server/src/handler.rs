//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.

use std::sync::Arc;

use crate::session::{Caches, Session};
use crate::tools::cache::{CacheClearParams, clear_impl, stats_impl};
use crate::tools::{SiteSearchParams, SiteViewParams, VideoSearchParams, VideoViewParams, site_search, video_search};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for fatwa-mcp.
#[derive(Clone)]
pub struct FatwaServer {
    tool_router: ToolRouter<Self>,
    session: Arc<Session>,
    caches: Caches,
}

#[tool_router]
impl FatwaServer {
    pub fn new(session: Session, caches: Caches) -> Self {
        Self { tool_router: Self::tool_router(), session: Arc::new(session), caches }
    }

    /// Start a new site search round.
    ///
    /// Supersedes any round still in flight for this session.
    #[tool(
        description = "Search scholar and fatwa sites. dorar.net results lead when included. Returns ranked results, hostname facets and a paging cursor."
    )]
    async fn site_search(&self, params: Parameters<SiteSearchParams>) -> Result<CallToolResult, McpError> {
        site_search::search_impl(&self.session, params.0).await
    }

    #[tool(description = "Fetch the next page of the active site search and append it to the results.")]
    async fn site_search_more(&self, params: Parameters<SiteViewParams>) -> Result<CallToolResult, McpError> {
        site_search::more_impl(&self.session, params.0).await
    }

    #[tool(description = "Show the active site search results under a hostname filter. No network requests are made.")]
    async fn site_results(&self, params: Parameters<SiteViewParams>) -> Result<CallToolResult, McpError> {
        site_search::results_impl(&self.session, params.0).await
    }

    /// Start a new video search over the configured channel roster.
    #[tool(
        description = "Search the configured scholar YouTube channels. Returns videos newest first with channel facets."
    )]
    async fn video_search(&self, params: Parameters<VideoSearchParams>) -> Result<CallToolResult, McpError> {
        video_search::search_impl(&self.session, params.0).await
    }

    #[tool(description = "Query the next slice of channels for the active video search and append the videos.")]
    async fn video_search_more(&self, params: Parameters<VideoViewParams>) -> Result<CallToolResult, McpError> {
        video_search::more_impl(&self.session, params.0).await
    }

    #[tool(description = "Show the active video search results under a channel filter. No network requests are made.")]
    async fn video_results(&self, params: Parameters<VideoViewParams>) -> Result<CallToolResult, McpError> {
        video_search::results_impl(&self.session, params.0).await
    }

    #[tool(description = "Report entry counts and TTL of the search and video result caches.")]
    async fn cache_stats(&self) -> Result<CallToolResult, McpError> {
        stats_impl(&self.caches)
    }

    #[tool(description = "Drop cached result sets. Target search, video or all (default).")]
    async fn cache_clear(&self, params: Parameters<CacheClearParams>) -> Result<CallToolResult, McpError> {
        clear_impl(&self.caches, params.0)
    }
}

impl ServerHandler for FatwaServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "fatwa-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::tools::testing::session;

    #[tokio::test]
    async fn test_router_lists_every_tool() {
        let (session, _calls) = session();
        let server = FatwaServer::new(session, Caches::new(Duration::from_secs(60)));

        let mut names: Vec<String> = server.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        names.sort();
        assert_eq!(
            names,
            [
                "cache_clear",
                "cache_stats",
                "site_results",
                "site_search",
                "site_search_more",
                "video_results",
                "video_search",
                "video_search_more"
            ]
        );
    }

    #[test]
    fn test_server_info_name() {
        let (session, _calls) = session();
        let server = FatwaServer::new(session, Caches::new(Duration::from_secs(60)));
        assert_eq!(server.get_info().server_info.name, "fatwa-mcp");
    }
}
