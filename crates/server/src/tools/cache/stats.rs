//! cache_stats tool implementation.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use serde::Serialize;

use fatwa_core::TtlCache;

use crate::session::Caches;
use crate::tools::json_result;

/// Occupancy of one cache namespace.
#[derive(Debug, Clone, Serialize)]
pub struct NamespaceStats {
    /// Stored entries, including expired ones not yet swept.
    pub size: usize,
    pub ttl_secs: u64,
}

impl<V: Clone + Send + Sync + 'static> From<&TtlCache<V>> for NamespaceStats {
    fn from(cache: &TtlCache<V>) -> Self {
        Self { size: cache.size(), ttl_secs: cache.ttl().as_secs() }
    }
}

/// Output from the cache_stats tool.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsOutput {
    pub search: NamespaceStats,
    pub video: NamespaceStats,
}

/// Implementation of the cache_stats tool.
pub fn stats_impl(caches: &Caches) -> Result<CallToolResult, McpError> {
    let output = CacheStatsOutput {
        search: NamespaceStats::from(caches.search.as_ref()),
        video: NamespaceStats::from(caches.video.as_ref()),
    };
    json_result(&output)
}
