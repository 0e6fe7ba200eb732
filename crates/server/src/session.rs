//! Process-wide caches and the per-connection session.
//!
//! One MCP connection is one UI session: it owns a search aggregator and a
//! video aggregator. The caches are shared by every session in the process.

use std::sync::Arc;
use std::time::Duration;

use fatwa_client::{SearchAggregator, SearchProvider, VideoAggregator, VideoProvider};
use fatwa_core::{AppConfig, Language, SearchResult, SweepHandle, TtlCache, VideoResult};

/// The two cache namespaces.
#[derive(Debug, Clone)]
pub struct Caches {
    pub search: Arc<TtlCache<Vec<SearchResult>>>,
    pub video: Arc<TtlCache<Vec<VideoResult>>>,
}

impl Caches {
    pub fn new(ttl: Duration) -> Self {
        Self { search: Arc::new(TtlCache::new("search", ttl)), video: Arc::new(TtlCache::new("video", ttl)) }
    }

    /// Start a sweeper per cache. The caller keeps the handles alive.
    pub fn spawn_sweepers(&self, every: Duration) -> [SweepHandle; 2] {
        [self.search.spawn_sweeper(every), self.video.spawn_sweeper(every)]
    }
}

/// Aggregation state of one connected client.
pub struct Session {
    pub search: SearchAggregator,
    pub video: VideoAggregator,
    pub language: Language,
    pub sites: Vec<String>,
}

impl Session {
    pub fn new(
        config: &AppConfig, caches: &Caches, search: Arc<dyn SearchProvider>, video: Arc<dyn VideoProvider>,
    ) -> Self {
        Self {
            search: SearchAggregator::new(search, caches.search.clone(), config.page_size),
            video: VideoAggregator::new(
                video,
                caches.video.clone(),
                config.channels.clone(),
                config.page_size as usize,
                config.videos_per_channel,
            ),
            language: config.language,
            sites: config.sites.clone(),
        }
    }
}
