//! End-to-end aggregation scenarios against in-memory providers.
//!
//! No network calls; providers count and optionally gate their calls.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use fatwa_client::{
    ProviderError, SearchAggregator, SearchPage, SearchProvider, SearchRequest, VideoAggregator, VideoProvider,
    VideoRequest,
};
use fatwa_core::config::{DEFAULT_CHANNELS, DEFAULT_SITES};
use fatwa_core::{
    CacheKey, Error, Notice, SearchResult, SiteQuery, SpecialSiteFlags, TtlCache, VideoKey, VideoResult,
};
use tokio::sync::Notify;

fn result(link: String) -> SearchResult {
    SearchResult { title: link.clone(), snippet: String::new(), link }
}

fn default_sites() -> Vec<String> {
    DEFAULT_SITES.iter().map(|s| s.to_string()).collect()
}

/// Answers per `site`, or for the combined query when `site` is absent.
/// Queries containing `gate_on` block until released.
#[derive(Default)]
struct ScriptedSearch {
    by_site: HashMap<String, Vec<SearchResult>>,
    by_query: HashMap<String, Vec<SearchResult>>,
    gate_on: Option<String>,
    gate: Notify,
    calls: AtomicUsize,
}

#[async_trait]
impl SearchProvider for ScriptedSearch {
    async fn search(&self, request: &SearchRequest) -> Result<SearchPage, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate_on) = &self.gate_on
            && request.q.contains(gate_on.as_str())
        {
            self.gate.notified().await;
        }
        let results = match &request.site {
            Some(site) => self.by_site.get(site).cloned(),
            None => self
                .by_query
                .iter()
                .find(|(text, _)| request.q.ends_with(text.as_str()))
                .map(|(_, results)| results.clone()),
        };
        Ok(SearchPage { results: results.unwrap_or_default(), info: None })
    }
}

#[tokio::test]
async fn taqwa_round_ranks_special_first_and_caches() {
    let special: Vec<SearchResult> = (0..4).map(|i| result(format!("https://dorar.net/hadith/{i}"))).collect();
    let regular: Vec<SearchResult> = (0..8).map(|i| result(format!("https://binbaz.org.sa/fatwas/{i}"))).collect();

    let provider = Arc::new(ScriptedSearch {
        by_site: HashMap::from([("dorar.net".to_string(), special.clone())]),
        by_query: HashMap::from([("تقوى".to_string(), regular.clone())]),
        ..Default::default()
    });
    let cache = Arc::new(TtlCache::new("search", Duration::from_secs(300)));
    let aggregator = SearchAggregator::new(provider.clone(), cache.clone(), 10);

    let query =
        SiteQuery::new("تقوى", default_sites(), SpecialSiteFlags { dorar: true, ..Default::default() }).unwrap();
    let report = aggregator.new_search(&query).await.unwrap().completed().unwrap();

    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    assert_eq!(report.fetched, 12);
    assert!(report.has_more);
    assert_eq!(report.notice, Some(Notice::IndexingDisclaimer));

    let shown = aggregator.snapshot().await.results;
    assert_eq!(&shown[..4], &special[..]);
    assert_eq!(&shown[4..], &regular[..]);

    let key = CacheKey::from_params(&query.cache_key(1)).unwrap();
    assert_eq!(cache.get(&key), Some(shown.clone()));

    let again = aggregator.new_search(&query).await.unwrap().completed().unwrap();
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    assert!(again.from_cache);
    assert_eq!(aggregator.snapshot().await.results, shown);
}

#[tokio::test]
async fn stale_search_round_is_discarded() {
    let provider = Arc::new(ScriptedSearch {
        by_query: HashMap::from([
            ("slow".to_string(), vec![result("https://binbaz.org.sa/slow".into())]),
            ("fast".to_string(), vec![result("https://binbaz.org.sa/fast".into())]),
        ]),
        gate_on: Some("slow".to_string()),
        ..Default::default()
    });
    let cache = Arc::new(TtlCache::new("search", Duration::from_secs(300)));
    let aggregator = Arc::new(SearchAggregator::new(provider.clone(), cache.clone(), 10));
    let sites = default_sites();

    let round_a = tokio::spawn({
        let aggregator = aggregator.clone();
        let query = SiteQuery::new("slow", sites.clone(), SpecialSiteFlags::default()).unwrap();
        async move { aggregator.new_search(&query).await }
    });
    while provider.calls.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }

    let fast = SiteQuery::new("fast", sites, SpecialSiteFlags::default()).unwrap();
    let round_b = aggregator.new_search(&fast).await.unwrap();
    provider.gate.notify_waiters();

    let round_a = round_a.await.unwrap().unwrap();
    assert!(round_a.is_superseded());
    assert!(round_b.completed().is_some());

    let shown = aggregator.snapshot().await.results;
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].link, "https://binbaz.org.sa/fast");
    assert_eq!(aggregator.active_query().await, Some(fast));
    assert_eq!(cache.size(), 1);
}

/// Returns one video per channel; channels listed in `quota` report an
/// exhausted quota.
#[derive(Default)]
struct RosterVideos {
    quota: Vec<String>,
    calls: AtomicUsize,
}

#[async_trait]
impl VideoProvider for RosterVideos {
    async fn channel_videos(&self, request: &VideoRequest) -> Result<Vec<VideoResult>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.quota.contains(&request.channel_id) {
            return Err(ProviderError::QuotaExceeded);
        }
        Ok(vec![VideoResult {
            video_id: format!("{}-v", request.channel_id),
            title: request.q.clone(),
            channel_id: request.channel_id.clone(),
            channel_title: request.channel_id.clone(),
            published_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            thumbnail_url: String::new(),
        }])
    }
}

fn roster() -> Vec<String> {
    DEFAULT_CHANNELS.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn tawheed_quota_on_seventh_channel_fails_round() {
    let provider = Arc::new(RosterVideos { quota: vec![DEFAULT_CHANNELS[6].to_string()], ..Default::default() });
    let cache = Arc::new(TtlCache::new("video", Duration::from_secs(300)));
    let aggregator = VideoAggregator::new(provider.clone(), cache.clone(), roster(), 10, 5);

    let err = aggregator.new_search("tawheed").await.unwrap_err();

    assert!(matches!(err, Error::QuotaExceeded));
    assert_eq!(fatwa_core::messages::video_failure(&err), "API quota exceeded. Please try again later.");
    assert_eq!(provider.calls.load(Ordering::SeqCst), 10);

    let snapshot = aggregator.snapshot().await;
    assert!(snapshot.results.is_empty());
    assert!(!snapshot.has_more);
    assert_eq!(aggregator.cursor().await, 0);
    assert_eq!(cache.size(), 0);
}

#[tokio::test]
async fn quota_during_load_more_keeps_prior_page() {
    let provider = Arc::new(RosterVideos { quota: vec![DEFAULT_CHANNELS[16].to_string()], ..Default::default() });
    let cache = Arc::new(TtlCache::new("video", Duration::from_secs(300)));
    let aggregator = VideoAggregator::new(provider, cache, roster(), 10, 5);

    aggregator.new_search("tawheed").await.unwrap();
    let before = aggregator.snapshot().await;
    assert!(before.has_more);

    assert!(matches!(aggregator.load_more().await, Err(Error::QuotaExceeded)));
    assert_eq!(aggregator.snapshot().await, before);
    assert_eq!(aggregator.cursor().await, 0);
}

#[tokio::test]
async fn video_pagination_covers_whole_roster() {
    let provider = Arc::new(RosterVideos::default());
    let cache = Arc::new(TtlCache::new("video", Duration::from_secs(300)));
    let aggregator = VideoAggregator::new(provider.clone(), cache, roster(), 10, 5);

    let mut report = aggregator.new_search("tawheed").await.unwrap().completed().unwrap();
    while report.has_more {
        report = aggregator.load_more().await.unwrap().completed().unwrap();
    }

    assert_eq!(provider.calls.load(Ordering::SeqCst), 21);
    assert_eq!(aggregator.snapshot().await.results.len(), 21);
    assert_eq!(aggregator.cursor().await, 20);
}

/// One video per channel, tagged with the query text. Queries containing
/// `gate_on` block until released.
#[derive(Default)]
struct GatedVideos {
    gate_on: String,
    gate: Notify,
    calls: AtomicUsize,
}

#[async_trait]
impl VideoProvider for GatedVideos {
    async fn channel_videos(&self, request: &VideoRequest) -> Result<Vec<VideoResult>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if request.q.contains(self.gate_on.as_str()) {
            self.gate.notified().await;
        }
        Ok(vec![VideoResult {
            video_id: format!("{}-{}", request.q, request.channel_id),
            title: request.q.clone(),
            channel_id: request.channel_id.clone(),
            channel_title: request.channel_id.clone(),
            published_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            thumbnail_url: String::new(),
        }])
    }
}

#[tokio::test]
async fn stale_video_round_is_discarded() {
    let channels = vec!["UC1".to_string(), "UC2".to_string()];
    let provider = Arc::new(GatedVideos { gate_on: "slow".to_string(), ..Default::default() });
    let cache = Arc::new(TtlCache::new("video", Duration::from_secs(300)));
    let aggregator = Arc::new(VideoAggregator::new(provider.clone(), cache.clone(), channels.clone(), 2, 5));

    let round_a = tokio::spawn({
        let aggregator = aggregator.clone();
        async move { aggregator.new_search("slow").await }
    });
    while provider.calls.load(Ordering::SeqCst) < 2 {
        tokio::task::yield_now().await;
    }

    let round_b = aggregator.new_search("fast").await.unwrap();
    provider.gate.notify_waiters();

    let round_a = round_a.await.unwrap().unwrap();
    assert!(round_a.is_superseded());
    assert!(round_b.completed().is_some());

    let shown = aggregator.snapshot().await.results;
    assert_eq!(shown.len(), 2);
    assert!(shown.iter().all(|video| video.video_id.starts_with("fast-")));

    assert_eq!(cache.size(), 1);
    let fast_key = CacheKey::from_params(&VideoKey { query: "fast", channels: &channels, cursor: 0 }).unwrap();
    let slow_key = CacheKey::from_params(&VideoKey { query: "slow", channels: &channels, cursor: 0 }).unwrap();
    assert!(cache.get(&fast_key).is_some());
    assert!(cache.get(&slow_key).is_none());
}
