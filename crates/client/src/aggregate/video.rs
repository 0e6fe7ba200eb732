//! Video aggregation across a fixed channel roster.
//!
//! A new search queries the first `page_size` channels. Each `load_more`
//! queries the next slice; the cursor is the start of the last slice
//! committed. A quota failure on any channel fails the whole round.

use std::sync::Arc;

use fatwa_core::{
    CacheKey, Error, FilterSet, Round, RoundController, RoundOutcome, TtlCache, VideoKey, VideoResult,
};
use futures_util::future::join_all;
use serde::Serialize;
use tokio::sync::Mutex;

use super::{RoundReport, Snapshot, observed, rank, superseded};
use crate::provider::VideoProvider;
use crate::proxy::{ProviderError, VideoRequest};

#[derive(Debug, Default)]
struct VideoState {
    query: Option<String>,
    results: Vec<VideoResult>,
    cursor: usize,
    has_more: bool,
}

/// A channel present in the current result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelFacet {
    pub channel_id: String,
    pub channel_title: String,
}

/// Per-session video search state and round driver.
pub struct VideoAggregator {
    provider: Arc<dyn VideoProvider>,
    cache: Arc<TtlCache<Vec<VideoResult>>>,
    rounds: RoundController,
    channels: Vec<String>,
    page_size: usize,
    per_channel: u8,
    state: Mutex<VideoState>,
}

impl VideoAggregator {
    pub fn new(
        provider: Arc<dyn VideoProvider>, cache: Arc<TtlCache<Vec<VideoResult>>>, channels: Vec<String>,
        page_size: usize, per_channel: u8,
    ) -> Self {
        Self {
            provider,
            cache,
            rounds: RoundController::new(),
            channels,
            page_size: page_size.max(1),
            per_channel,
            state: Mutex::new(VideoState::default()),
        }
    }

    /// Run one round for `text`, superseding any round in flight.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` for blank text without touching the
    /// round in flight, `Error::QuotaExceeded` when any channel reports an
    /// exhausted quota.
    pub async fn search(&self, text: &str, is_new: bool) -> Result<RoundOutcome<RoundReport>, Error> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput("query cannot be empty".into()));
        }

        let round = self.rounds.begin().await;
        let outcome = self.run_round(&round, text, is_new).await;
        self.rounds.finish(&round).await;
        outcome
    }

    pub async fn new_search(&self, text: &str) -> Result<RoundOutcome<RoundReport>, Error> {
        self.search(text, true).await
    }

    /// Query the next roster slice for the active search.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoActiveSearch` if no new search has completed yet.
    pub async fn load_more(&self) -> Result<RoundOutcome<RoundReport>, Error> {
        let active = self.state.lock().await.query.clone();
        match active {
            Some(text) => self.search(&text, false).await,
            None => Err(Error::NoActiveSearch),
        }
    }

    pub async fn cancel(&self) {
        self.rounds.cancel().await;
    }

    fn has_more_after(&self, cursor: usize) -> bool {
        cursor + self.page_size < self.channels.len()
    }

    async fn run_round(&self, round: &Round, text: &str, is_new: bool) -> Result<RoundOutcome<RoundReport>, Error> {
        let slice_start = if is_new { 0 } else { self.state.lock().await.cursor + self.page_size };

        if slice_start >= self.channels.len() {
            let mut state = self.state.lock().await;
            state.has_more = false;
            tracing::debug!(round = round.id(), "channel roster exhausted");
            return Ok(RoundOutcome::Completed(RoundReport {
                fetched: 0,
                total: state.results.len(),
                has_more: false,
                from_cache: false,
                notice: None,
            }));
        }

        let slice_end = (slice_start + self.page_size).min(self.channels.len());
        let slice = &self.channels[slice_start..slice_end];
        let key = CacheKey::from_params(&VideoKey { query: text, channels: slice, cursor: slice_start })?;

        if is_new && let Some(cached) = self.cache.get(&key) {
            return Ok(self.commit(round, text, slice_start, key, cached, true).await);
        }

        let calls = slice.iter().map(|channel| {
            let request = VideoRequest::new(text, channel.as_str(), self.per_channel);
            async move { observed(round, self.provider.channel_videos(&request)).await }
        });
        let responses = join_all(calls).await;

        if round.is_cancelled() {
            return Ok(superseded(round));
        }

        if let Some(position) = responses
            .iter()
            .position(|response| matches!(response, Err(ProviderError::QuotaExceeded)))
        {
            tracing::warn!(round = round.id(), channel = %slice[position], "video quota exceeded; failing round");
            return Err(Error::QuotaExceeded);
        }

        let mut merged = Vec::new();
        for (channel, response) in slice.iter().zip(responses) {
            match response {
                Ok(videos) => merged.extend(videos),
                Err(err) => {
                    tracing::warn!(%channel, error = %err, "channel search failed; continuing without it");
                }
            }
        }

        let ranked = rank::rank_videos(merged);
        Ok(self.commit(round, text, slice_start, key, ranked, false).await)
    }

    async fn commit(
        &self, round: &Round, text: &str, slice_start: usize, key: CacheKey, videos: Vec<VideoResult>,
        from_cache: bool,
    ) -> RoundOutcome<RoundReport> {
        let mut state = self.state.lock().await;
        if round.is_cancelled() {
            return superseded(round);
        }

        let fetched = videos.len();
        if slice_start == 0 {
            if fetched > 0 && !from_cache {
                self.cache.set(key, videos.clone());
            }
            state.query = Some(text.to_string());
            state.results = videos;
        } else {
            state.results.extend(videos);
        }
        state.cursor = slice_start;
        state.has_more = self.has_more_after(slice_start);

        tracing::debug!(
            round = round.id(),
            fetched,
            total = state.results.len(),
            cursor = state.cursor,
            from_cache,
            "video round committed"
        );

        RoundOutcome::Completed(RoundReport {
            fetched,
            total: state.results.len(),
            has_more: state.has_more,
            from_cache,
            notice: None,
        })
    }

    pub async fn snapshot(&self) -> Snapshot<VideoResult> {
        let state = self.state.lock().await;
        Snapshot { results: state.results.clone(), has_more: state.has_more }
    }

    /// Start of the last roster slice committed.
    pub async fn cursor(&self) -> usize {
        self.state.lock().await.cursor
    }

    pub async fn active_query(&self) -> Option<String> {
        self.state.lock().await.query.clone()
    }

    pub async fn filtered(&self, selection: &FilterSet) -> Vec<VideoResult> {
        selection.apply(&self.state.lock().await.results)
    }

    /// Channels present in the current result set, in first-seen order.
    pub async fn facets(&self) -> Vec<ChannelFacet> {
        let state = self.state.lock().await;
        let mut facets: Vec<ChannelFacet> = Vec::new();
        for video in &state.results {
            if !facets.iter().any(|facet| facet.channel_id == video.channel_id) {
                facets.push(ChannelFacet {
                    channel_id: video.channel_id.clone(),
                    channel_title: video.channel_title.clone(),
                });
            }
        }
        facets
    }
}
