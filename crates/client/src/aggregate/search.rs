//! Site search aggregation.
//!
//! One round issues a call per enabled special site plus one combined
//! `site:` OR-query for the regular sites, all with the same start offset.
//! Special-site calls are best-effort; the combined call is load-bearing.

use std::sync::Arc;

use fatwa_core::{
    CacheKey, Error, FilterSet, Notice, Round, RoundController, RoundOutcome, SearchResult, SiteQuery, TtlCache,
    filter,
};
use futures_util::future::join_all;
use tokio::sync::Mutex;

use super::{RoundReport, Snapshot, fail, observed, rank, superseded};
use crate::proxy::{SearchPage, SearchRequest};
use crate::provider::SearchProvider;

/// Start offset of a new search.
pub const FIRST_START: u32 = 1;

#[derive(Debug)]
struct SearchState {
    query: Option<SiteQuery>,
    results: Vec<SearchResult>,
    next_start: u32,
    has_more: bool,
}

impl Default for SearchState {
    fn default() -> Self {
        Self { query: None, results: Vec::new(), next_start: FIRST_START, has_more: false }
    }
}

/// What a round was asked to produce.
struct RoundPlan<'a> {
    query: &'a SiteQuery,
    start: u32,
    is_new: bool,
    key: CacheKey,
}

/// Per-session site search state and round driver.
pub struct SearchAggregator {
    provider: Arc<dyn SearchProvider>,
    cache: Arc<TtlCache<Vec<SearchResult>>>,
    rounds: RoundController,
    page_size: u32,
    state: Mutex<SearchState>,
}

impl SearchAggregator {
    pub fn new(provider: Arc<dyn SearchProvider>, cache: Arc<TtlCache<Vec<SearchResult>>>, page_size: u32) -> Self {
        Self { provider, cache, rounds: RoundController::new(), page_size, state: Mutex::new(SearchState::default()) }
    }

    /// Run one aggregation round, superseding any round in flight.
    ///
    /// A new search consults the cache first and replaces the result set;
    /// otherwise the round's results are appended.
    ///
    /// # Errors
    ///
    /// Returns the categorized round failure when the combined regular-site
    /// call fails. Prior results are left untouched.
    pub async fn search(
        &self, query: &SiteQuery, start: u32, is_new: bool,
    ) -> Result<RoundOutcome<RoundReport>, Error> {
        let round = self.rounds.begin().await;
        let outcome = self.run_round(&round, query, start, is_new).await;
        self.rounds.finish(&round).await;
        outcome
    }

    pub async fn new_search(&self, query: &SiteQuery) -> Result<RoundOutcome<RoundReport>, Error> {
        self.search(query, FIRST_START, true).await
    }

    /// Fetch the next page of the active query and append it.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoActiveSearch` if no new search has completed yet.
    /// A rejected call leaves the round in flight running.
    pub async fn load_more(&self) -> Result<RoundOutcome<RoundReport>, Error> {
        let active = {
            let state = self.state.lock().await;
            state.query.clone().map(|query| (query, state.next_start))
        };
        let Some((query, start)) = active else {
            return Err(Error::NoActiveSearch);
        };
        self.search(&query, start, false).await
    }

    /// Cancel the round in flight, if any.
    pub async fn cancel(&self) {
        self.rounds.cancel().await;
    }

    async fn run_round(
        &self, round: &Round, query: &SiteQuery, start: u32, is_new: bool,
    ) -> Result<RoundOutcome<RoundReport>, Error> {
        let key = CacheKey::from_params(&query.cache_key(start))?;
        let plan = RoundPlan { query, start, is_new, key };

        if is_new && let Some(cached) = self.cache.get(&plan.key) {
            return Ok(self.commit(round, plan, cached, true).await);
        }

        let special = query.special_sites();
        let special_calls = special.iter().map(|site| {
            let request = SearchRequest::for_site(query.text(), site.domain(), start);
            async move { observed(round, self.provider.search(&request)).await }
        });
        let regular_call = async {
            match query.combined_site_query() {
                Some(q) => {
                    let request = SearchRequest::new(q, start);
                    Some(observed(round, self.provider.search(&request)).await)
                }
                None => None,
            }
        };

        let (special_pages, regular_page) = tokio::join!(join_all(special_calls), regular_call);

        if round.is_cancelled() {
            return Ok(superseded(round));
        }

        let mut merged: Vec<SearchResult> = Vec::new();
        for (site, page) in special.iter().zip(special_pages) {
            match page {
                Ok(page) => merged.extend(page.results),
                Err(err) => {
                    tracing::warn!(
                        site = site.domain(),
                        error = %err,
                        "special site search failed; continuing without it"
                    );
                }
            }
        }
        match regular_page {
            Some(Ok(SearchPage { results, .. })) => merged.extend(results),
            Some(Err(err)) => return fail(round, err),
            None => {}
        }

        let ranked = rank::rank_search(merged, &special);
        Ok(self.commit(round, plan, ranked, false).await)
    }

    async fn commit(
        &self, round: &Round, plan: RoundPlan<'_>, results: Vec<SearchResult>, from_cache: bool,
    ) -> RoundOutcome<RoundReport> {
        let mut state = self.state.lock().await;
        if round.is_cancelled() {
            return superseded(round);
        }

        let fetched = results.len();
        if plan.is_new {
            if fetched > 0 && !from_cache {
                self.cache.set(plan.key, results.clone());
            }
            state.results = results;
            state.query = Some(plan.query.clone());
        } else {
            state.results.extend(results);
        }
        state.has_more = fetched >= self.page_size as usize;
        state.next_start = plan.start + self.page_size;

        tracing::debug!(
            round = round.id(),
            fetched,
            total = state.results.len(),
            from_cache,
            "search round committed"
        );

        RoundOutcome::Completed(RoundReport {
            fetched,
            total: state.results.len(),
            has_more: state.has_more,
            from_cache,
            notice: plan.is_new.then_some(Notice::IndexingDisclaimer),
        })
    }

    pub async fn snapshot(&self) -> Snapshot<SearchResult> {
        let state = self.state.lock().await;
        Snapshot { results: state.results.clone(), has_more: state.has_more }
    }

    /// Start offset the next `load_more` will request.
    pub async fn next_start(&self) -> u32 {
        self.state.lock().await.next_start
    }

    pub async fn active_query(&self) -> Option<SiteQuery> {
        self.state.lock().await.query.clone()
    }

    /// The current result set restricted to `selection`.
    pub async fn filtered(&self, selection: &FilterSet) -> Vec<SearchResult> {
        selection.apply(&self.state.lock().await.results)
    }

    /// Hostnames present in the current result set.
    pub async fn facets(&self) -> Vec<String> {
        filter::facets(&self.state.lock().await.results)
    }
}
