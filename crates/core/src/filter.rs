//! Post-hoc display filtering of an aggregated result set.
//!
//! Filtering never mutates the result set or any cache entry; callers
//! recompute the view whenever the selection changes.

use std::collections::BTreeSet;

use crate::model::{SearchResult, VideoResult};

/// Something a selection entry can match against.
pub trait Filterable {
    /// The facet value this item is grouped under (hostname or channel id).
    fn facet(&self) -> Option<String>;

    /// Whether this item passes for one selection entry.
    fn matches(&self, selected: &str) -> bool;
}

impl Filterable for SearchResult {
    fn facet(&self) -> Option<String> {
        self.hostname()
    }

    /// Matches the selected host and its subdomains.
    fn matches(&self, selected: &str) -> bool {
        match self.hostname() {
            Some(host) => host == selected || host.ends_with(&format!(".{selected}")),
            None => false,
        }
    }
}

impl Filterable for VideoResult {
    fn facet(&self) -> Option<String> {
        Some(self.channel_id.clone())
    }

    fn matches(&self, selected: &str) -> bool {
        self.channel_id == selected
    }
}

/// Selected hostnames or channel ids. Empty means "show everything".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet(BTreeSet<String>);

impl FilterSet {
    pub fn new<I, S>(selection: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            selection
                .into_iter()
                .map(Into::into)
                .filter(|s: &String| !s.trim().is_empty())
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn admits<T: Filterable>(&self, item: &T) -> bool {
        self.is_empty() || self.0.iter().any(|selected| item.matches(selected))
    }

    /// The subset of `results` that passes, in input order.
    pub fn apply<T: Filterable + Clone>(&self, results: &[T]) -> Vec<T> {
        results.iter().filter(|item| self.admits(*item)).cloned().collect()
    }
}

/// Distinct facet values of `results`, in first-seen order.
pub fn facets<T: Filterable>(results: &[T]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    results
        .iter()
        .filter_map(Filterable::facet)
        .filter(|facet| seen.insert(facet.clone()))
        .collect()
}
