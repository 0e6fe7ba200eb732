//! Search and video aggregation rounds.
//!
//! Each aggregator owns one session's result state and a
//! [`RoundController`](fatwa_core::RoundController). A round fans out its
//! provider calls concurrently, waits for all of them, then commits under
//! the state lock only if no newer round has started.

pub mod rank;
pub mod search;
pub mod video;

pub use search::SearchAggregator;
pub use video::{ChannelFacet, VideoAggregator};

use std::future::Future;

use fatwa_core::{Error, Notice, Round, RoundOutcome};
use serde::Serialize;

use crate::proxy::ProviderError;

/// Summary of a completed round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundReport {
    /// Results produced by this round.
    pub fetched: usize,
    /// Size of the session's result set after the round.
    pub total: usize,
    pub has_more: bool,
    pub from_cache: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

/// Current result set of a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot<T> {
    pub results: Vec<T>,
    pub has_more: bool,
}

/// Drive one provider call under `round`'s cancellation scope.
pub(crate) async fn observed<T, F>(round: &Round, call: F) -> Result<T, ProviderError>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    round.observe(call).await?
}

/// Turn a load-bearing provider failure into the round's result.
pub(crate) fn fail<T>(round: &Round, err: ProviderError) -> Result<RoundOutcome<T>, Error> {
    match Error::try_from(err) {
        Ok(err) => {
            tracing::debug!(round = round.id(), error = %err, "round failed");
            Err(err)
        }
        Err(_) => Ok(superseded(round)),
    }
}

pub(crate) fn superseded<T>(round: &Round) -> RoundOutcome<T> {
    tracing::debug!(round = round.id(), "discarding superseded round");
    RoundOutcome::Superseded
}
