//! Per-session aggregation round lifecycle.
//!
//! A session runs at most one live round. Beginning a round cancels the
//! previous round's token; every network call in a round is wrapped with
//! [`Round::observe`] so it resolves to [`Cancelled`] as soon as the round
//! is superseded. Aggregators check [`Round::is_cancelled`] while holding
//! their state lock before committing anything, so a superseded round can
//! never write over a newer one.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// A call was abandoned because its round was superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("round superseded")]
pub struct Cancelled;

/// Result of a round that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum RoundOutcome<T> {
    Completed(T),
    /// A newer round started first; nothing was committed.
    Superseded,
}

impl<T> RoundOutcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            RoundOutcome::Completed(value) => Some(value),
            RoundOutcome::Superseded => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, RoundOutcome::Superseded)
    }
}

/// Cancellation scope of one aggregation round.
#[derive(Debug, Clone)]
pub struct Round {
    id: u64,
    token: CancellationToken,
}

impl Round {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Drive `call` unless this round is cancelled first.
    ///
    /// A cancelled call is dropped, which aborts the underlying request.
    pub async fn observe<F>(&self, call: F) -> Result<F::Output, Cancelled>
    where
        F: Future,
    {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(Cancelled),
            output = call => Ok(output),
        }
    }
}

/// Hands out rounds, keeping at most one live at a time.
#[derive(Debug, Default)]
pub struct RoundController {
    current: Mutex<Option<Round>>,
    next_id: AtomicU64,
}

impl RoundController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any live round and start a new one.
    pub async fn begin(&self) -> Round {
        let mut current = self.current.lock().await;
        if let Some(previous) = current.take() {
            tracing::debug!(round = previous.id, "superseding in-flight round");
            previous.token.cancel();
        }
        let round = Round { id: self.next_id.fetch_add(1, Ordering::Relaxed) + 1, token: CancellationToken::new() };
        *current = Some(round.clone());
        round
    }

    /// Clear the live round if it is still `round`.
    pub async fn finish(&self, round: &Round) {
        let mut current = self.current.lock().await;
        if current.as_ref().is_some_and(|live| live.id == round.id) {
            *current = None;
        }
    }

    /// Cancel the live round, if any.
    pub async fn cancel(&self) {
        if let Some(live) = self.current.lock().await.take() {
            live.token.cancel();
        }
    }

    pub async fn is_active(&self) -> bool {
        self.current.lock().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_begin_cancels_previous() {
        let controller = RoundController::new();
        let first = controller.begin().await;
        let second = controller.begin().await;

        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert!(second.id() > first.id());
    }

    #[tokio::test]
    async fn test_finish_clears_only_matching_round() {
        let controller = RoundController::new();
        let first = controller.begin().await;
        let second = controller.begin().await;

        controller.finish(&first).await;
        assert!(controller.is_active().await);

        controller.finish(&second).await;
        assert!(!controller.is_active().await);
    }

    #[tokio::test]
    async fn test_observe_passes_output_through() {
        let controller = RoundController::new();
        let round = controller.begin().await;
        assert_eq!(round.observe(async { 7 }).await, Ok(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_observe_resolves_on_cancel() {
        let controller = RoundController::new();
        let round = controller.begin().await;

        let pending = tokio::spawn({
            let round = round.clone();
            async move { round.observe(tokio::time::sleep(Duration::from_secs(3600))).await }
        });
        tokio::task::yield_now().await;

        controller.begin().await;
        assert_eq!(pending.await.unwrap(), Err(Cancelled));
    }

    #[tokio::test]
    async fn test_cancel_without_live_round() {
        let controller = RoundController::new();
        controller.cancel().await;
        assert!(!controller.is_active().await);
    }

    #[test]
    fn test_outcome_helpers() {
        assert_eq!(RoundOutcome::Completed(3).completed(), Some(3));
        assert!(RoundOutcome::<u8>::Superseded.is_superseded());
    }
}
