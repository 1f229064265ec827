//! Retry wrapper for proposers with transient failures
//!
//! The driver charges one budget unit per `propose` call regardless of
//! how many attempts happen here.

use crate::collaborators::ActionProposer;
use crate::error::ProposalError;
use async_trait::async_trait;
use scenario_model::{ProposedAction, Scorecard};
use std::time::Duration;

/// Retries retryable proposer errors with linear backoff
#[derive(Debug, Clone)]
pub struct RetryingProposer<P> {
    inner: P,
    max_attempts: u32,
    backoff: Duration,
}

impl<P: ActionProposer> RetryingProposer<P> {
    /// Wrap `inner`; `max_attempts` is clamped to at least 1
    #[inline]
    #[must_use]
    pub fn new(inner: P, max_attempts: u32) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
            backoff: Duration::from_millis(200),
        }
    }

    /// Set base backoff between attempts
    #[inline]
    #[must_use]
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }
}

#[async_trait]
impl<P: ActionProposer> ActionProposer for RetryingProposer<P> {
    async fn propose(
        &self,
        scorecard: &Scorecard,
        rationale_history: &[String],
        calls_remaining: u32,
    ) -> Result<Vec<ProposedAction>, ProposalError> {
        let mut attempt = 1;
        loop {
            match self
                .inner
                .propose(scorecard, rationale_history, calls_remaining)
                .await
            {
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    tracing::debug!(attempt, error = %e, "Retrying proposer call");
                    tokio::time::sleep(self.backoff * attempt).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}
