//! Catalog check on proposer output
//!
//! Proposals naming a category the catalog does not know are dropped
//! before they reach the driver. A call whose every proposal is dropped
//! fails with `InvalidResponse`, so the parent is marked
//! `expansion_failed` like any other bad response.

use crate::catalog::ActionCatalog;
use crate::collaborators::ActionProposer;
use crate::error::ProposalError;
use async_trait::async_trait;
use scenario_model::{ProposedAction, Scorecard};
use std::sync::Arc;

/// Filters proposals against an [`ActionCatalog`]
#[derive(Debug, Clone)]
pub struct ValidatingProposer<P> {
    inner: P,
    catalog: Arc<ActionCatalog>,
}

impl<P: ActionProposer> ValidatingProposer<P> {
    /// Wrap `inner`, checking its output against `catalog`
    #[inline]
    #[must_use]
    pub fn new(inner: P, catalog: Arc<ActionCatalog>) -> Self {
        Self { inner, catalog }
    }
}

#[async_trait]
impl<P: ActionProposer> ActionProposer for ValidatingProposer<P> {
    async fn propose(
        &self,
        scorecard: &Scorecard,
        rationale_history: &[String],
        calls_remaining: u32,
    ) -> Result<Vec<ProposedAction>, ProposalError> {
        let proposed = self
            .inner
            .propose(scorecard, rationale_history, calls_remaining)
            .await?;
        let returned = proposed.len();

        let mut last_error = None;
        let accepted: Vec<ProposedAction> = proposed
            .into_iter()
            .filter(|proposal| match self.catalog.validate_proposal(proposal) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(
                        action = %proposal.action_description,
                        error = %e,
                        "Dropping proposal"
                    );
                    last_error = Some(e);
                    false
                }
            })
            .collect();

        match last_error {
            Some(e) if accepted.is_empty() => Err(ProposalError::InvalidResponse(format!(
                "all {returned} proposals rejected: {e}"
            ))),
            _ => Ok(accepted),
        }
    }
}
