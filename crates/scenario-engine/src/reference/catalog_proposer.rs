//! Offline proposer backed by the action catalog
//!
//! Ranks every catalog action not yet applied on the path by the cost it
//! would leave on the scorecard, cheapest first, and returns the top few.

use crate::catalog::ActionCatalog;
use crate::collaborators::ActionProposer;
use crate::error::ProposalError;
use async_trait::async_trait;
use scenario_model::{ProposedAction, Scorecard};
use std::sync::Arc;

/// Deterministic catalog-driven proposer
#[derive(Debug, Clone)]
pub struct CatalogProposer {
    catalog: Arc<ActionCatalog>,
    max_proposals: usize,
}

impl CatalogProposer {
    /// Propose at most `max_proposals` actions per call
    #[inline]
    #[must_use]
    pub fn new(catalog: Arc<ActionCatalog>, max_proposals: usize) -> Self {
        Self {
            catalog,
            max_proposals,
        }
    }

    /// Ranked proposals for a scorecard, skipping used rationales
    #[must_use]
    pub fn rank(&self, scorecard: &Scorecard, rationale_history: &[String]) -> Vec<ProposedAction> {
        let mut candidates: Vec<(f64, ProposedAction)> = self
            .catalog
            .entries()
            .filter(|(_, action)| !rationale_history.contains(&action.rationale))
            .map(|(category, action)| {
                let cost = scorecard.apply(&action.impact).cost();
                (cost, action.to_proposal(&category.name))
            })
            .filter(|(cost, _)| *cost < scorecard.cost())
            .collect();

        candidates.sort_by(|a, b| a.0.total_cmp(&b.0));
        candidates
            .into_iter()
            .take(self.max_proposals)
            .map(|(_, proposal)| proposal)
            .collect()
    }
}

#[async_trait]
impl ActionProposer for CatalogProposer {
    async fn propose(
        &self,
        scorecard: &Scorecard,
        rationale_history: &[String],
        calls_remaining: u32,
    ) -> Result<Vec<ProposedAction>, ProposalError> {
        if calls_remaining == 0 {
            return Ok(Vec::new());
        }
        Ok(self.rank(scorecard, rationale_history))
    }
}
