//! Candidate mutation returned by an action proposer

use crate::scorecard::ScorecardDelta;
use serde::{Deserialize, Serialize};

/// One proposed product change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposedAction {
    /// What to change
    pub action_description: String,
    /// Catalog category the change belongs to
    pub action_category: String,
    /// Why the change should help
    pub rationale: String,
    /// Expected shift of the scorecard
    #[serde(default)]
    pub scorecard_delta: ScorecardDelta,
}

impl ProposedAction {
    /// Create new proposal
    #[inline]
    #[must_use]
    pub fn new(
        action_description: impl Into<String>,
        action_category: impl Into<String>,
        rationale: impl Into<String>,
        scorecard_delta: ScorecardDelta,
    ) -> Self {
        Self {
            action_description: action_description.into(),
            action_category: action_category.into(),
            rationale: rationale.into(),
            scorecard_delta,
        }
    }
}
