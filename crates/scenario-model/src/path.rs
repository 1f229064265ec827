//! Winning path (derived, never stored)

use crate::ids::{ExplorationId, NodeId};
use serde::{Deserialize, Serialize};

/// One applied action on the way from the root to the winner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathStep {
    /// Depth of the node reached by this step
    pub depth: u32,
    /// Action applied
    pub action: String,
    /// Action category
    pub category: String,
    /// Proposer rationale
    pub rationale: String,
    /// Success rate after the step
    pub success_rate: f64,
    /// Change relative to the immediate parent
    pub delta_success_rate: f64,
}

/// Ordered root-to-winner sequence of actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinningPath {
    /// Exploration the path belongs to
    pub exploration_id: ExplorationId,
    /// Winner node
    pub winner_node_id: NodeId,
    /// Steps, root excluded
    pub path: Vec<PathStep>,
    /// Winner success rate minus baseline success rate
    pub total_improvement: f64,
}

impl WinningPath {
    /// Number of applied actions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Whether the path has no steps
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}
