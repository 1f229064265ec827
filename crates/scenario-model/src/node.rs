//! Scenario node

use crate::action::ProposedAction;
use crate::error::TransitionError;
use crate::exploration::BaselineAnalysis;
use crate::ids::{ExplorationId, NodeId};
use crate::outcome::OutcomeRates;
use crate::scorecard::Scorecard;
use crate::status::NodeStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One candidate scenario in the search tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioNode {
    /// Node identifier
    pub id: NodeId,
    /// Owning exploration
    pub exploration_id: ExplorationId,
    /// Parent node, `None` for the root
    pub parent_id: Option<NodeId>,
    /// Distance from the root
    pub depth: u32,
    /// Action applied to the parent to reach this node
    pub action_applied: Option<String>,
    /// Category of the applied action
    pub action_category: Option<String>,
    /// Proposer rationale for the action
    pub rationale: Option<String>,
    /// Resulting scorecard
    pub scorecard: Scorecard,
    /// Simulated outcome, once available
    pub simulation_results: Option<OutcomeRates>,
    /// Wall time of the simulation call
    pub execution_time_seconds: Option<f64>,
    node_status: NodeStatus,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Insertion order within the tree (assigned on insert)
    #[serde(default)]
    pub sequence: u64,
}

impl ScenarioNode {
    /// Root node: baseline scorecard and outcome copied in
    #[must_use]
    pub fn root(exploration_id: ExplorationId, baseline: &BaselineAnalysis) -> Self {
        Self {
            id: NodeId::new(),
            exploration_id,
            parent_id: None,
            depth: 0,
            action_applied: None,
            action_category: None,
            rationale: None,
            scorecard: baseline.scorecard,
            simulation_results: Some(baseline.outcome),
            execution_time_seconds: None,
            node_status: NodeStatus::Active,
            created_at: Utc::now(),
            sequence: 0,
        }
    }

    /// Child of `parent` produced by applying `action`, pending simulation
    #[must_use]
    pub fn child(parent: &ScenarioNode, action: &ProposedAction) -> Self {
        Self {
            id: NodeId::new(),
            exploration_id: parent.exploration_id,
            parent_id: Some(parent.id),
            depth: parent.depth + 1,
            action_applied: Some(action.action_description.clone()),
            action_category: Some(action.action_category.clone()),
            rationale: Some(action.rationale.clone()),
            scorecard: parent.scorecard.apply(&action.scorecard_delta),
            simulation_results: None,
            execution_time_seconds: None,
            node_status: NodeStatus::Active,
            created_at: Utc::now(),
            sequence: 0,
        }
    }

    /// Current status
    #[inline]
    #[must_use]
    pub fn status(&self) -> NodeStatus {
        self.node_status
    }

    /// Whether this is the root
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Simulated success rate, if simulated
    #[inline]
    #[must_use]
    pub fn success_rate(&self) -> Option<f64> {
        self.simulation_results.map(|r| r.success_rate)
    }

    /// Validate and apply a status transition
    pub fn transition(&mut self, to: NodeStatus) -> Result<(), TransitionError> {
        self.node_status = self.node_status.transition(to)?;
        Ok(())
    }
}
