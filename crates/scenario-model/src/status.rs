//! Exploration and node status state machines
//!
//! Both machines are closed enums with an explicit transition table.
//! Every non-initial status is terminal: its table is empty, so any
//! transition out of it is rejected.

use crate::error::TransitionError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of an exploration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplorationStatus {
    /// Search is still advancing
    Running,
    /// A node satisfied the goal
    GoalAchieved,
    /// Depth budget exhausted
    DepthLimitReached,
    /// LLM call budget exhausted
    CostLimitReached,
    /// Every branch failed or was pruned
    NoViablePaths,
}

impl ExplorationStatus {
    /// Statuses reachable from `self` in one step
    #[must_use]
    pub fn allowed_transitions(self) -> &'static [ExplorationStatus] {
        use ExplorationStatus::*;
        match self {
            Running => &[
                GoalAchieved,
                DepthLimitReached,
                CostLimitReached,
                NoViablePaths,
            ],
            GoalAchieved | DepthLimitReached | CostLimitReached | NoViablePaths => &[],
        }
    }

    /// Whether the exploration can no longer change
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, ExplorationStatus::Running)
    }

    /// Validate and perform a transition
    pub fn transition(self, to: ExplorationStatus) -> Result<ExplorationStatus, TransitionError> {
        if self.allowed_transitions().contains(&to) {
            Ok(to)
        } else {
            Err(TransitionError::Exploration { from: self, to })
        }
    }

    /// Wire name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ExplorationStatus::Running => "running",
            ExplorationStatus::GoalAchieved => "goal_achieved",
            ExplorationStatus::DepthLimitReached => "depth_limit_reached",
            ExplorationStatus::CostLimitReached => "cost_limit_reached",
            ExplorationStatus::NoViablePaths => "no_viable_paths",
        }
    }
}

impl fmt::Display for ExplorationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a scenario node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    /// Eligible for expansion (or pending simulation)
    Active,
    /// Excluded from the beam by better candidates
    Dominated,
    /// Satisfied the goal
    Winner,
    /// Proposer or simulator failed for this node
    ExpansionFailed,
}

impl NodeStatus {
    /// Statuses reachable from `self` in one step
    #[must_use]
    pub fn allowed_transitions(self) -> &'static [NodeStatus] {
        use NodeStatus::*;
        match self {
            Active => &[Dominated, Winner, ExpansionFailed],
            Dominated | Winner | ExpansionFailed => &[],
        }
    }

    /// Whether the node can no longer change
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, NodeStatus::Active)
    }

    /// Validate and perform a transition
    pub fn transition(self, to: NodeStatus) -> Result<NodeStatus, TransitionError> {
        if self.allowed_transitions().contains(&to) {
            Ok(to)
        } else {
            Err(TransitionError::Node { from: self, to })
        }
    }

    /// Wire name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            NodeStatus::Active => "active",
            NodeStatus::Dominated => "dominated",
            NodeStatus::Winner => "winner",
            NodeStatus::ExpansionFailed => "expansion_failed",
        }
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
