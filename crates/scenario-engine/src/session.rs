//! Exploration session: the exploration record plus its tree
//!
//! Fields are private to the crate; the driver is the only mutator.

use crate::error::{EngineError, PathError};
use crate::path::reconstruct_winning_path;
use scenario_model::{
    BaselineAnalysis, Exploration, ExplorationConfig, ExplorationStatus, Goal, ScenarioNode,
    WinningPath,
};
use scenario_tree::ScenarioTree;
use serde::{Deserialize, Serialize};

/// A live exploration and its tree
#[derive(Debug, Clone)]
pub struct ExplorationSession {
    pub(crate) exploration: Exploration,
    pub(crate) tree: ScenarioTree,
}

/// Serialisable view of a session (exploration record plus ordered nodes)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorationSnapshot {
    /// Exploration record
    pub exploration: Exploration,
    /// Nodes in insertion order
    pub nodes: Vec<ScenarioNode>,
}

impl ExplorationSession {
    /// Seed a running exploration from a baseline analysis.
    ///
    /// The tree starts with a single root at depth 0 that copies the
    /// baseline scorecard and outcome.
    ///
    /// # Errors
    /// `InvalidConfig` for bad config or goal, `InvalidBaseline` if the
    /// baseline rates are not a distribution.
    pub fn start(
        experiment_id: impl Into<String>,
        baseline: &BaselineAnalysis,
        goal: Goal,
        config: ExplorationConfig,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        goal.validate()?;
        baseline.outcome.validate()?;

        let exploration = Exploration::new(experiment_id, baseline, goal, config);
        let root = ScenarioNode::root(exploration.id, baseline);
        let tree = ScenarioTree::with_root(root)?;

        tracing::info!(
            exploration_id = %exploration.id,
            baseline = %baseline.id,
            baseline_success_rate = baseline.outcome.success_rate,
            "Exploration seeded"
        );

        Ok(Self { exploration, tree })
    }

    /// Restore a session, replaying every tree insert rule
    ///
    /// # Errors
    /// `InvalidConfig` for bad config or goal, `Validation` for a tree
    /// that breaks an insert rule, `InconsistentSnapshot` when the node
    /// count or winner disagrees with the recorded status.
    pub fn from_snapshot(snapshot: ExplorationSnapshot) -> Result<Self, EngineError> {
        let exploration = snapshot.exploration;
        exploration.config.validate()?;
        exploration.goal.validate()?;

        let tree = ScenarioTree::from_nodes(exploration.id, snapshot.nodes)?;
        let inconsistent = |reason: String| EngineError::InconsistentSnapshot {
            exploration: exploration.id,
            reason,
        };

        if usize::try_from(exploration.total_nodes).ok() != Some(tree.len()) {
            return Err(inconsistent(format!(
                "total_nodes is {} but the tree holds {}",
                exploration.total_nodes,
                tree.len()
            )));
        }
        let achieved = exploration.status() == ExplorationStatus::GoalAchieved;
        if achieved != tree.winner().is_some() {
            return Err(inconsistent(format!(
                "status {} with{} a winner node",
                exploration.status(),
                if achieved { "out" } else { "" }
            )));
        }

        Ok(Self { exploration, tree })
    }

    /// Exploration record
    #[inline]
    #[must_use]
    pub fn exploration(&self) -> &Exploration {
        &self.exploration
    }

    /// Scenario tree
    #[inline]
    #[must_use]
    pub fn tree(&self) -> &ScenarioTree {
        &self.tree
    }

    /// Whether the exploration has stopped
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.exploration.is_terminal()
    }

    /// Copy out a serialisable snapshot
    #[must_use]
    pub fn snapshot(&self) -> ExplorationSnapshot {
        ExplorationSnapshot {
            exploration: self.exploration.clone(),
            nodes: self.tree.to_nodes(),
        }
    }

    /// Root-to-winner path, only for `goal_achieved`
    pub fn winning_path(&self) -> Result<WinningPath, PathError> {
        reconstruct_winning_path(&self.exploration, &self.tree)
    }
}
