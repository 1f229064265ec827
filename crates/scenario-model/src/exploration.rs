//! Exploration aggregate root

use crate::config::ExplorationConfig;
use crate::error::TransitionError;
use crate::goal::Goal;
use crate::ids::ExplorationId;
use crate::outcome::OutcomeRates;
use crate::scorecard::Scorecard;
use crate::status::ExplorationStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Baseline analysis an exploration starts from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineAnalysis {
    /// Analysis identifier
    pub id: String,
    /// Baseline scorecard
    pub scorecard: Scorecard,
    /// Baseline outcome (copied into the root, never re-simulated)
    pub outcome: OutcomeRates,
}

impl BaselineAnalysis {
    /// Create new baseline
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, scorecard: Scorecard, outcome: OutcomeRates) -> Self {
        Self {
            id: id.into(),
            scorecard,
            outcome,
        }
    }
}

/// One search session and its aggregate counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exploration {
    /// Exploration identifier
    pub id: ExplorationId,
    /// Owning experiment
    pub experiment_id: String,
    /// Baseline the root was seeded from
    pub baseline_analysis_id: String,
    /// Target threshold
    pub goal: Goal,
    /// Search parameters
    pub config: ExplorationConfig,
    status: ExplorationStatus,
    /// Depth of the current frontier
    pub current_depth: u32,
    /// Persisted nodes, root included
    pub total_nodes: u64,
    /// Proposer calls dispatched so far
    pub total_llm_calls: u32,
    /// Best success rate observed
    pub best_success_rate: Option<f64>,
    /// Session start
    pub started_at: DateTime<Utc>,
    /// Set once a terminal status is reached
    pub completed_at: Option<DateTime<Utc>>,
}

impl Exploration {
    /// Start a running exploration seeded from a baseline (root only, depth 0)
    #[must_use]
    pub fn new(
        experiment_id: impl Into<String>,
        baseline: &BaselineAnalysis,
        goal: Goal,
        config: ExplorationConfig,
    ) -> Self {
        Self {
            id: ExplorationId::new(),
            experiment_id: experiment_id.into(),
            baseline_analysis_id: baseline.id.clone(),
            goal,
            config,
            status: ExplorationStatus::Running,
            current_depth: 0,
            total_nodes: 1,
            total_llm_calls: 0,
            best_success_rate: Some(baseline.outcome.success_rate),
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Current status
    #[inline]
    #[must_use]
    pub fn status(&self) -> ExplorationStatus {
        self.status
    }

    /// Whether the exploration has stopped
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Proposer calls still available (saturating)
    #[inline]
    #[must_use]
    pub fn calls_remaining(&self) -> u32 {
        self.config.max_llm_calls.saturating_sub(self.total_llm_calls)
    }

    /// Fold a newly observed success rate into `best_success_rate`
    pub fn observe_success_rate(&mut self, rate: f64) {
        self.best_success_rate = Some(match self.best_success_rate {
            Some(best) => best.max(rate),
            None => rate,
        });
    }

    /// Move to a terminal status and stamp `completed_at`
    pub fn finish(&mut self, to: ExplorationStatus) -> Result<(), TransitionError> {
        self.status = self.status.transition(to)?;
        self.completed_at = Some(Utc::now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline() -> BaselineAnalysis {
        BaselineAnalysis::new(
            "analysis-1",
            Scorecard::default(),
            OutcomeRates::new(0.4, 0.4, 0.2),
        )
    }

    #[test]
    fn new_exploration_is_seeded() {
        let goal = Goal::success_rate_at_least(0.8).unwrap();
        let exploration = Exploration::new("exp-1", &baseline(), goal, ExplorationConfig::new());

        assert_eq!(exploration.status(), ExplorationStatus::Running);
        assert_eq!(exploration.total_nodes, 1);
        assert_eq!(exploration.current_depth, 0);
        assert_eq!(exploration.best_success_rate, Some(0.4));
        assert_eq!(exploration.baseline_analysis_id, "analysis-1");
    }

    #[test]
    fn finish_is_one_way() {
        let goal = Goal::success_rate_at_least(0.8).unwrap();
        let mut exploration = Exploration::new("exp-1", &baseline(), goal, ExplorationConfig::new());

        exploration.finish(ExplorationStatus::CostLimitReached).unwrap();
        assert!(exploration.completed_at.is_some());
        assert!(exploration.finish(ExplorationStatus::GoalAchieved).is_err());
        assert_eq!(exploration.status(), ExplorationStatus::CostLimitReached);
    }

    #[test]
    fn calls_remaining_saturates() {
        let goal = Goal::success_rate_at_least(0.8).unwrap();
        let mut exploration = Exploration::new(
            "exp-1",
            &baseline(),
            goal,
            ExplorationConfig::new().with_max_llm_calls(2),
        );
        exploration.total_llm_calls = 3;
        assert_eq!(exploration.calls_remaining(), 0);
    }
}
