//! Winning path reconstruction
//!
//! Walks parent links from the winner to the root, then reverses.

use crate::error::PathError;
use scenario_model::{Exploration, ExplorationStatus, PathStep, ScenarioNode, WinningPath};
use scenario_tree::ScenarioTree;

/// Build the root-to-winner path of a `goal_achieved` exploration.
///
/// Steps exclude the root. `delta_success_rate` is measured against the
/// previous node on the path; `total_improvement` is winner minus root.
pub fn reconstruct_winning_path(
    exploration: &Exploration,
    tree: &ScenarioTree,
) -> Result<WinningPath, PathError> {
    let no_winner = || PathError::NoWinner {
        exploration: exploration.id,
        status: exploration.status(),
    };

    if exploration.status() != ExplorationStatus::GoalAchieved {
        return Err(no_winner());
    }
    let winner = tree.winner().ok_or_else(no_winner)?;

    let mut chain = tree.ancestors_of(&winner.id)?;
    chain.reverse();

    let (root, steps) = chain.split_first().ok_or_else(no_winner)?;
    let baseline_rate = success_rate(root)?;

    let mut previous = baseline_rate;
    let mut path = Vec::with_capacity(steps.len());
    for node in steps {
        let rate = success_rate(node)?;
        path.push(PathStep {
            depth: node.depth,
            action: node.action_applied.clone().unwrap_or_default(),
            category: node.action_category.clone().unwrap_or_default(),
            rationale: node.rationale.clone().unwrap_or_default(),
            success_rate: rate,
            delta_success_rate: rate - previous,
        });
        previous = rate;
    }

    Ok(WinningPath {
        exploration_id: exploration.id,
        winner_node_id: winner.id,
        path,
        total_improvement: previous - baseline_rate,
    })
}

fn success_rate(node: &ScenarioNode) -> Result<f64, PathError> {
    node.success_rate()
        .ok_or(PathError::MissingOutcome(node.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenario_model::{
        BaselineAnalysis, ExplorationConfig, Goal, NodeStatus, OutcomeRates, ProposedAction,
        Scorecard, ScorecardDelta,
    };

    fn simulated_child(parent: &ScenarioNode, name: &str, rate: f64) -> ScenarioNode {
        let action = ProposedAction::new(
            name,
            "onboarding",
            format!("because {name}"),
            ScorecardDelta::new().with_complexity(-0.1),
        );
        let mut child = ScenarioNode::child(parent, &action);
        child.simulation_results = Some(OutcomeRates::new(rate, 1.0 - rate, 0.0));
        child
    }

    fn two_step_tree() -> (Exploration, ScenarioTree) {
        let baseline = BaselineAnalysis::new(
            "analysis-1",
            Scorecard::default(),
            OutcomeRates::new(0.40, 0.40, 0.20),
        );
        let mut exploration = Exploration::new(
            "exp",
            &baseline,
            Goal::success_rate_at_least(0.8).unwrap(),
            ExplorationConfig::default(),
        );
        let root = ScenarioNode::root(exploration.id, &baseline);
        let mut tree = ScenarioTree::with_root(root.clone()).unwrap();

        let first = simulated_child(&root, "Add templates", 0.55);
        tree.insert(first.clone()).unwrap();
        let second = simulated_child(&first, "Add guided wizard", 0.82);
        let winner = tree.insert(second).unwrap();
        tree.set_status(winner, NodeStatus::Winner).unwrap();

        exploration
            .finish(ExplorationStatus::GoalAchieved)
            .unwrap();
        (exploration, tree)
    }

    #[test]
    fn path_runs_root_to_winner() {
        let (exploration, tree) = two_step_tree();
        let path = reconstruct_winning_path(&exploration, &tree).unwrap();

        assert_eq!(path.len(), 2);
        assert_eq!(path.path[0].action, "Add templates");
        assert_eq!(path.path[0].depth, 1);
        assert!((path.path[0].delta_success_rate - 0.15).abs() < 1e-9);
        assert_eq!(path.path[1].action, "Add guided wizard");
        assert!((path.path[1].delta_success_rate - 0.27).abs() < 1e-9);
        assert!((path.total_improvement - 0.42).abs() < 1e-9);

        let deltas: f64 = path.path.iter().map(|s| s.delta_success_rate).sum();
        assert!((deltas - path.total_improvement).abs() < 1e-9);
    }

    #[test]
    fn non_goal_status_has_no_winner() {
        let baseline = BaselineAnalysis::new(
            "analysis-1",
            Scorecard::default(),
            OutcomeRates::new(0.4, 0.4, 0.2),
        );
        let mut exploration = Exploration::new(
            "exp",
            &baseline,
            Goal::success_rate_at_least(0.8).unwrap(),
            ExplorationConfig::default(),
        );
        exploration
            .finish(ExplorationStatus::DepthLimitReached)
            .unwrap();
        let tree =
            ScenarioTree::with_root(ScenarioNode::root(exploration.id, &baseline)).unwrap();

        let err = reconstruct_winning_path(&exploration, &tree).unwrap_err();
        assert_eq!(
            err,
            PathError::NoWinner {
                exploration: exploration.id,
                status: ExplorationStatus::DepthLimitReached,
            }
        );
    }
}
