//! Candidate ranking and domination
//!
//! Order: higher `success_rate` first, then lower scorecard cost, then
//! earlier `created_at`, then earlier materialisation. The same order
//! picks the winner among goal-satisfying candidates and the survivors of
//! pruning.

use scenario_model::{Goal, ScenarioNode};
use std::cmp::Ordering;

/// Compare two simulated candidates; `Less` means `a` ranks higher.
///
/// Unsimulated nodes rank below every simulated one.
#[must_use]
pub fn compare_candidates(a: &ScenarioNode, b: &ScenarioNode) -> Ordering {
    let rate_a = a.success_rate().unwrap_or(f64::NEG_INFINITY);
    let rate_b = b.success_rate().unwrap_or(f64::NEG_INFINITY);

    rate_b
        .total_cmp(&rate_a)
        .then_with(|| a.scorecard.cost().total_cmp(&b.scorecard.cost()))
        .then_with(|| a.created_at.cmp(&b.created_at))
}

/// Indices of simulated candidates, best first.
///
/// Stable: full ties keep materialisation order.
#[must_use]
pub fn rank_candidates(candidates: &[ScenarioNode]) -> Vec<usize> {
    let mut ranked: Vec<usize> = candidates
        .iter()
        .enumerate()
        .filter(|(_, n)| n.simulation_results.is_some())
        .map(|(i, _)| i)
        .collect();
    ranked.sort_by(|&a, &b| compare_candidates(&candidates[a], &candidates[b]));
    ranked
}

/// Split ranked candidates into survivors and dominated
#[must_use]
pub fn partition_beam(ranked: &[usize], beam_width: usize) -> (&[usize], &[usize]) {
    ranked.split_at(beam_width.min(ranked.len()))
}

/// Index of the single winner among goal-satisfying candidates, if any
#[must_use]
pub fn select_winner(candidates: &[ScenarioNode], goal: &Goal) -> Option<usize> {
    candidates
        .iter()
        .enumerate()
        .filter(|(_, n)| n.simulation_results.is_some_and(|r| goal.is_met(&r)))
        .min_by(|(_, a), (_, b)| compare_candidates(a, b))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use scenario_model::{
        BaselineAnalysis, ExplorationId, OutcomeRates, ProposedAction, Scorecard, ScorecardDelta,
    };

    fn root() -> ScenarioNode {
        let baseline = BaselineAnalysis::new(
            "b",
            Scorecard::new(0.0, 0.0, 0.0, 0.0),
            OutcomeRates::new(0.2, 0.6, 0.2),
        );
        ScenarioNode::root(ExplorationId::new(), &baseline)
    }

    /// Child whose cost equals `cost` (spread on complexity + effort)
    fn candidate(parent: &ScenarioNode, rate: Option<f64>, cost: f64) -> ScenarioNode {
        let half = cost / 2.0;
        let action = ProposedAction::new(
            "a",
            "c",
            "r",
            ScorecardDelta::new().with_complexity(half).with_initial_effort(half),
        );
        let mut node = ScenarioNode::child(parent, &action);
        node.simulation_results = rate.map(|r| OutcomeRates::new(r, 1.0 - r, 0.0));
        node
    }

    #[test]
    fn equal_rate_prefers_cheaper() {
        let root = root();
        let expensive = candidate(&root, Some(0.6), 0.8);
        let cheap = candidate(&root, Some(0.6), 0.5);
        let candidates = vec![expensive, cheap];

        let ranked = rank_candidates(&candidates);
        let (kept, dominated) = partition_beam(&ranked, 1);
        assert_eq!(kept, &[1]);
        assert_eq!(dominated, &[0]);
    }

    #[test]
    fn unsimulated_are_excluded() {
        let root = root();
        let candidates = vec![candidate(&root, None, 0.1), candidate(&root, Some(0.1), 0.9)];
        assert_eq!(rank_candidates(&candidates), vec![1]);
    }

    #[test]
    fn winner_is_highest_satisfying_rate() {
        let root = root();
        let goal = Goal::success_rate_at_least(0.8).unwrap();
        let candidates = vec![
            candidate(&root, Some(0.81), 0.1),
            candidate(&root, Some(0.95), 0.9),
            candidate(&root, Some(0.5), 0.0),
        ];
        assert_eq!(select_winner(&candidates, &goal), Some(1));
    }

    #[test]
    fn no_winner_below_goal() {
        let root = root();
        let goal = Goal::success_rate_at_least(0.8).unwrap();
        let candidates = vec![candidate(&root, Some(0.79), 0.1), candidate(&root, None, 0.0)];
        assert_eq!(select_winner(&candidates, &goal), None);
    }

    #[test]
    fn full_tie_keeps_materialisation_order() {
        let root = root();
        let first = candidate(&root, Some(0.5), 0.4);
        let mut second = candidate(&root, Some(0.5), 0.4);
        second.created_at = first.created_at;
        let candidates = vec![first, second];
        assert_eq!(rank_candidates(&candidates), vec![0, 1]);
    }

    proptest! {
        #[test]
        fn prop_beam_bound_and_order(
            rates in proptest::collection::vec((0.0f64..=1.0, 0.0f64..=2.0), 0..24),
            beam_width in 1usize..6,
        ) {
            let root = root();
            let candidates: Vec<ScenarioNode> = rates
                .iter()
                .map(|(rate, cost)| candidate(&root, Some(*rate), *cost))
                .collect();

            let ranked = rank_candidates(&candidates);
            let (kept, dominated) = partition_beam(&ranked, beam_width);

            prop_assert!(kept.len() <= beam_width);
            prop_assert_eq!(kept.len() + dominated.len(), candidates.len());
            for pair in ranked.windows(2) {
                let a = candidates[pair[0]].success_rate().unwrap();
                let b = candidates[pair[1]].success_rate().unwrap();
                prop_assert!(a >= b);
            }
        }
    }
}
