//! Beam-search driver
//!
//! One round:
//! 1. budget and depth checks
//! 2. propose for every active frontier node (concurrent, one call each)
//! 3. materialise children, simulate them (concurrent)
//! 4. aggregate: goal check, then beam pruning
//! 5. advance depth or stop with `no_viable_paths`
//!
//! All tree and counter mutation happens in step 4 after fan-in, on the
//! caller's task. Collaborator output order is preserved, so identical
//! collaborator outputs always yield an identical tree.

use crate::collaborators::{ActionProposer, OutcomeSimulator};
use crate::error::EngineError;
use crate::ranking::{partition_beam, rank_candidates, select_winner};
use crate::session::ExplorationSession;
use futures::future::join_all;
use scenario_model::{ExplorationStatus, NodeId, NodeStatus, ScenarioNode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Summary of one driver round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundReport {
    /// Depth whose frontier was expanded
    pub depth: u32,
    /// Proposer calls charged this round
    pub proposer_calls: u32,
    /// Frontier nodes whose proposal failed or came back empty
    pub proposal_failures: usize,
    /// Children materialised this round
    pub children: usize,
    /// Children whose simulation failed
    pub simulation_failures: usize,
    /// Children kept active
    pub kept: usize,
    /// Children pruned as dominated
    pub dominated: usize,
    /// Goal-satisfying winner, if found
    pub winner: Option<NodeId>,
    /// Exploration status after the round
    pub status: ExplorationStatus,
}

impl RoundReport {
    fn idle(depth: u32, status: ExplorationStatus) -> Self {
        Self {
            depth,
            proposer_calls: 0,
            proposal_failures: 0,
            children: 0,
            simulation_failures: 0,
            kept: 0,
            dominated: 0,
            winner: None,
            status,
        }
    }
}

/// Frontier node plus the rationale chain handed to the proposer
struct FrontierEntry {
    node: ScenarioNode,
    history: Vec<String>,
}

/// Drives an exploration to a terminal status
#[derive(Clone)]
pub struct BeamSearchDriver {
    proposer: Arc<dyn ActionProposer>,
    simulator: Arc<dyn OutcomeSimulator>,
}

impl std::fmt::Debug for BeamSearchDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeamSearchDriver").finish_non_exhaustive()
    }
}

impl BeamSearchDriver {
    /// Create a driver over the given collaborators
    #[inline]
    #[must_use]
    pub fn new(proposer: Arc<dyn ActionProposer>, simulator: Arc<dyn OutcomeSimulator>) -> Self {
        Self {
            proposer,
            simulator,
        }
    }

    /// Run rounds until the exploration is terminal.
    ///
    /// Terminates: every non-terminal round advances `current_depth`,
    /// which is bounded by `max_depth`.
    #[tracing::instrument(
        skip_all,
        fields(exploration_id = %session.exploration.id)
    )]
    pub async fn run(
        &self,
        session: &mut ExplorationSession,
    ) -> Result<ExplorationStatus, EngineError> {
        while !session.is_terminal() {
            self.step(session).await?;
        }

        let exploration = &session.exploration;
        tracing::info!(
            status = %exploration.status(),
            depth = exploration.current_depth,
            total_nodes = exploration.total_nodes,
            total_llm_calls = exploration.total_llm_calls,
            best_success_rate = exploration.best_success_rate,
            "Exploration finished"
        );
        Ok(exploration.status())
    }

    /// Execute a single round. A no-op on a terminal session.
    ///
    /// Every active frontier node is proposed for, even when the frontier
    /// is larger than the calls remaining, so `total_llm_calls` may end a
    /// round above `max_llm_calls` by at most `beam_width - 1`. The next
    /// round then stops with `cost_limit_reached`.
    ///
    /// # Errors
    /// Only structural failures (tree or state machine). Proposer and
    /// simulator failures are recorded as `expansion_failed`.
    pub async fn step(
        &self,
        session: &mut ExplorationSession,
    ) -> Result<RoundReport, EngineError> {
        let depth = session.exploration.current_depth;
        if session.is_terminal() {
            return Ok(RoundReport::idle(depth, session.exploration.status()));
        }

        let config = session.exploration.config;

        if session.exploration.total_llm_calls >= config.max_llm_calls {
            return Self::stop(session, ExplorationStatus::CostLimitReached);
        }
        if depth >= config.max_depth {
            return Self::stop(session, ExplorationStatus::DepthLimitReached);
        }

        let frontier = session
            .tree
            .active_frontier(depth)
            .into_iter()
            .map(|node| {
                Ok(FrontierEntry {
                    history: session.tree.rationale_history(&node.id)?,
                    node: node.clone(),
                })
            })
            .collect::<Result<Vec<_>, EngineError>>()?;

        if frontier.is_empty() {
            return Self::stop(session, ExplorationStatus::NoViablePaths);
        }

        // Fan-out: proposals
        let calls_remaining = session.exploration.calls_remaining();
        let proposals = join_all(frontier.iter().map(|entry| {
            self.proposer
                .propose(&entry.node.scorecard, &entry.history, calls_remaining)
        }))
        .await;
        let proposer_calls = u32::try_from(frontier.len()).unwrap_or(u32::MAX);

        let mut failed_parents = Vec::new();
        let mut children = Vec::new();
        for (entry, proposal) in frontier.iter().zip(proposals) {
            match proposal {
                Ok(actions) if !actions.is_empty() => {
                    children.extend(actions.iter().map(|a| ScenarioNode::child(&entry.node, a)));
                }
                Ok(_) => {
                    tracing::debug!(node = %entry.node.id, "Proposer returned no actions");
                    failed_parents.push(entry.node.id);
                }
                Err(e) => {
                    tracing::warn!(node = %entry.node.id, error = %e, "Proposal failed");
                    failed_parents.push(entry.node.id);
                }
            }
        }

        // Fan-out: simulations
        let outcomes = join_all(children.iter().map(|child| {
            self.simulator.simulate(
                &child.scorecard,
                config.n_executions,
                config.sigma,
                config.seed,
            )
        }))
        .await;

        let mut simulation_failures = 0;
        for (child, outcome) in children.iter_mut().zip(outcomes) {
            let checked = outcome.and_then(|o| {
                o.rates.validate()?;
                Ok(o)
            });
            match checked {
                Ok(o) => {
                    child.simulation_results = Some(o.rates);
                    child.execution_time_seconds = Some(o.execution_time_seconds);
                }
                Err(e) => {
                    tracing::warn!(node = %child.id, error = %e, "Simulation failed");
                    simulation_failures += 1;
                }
            }
        }

        // Fan-in: single aggregation point
        let exploration = &mut session.exploration;
        let tree = &mut session.tree;

        for parent in &failed_parents {
            tree.set_status(*parent, NodeStatus::ExpansionFailed)?;
        }
        exploration.total_llm_calls = exploration.total_llm_calls.saturating_add(proposer_calls);

        let mut report = RoundReport {
            depth,
            proposer_calls,
            proposal_failures: failed_parents.len(),
            children: children.len(),
            simulation_failures,
            ..RoundReport::idle(depth, ExplorationStatus::Running)
        };

        if let Some(index) = select_winner(&children, &exploration.goal) {
            let winner = children.swap_remove(index);
            let rate = winner.success_rate().unwrap_or_default();
            let winner_id = tree.insert(winner)?;
            tree.set_status(winner_id, NodeStatus::Winner)?;
            exploration.total_nodes += 1;
            exploration.observe_success_rate(rate);
            exploration.finish(ExplorationStatus::GoalAchieved)?;

            tracing::info!(
                depth = depth + 1,
                winner = %winner_id,
                success_rate = rate,
                "Goal achieved"
            );
            report.winner = Some(winner_id);
            report.status = exploration.status();
            return Ok(report);
        }

        let ranked = rank_candidates(&children);
        let (kept, dominated) = partition_beam(&ranked, config.beam_width);
        let dominated: Vec<NodeId> = dominated.iter().map(|&i| children[i].id).collect();
        report.kept = kept.len();
        report.dominated = dominated.len();

        if let Some(best) = kept.first().and_then(|&i| children[i].success_rate()) {
            exploration.observe_success_rate(best);
        }

        exploration.total_nodes += children.len() as u64;
        for child in children {
            let failed = child.simulation_results.is_none();
            let id = tree.insert(child)?;
            if failed {
                tree.set_status(id, NodeStatus::ExpansionFailed)?;
            }
        }
        for id in dominated {
            tree.set_status(id, NodeStatus::Dominated)?;
        }

        if report.kept == 0 {
            exploration.finish(ExplorationStatus::NoViablePaths)?;
            tracing::info!(depth, "No viable paths");
        } else {
            exploration.current_depth = depth + 1;
            tracing::debug!(
                depth = exploration.current_depth,
                kept = report.kept,
                dominated = report.dominated,
                best_success_rate = exploration.best_success_rate,
                "Round complete"
            );
        }

        report.status = exploration.status();
        Ok(report)
    }

    fn stop(
        session: &mut ExplorationSession,
        status: ExplorationStatus,
    ) -> Result<RoundReport, EngineError> {
        session.exploration.finish(status)?;
        tracing::info!(
            status = %status,
            depth = session.exploration.current_depth,
            "Exploration stopped"
        );
        Ok(RoundReport::idle(session.exploration.current_depth, status))
    }
}
