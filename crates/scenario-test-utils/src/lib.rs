//! Testing utilities for the scenario workspace
//!
//! Shared fixtures and scripted collaborators.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use scenario_engine::{
    ActionProposer, OutcomeSimulator, ProposalError, SimulationError, SimulationOutcome,
};
use scenario_model::{
    BaselineAnalysis, ExplorationConfig, Goal, OutcomeRates, ProposedAction, Scorecard,
    ScorecardDelta,
};
use std::sync::atomic::{AtomicU32, Ordering};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn baseline_with(scorecard: Scorecard, success_rate: f64) -> BaselineAnalysis {
    let rest = 1.0 - success_rate;
    BaselineAnalysis::new(
        "analysis-test",
        scorecard,
        OutcomeRates::new(success_rate, rest * 0.6, rest * 0.4),
    )
}

pub fn baseline() -> BaselineAnalysis {
    baseline_with(Scorecard::new(0.6, 0.5, 0.4, 0.7), 0.42)
}

pub fn goal(value: f64) -> Goal {
    Goal::success_rate_at_least(value).unwrap()
}

pub fn config(beam_width: usize, max_depth: u32, max_llm_calls: u32) -> ExplorationConfig {
    ExplorationConfig::default()
        .with_beam_width(beam_width)
        .with_max_depth(max_depth)
        .with_max_llm_calls(max_llm_calls)
        .with_seed(Some(42))
}

pub fn action(name: &str, delta: ScorecardDelta) -> ProposedAction {
    ProposedAction::new(name, "test", format!("{name} rationale"), delta)
}

pub fn rates(success_rate: f64) -> OutcomeRates {
    OutcomeRates::new(success_rate, 1.0 - success_rate, 0.0)
}

// ---------------------------------------------------------------------------
// Scripted proposer
// ---------------------------------------------------------------------------

type ProposeFn =
    dyn Fn(&Scorecard, &[String]) -> Result<Vec<ProposedAction>, ProposalError> + Send + Sync;

/// One recorded `propose` call
#[derive(Debug, Clone, PartialEq)]
pub struct ProposerCall {
    pub scorecard: Scorecard,
    pub rationale_history: Vec<String>,
    pub calls_remaining: u32,
}

/// Proposer driven by a closure, recording every call
pub struct ScriptedProposer {
    script: Box<ProposeFn>,
    calls: Mutex<Vec<ProposerCall>>,
}

impl std::fmt::Debug for ScriptedProposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedProposer")
            .field("calls", &self.calls.lock().len())
            .finish_non_exhaustive()
    }
}

impl ScriptedProposer {
    pub fn new<F>(script: F) -> Self
    where
        F: Fn(&Scorecard, &[String]) -> Result<Vec<ProposedAction>, ProposalError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            script: Box::new(script),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Same actions for every node
    pub fn fixed(actions: Vec<ProposedAction>) -> Self {
        Self::new(move |_, _| Ok(actions.clone()))
    }

    /// Always "no good action found"
    pub fn empty() -> Self {
        Self::new(|_, _| Ok(Vec::new()))
    }

    /// Always fails
    pub fn failing(error: ProposalError) -> Self {
        Self::new(move |_, _| Err(error.clone()))
    }

    /// Number of `propose` calls so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Recorded calls in call order
    pub fn calls(&self) -> Vec<ProposerCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ActionProposer for ScriptedProposer {
    async fn propose(
        &self,
        scorecard: &Scorecard,
        rationale_history: &[String],
        calls_remaining: u32,
    ) -> Result<Vec<ProposedAction>, ProposalError> {
        self.calls.lock().push(ProposerCall {
            scorecard: *scorecard,
            rationale_history: rationale_history.to_vec(),
            calls_remaining,
        });
        (self.script)(scorecard, rationale_history)
    }
}

// ---------------------------------------------------------------------------
// Scripted simulator
// ---------------------------------------------------------------------------

type SimulateFn = dyn Fn(&Scorecard) -> Result<OutcomeRates, SimulationError> + Send + Sync;

/// Simulator driven by a closure over the scorecard
pub struct ScriptedSimulator {
    script: Box<SimulateFn>,
    calls: AtomicU32,
    seeds: Mutex<Vec<Option<u64>>>,
}

impl std::fmt::Debug for ScriptedSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedSimulator")
            .field("calls", &self.call_count())
            .finish_non_exhaustive()
    }
}

impl ScriptedSimulator {
    pub fn new<F>(script: F) -> Self
    where
        F: Fn(&Scorecard) -> Result<OutcomeRates, SimulationError> + Send + Sync + 'static,
    {
        Self {
            script: Box::new(script),
            calls: AtomicU32::new(0),
            seeds: Mutex::new(Vec::new()),
        }
    }

    /// Success rate as a function of scorecard cost; the rest fails
    pub fn by_cost<F>(success_for_cost: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self::new(move |scorecard| Ok(rates(success_for_cost(scorecard.cost()))))
    }

    /// `success = 1 - cost / 4`: cheaper scenarios always score higher
    pub fn linear() -> Self {
        Self::by_cost(|cost| 1.0 - cost / 4.0)
    }

    /// Same success rate for every scenario
    pub fn constant(success_rate: f64) -> Self {
        Self::new(move |_| Ok(rates(success_rate)))
    }

    /// Number of `simulate` calls so far
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Seeds passed to each call
    pub fn seeds(&self) -> Vec<Option<u64>> {
        self.seeds.lock().clone()
    }
}

#[async_trait]
impl OutcomeSimulator for ScriptedSimulator {
    async fn simulate(
        &self,
        scorecard: &Scorecard,
        _n_executions: u32,
        _sigma: f64,
        seed: Option<u64>,
    ) -> Result<SimulationOutcome, SimulationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seeds.lock().push(seed);
        let rates = (self.script)(scorecard)?;
        Ok(SimulationOutcome {
            rates,
            execution_time_seconds: 0.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_proposer_records_calls() {
        let proposer = ScriptedProposer::fixed(vec![action("a", ScorecardDelta::new())]);
        let history = vec!["r".to_string()];
        let result = proposer
            .propose(&Scorecard::default(), &history, 4)
            .await
            .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(proposer.call_count(), 1);
        assert_eq!(proposer.calls()[0].calls_remaining, 4);
        assert_eq!(proposer.calls()[0].rationale_history, history);
    }

    #[tokio::test]
    async fn linear_simulator_prefers_cheap() {
        let simulator = ScriptedSimulator::linear();
        let cheap = simulator
            .simulate(&Scorecard::new(0.1, 0.1, 0.1, 0.1), 10, 0.0, Some(1))
            .await
            .unwrap();
        let dear = simulator
            .simulate(&Scorecard::new(0.9, 0.9, 0.9, 0.9), 10, 0.0, Some(1))
            .await
            .unwrap();
        assert!(cheap.rates.success_rate > dear.rates.success_rate);
        assert_eq!(simulator.call_count(), 2);
        assert_eq!(simulator.seeds(), vec![Some(1), Some(1)]);
    }

    #[test]
    fn fixture_baseline_is_valid() {
        assert!(baseline().outcome.validate().is_ok());
        assert!(config(2, 3, 10).validate().is_ok());
    }
}
