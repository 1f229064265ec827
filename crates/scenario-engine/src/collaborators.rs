//! External collaborators consumed by the driver
//!
//! The driver only depends on these contracts; concrete proposers and
//! simulators (remote services, the reference implementations in
//! [`crate::reference`], test fakes) are injected behind `Arc<dyn _>`.

use crate::error::{ProposalError, SimulationError};
use async_trait::async_trait;
use scenario_model::{OutcomeRates, ProposedAction, Scorecard};
use serde::{Deserialize, Serialize};

/// Generates candidate mutations for a scenario.
///
/// Returning an empty list means "no good action found" and must not be
/// reported as an error. Any retry policy lives inside the implementation:
/// the driver counts one call as one budget unit no matter what happens
/// behind it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActionProposer: Send + Sync {
    /// Propose 0..K actions for a node
    async fn propose(
        &self,
        scorecard: &Scorecard,
        rationale_history: &[String],
        calls_remaining: u32,
    ) -> Result<Vec<ProposedAction>, ProposalError>;
}

/// Result of one simulator call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    /// Aggregated outcome rates
    pub rates: OutcomeRates,
    /// Wall time spent simulating
    pub execution_time_seconds: f64,
}

/// Scores a scorecard by simulating a population.
///
/// With `seed = Some(_)` identical inputs must give identical rates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OutcomeSimulator: Send + Sync {
    /// Simulate `n_executions` users
    async fn simulate(
        &self,
        scorecard: &Scorecard,
        n_executions: u32,
        sigma: f64,
        seed: Option<u64>,
    ) -> Result<SimulationOutcome, SimulationError>;
}
