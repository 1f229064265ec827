//! Seeded Monte Carlo population simulator
//!
//! Each simulated user first decides whether to try the product, then
//! whether they succeed. Both probabilities fall linearly with the
//! scorecard dimensions and are shifted per user by a Gaussian shock of
//! scale `sigma`.

use crate::collaborators::{OutcomeSimulator, SimulationOutcome};
use crate::error::SimulationError;
use async_trait::async_trait;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;
use scenario_model::{OutcomeRates, Scorecard};
use std::time::Instant;

/// Weights of (initial_effort, perceived_risk, time_to_value) on trying
const TRY_WEIGHTS: [f64; 3] = [0.5, 0.3, 0.2];
/// Weights of (complexity, time_to_value, perceived_risk) on succeeding
const SUCCESS_WEIGHTS: [f64; 3] = [0.6, 0.25, 0.15];

const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

/// Population simulator running on the blocking pool
#[derive(Debug, Clone, Copy, Default)]
pub struct MonteCarloSimulator;

impl MonteCarloSimulator {
    /// Create simulator
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OutcomeSimulator for MonteCarloSimulator {
    async fn simulate(
        &self,
        scorecard: &Scorecard,
        n_executions: u32,
        sigma: f64,
        seed: Option<u64>,
    ) -> Result<SimulationOutcome, SimulationError> {
        if n_executions == 0 {
            return Err(SimulationError::Failed("n_executions must be at least 1".into()));
        }
        if !sigma.is_finite() || sigma < 0.0 {
            return Err(SimulationError::Failed(format!("invalid sigma {sigma}")));
        }

        let scorecard = *scorecard;
        let started = Instant::now();
        let rates = tokio::task::spawn_blocking(move || {
            run_population(&scorecard, n_executions, sigma, seed)
        })
        .await
        .map_err(|e| SimulationError::Failed(format!("simulation task failed: {e}")))?
        .ok_or_else(|| SimulationError::Failed("empty population".into()))?;

        Ok(SimulationOutcome {
            rates,
            execution_time_seconds: started.elapsed().as_secs_f64(),
        })
    }
}

fn run_population(
    scorecard: &Scorecard,
    n_executions: u32,
    sigma: f64,
    seed: Option<u64>,
) -> Option<OutcomeRates> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(derive_seed(seed, scorecard)),
        None => StdRng::from_entropy(),
    };

    let try_base = 1.0
        - (TRY_WEIGHTS[0] * scorecard.initial_effort()
            + TRY_WEIGHTS[1] * scorecard.perceived_risk()
            + TRY_WEIGHTS[2] * scorecard.time_to_value());
    let success_base = 1.0
        - (SUCCESS_WEIGHTS[0] * scorecard.complexity()
            + SUCCESS_WEIGHTS[1] * scorecard.time_to_value()
            + SUCCESS_WEIGHTS[2] * scorecard.perceived_risk());

    let (mut successes, mut failures, mut did_not_try) = (0u64, 0u64, 0u64);
    for _ in 0..n_executions {
        let shock: f64 = if sigma > 0.0 {
            sigma * rng.sample::<f64, _>(StandardNormal)
        } else {
            0.0
        };

        let p_try = (try_base + shock).clamp(0.0, 1.0);
        if rng.gen::<f64>() >= p_try {
            did_not_try += 1;
            continue;
        }

        let p_success = (success_base + shock).clamp(0.0, 1.0);
        if rng.gen::<f64>() < p_success {
            successes += 1;
        } else {
            failures += 1;
        }
    }

    OutcomeRates::from_counts(successes, failures, did_not_try)
}

/// Mix the run seed with the scorecard so distinct scenarios draw
/// distinct streams while equal inputs stay reproducible
fn derive_seed(seed: u64, scorecard: &Scorecard) -> u64 {
    scorecard.to_bits().iter().fold(seed, |acc, bits| {
        let mut z = acc ^ bits.wrapping_add(GOLDEN_GAMMA);
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    })
}
