//! Memoising simulator wrapper using moka
//!
//! Only seeded calls are cached: an unseeded call is allowed to differ
//! every time, so it always reaches the inner simulator.

use crate::collaborators::{OutcomeSimulator, SimulationOutcome};
use crate::error::SimulationError;
use async_trait::async_trait;
use moka::future::Cache;
use scenario_model::Scorecard;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SimulationKey {
    scorecard: [u64; 4],
    n_executions: u32,
    sigma: u64,
    seed: u64,
}

/// Caches seeded results of an inner simulator
#[derive(Debug, Clone)]
pub struct CachingSimulator<S> {
    inner: S,
    cache: Cache<SimulationKey, SimulationOutcome>,
}

impl<S: OutcomeSimulator> CachingSimulator<S> {
    /// Wrap `inner` with a cache of at most `max_capacity` entries
    #[inline]
    #[must_use]
    pub fn new(inner: S, max_capacity: u64) -> Self {
        Self {
            inner,
            cache: Cache::new(max_capacity),
        }
    }

    /// Entries currently cached
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[async_trait]
impl<S: OutcomeSimulator> OutcomeSimulator for CachingSimulator<S> {
    async fn simulate(
        &self,
        scorecard: &Scorecard,
        n_executions: u32,
        sigma: f64,
        seed: Option<u64>,
    ) -> Result<SimulationOutcome, SimulationError> {
        let Some(seed) = seed else {
            return self.inner.simulate(scorecard, n_executions, sigma, None).await;
        };

        let key = SimulationKey {
            scorecard: scorecard.to_bits(),
            n_executions,
            sigma: sigma.to_bits(),
            seed,
        };
        if let Some(hit) = self.cache.get(&key).await {
            tracing::trace!(seed, "Simulation cache hit");
            return Ok(hit);
        }

        let outcome = self
            .inner
            .simulate(scorecard, n_executions, sigma, Some(seed))
            .await?;
        self.cache.insert(key, outcome).await;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenario_model::OutcomeRates;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Default)]
    struct Counting(Arc<AtomicU32>);

    #[async_trait]
    impl OutcomeSimulator for Counting {
        async fn simulate(
            &self,
            _scorecard: &Scorecard,
            _n_executions: u32,
            _sigma: f64,
            _seed: Option<u64>,
        ) -> Result<SimulationOutcome, SimulationError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(SimulationOutcome {
                rates: OutcomeRates::new(0.5, 0.3, 0.2),
                execution_time_seconds: 0.0,
            })
        }
    }

    #[tokio::test]
    async fn seeded_calls_hit_cache() {
        let calls = Arc::new(AtomicU32::new(0));
        let simulator = CachingSimulator::new(Counting(Arc::clone(&calls)), 64);
        let scorecard = Scorecard::default();

        simulator.simulate(&scorecard, 100, 0.1, Some(3)).await.unwrap();
        simulator.simulate(&scorecard, 100, 0.1, Some(3)).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        simulator.simulate(&scorecard, 100, 0.2, Some(3)).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unseeded_calls_pass_through() {
        let calls = Arc::new(AtomicU32::new(0));
        let simulator = CachingSimulator::new(Counting(Arc::clone(&calls)), 64);
        let scorecard = Scorecard::default();

        simulator.simulate(&scorecard, 100, 0.1, None).await.unwrap();
        simulator.simulate(&scorecard, 100, 0.1, None).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
