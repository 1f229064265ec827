//! Exploration configuration

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Immutable search parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorationConfig {
    /// Candidates kept active per round
    pub beam_width: usize,
    /// Rounds allowed before `depth_limit_reached`
    pub max_depth: u32,
    /// Proposer calls allowed before `cost_limit_reached`
    pub max_llm_calls: u32,
    /// Simulated users per scenario
    pub n_executions: u32,
    /// Noise parameter passed to the simulator
    pub sigma: f64,
    /// Simulation seed; `None` accepts non-reproducible runs
    pub seed: Option<u64>,
}

impl ExplorationConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With beam width
    #[inline]
    #[must_use]
    pub fn with_beam_width(mut self, beam_width: usize) -> Self {
        self.beam_width = beam_width;
        self
    }

    /// With max depth
    #[inline]
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// With LLM call budget
    #[inline]
    #[must_use]
    pub fn with_max_llm_calls(mut self, max_llm_calls: u32) -> Self {
        self.max_llm_calls = max_llm_calls;
        self
    }

    /// With trial count
    #[inline]
    #[must_use]
    pub fn with_executions(mut self, n_executions: u32) -> Self {
        self.n_executions = n_executions;
        self
    }

    /// With noise parameter
    #[inline]
    #[must_use]
    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    /// With simulation seed
    #[inline]
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Validate parameter ranges.
    ///
    /// `max_depth = 0` is accepted: the exploration stops before the first round.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.beam_width == 0 {
            return Err(ConfigError::InvalidBeamWidth);
        }
        if self.max_llm_calls == 0 {
            return Err(ConfigError::InvalidCallBudget);
        }
        if self.n_executions == 0 {
            return Err(ConfigError::InvalidExecutions);
        }
        if !self.sigma.is_finite() || self.sigma < 0.0 {
            return Err(ConfigError::InvalidSigma(self.sigma));
        }
        Ok(())
    }
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self {
            beam_width: 3,
            max_depth: 5,
            max_llm_calls: 20,
            n_executions: 1000,
            sigma: 0.1,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(ExplorationConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_depth_is_accepted() {
        assert!(ExplorationConfig::new().with_max_depth(0).validate().is_ok());
    }

    #[test]
    fn rejects_bad_ranges() {
        assert_eq!(
            ExplorationConfig::new().with_beam_width(0).validate(),
            Err(ConfigError::InvalidBeamWidth)
        );
        assert_eq!(
            ExplorationConfig::new().with_max_llm_calls(0).validate(),
            Err(ConfigError::InvalidCallBudget)
        );
        assert_eq!(
            ExplorationConfig::new().with_executions(0).validate(),
            Err(ConfigError::InvalidExecutions)
        );
        assert!(ExplorationConfig::new().with_sigma(-0.1).validate().is_err());
        assert!(ExplorationConfig::new().with_sigma(f64::INFINITY).validate().is_err());
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: ExplorationConfig = serde_json::from_str(r#"{"beam_width": 5, "seed": 7}"#).unwrap();
        assert_eq!(config.beam_width, 5);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.max_depth, 5);
    }
}
