//! Aggregated simulation outcome

use crate::error::RateError;
use serde::{Deserialize, Serialize};

/// Allowed deviation of the rate sum from 1.0
pub const RATE_TOLERANCE: f64 = 1e-6;

/// Fractions of simulated users per outcome
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRates {
    /// Users who tried and succeeded
    pub success_rate: f64,
    /// Users who tried and failed
    pub fail_rate: f64,
    /// Users who never tried
    pub did_not_try_rate: f64,
}

impl OutcomeRates {
    /// Create rates (unchecked; see [`OutcomeRates::validate`])
    #[inline]
    #[must_use]
    pub fn new(success_rate: f64, fail_rate: f64, did_not_try_rate: f64) -> Self {
        Self {
            success_rate,
            fail_rate,
            did_not_try_rate,
        }
    }

    /// Build rates from raw trial counts
    #[must_use]
    pub fn from_counts(successes: u64, failures: u64, did_not_try: u64) -> Option<Self> {
        let total = successes + failures + did_not_try;
        if total == 0 {
            return None;
        }
        let total = total as f64;
        Some(Self::new(
            successes as f64 / total,
            failures as f64 / total,
            did_not_try as f64 / total,
        ))
    }

    /// Sum of the three rates
    #[inline]
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.success_rate + self.fail_rate + self.did_not_try_rate
    }

    /// Check the rate contract: finite, each in [0, 1], summing to 1.0
    pub fn validate(&self) -> Result<(), RateError> {
        for rate in [self.success_rate, self.fail_rate, self.did_not_try_rate] {
            if !rate.is_finite() {
                return Err(RateError::NonFinite);
            }
            if !(0.0..=1.0).contains(&rate) {
                return Err(RateError::OutOfRange(rate));
            }
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > RATE_TOLERANCE {
            return Err(RateError::NotNormalized { sum });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_counts_normalizes() {
        let rates = OutcomeRates::from_counts(3, 1, 0).unwrap();
        assert_eq!(rates.success_rate, 0.75);
        assert!(rates.validate().is_ok());
        assert!(OutcomeRates::from_counts(0, 0, 0).is_none());
    }

    #[test]
    fn validate_rejects_bad_sums() {
        let rates = OutcomeRates::new(0.5, 0.5, 0.1);
        assert!(matches!(rates.validate(), Err(RateError::NotNormalized { .. })));
    }

    #[test]
    fn validate_rejects_nan_and_range() {
        assert_eq!(
            OutcomeRates::new(f64::NAN, 0.5, 0.5).validate(),
            Err(RateError::NonFinite)
        );
        assert_eq!(
            OutcomeRates::new(1.5, -0.5, 0.0).validate(),
            Err(RateError::OutOfRange(1.5))
        );
    }
}
