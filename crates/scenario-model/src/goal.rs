//! Exploration goal

use crate::error::ConfigError;
use crate::outcome::OutcomeRates;
use serde::{Deserialize, Serialize};

/// Metric a goal is expressed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalMetric {
    /// Fraction of simulated users who succeed
    #[default]
    SuccessRate,
}

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GoalOperator {
    /// Metric must be greater than or equal to the target
    #[default]
    #[serde(rename = ">=")]
    AtLeast,
}

/// Target threshold that ends the search when met
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// Metric compared
    #[serde(default)]
    pub metric: GoalMetric,
    /// Comparison operator
    #[serde(default)]
    pub operator: GoalOperator,
    /// Threshold in (0, 1]
    pub value: f64,
}

impl Goal {
    /// `success_rate >= value`
    pub fn success_rate_at_least(value: f64) -> Result<Self, ConfigError> {
        let goal = Self {
            metric: GoalMetric::SuccessRate,
            operator: GoalOperator::AtLeast,
            value,
        };
        goal.validate()?;
        Ok(goal)
    }

    /// Check the threshold lies in (0, 1]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.value.is_finite() && self.value > 0.0 && self.value <= 1.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidGoalValue(self.value))
        }
    }

    /// Whether an outcome satisfies the goal
    #[must_use]
    pub fn is_met(&self, rates: &OutcomeRates) -> bool {
        let observed = match self.metric {
            GoalMetric::SuccessRate => rates.success_rate,
        };
        match self.operator {
            GoalOperator::AtLeast => observed >= self.value,
        }
    }
}
