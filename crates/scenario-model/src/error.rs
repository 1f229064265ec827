//! Error types for the scenario model
//!
//! - Configuration validation failures
//! - Simulator output that breaks the rate contract
//! - Illegal status transitions

use crate::status::{ExplorationStatus, NodeStatus};

/// Invalid exploration parameters
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Beam width must keep at least one candidate
    #[error("beam width must be at least 1")]
    InvalidBeamWidth,

    /// LLM call budget must allow at least one call
    #[error("max llm calls must be at least 1")]
    InvalidCallBudget,

    /// Simulation needs at least one trial
    #[error("n_executions must be at least 1")]
    InvalidExecutions,

    /// Noise parameter must be a finite, non-negative number
    #[error("sigma must be finite and >= 0, got {0}")]
    InvalidSigma(f64),

    /// Goal threshold outside (0, 1]
    #[error("goal value must be in (0, 1], got {0}")]
    InvalidGoalValue(f64),

    /// Free-form settings problem (file sections, catalog path, ...)
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

/// Simulator output violating the outcome-rate contract
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RateError {
    /// A rate is NaN or infinite
    #[error("non-finite rate")]
    NonFinite,

    /// A rate lies outside [0, 1]
    #[error("rate out of range: {0}")]
    OutOfRange(f64),

    /// Rates do not sum to 1.0
    #[error("rates sum to {sum}, expected 1.0")]
    NotNormalized {
        /// Observed sum
        sum: f64,
    },
}

/// Attempted transition that the state machine forbids
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// Exploration status transition
    #[error("illegal exploration transition: {from} -> {to}")]
    Exploration {
        /// Current status
        from: ExplorationStatus,
        /// Requested status
        to: ExplorationStatus,
    },

    /// Node status transition
    #[error("illegal node transition: {from} -> {to}")]
    Node {
        /// Current status
        from: NodeStatus,
        /// Requested status
        to: NodeStatus,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_error_display() {
        let err = TransitionError::Exploration {
            from: ExplorationStatus::GoalAchieved,
            to: ExplorationStatus::Running,
        };
        assert_eq!(
            err.to_string(),
            "illegal exploration transition: goal_achieved -> running"
        );
    }

    #[test]
    fn config_error_display() {
        assert!(ConfigError::InvalidSigma(-1.0).to_string().contains("sigma"));
    }
}
