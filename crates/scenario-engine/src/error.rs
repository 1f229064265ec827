//! Error types for the exploration engine
//!
//! Two families:
//! - Local failures ([`ProposalError`], [`SimulationError`]) are absorbed by
//!   the driver and recorded on a node as `expansion_failed`.
//! - Structural failures ([`EngineError`], [`PathError`]) propagate to the
//!   caller. Terminal statuses such as `cost_limit_reached` are outcomes,
//!   not errors, and never appear here.

use crate::catalog::CatalogError;
use scenario_model::{
    ConfigError, ExplorationId, ExplorationStatus, NodeId, RateError, TransitionError,
};
use scenario_tree::TreeError;
use std::path::PathBuf;

/// Main engine error type
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Invalid configuration or goal
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// Baseline outcome breaks the rate contract
    #[error("invalid baseline outcome: {0}")]
    InvalidBaseline(#[from] RateError),

    /// Malformed tree operation
    #[error("tree validation failed: {0}")]
    Validation(#[from] TreeError),

    /// Illegal status transition
    #[error("state machine error: {0}")]
    Transition(#[from] TransitionError),

    /// Winning path unavailable
    #[error("path reconstruction failed: {0}")]
    Path(#[from] PathError),

    /// Unknown exploration id
    #[error("exploration not found: {0}")]
    ExplorationNotFound(ExplorationId),

    /// Unknown baseline analysis id
    #[error("baseline analysis not found: {0}")]
    BaselineNotFound(String),

    /// Another driver holds the single-writer lease
    #[error("exploration {0} is already leased by another driver")]
    LeaseHeld(ExplorationId),

    /// Exploration id already present in the store
    #[error("exploration {0} already exists")]
    DuplicateExploration(ExplorationId),

    /// Snapshot record disagrees with its own tree
    #[error("inconsistent snapshot of exploration {exploration}: {reason}")]
    InconsistentSnapshot {
        /// Exploration id
        exploration: ExplorationId,
        /// What disagrees
        reason: String,
    },

    /// Settings file could not be read
    #[error("io error reading {path}: {source}")]
    SettingsIo {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Settings file could not be parsed
    #[error("settings parse error: {0}")]
    SettingsParse(#[from] toml::de::Error),

    /// Settings could not be rendered as TOML
    #[error("settings render error: {0}")]
    SettingsRender(#[from] toml::ser::Error),

    /// Action catalog problem
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl EngineError {
    /// Whether the error reflects a broken tree or state-machine invariant
    #[inline]
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::Transition(_)
                | Self::Path(_)
                | Self::InconsistentSnapshot { .. }
        )
    }

    /// Whether the error comes from caller input (config, ids, files)
    #[inline]
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig(_)
                | Self::InvalidBaseline(_)
                | Self::ExplorationNotFound(_)
                | Self::BaselineNotFound(_)
                | Self::DuplicateExploration(_)
                | Self::SettingsIo { .. }
                | Self::SettingsParse(_)
                | Self::Catalog(_)
        )
    }
}

/// Action proposer failure (local to one frontier node)
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProposalError {
    /// Service unreachable or transport failure
    #[error("proposer transport error: {0}")]
    Transport(String),

    /// Response could not be interpreted
    #[error("invalid proposer response: {0}")]
    InvalidResponse(String),

    /// Call exceeded its deadline
    #[error("proposer timed out after {duration_secs}s")]
    Timeout {
        /// Elapsed seconds
        duration_secs: u64,
    },
}

impl ProposalError {
    /// Whether a collaborator-side retry may help
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout { .. })
    }
}

/// Outcome simulator failure (local to one child)
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    /// Simulator reported a failure
    #[error("simulation failed: {0}")]
    Failed(String),

    /// Simulator output breaks the rate contract
    #[error("invalid simulation output: {0}")]
    InvalidRates(#[from] RateError),
}

/// Winning path reconstruction errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PathError {
    /// Exploration has not reached `goal_achieved`
    #[error("exploration {exploration} has no winner (status: {status})")]
    NoWinner {
        /// Exploration id
        exploration: ExplorationId,
        /// Its current status
        status: ExplorationStatus,
    },

    /// A node on the path was never simulated
    #[error("node {0} on the winning path has no simulation results")]
    MissingOutcome(NodeId),

    /// Tree lookup failed while walking ancestors
    #[error(transparent)]
    Tree(#[from] TreeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_error_display() {
        let err = EngineError::BaselineNotFound("analysis-9".to_string());
        assert!(err.to_string().contains("baseline analysis not found"));
    }

    #[test]
    fn engine_error_classification() {
        let structural = EngineError::Validation(TreeError::MissingRoot);
        assert!(structural.is_structural());
        assert!(!structural.is_input_error());

        let input = EngineError::InvalidConfig(ConfigError::InvalidBeamWidth);
        assert!(input.is_input_error());
        assert!(!input.is_structural());
    }

    #[test]
    fn proposal_error_is_retryable() {
        assert!(ProposalError::Transport("reset".into()).is_retryable());
        assert!(ProposalError::Timeout { duration_secs: 30 }.is_retryable());
        assert!(!ProposalError::InvalidResponse("garbage".into()).is_retryable());
    }

    #[test]
    fn rate_error_converts_into_simulation_error() {
        let err: SimulationError = RateError::NonFinite.into();
        assert!(matches!(err, SimulationError::InvalidRates(RateError::NonFinite)));
    }
}
