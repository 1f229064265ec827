//! Scenario Engine - beam search over product scenarios
//!
//! Starting from a baseline scorecard, the engine repeatedly:
//! - asks an [`ActionProposer`] for candidate changes per frontier node
//! - scores the resulting scenarios with an [`OutcomeSimulator`]
//! - stops on the first goal-satisfying scenario, or prunes to the beam
//!
//! until the goal is met, the depth or call budget runs out, or no viable
//! scenario remains.
//!
//! # Example
//!
//! ```rust,no_run
//! use scenario_engine::prelude::*;
//! use scenario_engine::reference::{CatalogProposer, MonteCarloSimulator};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let baseline = BaselineAnalysis::new(
//!     "analysis-1",
//!     Scorecard::new(0.6, 0.5, 0.4, 0.7),
//!     OutcomeRates::new(0.42, 0.38, 0.20),
//! );
//! let goal = Goal::success_rate_at_least(0.8)?;
//! let config = ExplorationConfig::default().with_seed(Some(42));
//!
//! let mut session = ExplorationSession::start("exp-1", &baseline, goal, config)?;
//! let driver = BeamSearchDriver::new(
//!     Arc::new(CatalogProposer::new(Arc::new(ActionCatalog::builtin()?), 3)),
//!     Arc::new(MonteCarloSimulator::new()),
//! );
//!
//! if driver.run(&mut session).await? == ExplorationStatus::GoalAchieved {
//!     println!("{:?}", session.winning_path()?);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod catalog;
pub mod collaborators;
pub mod driver;
pub mod error;
pub mod path;
pub mod ranking;
pub mod reference;
pub mod session;
pub mod settings;
pub mod store;
pub mod telemetry;

pub use catalog::{ActionCatalog, CatalogAction, CatalogCategory, CatalogError};
pub use collaborators::{ActionProposer, OutcomeSimulator, SimulationOutcome};
pub use driver::{BeamSearchDriver, RoundReport};
pub use error::{EngineError, PathError, ProposalError, SimulationError};
pub use path::reconstruct_winning_path;
pub use session::{ExplorationSession, ExplorationSnapshot};
pub use settings::{
    EngineSettings, GoalSettings, LoggingSettings, ProposerSettings, SimulatorSettings,
};
pub use store::{ExplorationLease, ExplorationStore};
pub use telemetry::init_tracing;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving explorations
    pub use crate::{
        ActionCatalog, ActionProposer, BeamSearchDriver, EngineError, ExplorationSession,
        ExplorationStore, OutcomeSimulator, RoundReport, SimulationOutcome,
    };
    pub use scenario_model::{
        BaselineAnalysis, ExplorationConfig, ExplorationStatus, Goal, NodeStatus, OutcomeRates,
        ProposedAction, Scorecard, ScorecardDelta, WinningPath,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
