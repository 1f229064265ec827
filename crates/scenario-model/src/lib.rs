//! Scenario Model
//!
//! Value types shared by every part of the exploration engine:
//! - [`Scorecard`]: the four bounded cost/risk dimensions of a scenario
//! - [`Goal`] and [`ExplorationConfig`]: immutable search parameters
//! - [`Exploration`]: the aggregate root mutated by the driver
//! - [`ScenarioNode`]: one candidate scenario in the search tree
//! - [`ExplorationStatus`] / [`NodeStatus`]: closed state machines with
//!   explicit, one-way transition tables
//!
//! # Example
//!
//! ```rust
//! use scenario_model::{Scorecard, ScorecardDelta};
//!
//! let base = Scorecard::new(0.6, 0.5, 0.4, 0.7);
//! let next = base.apply(&ScorecardDelta::new().with_complexity(-0.8));
//!
//! // Clamped, never rejected
//! assert_eq!(next.complexity(), 0.0);
//! ```

#![warn(unreachable_pub)]

pub mod action;
pub mod config;
pub mod error;
pub mod exploration;
pub mod goal;
pub mod ids;
pub mod node;
pub mod outcome;
pub mod path;
pub mod scorecard;
pub mod status;

pub use action::ProposedAction;
pub use config::ExplorationConfig;
pub use error::{ConfigError, RateError, TransitionError};
pub use exploration::{BaselineAnalysis, Exploration};
pub use goal::{Goal, GoalMetric, GoalOperator};
pub use ids::{ExplorationId, NodeId};
pub use node::ScenarioNode;
pub use outcome::{OutcomeRates, RATE_TOLERANCE};
pub use path::{PathStep, WinningPath};
pub use scorecard::{Scorecard, ScorecardDelta};
pub use status::{ExplorationStatus, NodeStatus};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
