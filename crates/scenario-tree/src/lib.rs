//! Scenario Tree
//!
//! Arena of [`ScenarioNode`]s keyed by [`NodeId`]. Parent links are plain
//! key lookups, so the tree owns every node and cycles cannot be expressed:
//! a node can only be inserted under a parent that already exists, at
//! exactly `parent.depth + 1`, and `parent_id` is never rewritten.
//!
//! The tree answers structural questions only (children, ancestors,
//! frontier). Search decisions live in the engine.
//!
//! [`ScenarioNode`]: scenario_model::ScenarioNode
//! [`NodeId`]: scenario_model::NodeId

#![warn(unreachable_pub)]

mod error;
mod fingerprint;
mod tree;

pub use error::TreeError;
pub use tree::ScenarioTree;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
