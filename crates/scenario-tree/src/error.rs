//! Tree validation errors
//!
//! Malformed inserts are rejected, never corrected.

use scenario_model::{ExplorationId, NodeId, TransitionError};

/// Structural violation of the scenario tree
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TreeError {
    /// Parent is not part of this tree
    #[error("node {node} references unknown parent {parent}")]
    UnknownParent {
        /// Rejected node
        node: NodeId,
        /// Missing parent
        parent: NodeId,
    },

    /// Depth is not `parent.depth + 1` (or 0 for the root)
    #[error("node {node} has depth {actual}, expected {expected}")]
    DepthMismatch {
        /// Rejected node
        node: NodeId,
        /// Required depth
        expected: u32,
        /// Depth carried by the node
        actual: u32,
    },

    /// Node id already present
    #[error("duplicate node: {0}")]
    DuplicateNode(NodeId),

    /// A second parentless node
    #[error("tree already has a root")]
    RootAlreadyPresent,

    /// Node belongs to another exploration
    #[error("node {node} belongs to exploration {actual}, expected {expected}")]
    ForeignExploration {
        /// Rejected node
        node: NodeId,
        /// Tree's exploration
        expected: ExplorationId,
        /// Node's exploration
        actual: ExplorationId,
    },

    /// Lookup of a node not in the tree
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// Operation needs a root but the tree is empty
    #[error("tree has no root")]
    MissingRoot,

    /// A winner is already locked in
    #[error("winner already selected: {existing}")]
    WinnerAlreadySelected {
        /// Current winner
        existing: NodeId,
    },

    /// Node status transition rejected by the state machine
    #[error(transparent)]
    Transition(#[from] TransitionError),
}
