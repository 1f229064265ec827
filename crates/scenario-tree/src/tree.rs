use crate::error::TreeError;
use indexmap::IndexMap;
use scenario_model::{ExplorationId, NodeId, NodeStatus, ScenarioNode};
use std::collections::HashMap;

/// Rooted tree of scenario nodes for one exploration
#[derive(Debug, Clone)]
pub struct ScenarioTree {
    exploration_id: ExplorationId,
    nodes: IndexMap<NodeId, ScenarioNode>,
    children: HashMap<NodeId, Vec<NodeId>>,
    root: Option<NodeId>,
    winner: Option<NodeId>,
}

impl ScenarioTree {
    /// Empty tree for an exploration
    #[must_use]
    pub fn new(exploration_id: ExplorationId) -> Self {
        Self {
            exploration_id,
            nodes: IndexMap::new(),
            children: HashMap::new(),
            root: None,
            winner: None,
        }
    }

    /// Tree holding only `root`
    pub fn with_root(root: ScenarioNode) -> Result<Self, TreeError> {
        let mut tree = Self::new(root.exploration_id);
        tree.insert(root)?;
        Ok(tree)
    }

    /// Rebuild a tree from persisted nodes, re-checking every insert rule.
    ///
    /// Nodes are replayed in their recorded insertion order.
    pub fn from_nodes(
        exploration_id: ExplorationId,
        mut nodes: Vec<ScenarioNode>,
    ) -> Result<Self, TreeError> {
        nodes.sort_by_key(|n| n.sequence);
        let mut tree = Self::new(exploration_id);
        for node in nodes {
            tree.insert(node)?;
        }
        Ok(tree)
    }

    /// Append a node.
    ///
    /// # Errors
    /// - `DepthMismatch` if `depth != parent.depth + 1` (or the root is not at 0)
    /// - `UnknownParent` if `parent_id` is not in this tree
    /// - `RootAlreadyPresent`, `DuplicateNode`, `ForeignExploration`
    /// - `WinnerAlreadySelected` for a second winner
    pub fn insert(&mut self, mut node: ScenarioNode) -> Result<NodeId, TreeError> {
        if node.exploration_id != self.exploration_id {
            return Err(TreeError::ForeignExploration {
                node: node.id,
                expected: self.exploration_id,
                actual: node.exploration_id,
            });
        }
        if self.nodes.contains_key(&node.id) {
            return Err(TreeError::DuplicateNode(node.id));
        }

        let expected_depth = match node.parent_id {
            None => {
                if self.root.is_some() {
                    return Err(TreeError::RootAlreadyPresent);
                }
                0
            }
            Some(parent_id) => {
                let parent = self.nodes.get(&parent_id).ok_or(TreeError::UnknownParent {
                    node: node.id,
                    parent: parent_id,
                })?;
                parent.depth + 1
            }
        };
        if node.depth != expected_depth {
            return Err(TreeError::DepthMismatch {
                node: node.id,
                expected: expected_depth,
                actual: node.depth,
            });
        }

        if node.status() == NodeStatus::Winner {
            if let Some(existing) = self.winner {
                return Err(TreeError::WinnerAlreadySelected { existing });
            }
            self.winner = Some(node.id);
        }

        let id = node.id;
        node.sequence = self.nodes.len() as u64;
        match node.parent_id {
            None => self.root = Some(id),
            Some(parent_id) => self.children.entry(parent_id).or_default().push(id),
        }
        self.nodes.insert(id, node);
        Ok(id)
    }

    /// Apply a one-way status transition to a node
    ///
    /// At most one node may ever become `Winner`.
    pub fn set_status(&mut self, id: NodeId, to: NodeStatus) -> Result<(), TreeError> {
        if to == NodeStatus::Winner {
            if let Some(existing) = self.winner {
                return Err(TreeError::WinnerAlreadySelected { existing });
            }
        }

        let node = self.nodes.get_mut(&id).ok_or(TreeError::NodeNotFound(id))?;
        node.transition(to)?;

        if to == NodeStatus::Winner {
            self.winner = Some(id);
        }
        Ok(())
    }

    /// Look up a node
    #[inline]
    #[must_use]
    pub fn get(&self, id: &NodeId) -> Option<&ScenarioNode> {
        self.nodes.get(id)
    }

    /// Whether the node is part of this tree
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Children in insertion order
    pub fn children_of(&self, id: &NodeId) -> Result<Vec<&ScenarioNode>, TreeError> {
        if !self.nodes.contains_key(id) {
            return Err(TreeError::NodeNotFound(*id));
        }
        Ok(self
            .children
            .get(id)
            .map(|ids| ids.iter().filter_map(|c| self.nodes.get(c)).collect())
            .unwrap_or_default())
    }

    /// Chain from the node up to and including the root
    pub fn ancestors_of(&self, id: &NodeId) -> Result<Vec<&ScenarioNode>, TreeError> {
        let mut chain = Vec::new();
        let mut current = Some(*id);

        while let Some(node_id) = current {
            let node = self.nodes.get(&node_id).ok_or(TreeError::NodeNotFound(node_id))?;
            chain.push(node);
            current = node.parent_id;
        }

        Ok(chain)
    }

    /// Active nodes at `depth`, in insertion order
    #[must_use]
    pub fn active_frontier(&self, depth: u32) -> Vec<&ScenarioNode> {
        self.nodes
            .values()
            .filter(|n| n.depth == depth && n.status() == NodeStatus::Active)
            .collect()
    }

    /// Non-null rationales along the ancestor chain, root first
    pub fn rationale_history(&self, id: &NodeId) -> Result<Vec<String>, TreeError> {
        let mut history: Vec<String> = self
            .ancestors_of(id)?
            .into_iter()
            .filter_map(|n| n.rationale.clone())
            .collect();
        history.reverse();
        Ok(history)
    }

    /// Root node
    #[inline]
    #[must_use]
    pub fn root(&self) -> Option<&ScenarioNode> {
        self.root.and_then(|id| self.nodes.get(&id))
    }

    /// The winner, once selected
    #[inline]
    #[must_use]
    pub fn winner(&self) -> Option<&ScenarioNode> {
        self.winner.and_then(|id| self.nodes.get(&id))
    }

    /// Exploration this tree belongs to
    #[inline]
    #[must_use]
    pub fn exploration_id(&self) -> ExplorationId {
        self.exploration_id
    }

    /// Number of nodes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &ScenarioNode> {
        self.nodes.values()
    }

    /// Count of nodes with a given status
    #[must_use]
    pub fn count_with_status(&self, status: NodeStatus) -> usize {
        self.nodes.values().filter(|n| n.status() == status).count()
    }

    /// Insertion position of a node
    #[inline]
    pub(crate) fn position(&self, id: &NodeId) -> Option<usize> {
        self.nodes.get_index_of(id)
    }

    /// Owned copy of every node, in insertion order
    #[must_use]
    pub fn to_nodes(&self) -> Vec<ScenarioNode> {
        self.nodes.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use scenario_model::{BaselineAnalysis, OutcomeRates, ProposedAction, Scorecard, ScorecardDelta};

    fn baseline() -> BaselineAnalysis {
        BaselineAnalysis::new(
            "baseline",
            Scorecard::new(0.5, 0.5, 0.5, 0.5),
            OutcomeRates::new(0.3, 0.5, 0.2),
        )
    }

    fn root_node() -> ScenarioNode {
        ScenarioNode::root(ExplorationId::new(), &baseline())
    }

    fn action(name: &str) -> ProposedAction {
        ProposedAction::new(
            name,
            "onboarding",
            format!("because {name}"),
            ScorecardDelta::new().with_complexity(-0.1),
        )
    }

    #[test]
    fn insert_and_navigate() {
        let root = root_node();
        let root_id = root.id;
        let mut tree = ScenarioTree::with_root(root).unwrap();

        let a = ScenarioNode::child(tree.get(&root_id).unwrap(), &action("a"));
        let a_id = tree.insert(a).unwrap();
        let b = ScenarioNode::child(tree.get(&root_id).unwrap(), &action("b"));
        let b_id = tree.insert(b).unwrap();
        let c = ScenarioNode::child(tree.get(&a_id).unwrap(), &action("c"));
        let c_id = tree.insert(c).unwrap();

        let children: Vec<NodeId> = tree.children_of(&root_id).unwrap().iter().map(|n| n.id).collect();
        assert_eq!(children, vec![a_id, b_id]);

        let ancestors: Vec<NodeId> = tree.ancestors_of(&c_id).unwrap().iter().map(|n| n.id).collect();
        assert_eq!(ancestors, vec![c_id, a_id, root_id]);

        assert_eq!(
            tree.rationale_history(&c_id).unwrap(),
            vec!["because a".to_string(), "because c".to_string()]
        );
        assert_eq!(tree.get(&c_id).unwrap().sequence, 3);
    }

    #[test]
    fn rejects_unknown_parent() {
        let root = root_node();
        let mut tree = ScenarioTree::with_root(root.clone()).unwrap();

        let other_tree_root = ScenarioNode::root(root.exploration_id, &baseline());
        let orphan = ScenarioNode::child(&other_tree_root, &action("x"));
        assert!(matches!(tree.insert(orphan), Err(TreeError::UnknownParent { .. })));
    }

    #[test]
    fn rejects_depth_mismatch() {
        let root = root_node();
        let mut tree = ScenarioTree::with_root(root.clone()).unwrap();

        let mut child = ScenarioNode::child(&root, &action("a"));
        child.depth = 2;
        assert!(matches!(
            tree.insert(child),
            Err(TreeError::DepthMismatch { expected: 1, actual: 2, .. })
        ));
    }

    #[test]
    fn rejects_second_root_and_duplicates() {
        let root = root_node();
        let mut tree = ScenarioTree::with_root(root.clone()).unwrap();

        assert_eq!(tree.insert(root.clone()), Err(TreeError::DuplicateNode(root.id)));

        let second = ScenarioNode::root(root.exploration_id, &baseline());
        assert_eq!(tree.insert(second), Err(TreeError::RootAlreadyPresent));
    }

    #[test]
    fn rejects_foreign_nodes() {
        let mut tree = ScenarioTree::with_root(root_node()).unwrap();
        assert!(matches!(
            tree.insert(root_node()),
            Err(TreeError::ForeignExploration { .. })
        ));
    }

    #[test]
    fn single_winner() {
        let root = root_node();
        let mut tree = ScenarioTree::with_root(root.clone()).unwrap();
        let a = tree.insert(ScenarioNode::child(&root, &action("a"))).unwrap();
        let b = tree.insert(ScenarioNode::child(&root, &action("b"))).unwrap();

        tree.set_status(a, NodeStatus::Winner).unwrap();
        assert_eq!(
            tree.set_status(b, NodeStatus::Winner),
            Err(TreeError::WinnerAlreadySelected { existing: a })
        );
        assert!(tree.set_status(a, NodeStatus::Dominated).is_err());
        assert_eq!(tree.winner().map(|n| n.id), Some(a));
    }

    #[test]
    fn frontier_filters_depth_and_status() {
        let root = root_node();
        let mut tree = ScenarioTree::with_root(root.clone()).unwrap();
        let a = tree.insert(ScenarioNode::child(&root, &action("a"))).unwrap();
        let b = tree.insert(ScenarioNode::child(&root, &action("b"))).unwrap();
        tree.set_status(b, NodeStatus::Dominated).unwrap();

        let frontier: Vec<NodeId> = tree.active_frontier(1).iter().map(|n| n.id).collect();
        assert_eq!(frontier, vec![a]);
        assert_eq!(tree.active_frontier(0).len(), 1);
        assert!(tree.active_frontier(2).is_empty());
    }

    #[test]
    fn rebuild_from_nodes() {
        let root = root_node();
        let mut tree = ScenarioTree::with_root(root.clone()).unwrap();
        let a = tree.insert(ScenarioNode::child(&root, &action("a"))).unwrap();
        tree.set_status(a, NodeStatus::Winner).unwrap();

        let mut nodes = tree.to_nodes();
        nodes.reverse();
        let rebuilt = ScenarioTree::from_nodes(tree.exploration_id(), nodes).unwrap();

        assert_eq!(rebuilt.len(), 2);
        assert_eq!(rebuilt.winner().map(|n| n.id), Some(a));
        assert_eq!(rebuilt.fingerprint(), tree.fingerprint());
    }

    proptest! {
        #[test]
        fn prop_accepted_nodes_keep_depth_invariant(
            ops in proptest::collection::vec((0usize..32, 0u32..3), 1..40)
        ) {
            let root = root_node();
            let mut tree = ScenarioTree::with_root(root).unwrap();
            let mut ids = vec![tree.root().unwrap().id];

            for (parent_pick, depth_offset) in ops {
                let parent = tree.get(&ids[parent_pick % ids.len()]).unwrap().clone();
                let mut child = ScenarioNode::child(&parent, &action("p"));
                child.depth = parent.depth + depth_offset;

                match tree.insert(child) {
                    Ok(id) => {
                        prop_assert_eq!(depth_offset, 1);
                        ids.push(id);
                    }
                    Err(TreeError::DepthMismatch { .. }) => prop_assert_ne!(depth_offset, 1),
                    Err(other) => prop_assert!(false, "unexpected error: {other}"),
                }
            }

            for node in tree.iter() {
                if let Some(parent_id) = node.parent_id {
                    prop_assert_eq!(node.depth, tree.get(&parent_id).unwrap().depth + 1);
                }
            }
        }
    }
}
