//! Audit fingerprint of a tree's structural content
//!
//! Random ids, timestamps and wall-clock durations are excluded, so two
//! runs fed identical collaborator outputs hash identically.

use crate::tree::ScenarioTree;
use scenario_model::ScenarioNode;
use sha2::{Digest, Sha256};

const NO_PARENT: u64 = u64::MAX;

impl ScenarioTree {
    /// SHA-256 (hex) over every node in insertion order
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for node in self.iter() {
            let parent_position = node
                .parent_id
                .and_then(|p| self.position(&p))
                .map_or(NO_PARENT, |p| p as u64);
            hash_node(&mut hasher, node, parent_position);
        }
        hex::encode(hasher.finalize())
    }
}

fn hash_node(hasher: &mut Sha256, node: &ScenarioNode, parent_position: u64) {
    hasher.update(parent_position.to_le_bytes());
    hasher.update(node.depth.to_le_bytes());

    for text in [&node.action_applied, &node.action_category, &node.rationale] {
        match text {
            Some(t) => {
                hasher.update([1u8]);
                hasher.update(t.as_bytes());
            }
            None => hasher.update([0u8]),
        }
        hasher.update([0u8]);
    }

    for bits in node.scorecard.to_bits() {
        hasher.update(bits.to_le_bytes());
    }

    match node.simulation_results {
        Some(rates) => {
            hasher.update([1u8]);
            for rate in [rates.success_rate, rates.fail_rate, rates.did_not_try_rate] {
                hasher.update(rate.to_bits().to_le_bytes());
            }
        }
        None => hasher.update([0u8]),
    }

    hasher.update(node.status().as_str().as_bytes());
    hasher.update([0u8]);
}
