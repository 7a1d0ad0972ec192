//! Fixed-depth Merkle authentication paths over Poseidon2.
//!
//! A proof of depth `N` carries exactly `N` sibling hashes and `N` index
//! bits, least-significant bit first (the sibling closest to the leaf
//! first). An empty leaf is `0`, so the empty inner node of the first level
//! is `H₂(0, 0)` and so on upward, the same convention the sparse on-disk
//! trees of the node use.
//!
//! [`MerkleProof::update`] recomputes the root with the old siblings, which
//! is sound only under the witness discipline that consecutive updates in a
//! block carry paths refreshed against the intermediate roots.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::field::FieldElement;
use crate::poseidon2::Poseidon2;

/// Merkle path errors.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MerkleError {
    /// The authentication path does not fold to the claimed root.
    #[error("authentication path does not match the claimed root")]
    PathMismatch,

    /// The proof does not have the depth the tree requires.
    #[error("proof depth {actual} does not match tree depth {expected}")]
    DepthMismatch { expected: usize, actual: usize },
}

/// Authentication path of a single leaf.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// Leaf index bits, LSB first.
    pub index_bits: Vec<bool>,
    /// Sibling hashes, closest to the leaf first.
    pub hash_path: Vec<FieldElement>,
}

impl MerkleProof {
    /// Proof depth.
    pub fn depth(&self) -> usize {
        self.hash_path.len()
    }

    /// The leaf index encoded by the path bits, as a field element.
    pub fn index(&self) -> FieldElement {
        FieldElement::from_le_bits(&self.index_bits)
    }

    /// Require both the path and the bit vector to have `expected` entries.
    pub fn check_depth(&self, expected: usize) -> Result<(), MerkleError> {
        if self.index_bits.len() != expected || self.hash_path.len() != expected {
            return Err(MerkleError::DepthMismatch {
                expected,
                actual: self.index_bits.len().max(self.hash_path.len()),
            });
        }
        Ok(())
    }

    /// Fold a leaf up the path to a root.
    pub fn root(&self, leaf: FieldElement) -> FieldElement {
        let mut current = leaf;
        for (bit, sibling) in self.index_bits.iter().zip(&self.hash_path) {
            current = if *bit {
                Poseidon2::hash_pair(*sibling, current)
            } else {
                Poseidon2::hash_pair(current, *sibling)
            };
        }
        current
    }

    /// Verify `old_leaf` against `old_root`, then return the root with the
    /// leaf replaced by `new_leaf` along the same path.
    pub fn update(
        &self,
        old_leaf: FieldElement,
        new_leaf: FieldElement,
        old_root: FieldElement,
    ) -> Result<FieldElement, MerkleError> {
        if self.root(old_leaf) != old_root {
            return Err(MerkleError::PathMismatch);
        }
        Ok(self.root(new_leaf))
    }
}

/// In-memory fixed-depth Merkle tree.
///
/// Witness producers and tests use it to materialize small trees and cut
/// authentication paths; the verifier itself only ever consumes proofs.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    depth: usize,
    /// `levels[0]` holds the leaves, `levels[depth]` the root.
    levels: Vec<Vec<FieldElement>>,
}

impl MerkleTree {
    /// Build a tree of the given depth with every leaf empty (`0`).
    pub fn new(depth: usize) -> Self {
        Self::with_leaves(depth, &[])
    }

    /// Build a tree of the given depth over the provided leaves, padding
    /// the remaining slots with empty leaves.
    ///
    /// # Panics
    ///
    /// Panics if more leaves are supplied than the depth can hold.
    pub fn with_leaves(depth: usize, leaves: &[FieldElement]) -> Self {
        assert!(leaves.len() <= 1 << depth, "too many leaves for depth {depth}");
        let mut level = vec![FieldElement::ZERO; 1 << depth];
        level[..leaves.len()].copy_from_slice(leaves);

        let mut levels = Vec::with_capacity(depth + 1);
        levels.push(level);
        for level in 0..depth {
            let below = &levels[level];
            let mut above = Vec::with_capacity(below.len() / 2);
            for pair in below.chunks(2) {
                above.push(Poseidon2::hash_pair(pair[0], pair[1]));
            }
            levels.push(above);
        }
        Self { depth, levels }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of leaf slots.
    pub fn leaf_count(&self) -> usize {
        1 << self.depth
    }

    pub fn leaf(&self, index: usize) -> FieldElement {
        self.levels[0][index]
    }

    pub fn root(&self) -> FieldElement {
        self.levels[self.depth][0]
    }

    /// Replace a leaf and recompute the path above it.
    pub fn set(&mut self, index: usize, leaf: FieldElement) {
        assert!(index < self.leaf_count(), "leaf index out of range");
        self.levels[0][index] = leaf;
        let mut node = index;
        for level in 0..self.depth {
            node /= 2;
            let left = self.levels[level][2 * node];
            let right = self.levels[level][2 * node + 1];
            self.levels[level + 1][node] = Poseidon2::hash_pair(left, right);
        }
    }

    /// Cut the authentication path of a leaf.
    pub fn prove(&self, index: usize) -> MerkleProof {
        assert!(index < self.leaf_count(), "leaf index out of range");
        let mut index_bits = Vec::with_capacity(self.depth);
        let mut hash_path = Vec::with_capacity(self.depth);
        let mut node = index;
        for level in 0..self.depth {
            index_bits.push(node & 1 == 1);
            hash_path.push(self.levels[level][node ^ 1]);
            node /= 2;
        }
        MerkleProof {
            index_bits,
            hash_path,
        }
    }
}

// ========== Tests ==========
