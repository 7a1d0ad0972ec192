//! Protocol parameters.
//!
//! These are consensus constants: every prover and verifier must agree on
//! them, and the public-input layout bakes the oracle size into the on-chain
//! digest.

use crypto::FieldElement;

/// Depth of the accounts tree.
pub const ACCOUNT_TREE_DEPTH: usize = 10;

/// Depth of the data tree (over file records).
pub const FILE_TREE_DEPTH: usize = 10;

/// Depth of each file's content tree.
pub const FILE_CONTENT_DEPTH: usize = 10;

/// Number of entries in the random-oracle window.
pub const RANDOM_ORACLE_SIZE: usize = 16;

/// Transfer slots per block.
pub const MAX_TX_PER_BLOCK: usize = 8;

/// File slots per block.
pub const MAX_FILE_PER_BLOCK: usize = 8;

/// Mining slots per block.
pub const MAX_MINING_PER_BLOCK: usize = 1;

/// Fee per unit of file lease time.
pub const PRICE: u64 = 1;

/// Reward credited for an accepted mining operation.
pub const MINING_REWARD: u64 = 1024;

/// Bit width bounding the brute-forced mining nonce (`2^20` values).
pub const MAX_MINING_NONCE_BITS: usize = 20;

/// Difficulty target: a mining hash is accepted iff it is strictly below
/// `2^244` as a canonical integer.
pub fn rev_difficulty() -> FieldElement {
    FieldElement::two_pow(244)
}
