//! Public-input canonicalization.
//!
//! The single value committed on-chain is a Keccak-256 digest of the public
//! state: `(old_root, new_root, now, oracle)`. The byte layout below is
//! Ethereum-facing and fixed: 20 field elements, 32 big-endian bytes each,
//! concatenated without framing, hashed, and the digest reinterpreted
//! big-endian modulo the field.

use crypto::FieldElement;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use tx::RandomOracle;

use crate::params::RANDOM_ORACLE_SIZE;

/// Public half of the witness.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicInput {
    /// Hash of the old root record.
    pub old_root: FieldElement,
    /// Hash of the new root record.
    pub new_root: FieldElement,
    /// Wall-clock value the file rule measures leases against.
    pub now: FieldElement,
    pub oracle: RandomOracle,
}

impl PublicInput {
    /// Canonical digest of the public input.
    pub fn hash(&self) -> FieldElement {
        let mut bytes = Vec::with_capacity((4 + RANDOM_ORACLE_SIZE) * 32);
        for fe in [&self.old_root, &self.new_root, &self.now, &self.oracle.offset]
            .into_iter()
            .chain(self.oracle.data.iter())
        {
            bytes.extend_from_slice(&fe.to_be_bytes());
        }
        let digest = Keccak256::digest(&bytes);
        FieldElement::from_be_bytes_mod_order(&digest)
    }
}

// ========== Tests ==========
