//! Witnessed transaction payloads and blocks.
//!
//! This crate is pure data: the ledger records the state trees commit to
//! ([`Account`], [`File`], [`Root`], [`RandomOracle`]) and the three
//! transaction kinds with the per-slot witness assets the verifier consumes.
//! The transition rules themselves live in the `rollup` crate.
//!
//! Every block has a fixed slot capacity; unused slots carry a blank
//! signature (`a = 0`) and default assets.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]

pub mod records;

use crypto::{FieldElement, MerkleProof, Poseidon2, SignaturePacked};
use serde::{Deserialize, Serialize};

pub use records::{Account, File, RandomOracle, Root};

/// Balance transfer between two account slots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferTx {
    pub sender_index: FieldElement,
    pub receiver_index: FieldElement,
    /// Key the receiver slot must hold (or adopt, when the slot is empty).
    pub receiver_key: FieldElement,
    pub amount: FieldElement,
    pub nonce: FieldElement,
}

impl TransferTx {
    /// Message the sender signs.
    pub fn hash(&self) -> FieldElement {
        Poseidon2::hash(&[
            self.sender_index,
            self.receiver_index,
            self.receiver_key,
            self.amount,
            self.nonce,
        ])
    }
}

/// Witness assets of one transfer slot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferAssets {
    pub proof_sender: MerkleProof,
    pub proof_receiver: MerkleProof,
    pub account_sender: Account,
    pub account_receiver: Account,
    pub signature: SignaturePacked,
}

/// One transfer slot of a block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferSlot {
    pub tx: TransferTx,
    pub assets: TransferAssets,
}

/// Fixed-capacity transfer block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferBlock {
    pub slots: Vec<TransferSlot>,
}

impl TransferBlock {
    /// A block of `capacity` blank slots.
    pub fn blank(capacity: usize) -> Self {
        Self {
            slots: vec![TransferSlot::default(); capacity],
        }
    }
}

/// Payment renting (or refreshing) a file slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTx {
    pub sender_index: FieldElement,
    /// Index of the file slot in the data tree.
    pub data_index: FieldElement,
    /// Lease extension; the fee is `PRICE · time_interval`.
    pub time_interval: FieldElement,
    /// New content root, or `0` to keep the current contents.
    pub data: FieldElement,
    pub nonce: FieldElement,
}

impl FileTx {
    pub fn hash(&self) -> FieldElement {
        Poseidon2::hash(&[
            self.sender_index,
            self.data_index,
            self.time_interval,
            self.data,
            self.nonce,
        ])
    }
}

/// Witness assets of one file slot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAssets {
    pub proof_sender: MerkleProof,
    pub proof_file: MerkleProof,
    pub account_sender: Account,
    pub file: File,
    pub signature: SignaturePacked,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSlot {
    pub tx: FileTx,
    pub assets: FileAssets,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileBlock {
    pub slots: Vec<FileSlot>,
}

impl FileBlock {
    pub fn blank(capacity: usize) -> Self {
        Self {
            slots: vec![FileSlot::default(); capacity],
        }
    }
}

/// Proof-of-work claim against the random oracle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiningTx {
    pub sender_index: FieldElement,
    pub nonce: FieldElement,
    /// Oracle nonce being consumed; must exceed the account's last one.
    pub random_oracle_nonce: FieldElement,
    /// Brute-forced nonce, bounded to the mining-nonce bit width.
    pub mining_nonce: FieldElement,
}

impl MiningTx {
    pub fn hash(&self) -> FieldElement {
        Poseidon2::hash(&[
            self.sender_index,
            self.nonce,
            self.random_oracle_nonce,
            self.mining_nonce,
        ])
    }
}

/// Witness assets of the mining slot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiningAssets {
    pub proof_sender: MerkleProof,
    pub account_sender: Account,
    /// Oracle entry the work was ground against.
    pub random_oracle_value: FieldElement,
    /// Membership of the opened file in the data tree.
    pub proof_file: MerkleProof,
    pub file: File,
    /// Membership of the opened chunk in the file's content tree.
    pub proof_data_in_file: MerkleProof,
    pub data_in_file: FieldElement,
    pub signature: SignaturePacked,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiningSlot {
    pub tx: MiningTx,
    pub assets: MiningAssets,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiningBlock {
    pub slots: Vec<MiningSlot>,
}

impl MiningBlock {
    pub fn blank(capacity: usize) -> Self {
        Self {
            slots: vec![MiningSlot::default(); capacity],
        }
    }
}

// ========== Tests ==========
