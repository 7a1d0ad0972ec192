//! Mining rule: verify a proof-of-work claim over stored data and reward
//! the miner.
//!
//! The work commits to an oracle entry, a brute-forced nonce and an opened
//! chunk of a stored file: the index hash must point at exactly the
//! `(file, chunk)` pair the witness opens, and the mining hash must clear
//! the difficulty target. Consuming oracle nonces in strictly increasing
//! order prevents replays.

use crypto::{FieldElement, Poseidon2};
use tx::{Account, MiningSlot, RandomOracle};

use crate::error::VerifyError;
use crate::params::{
    rev_difficulty, ACCOUNT_TREE_DEPTH, FILE_CONTENT_DEPTH, FILE_TREE_DEPTH,
    MAX_MINING_NONCE_BITS, MINING_REWARD,
};

/// Apply the mining slot to the accounts tree, returning the new root.
///
/// The data tree is only read: membership of the opened file and chunk is
/// checked against `data_root`, which never changes here.
pub fn apply(
    slot: &MiningSlot,
    acc_root: FieldElement,
    data_root: FieldElement,
    oracle: &RandomOracle,
) -> Result<FieldElement, VerifyError> {
    let tx = &slot.tx;
    let assets = &slot.assets;

    if assets.signature.is_blank() {
        return Ok(acc_root);
    }

    assets.proof_sender.check_depth(ACCOUNT_TREE_DEPTH)?;
    assets.proof_file.check_depth(FILE_TREE_DEPTH)?;
    assets.proof_data_in_file.check_depth(FILE_CONTENT_DEPTH)?;
    assets.signature.verify(tx.hash())?;

    let sender = &assets.account_sender;
    let reward = FieldElement::from_u64(MINING_REWARD);

    let credited = sender.balance + reward;
    if credited.lt(&sender.balance) {
        return Err(VerifyError::BalanceOverflow);
    }
    if sender.key != assets.signature.a {
        return Err(VerifyError::SenderKeyMismatch);
    }
    if tx.sender_index != assets.proof_sender.index() {
        return Err(VerifyError::IndexMismatch);
    }
    if sender.nonce != tx.nonce {
        return Err(VerifyError::NonceMismatch);
    }
    if oracle.get_nonce(assets.random_oracle_value) != tx.random_oracle_nonce {
        return Err(VerifyError::OracleNonceMismatch);
    }
    if !sender.random_oracle_nonce.lt(&tx.random_oracle_nonce) {
        return Err(VerifyError::OracleNonceNotIncreasing);
    }
    if assets.proof_file.root(assets.file.hash()) != data_root {
        return Err(VerifyError::FileNotInTree);
    }
    if assets.proof_data_in_file.root(assets.data_in_file) != assets.file.data {
        return Err(VerifyError::ChunkNotInFile);
    }

    // The nonce bound is enforced through the decomposition width.
    tx.mining_nonce.to_le_bits(MAX_MINING_NONCE_BITS)?;

    let bruteforce_hash = Poseidon2::hash(&[
        assets.signature.a,
        assets.random_oracle_value,
        tx.mining_nonce,
    ]);
    let index_hash = Poseidon2::hash(&[bruteforce_hash]);
    let opened_index = assets.proof_data_in_file.index()
        + FieldElement::two_pow(FILE_CONTENT_DEPTH) * assets.proof_file.index();
    if opened_index != index_hash.trim(FILE_TREE_DEPTH + FILE_CONTENT_DEPTH) {
        return Err(VerifyError::PowIndexMismatch);
    }

    let mining_hash = Poseidon2::hash(&[bruteforce_hash, assets.data_in_file]);
    if !mining_hash.lt(&rev_difficulty()) {
        return Err(VerifyError::DifficultyNotMet);
    }

    let new_sender = Account {
        key: sender.key,
        balance: credited,
        nonce: tx.nonce + FieldElement::ONE,
        random_oracle_nonce: tx.random_oracle_nonce,
    };
    let root = assets
        .proof_sender
        .update(sender.hash(), new_sender.hash(), acc_root)?;
    Ok(root)
}
