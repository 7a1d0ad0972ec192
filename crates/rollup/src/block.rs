//! Block driver: sequence the three sub-blocks over the state roots.

use crypto::FieldElement;
use tx::{FileBlock, MiningBlock, RandomOracle, TransferBlock};

use crate::error::VerifyError;
use crate::params::{MAX_FILE_PER_BLOCK, MAX_MINING_PER_BLOCK, MAX_TX_PER_BLOCK};
use crate::{file, mining, transfer};

fn check_capacity(expected: usize, actual: usize) -> Result<(), VerifyError> {
    if expected != actual {
        return Err(VerifyError::SlotCount { expected, actual });
    }
    Ok(())
}

/// Apply a full block to `(acc_root, data_root)`.
///
/// Order is fixed: all transfer slots, then all file slots, then the mining
/// slot, each in index order, roots threading through. Every slot is
/// structurally present; blank slots pass through without touching state.
pub fn apply(
    acc_root: FieldElement,
    data_root: FieldElement,
    now: FieldElement,
    oracle: &RandomOracle,
    tx_block: &TransferBlock,
    file_block: &FileBlock,
    mining_block: &MiningBlock,
) -> Result<(FieldElement, FieldElement), VerifyError> {
    check_capacity(MAX_TX_PER_BLOCK, tx_block.slots.len())?;
    check_capacity(MAX_FILE_PER_BLOCK, file_block.slots.len())?;
    check_capacity(MAX_MINING_PER_BLOCK, mining_block.slots.len())?;

    let mut acc = acc_root;
    for slot in &tx_block.slots {
        acc = transfer::apply(slot, acc)?;
    }

    let mut data = data_root;
    for slot in &file_block.slots {
        (acc, data) = file::apply(slot, acc, data, now)?;
    }

    for slot in &mining_block.slots {
        acc = mining::apply(slot, acc, data, oracle)?;
    }

    Ok((acc, data))
}
