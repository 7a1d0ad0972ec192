//! File rule: charge the sender for a file-slot lease and update the record.

use crypto::FieldElement;
use tx::{File, FileSlot};

use crate::error::VerifyError;
use crate::params::{ACCOUNT_TREE_DEPTH, FILE_TREE_DEPTH, PRICE};
use crate::transfer::debit;

/// Apply one file slot, returning the new `(acc_root, data_root)` pair.
pub fn apply(
    slot: &FileSlot,
    acc_root: FieldElement,
    data_root: FieldElement,
    now: FieldElement,
) -> Result<(FieldElement, FieldElement), VerifyError> {
    let tx = &slot.tx;
    let assets = &slot.assets;

    if assets.signature.is_blank() {
        return Ok((acc_root, data_root));
    }

    assets.proof_sender.check_depth(ACCOUNT_TREE_DEPTH)?;
    assets.proof_file.check_depth(FILE_TREE_DEPTH)?;
    assets.signature.verify(tx.hash())?;

    let sender = &assets.account_sender;
    let file = &assets.file;
    let fee = FieldElement::from_u64(PRICE) * tx.time_interval;

    if sender.balance.lt(&fee) {
        return Err(VerifyError::InsufficientBalance);
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
    if !file.is_writeable(now, sender.key) {
        return Err(VerifyError::FileNotWriteable);
    }
    if tx.data_index != assets.proof_file.index() {
        return Err(VerifyError::IndexMismatch);
    }

    let new_sender = debit(sender, fee, tx.nonce);

    // The lease extends from the later of the current expiration and now.
    let base = if file.expiration_time.lt(&now) {
        now
    } else {
        file.expiration_time
    };
    let new_file = File {
        expiration_time: base + tx.time_interval,
        owner: sender.key,
        data: if tx.data.is_zero() { file.data } else { tx.data },
    };

    let acc_root = assets
        .proof_sender
        .update(sender.hash(), new_sender.hash(), acc_root)?;
    let data_root = assets
        .proof_file
        .update(file.hash(), new_file.hash(), data_root)?;
    Ok((acc_root, data_root))
}
