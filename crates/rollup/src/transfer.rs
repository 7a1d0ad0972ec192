//! Transfer rule: debit the sender, credit the receiver, bump the nonce.

use crypto::FieldElement;
use tx::{Account, TransferSlot};

use crate::error::VerifyError;
use crate::params::ACCOUNT_TREE_DEPTH;

/// Apply one transfer slot to the accounts tree, returning the new root.
///
/// A blank slot leaves the root untouched. Every other slot must satisfy the
/// full conjunction of checks or the block is rejected.
pub fn apply(slot: &TransferSlot, acc_root: FieldElement) -> Result<FieldElement, VerifyError> {
    let tx = &slot.tx;
    let assets = &slot.assets;

    if assets.signature.is_blank() {
        return Ok(acc_root);
    }

    assets.proof_sender.check_depth(ACCOUNT_TREE_DEPTH)?;
    assets.proof_receiver.check_depth(ACCOUNT_TREE_DEPTH)?;
    assets.signature.verify(tx.hash())?;

    let sender = &assets.account_sender;
    let receiver = &assets.account_receiver;

    if sender.balance.lt(&tx.amount) {
        return Err(VerifyError::InsufficientBalance);
    }
    let credited = receiver.balance + tx.amount;
    if credited.lt(&receiver.balance) {
        return Err(VerifyError::BalanceOverflow);
    }
    if receiver.key != tx.receiver_key && !receiver.key.is_zero() {
        return Err(VerifyError::ReceiverKeyMismatch);
    }
    if sender.key != assets.signature.a {
        return Err(VerifyError::SenderKeyMismatch);
    }
    if tx.sender_index != assets.proof_sender.index()
        || tx.receiver_index != assets.proof_receiver.index()
    {
        return Err(VerifyError::IndexMismatch);
    }
    if tx.sender_index == tx.receiver_index {
        return Err(VerifyError::SelfTransfer);
    }
    if sender.nonce != tx.nonce {
        return Err(VerifyError::NonceMismatch);
    }

    let new_sender = debit(sender, tx.amount, tx.nonce);
    let new_receiver = Account {
        key: tx.receiver_key,
        balance: credited,
        nonce: receiver.nonce,
        random_oracle_nonce: receiver.random_oracle_nonce,
    };

    let root = assets
        .proof_sender
        .update(sender.hash(), new_sender.hash(), acc_root)?;
    let root = assets
        .proof_receiver
        .update(receiver.hash(), new_receiver.hash(), root)?;
    Ok(root)
}

/// Charge `amount` from an account that signed with nonce `tx_nonce`.
///
/// An account drained to exactly zero is wiped whole, freeing the slot for
/// reinitialization; otherwise the key and oracle nonce survive and the
/// transaction nonce advances.
pub(crate) fn debit(account: &Account, amount: FieldElement, tx_nonce: FieldElement) -> Account {
    let balance = account.balance - amount;
    if balance.is_zero() {
        return Account::default();
    }
    Account {
        key: account.key,
        balance,
        nonce: tx_nonce + FieldElement::ONE,
        random_oracle_nonce: account.random_oracle_nonce,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debit_preserves_identity_until_drained() {
        let account = Account {
            key: FieldElement::from_u64(9),
            balance: FieldElement::from_u64(50),
            nonce: FieldElement::from_u64(3),
            random_oracle_nonce: FieldElement::from_u64(12),
        };

        let partial = debit(&account, FieldElement::from_u64(20), account.nonce);
        assert_eq!(partial.key, account.key);
        assert_eq!(partial.balance, FieldElement::from_u64(30));
        assert_eq!(partial.nonce, FieldElement::from_u64(4));
        assert_eq!(partial.random_oracle_nonce, account.random_oracle_nonce);

        let drained = debit(&account, FieldElement::from_u64(50), account.nonce);
        assert_eq!(drained, Account::default());
        assert_eq!(drained.hash(), FieldElement::ZERO);
    }
}
