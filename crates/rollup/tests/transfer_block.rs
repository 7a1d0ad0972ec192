//! Transfer-rule scenario tests over handcrafted account trees.

mod common;

use common::{account_tree, actor, balance_sum, fe, set_account, sign, Actor};
use crypto::{FieldElement, MerkleTree};
use rollup::error::VerifyError;
use rollup::transfer;
use tx::{Account, TransferAssets, TransferSlot, TransferTx};

/// Build a signed transfer slot against `tree`, applying the expected
/// post-state to the tree as a side effect so callers can compare roots.
fn signed_transfer(
    tree: &mut MerkleTree,
    sender_index: usize,
    receiver_index: usize,
    sender: &Account,
    receiver: &Account,
    receiver_key: FieldElement,
    amount: FieldElement,
    signer: &Actor,
) -> (TransferSlot, FieldElement) {
    let tx = TransferTx {
        sender_index: fe(sender_index as u64),
        receiver_index: fe(receiver_index as u64),
        receiver_key,
        amount,
        nonce: sender.nonce,
    };

    let proof_sender = tree.prove(sender_index);
    let balance = sender.balance - amount;
    let new_sender = if balance.is_zero() {
        Account::default()
    } else {
        Account {
            key: sender.key,
            balance,
            nonce: sender.nonce + FieldElement::ONE,
            random_oracle_nonce: sender.random_oracle_nonce,
        }
    };
    set_account(tree, sender_index, &new_sender);

    let proof_receiver = tree.prove(receiver_index);
    let new_receiver = Account {
        key: receiver_key,
        balance: receiver.balance + amount,
        nonce: receiver.nonce,
        random_oracle_nonce: receiver.random_oracle_nonce,
    };
    set_account(tree, receiver_index, &new_receiver);

    let slot = TransferSlot {
        tx,
        assets: TransferAssets {
            proof_sender,
            proof_receiver,
            account_sender: *sender,
            account_receiver: *receiver,
            signature: sign(signer, tx.hash()),
        },
    };
    (slot, tree.root())
}

#[test]
fn valid_transfer_updates_the_root() {
    let alice = actor(101);
    let sender = Account {
        key: alice.key,
        balance: fe(100),
        nonce: fe(7),
        random_oracle_nonce: fe(2),
    };
    let receiver = Account::default();
    let bob = actor(202);

    let mut tree = account_tree();
    set_account(&mut tree, 3, &sender);
    let old_root = tree.root();

    let (slot, expected_root) =
        signed_transfer(&mut tree, 3, 5, &sender, &receiver, bob.key, fe(30), &alice);

    let new_root = transfer::apply(&slot, old_root).expect("transfer accepted");
    assert_eq!(new_root, expected_root);
    assert_ne!(new_root, old_root);
}

#[test]
fn transfer_conserves_total_balance() {
    let alice = actor(11);
    let bob = actor(12);
    let sender = Account {
        key: alice.key,
        balance: fe(64),
        nonce: fe(0),
        random_oracle_nonce: fe(0),
    };
    let receiver = Account {
        key: bob.key,
        balance: fe(36),
        nonce: fe(4),
        random_oracle_nonce: fe(9),
    };

    let mut tree = account_tree();
    set_account(&mut tree, 1, &sender);
    set_account(&mut tree, 2, &receiver);
    let old_root = tree.root();
    let before = balance_sum(&[sender, receiver]);

    let (slot, expected_root) =
        signed_transfer(&mut tree, 1, 2, &sender, &receiver, bob.key, fe(25), &alice);
    let new_root = transfer::apply(&slot, old_root).expect("transfer accepted");
    assert_eq!(new_root, expected_root);

    let new_sender = Account {
        key: alice.key,
        balance: fe(39),
        nonce: fe(1),
        random_oracle_nonce: fe(0),
    };
    let new_receiver = Account {
        key: bob.key,
        balance: fe(61),
        nonce: fe(4),
        random_oracle_nonce: fe(9),
    };
    assert_eq!(balance_sum(&[new_sender, new_receiver]), before);

    // The claimed root really is the tree over the expected records.
    let mut rebuilt = account_tree();
    set_account(&mut rebuilt, 1, &new_sender);
    set_account(&mut rebuilt, 2, &new_receiver);
    assert_eq!(rebuilt.root(), new_root);
}

#[test]
fn draining_transfer_wipes_the_sender_slot() {
    let alice = actor(31);
    let sender = Account {
        key: alice.key,
        balance: fe(50),
        nonce: fe(1),
        random_oracle_nonce: fe(3),
    };

    let mut tree = account_tree();
    set_account(&mut tree, 0, &sender);
    let old_root = tree.root();

    let (slot, expected_root) = signed_transfer(
        &mut tree,
        0,
        9,
        &sender,
        &Account::default(),
        actor(32).key,
        fe(50),
        &alice,
    );

    let new_root = transfer::apply(&slot, old_root).expect("transfer accepted");
    assert_eq!(new_root, expected_root);
    // The sender leaf is the empty leaf again.
    assert_eq!(tree.leaf(0), FieldElement::ZERO);
}

#[test]
fn blank_slot_leaves_the_root_unchanged() {
    // Garbage in every other witness field must not matter.
    let slot = TransferSlot {
        tx: TransferTx {
            sender_index: fe(999),
            receiver_index: fe(999),
            receiver_key: fe(123),
            amount: fe(1 << 60),
            nonce: fe(77),
        },
        assets: TransferAssets {
            account_sender: Account {
                key: fe(5),
                balance: fe(5),
                nonce: fe(5),
                random_oracle_nonce: fe(5),
            },
            // Only a = 0 marks the slot blank; s and r8 may hold anything,
            // including x-coordinates that do not decompress.
            signature: crypto::SignaturePacked {
                a: FieldElement::ZERO,
                s: fe(987),
                r8: fe(124),
            },
            ..TransferAssets::default()
        },
    };
    assert!(slot.assets.signature.is_blank());

    let root = fe(4242);
    assert_eq!(transfer::apply(&slot, root).unwrap(), root);
}

#[test]
fn self_transfer_is_rejected() {
    let alice = actor(41);
    let sender = Account {
        key: alice.key,
        balance: fe(10),
        nonce: fe(0),
        random_oracle_nonce: fe(0),
    };

    let mut tree = account_tree();
    set_account(&mut tree, 4, &sender);
    let old_root = tree.root();

    let proof = tree.prove(4);
    let tx = TransferTx {
        sender_index: fe(4),
        receiver_index: fe(4),
        receiver_key: alice.key,
        amount: fe(1),
        nonce: fe(0),
    };
    let slot = TransferSlot {
        tx,
        assets: TransferAssets {
            proof_sender: proof.clone(),
            proof_receiver: proof,
            account_sender: sender,
            account_receiver: sender,
            signature: sign(&alice, tx.hash()),
        },
    };

    assert_eq!(
        transfer::apply(&slot, old_root),
        Err(VerifyError::SelfTransfer)
    );
}

#[test]
fn overdraft_is_rejected() {
    let alice = actor(51);
    let sender = Account {
        key: alice.key,
        balance: fe(10),
        nonce: fe(0),
        random_oracle_nonce: fe(0),
    };

    let mut tree = account_tree();
    set_account(&mut tree, 2, &sender);
    let old_root = tree.root();

    let (mut slot, _) = signed_transfer(
        &mut tree,
        2,
        3,
        &sender,
        &Account::default(),
        actor(52).key,
        fe(10),
        &alice,
    );
    slot.tx.amount = fe(11);
    slot.assets.signature = sign(&alice, slot.tx.hash());

    assert_eq!(
        transfer::apply(&slot, old_root),
        Err(VerifyError::InsufficientBalance)
    );
}

#[test]
fn receiver_credit_must_not_wrap_the_field() {
    let alice = actor(61);
    let sender = Account {
        key: alice.key,
        balance: FieldElement::MINUS_ONE,
        nonce: fe(0),
        random_oracle_nonce: fe(0),
    };
    let bob = actor(62);
    let receiver = Account {
        key: bob.key,
        balance: fe(2),
        nonce: fe(0),
        random_oracle_nonce: fe(0),
    };

    let mut tree = account_tree();
    set_account(&mut tree, 0, &sender);
    set_account(&mut tree, 1, &receiver);
    let old_root = tree.root();

    // r - 1 + 2 wraps to 1 < 2.
    let (slot, _) = signed_transfer(
        &mut tree,
        0,
        1,
        &sender,
        &receiver,
        bob.key,
        FieldElement::MINUS_ONE,
        &alice,
    );

    assert_eq!(
        transfer::apply(&slot, old_root),
        Err(VerifyError::BalanceOverflow)
    );
}

#[test]
fn stale_nonce_is_rejected() {
    let alice = actor(71);
    let sender = Account {
        key: alice.key,
        balance: fe(40),
        nonce: fe(6),
        random_oracle_nonce: fe(0),
    };

    let mut tree = account_tree();
    set_account(&mut tree, 7, &sender);
    let old_root = tree.root();

    let (mut slot, _) = signed_transfer(
        &mut tree,
        7,
        8,
        &sender,
        &Account::default(),
        actor(72).key,
        fe(5),
        &alice,
    );
    slot.tx.nonce = fe(5);
    slot.assets.signature = sign(&alice, slot.tx.hash());

    assert_eq!(
        transfer::apply(&slot, old_root),
        Err(VerifyError::NonceMismatch)
    );
}

#[test]
fn occupied_receiver_slot_requires_matching_key() {
    let alice = actor(81);
    let carol = actor(82);
    let sender = Account {
        key: alice.key,
        balance: fe(30),
        nonce: fe(0),
        random_oracle_nonce: fe(0),
    };
    let receiver = Account {
        key: carol.key,
        balance: fe(1),
        nonce: fe(0),
        random_oracle_nonce: fe(0),
    };

    let mut tree = account_tree();
    set_account(&mut tree, 0, &sender);
    set_account(&mut tree, 1, &receiver);
    let old_root = tree.root();

    // Claim the occupied slot under a different key.
    let (slot, _) = signed_transfer(
        &mut tree,
        0,
        1,
        &sender,
        &receiver,
        actor(83).key,
        fe(5),
        &alice,
    );

    assert_eq!(
        transfer::apply(&slot, old_root),
        Err(VerifyError::ReceiverKeyMismatch)
    );
}

#[test]
fn foreign_signature_is_rejected() {
    let alice = actor(91);
    let mallory = actor(92);
    let sender = Account {
        key: alice.key,
        balance: fe(30),
        nonce: fe(0),
        random_oracle_nonce: fe(0),
    };

    let mut tree = account_tree();
    set_account(&mut tree, 0, &sender);
    let old_root = tree.root();

    let (mut slot, _) = signed_transfer(
        &mut tree,
        0,
        1,
        &sender,
        &Account::default(),
        actor(93).key,
        fe(5),
        &alice,
    );
    // Mallory signs the same payload with her own key.
    slot.assets.signature = sign(&mallory, slot.tx.hash());

    assert_eq!(
        transfer::apply(&slot, old_root),
        Err(VerifyError::SenderKeyMismatch)
    );
}
