//! Shared fixtures for the rule and block tests.

#![allow(dead_code)]

use crypto::babyjubjub::BASE8;
use crypto::{FieldElement, MerkleTree, SignaturePacked};
use rollup::params::{ACCOUNT_TREE_DEPTH, FILE_CONTENT_DEPTH, FILE_TREE_DEPTH};
use tx::{Account, File};

pub fn fe(n: u64) -> FieldElement {
    FieldElement::from_u64(n)
}

/// A signer with a derived account key.
pub struct Actor {
    pub secret: FieldElement,
    pub key: FieldElement,
}

pub fn actor(seed: u64) -> Actor {
    let secret = fe(seed);
    let key = BASE8.mul(&secret).x;
    Actor { secret, key }
}

pub fn sign(actor: &Actor, message: FieldElement) -> SignaturePacked {
    SignaturePacked::sign(actor.secret, message).expect("signing succeeds")
}

/// Empty accounts tree at the protocol depth.
pub fn account_tree() -> MerkleTree {
    MerkleTree::new(ACCOUNT_TREE_DEPTH)
}

/// Empty data tree at the protocol depth.
pub fn data_tree() -> MerkleTree {
    MerkleTree::new(FILE_TREE_DEPTH)
}

/// Data tree with every slot holding the same file record.
pub fn saturated_data_tree(file: &File) -> MerkleTree {
    let leaves = vec![file.hash(); 1 << FILE_TREE_DEPTH];
    MerkleTree::with_leaves(FILE_TREE_DEPTH, &leaves)
}

/// Content tree with all-empty chunks.
pub fn empty_content_tree() -> MerkleTree {
    MerkleTree::new(FILE_CONTENT_DEPTH)
}

pub fn set_account(tree: &mut MerkleTree, index: usize, account: &Account) {
    tree.set(index, account.hash());
}

/// Sum of the balances of a set of account records.
pub fn balance_sum(accounts: &[Account]) -> FieldElement {
    accounts
        .iter()
        .fold(FieldElement::ZERO, |acc, a| acc + a.balance)
}
