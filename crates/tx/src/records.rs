//! Ledger records committed into the two state trees.

use crypto::{FieldElement, Poseidon2};
use serde::{Deserialize, Serialize};

/// Account record, a leaf of the accounts tree.
///
/// `key = 0` marks an uninitialized slot. A slot holding the all-zero record
/// is stored as the zero leaf, so deinitialized accounts are
/// indistinguishable from never-used ones and the slot can be reclaimed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// x-coordinate of the owner's public key.
    pub key: FieldElement,
    pub balance: FieldElement,
    pub nonce: FieldElement,
    /// Highest random-oracle nonce this account has mined against.
    pub random_oracle_nonce: FieldElement,
}

impl Account {
    /// Leaf hash of the record.
    ///
    /// The all-zero record hashes to `0` (the empty leaf); keying this on
    /// the key alone would let a malformed witness hide a balance inside an
    /// "empty" slot.
    pub fn hash(&self) -> FieldElement {
        if *self == Account::default() {
            return FieldElement::ZERO;
        }
        Poseidon2::hash(&[self.key, self.balance, self.nonce, self.random_oracle_nonce])
    }
}

/// File record, a leaf of the data tree.
///
/// `owner = 0` marks an erased or never-rented slot. `data` is the root of
/// the per-file content tree; only the root is carried here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    /// Time after which any sender may overwrite the slot.
    pub expiration_time: FieldElement,
    /// Key of the account paying for the slot.
    pub owner: FieldElement,
    /// Root of the file's content tree.
    pub data: FieldElement,
}

impl File {
    /// Leaf hash of the record; the all-zero record is the empty leaf.
    pub fn hash(&self) -> FieldElement {
        if *self == File::default() {
            return FieldElement::ZERO;
        }
        Poseidon2::hash(&[self.expiration_time, self.owner, self.data])
    }

    /// Whether `sender_key` may write this slot at time `now`: the lease
    /// expired, the slot is empty, or the sender already owns it.
    pub fn is_writeable(&self, now: FieldElement, sender_key: FieldElement) -> bool {
        self.expiration_time.lt(&now) || self.owner.is_zero() || self.owner == sender_key
    }
}

/// Commitment to the pair of state trees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Root {
    /// Accounts tree root.
    pub acc: FieldElement,
    /// Data tree root.
    pub data: FieldElement,
}

impl Root {
    pub fn hash(&self) -> FieldElement {
        Poseidon2::hash(&[self.acc, self.data])
    }
}

/// Sliding window of public oracle entropy.
///
/// The entries carry consecutive nonces `offset, offset+1, …`; each miner
/// must consume a strictly larger nonce than it last used.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomOracle {
    pub offset: FieldElement,
    pub data: Vec<FieldElement>,
}

impl RandomOracle {
    /// Nonce of the oracle value `value`, or `-1` when the window does not
    /// contain it. The whole window is scanned; on (malformed) duplicates
    /// the last match wins.
    pub fn get_nonce(&self, value: FieldElement) -> FieldElement {
        let mut nonce = FieldElement::MINUS_ONE;
        for (i, entry) in self.data.iter().enumerate() {
            if *entry == value {
                nonce = self.offset + FieldElement::from_u64(i as u64);
            }
        }
        nonce
    }
}

// ========== Tests ==========

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_account_is_the_empty_leaf() {
        assert_eq!(Account::default().hash(), FieldElement::ZERO);

        // A key-less record with a balance is *not* the empty leaf.
        let smuggled = Account {
            balance: FieldElement::from_u64(999),
            ..Account::default()
        };
        assert_ne!(smuggled.hash(), FieldElement::ZERO);
    }

    #[test]
    fn account_hash_commits_to_every_field() {
        let base = Account {
            key: FieldElement::from_u64(5),
            balance: FieldElement::from_u64(10),
            nonce: FieldElement::from_u64(1),
            random_oracle_nonce: FieldElement::from_u64(2),
        };
        let mut bumped = base;
        bumped.random_oracle_nonce = FieldElement::from_u64(3);
        assert_ne!(base.hash(), bumped.hash());
    }

    #[test]
    fn zero_file_is_the_empty_leaf() {
        assert_eq!(File::default().hash(), FieldElement::ZERO);
        let owned = File {
            owner: FieldElement::from_u64(7),
            ..File::default()
        };
        assert_ne!(owned.hash(), FieldElement::ZERO);
    }

    #[test]
    fn file_writeability() {
        let now = FieldElement::from_u64(100);
        let owner = FieldElement::from_u64(42);
        let stranger = FieldElement::from_u64(43);

        let live = File {
            expiration_time: FieldElement::from_u64(200),
            owner,
            data: FieldElement::from_u64(1),
        };
        assert!(live.is_writeable(now, owner));
        assert!(!live.is_writeable(now, stranger));

        let expired = File {
            expiration_time: FieldElement::from_u64(99),
            ..live
        };
        assert!(expired.is_writeable(now, stranger));

        // Expiring exactly now is not yet expired.
        let boundary = File {
            expiration_time: now,
            ..live
        };
        assert!(!boundary.is_writeable(now, stranger));

        assert!(File::default().is_writeable(now, stranger));
    }

    #[test]
    fn oracle_lookup() {
        let oracle = RandomOracle {
            offset: FieldElement::from_u64(100),
            data: (0..16).map(|i| FieldElement::from_u64(1000 + i)).collect(),
        };
        assert_eq!(
            oracle.get_nonce(FieldElement::from_u64(1000)),
            FieldElement::from_u64(100)
        );
        assert_eq!(
            oracle.get_nonce(FieldElement::from_u64(1015)),
            FieldElement::from_u64(115)
        );
        assert_eq!(
            oracle.get_nonce(FieldElement::from_u64(77)),
            FieldElement::MINUS_ONE
        );
    }

    #[test]
    fn oracle_duplicate_takes_last_match() {
        let v = FieldElement::from_u64(5);
        let oracle = RandomOracle {
            offset: FieldElement::ZERO,
            data: vec![v, FieldElement::from_u64(6), v],
        };
        assert_eq!(oracle.get_nonce(v), FieldElement::from_u64(2));
    }
}
