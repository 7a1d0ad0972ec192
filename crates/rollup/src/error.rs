//! Rejection reasons.
//!
//! Every in-core check is fatal: any variant below collapses to "reject" at
//! the boundary. The variants exist so operators can see which predicate a
//! block tripped; they carry no witness data and leak no non-determinism.

use crypto::{FieldError, MerkleError, SignatureError};
use thiserror::Error;

/// Why a block was rejected.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum VerifyError {
    #[error("transaction signature rejected: {0}")]
    Signature(#[from] SignatureError),

    #[error("merkle proof rejected: {0}")]
    Merkle(#[from] MerkleError),

    #[error("field decomposition rejected: {0}")]
    Field(#[from] FieldError),

    #[error("sender account key does not match the signature key")]
    SenderKeyMismatch,

    #[error("receiver slot holds a different key")]
    ReceiverKeyMismatch,

    #[error("transfer sends from an index to itself")]
    SelfTransfer,

    #[error("sender balance is insufficient")]
    InsufficientBalance,

    #[error("balance addition wraps the field modulus")]
    BalanceOverflow,

    #[error("account nonce does not match the transaction nonce")]
    NonceMismatch,

    #[error("transaction index does not match the proof path")]
    IndexMismatch,

    #[error("file slot is not writeable by the sender")]
    FileNotWriteable,

    #[error("random oracle nonce does not match the transaction")]
    OracleNonceMismatch,

    #[error("random oracle nonce is not strictly increasing")]
    OracleNonceNotIncreasing,

    #[error("file record is not part of the data tree")]
    FileNotInTree,

    #[error("opened chunk is not part of the file contents")]
    ChunkNotInFile,

    #[error("mining hash does not commit to the opened index")]
    PowIndexMismatch,

    #[error("mining hash does not meet the difficulty target")]
    DifficultyNotMet,

    #[error("block carries {actual} slots where exactly {expected} are required")]
    SlotCount { expected: usize, actual: usize },

    #[error("random oracle window has {actual} entries where {expected} are required")]
    OracleSize { expected: usize, actual: usize },

    #[error("public input digest does not match")]
    PublicInputMismatch,

    #[error("root record does not hash to the committed root")]
    RootCommitmentMismatch,

    #[error("final roots do not match the new root record")]
    FinalRootMismatch,
}
