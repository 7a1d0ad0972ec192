//! Rollup state-transition verifier.
//!
//! Decides whether a new state commitment is the unique result of applying
//! a block of operations (transfers, file storage payments, mining) to a
//! prior commitment under the protocol rules. The verifier is stateless and
//! purely sequential: it consumes a fully-witnessed block and either
//! accepts or rejects, with the rejecting predicate surfaced through
//! [`VerifyError`] for debugging only.
//!
//! Verification recomputes the public-input digest, binds the witnessed
//! root records to it, threads the roots through the block driver
//! (transfer → file → mining) and requires the final roots to equal the new
//! record.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]

pub mod block;
pub mod error;
pub mod file;
pub mod mining;
pub mod params;
pub mod public;
pub mod transfer;

use crypto::FieldElement;
use serde::{Deserialize, Serialize};
use tracing::debug;
use tx::{FileBlock, MiningBlock, Root, TransferBlock};

pub use error::VerifyError;
pub use public::PublicInput;

use crate::params::RANDOM_ORACLE_SIZE;

/// Everything the verifier consumes besides the public-input digest.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RollupInput {
    pub public: PublicInput,
    /// Pre-state roots; must hash to `public.old_root`.
    pub old_root: Root,
    /// Claimed post-state roots; must hash to `public.new_root`.
    pub new_root: Root,
    pub tx_block: TransferBlock,
    pub file_block: FileBlock,
    pub mining_block: MiningBlock,
}

/// Verify a block against its public-input digest.
///
/// Returns `Ok(())` to accept; any error rejects the whole block.
pub fn verify(pub_hash: FieldElement, input: &RollupInput) -> Result<(), VerifyError> {
    let outcome = verify_inner(pub_hash, input);
    if let Err(reason) = &outcome {
        debug!(%reason, "rollup block rejected");
    }
    outcome
}

fn verify_inner(pub_hash: FieldElement, input: &RollupInput) -> Result<(), VerifyError> {
    if input.public.oracle.data.len() != RANDOM_ORACLE_SIZE {
        return Err(VerifyError::OracleSize {
            expected: RANDOM_ORACLE_SIZE,
            actual: input.public.oracle.data.len(),
        });
    }
    if input.public.hash() != pub_hash {
        return Err(VerifyError::PublicInputMismatch);
    }
    if input.old_root.hash() != input.public.old_root
        || input.new_root.hash() != input.public.new_root
    {
        return Err(VerifyError::RootCommitmentMismatch);
    }

    let (acc, data) = block::apply(
        input.old_root.acc,
        input.old_root.data,
        input.public.now,
        &input.public.oracle,
        &input.tx_block,
        &input.file_block,
        &input.mining_block,
    )?;

    if acc != input.new_root.acc || data != input.new_root.data {
        return Err(VerifyError::FinalRootMismatch);
    }
    Ok(())
}
