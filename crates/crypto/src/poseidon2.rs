//! Poseidon2 hash function over the BN254 scalar field.
//!
//! Width-4 instantiation of the Poseidon2 permutation:
//! - State width: 4 elements (rate 3, capacity 1)
//! - Full rounds: 8 (4 at the beginning, 4 at the end)
//! - Partial rounds: 56
//! - S-box: x^5
//!
//! This is the parameter shape of the canonical BN254 Poseidon2 sponge.
//! Round constants and the internal-matrix diagonal are derived once, at
//! first use, by the Grain LFSR procedure from the Poseidon reference
//! parameter generator (80-bit register seeded with the instance shape,
//! bit-pair filtering, rejection sampling into the field).
//!
//! Record hashes and Merkle nodes share this permutation with no domain
//! tags; the only arity separation is the input length folded into the
//! sponge capacity.

use std::sync::LazyLock;

use ark_ff::{BigInteger, PrimeField};
use num_bigint::BigUint;

use crate::field::FieldElement;

/// Poseidon2 state width (number of field elements).
pub const STATE_WIDTH: usize = 4;

/// Sponge rate (elements absorbed per permutation).
pub const RATE: usize = 3;

/// Number of full rounds (4 before + 4 after the partial rounds).
pub const FULL_ROUNDS: usize = 8;

/// Number of partial rounds (one S-box per round).
pub const PARTIAL_ROUNDS: usize = 56;

/// Poseidon2 hasher state.
#[derive(Clone, Debug)]
pub struct Poseidon2 {
    state: [FieldElement; STATE_WIDTH],
}

impl Poseidon2 {
    fn new(capacity_iv: FieldElement) -> Self {
        let mut state = [FieldElement::ZERO; STATE_WIDTH];
        state[STATE_WIDTH - 1] = capacity_iv;
        Self { state }
    }

    /// Hash a variable-length input to a single field element.
    ///
    /// The input length is committed through the capacity initializer
    /// `len · 2^64`, so inputs of different arity never collide trivially.
    pub fn hash(inputs: &[FieldElement]) -> FieldElement {
        let iv = FieldElement::from_u128((inputs.len() as u128) << 64);
        let mut hasher = Self::new(iv);

        if inputs.is_empty() {
            hasher.permute();
            return hasher.state[0];
        }

        for chunk in inputs.chunks(RATE) {
            for (i, value) in chunk.iter().enumerate() {
                hasher.state[i] = hasher.state[i] + *value;
            }
            hasher.permute();
        }

        hasher.state[0]
    }

    /// 2-to-1 compression for Merkle nodes.
    pub fn hash_pair(left: FieldElement, right: FieldElement) -> FieldElement {
        Self::hash(&[left, right])
    }

    /// Apply the Poseidon2 permutation to the internal state.
    fn permute(&mut self) {
        let params = &*PARAMS;

        // Linear layer before the first round.
        matmul_external(&mut self.state);

        for round in 0..FULL_ROUNDS / 2 {
            add_round_constants(&mut self.state, &params.external_rc[round]);
            apply_sbox_full(&mut self.state);
            matmul_external(&mut self.state);
        }

        for round in 0..PARTIAL_ROUNDS {
            self.state[0] = self.state[0] + params.internal_rc[round];
            self.state[0] = sbox(self.state[0]);
            matmul_internal(&mut self.state, &params.internal_diag);
        }

        for round in FULL_ROUNDS / 2..FULL_ROUNDS {
            add_round_constants(&mut self.state, &params.external_rc[round]);
            apply_sbox_full(&mut self.state);
            matmul_external(&mut self.state);
        }
    }
}

/// S-box function: x^5.
#[inline]
fn sbox(x: FieldElement) -> FieldElement {
    let x2 = x.square();
    let x4 = x2.square();
    x4 * x
}

fn add_round_constants(state: &mut [FieldElement; STATE_WIDTH], rc: &[FieldElement; STATE_WIDTH]) {
    for i in 0..STATE_WIDTH {
        state[i] = state[i] + rc[i];
    }
}

fn apply_sbox_full(state: &mut [FieldElement; STATE_WIDTH]) {
    for i in 0..STATE_WIDTH {
        state[i] = sbox(state[i]);
    }
}

/// Multiply the state by the external matrix M4:
///
/// ```text
/// [5 7 1 3]
/// [4 6 1 1]
/// [1 3 5 7]
/// [1 1 4 6]
/// ```
///
/// written as the addition chain from the Poseidon2 reference.
fn matmul_external(state: &mut [FieldElement; STATE_WIDTH]) {
    let t0 = state[0] + state[1];
    let t1 = state[2] + state[3];
    let t2 = state[1] + state[1] + t1;
    let t3 = state[3] + state[3] + t0;
    let t4 = t1 + t1 + t1 + t1 + t3;
    let t5 = t0 + t0 + t0 + t0 + t2;
    let t6 = t3 + t5;
    let t7 = t2 + t4;
    state[0] = t6;
    state[1] = t5;
    state[2] = t7;
    state[3] = t4;
}

/// Multiply the state by the internal matrix (all-ones plus a diagonal).
fn matmul_internal(state: &mut [FieldElement; STATE_WIDTH], diag: &[FieldElement; STATE_WIDTH]) {
    let sum = state[0] + state[1] + state[2] + state[3];
    for i in 0..STATE_WIDTH {
        state[i] = state[i] * diag[i] + sum - state[i];
    }
}

/// Grain LFSR for deriving the Poseidon2 round constants.
///
/// 80-bit register seeded with the instance shape (field tag, S-box tag,
/// field size, state width, round counts), warmed up for 160 steps, then
/// read through the bit-pair filter of the reference generator.
struct GrainLFSR {
    state: [bool; 80],
}

impl GrainLFSR {
    fn new() -> Self {
        let mut bits = Vec::with_capacity(80);
        push_bits(&mut bits, 1, 2); // field tag: prime field
        push_bits(&mut bits, 0, 4); // S-box tag: x^alpha
        push_bits(&mut bits, 254, 12); // field size in bits
        push_bits(&mut bits, STATE_WIDTH as u64, 12);
        push_bits(&mut bits, FULL_ROUNDS as u64, 10);
        push_bits(&mut bits, PARTIAL_ROUNDS as u64, 10);
        push_bits(&mut bits, (1 << 30) - 1, 30);

        let mut state = [false; 80];
        state.copy_from_slice(&bits);

        let mut lfsr = Self { state };
        for _ in 0..160 {
            lfsr.step();
        }
        lfsr
    }

    /// Advance the register by one step.
    fn step(&mut self) -> bool {
        let new_bit = self.state[62]
            ^ self.state[51]
            ^ self.state[38]
            ^ self.state[23]
            ^ self.state[13]
            ^ self.state[0];

        for i in 0..79 {
            self.state[i] = self.state[i + 1];
        }
        self.state[79] = new_bit;
        new_bit
    }

    /// Next filtered output bit: pairs are read and the second bit is kept
    /// only when the first is set.
    fn next_bit(&mut self) -> bool {
        loop {
            let keep = self.step();
            let bit = self.step();
            if keep {
                return bit;
            }
        }
    }

    /// Sample a field element: 254 bits MSB-first with rejection sampling.
    fn next_field_element(&mut self, modulus: &BigUint) -> FieldElement {
        loop {
            let mut value = BigUint::default();
            for _ in 0..254 {
                value <<= 1u8;
                if self.next_bit() {
                    value += 1u8;
                }
            }
            if &value < modulus {
                let bytes = value.to_bytes_be();
                let mut padded = [0u8; 32];
                padded[32 - bytes.len()..].copy_from_slice(&bytes);
                return FieldElement::from_be_bytes_mod_order(&padded);
            }
        }
    }
}

fn push_bits(bits: &mut Vec<bool>, value: u64, width: usize) {
    for i in (0..width).rev() {
        bits.push((value >> i) & 1 == 1);
    }
}

/// Poseidon2 round constants and internal-matrix diagonal.
struct Poseidon2Params {
    external_rc: [[FieldElement; STATE_WIDTH]; FULL_ROUNDS],
    internal_rc: [FieldElement; PARTIAL_ROUNDS],
    internal_diag: [FieldElement; STATE_WIDTH],
}

/// Parameters are derived once from a single Grain stream: the external
/// round constants first, then the partial-round constants, then the
/// internal diagonal (re-sampled if a draw comes out zero).
static PARAMS: LazyLock<Poseidon2Params> = LazyLock::new(|| {
    let modulus = BigUint::from_bytes_be(
        &ark_bn254::Fr::MODULUS.to_bytes_be(),
    );
    let mut lfsr = GrainLFSR::new();

    let mut external_rc = [[FieldElement::ZERO; STATE_WIDTH]; FULL_ROUNDS];
    for round in &mut external_rc {
        for slot in round.iter_mut() {
            *slot = lfsr.next_field_element(&modulus);
        }
    }

    let mut internal_rc = [FieldElement::ZERO; PARTIAL_ROUNDS];
    for slot in &mut internal_rc {
        *slot = lfsr.next_field_element(&modulus);
    }

    let mut internal_diag = [FieldElement::ZERO; STATE_WIDTH];
    for slot in &mut internal_diag {
        let mut draw = lfsr.next_field_element(&modulus);
        while draw.is_zero() {
            draw = lfsr.next_field_element(&modulus);
        }
        *slot = draw;
    }

    Poseidon2Params {
        external_rc,
        internal_rc,
        internal_diag,
    }
});

// ========== Tests ==========
