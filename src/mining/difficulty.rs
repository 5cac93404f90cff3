//! Difficulty masks
//!
//! A difficulty level `d` is encoded as a 48-bit mask whose low `d` bits are
//! zero and whose remaining bits are one. A work value satisfies the mask when
//! OR-ing it into the mask leaves the mask unchanged, i.e. when the low `d`
//! bits of the work value are all zero.

/// Number of bits in a work value
pub const WORK_BITS: u32 = 48;

/// Mask selecting the 48-bit working window of a digest
pub const WORK_MASK: u64 = 0xFFFF_FFFF_FFFF;

/// Width of the run of ones the miner shifts to build its mask.
///
/// Any width of at least `WORK_BITS` yields the same 48-bit mask; 64 is the
/// width historically used for this exercise.
pub const MASK_BASE_WIDTH: u32 = 64;

/// Build the mask for `difficulty` from a run of `bit_width` ones.
///
/// The ones are shifted left by `difficulty` positions and the result is cut
/// down to the 48-bit working window. For `difficulty >= WORK_BITS` the mask
/// collapses to zero, which only a work value of exactly zero can satisfy.
pub fn compute_mask(bit_width: u32, difficulty: u32) -> u64 {
    let ones: u128 = if bit_width >= u128::BITS {
        u128::MAX
    } else {
        (1u128 << bit_width) - 1
    };
    let shifted = ones.checked_shl(difficulty).unwrap_or(0);
    (shifted & u128::from(WORK_MASK)) as u64
}

/// The mask the miner searches against for a given difficulty
pub fn difficulty_mask(difficulty: u32) -> u64 {
    compute_mask(MASK_BASE_WIDTH, difficulty)
}

/// Check a work value against a mask
#[inline]
pub fn meets_mask(work: u64, mask: u64) -> bool {
    (work | mask) == mask
}

/// Whether a difficulty can be met by anything other than a zero work value
pub fn is_satisfiable(difficulty: u32) -> bool {
    difficulty < WORK_BITS
}
