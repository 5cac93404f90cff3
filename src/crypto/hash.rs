//! Cryptographic hashing utilities for proof of work
//!
//! Provides the SHA-256 digest used for block hashes and the reduction of
//! that digest to the 48-bit work value every difficulty comparison uses.

use crate::mining::difficulty::WORK_MASK;
use sha2::{Digest, Sha256};

/// Computes SHA-256 hash of the input data
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Computes SHA-256 hash and returns it as a hex string
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// Reduce a digest to the working value compared against difficulty masks.
///
/// The digest is read as one big-endian unsigned integer and only its low
/// 48 bits are kept, which are exactly the last six bytes.
pub fn truncate_digest(digest: &[u8; 32]) -> u64 {
    let tail = digest[24..]
        .iter()
        .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte));
    tail & WORK_MASK
}

/// Hash arbitrary bytes straight to a work value
pub fn work_value(data: &[u8]) -> u64 {
    truncate_digest(&sha256(data))
}
