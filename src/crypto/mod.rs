//! Cryptographic utilities
//!
//! This module provides:
//! - SHA-256 hashing
//! - Truncation of digests to the 48-bit work value

pub mod hash;

pub use hash::{sha256, sha256_hex, truncate_digest, work_value};
