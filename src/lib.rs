//! PoW demo: a minimal proof-of-work miner in Rust
//!
//! This crate provides:
//! - Difficulty masks over a 48-bit work value
//! - Canonical, deterministic block serialization
//! - SHA-256 block hashing truncated to the work window
//! - Ledger-based transaction validation on a private copy of balances
//! - A nonce search with throttling, attempt caps and cancellation
//!
//! # Example
//!
//! ```rust
//! use pow_demo::core::{BalanceLedger, Block, Transaction};
//! use pow_demo::mining::Miner;
//!
//! let mut block = Block::new(1, 0, vec![Transaction::new("alice", "bob", 1)]);
//! let ledger = BalanceLedger::new()
//!     .with_account("alice", 5)
//!     .with_account("bob", 0);
//!
//! let outcome = Miner::default().mine(&mut block, &ledger, 4).unwrap();
//! assert_eq!(block.nonce(), outcome.nonce);
//! assert!(block.meets_difficulty(4));
//! println!("{}", block.to_json());
//! ```

pub mod cli;
pub mod core;
pub mod crypto;
pub mod mining;
pub mod storage;

// Re-export commonly used types
pub use crate::core::{Amount, BalanceLedger, Block, LedgerError, RecipientPolicy, Transaction};
pub use crate::mining::{CancelToken, Miner, MinerConfig, MiningError, MiningOutcome};
pub use crate::storage::StorageError;
