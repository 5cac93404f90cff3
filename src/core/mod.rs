//! Core components
//!
//! This module contains the fundamental building blocks:
//! - Amounts (exact integers or decimals)
//! - Transactions (plain account-to-account transfers)
//! - Blocks (header + ordered transaction list)
//! - Canonical JSON encoding used as the hash preimage
//! - Balance ledger and transaction validation

pub mod amount;
pub mod block;
pub mod encoding;
pub mod ledger;
pub mod transaction;

pub use amount::{Amount, AmountError};
pub use block::{Block, BlockBody, BlockHeader};
pub use encoding::{to_canonical_bytes, SpacedFormatter};
pub use ledger::{BalanceLedger, LedgerError, RecipientPolicy};
pub use transaction::Transaction;
