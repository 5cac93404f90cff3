//! Block implementation
//!
//! A block is a header (number, parent, nonce) plus a body holding an ordered
//! list of transactions. Its canonical encoding is the proof-of-work preimage.

use crate::core::encoding::to_canonical_bytes;
use crate::core::transaction::Transaction;
use crate::crypto::{sha256_hex, work_value};
use crate::mining::difficulty::{difficulty_mask, meets_mask};
use serde::{Deserialize, Serialize};

/// Block header containing metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlockHeader {
    /// Block height
    pub block_number: u64,
    /// Identifier of the predecessor block
    pub parent_block: i64,
    /// Nonce used for proof of work
    pub nonce: u64,
}

/// Block body
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BlockBody {
    /// Transactions, applied and hashed in this order
    pub transactions: Vec<Transaction>,
}

/// A block to be mined
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Block {
    pub header: BlockHeader,
    pub body: BlockBody,
}

impl Block {
    /// Create a new block (unmined, nonce 0)
    pub fn new(block_number: u64, parent_block: i64, transactions: Vec<Transaction>) -> Self {
        Self {
            header: BlockHeader {
                block_number,
                parent_block,
                nonce: 0,
            },
            body: BlockBody { transactions },
        }
    }

    /// Set the starting nonce
    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.header.nonce = nonce;
        self
    }

    pub fn nonce(&self) -> u64 {
        self.header.nonce
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.body.transactions
    }

    /// Get number of transactions in this block
    pub fn tx_count(&self) -> usize {
        self.body.transactions.len()
    }

    /// Canonical byte encoding of the block
    pub fn serialize(&self) -> Vec<u8> {
        // Strings, integers and finite floats always encode into a Vec.
        to_canonical_bytes(self).expect("block encoding into memory cannot fail")
    }

    /// Canonical encoding as text
    pub fn to_json(&self) -> String {
        String::from_utf8_lossy(&self.serialize()).into_owned()
    }

    /// 48-bit work value of the current block state
    pub fn hash(&self) -> u64 {
        work_value(&self.serialize())
    }

    /// Full SHA-256 digest of the current block state, hex encoded
    pub fn hash_hex(&self) -> String {
        sha256_hex(&self.serialize())
    }

    /// Advance the nonce by one. Returns the new nonce, or `None` if the
    /// nonce space is used up, in which case the nonce is left unchanged.
    pub fn increase_nonce(&mut self) -> Option<u64> {
        let next = self.header.nonce.checked_add(1)?;
        self.header.nonce = next;
        Some(next)
    }

    /// Check whether the current nonce satisfies `difficulty`
    pub fn meets_difficulty(&self, difficulty: u32) -> bool {
        meets_mask(self.hash(), difficulty_mask(difficulty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_block() -> Block {
        Block::new(1, 0, vec![Transaction::new("alice", "bob", 1)])
    }

    #[test]
    fn test_canonical_serialization() {
        let block = sample_block();
        assert_eq!(
            block.to_json(),
            r#"{"header": {"block_number": 1, "parent_block": 0, "nonce": 0}, "body": {"transactions": [{"from": "alice", "to": "bob", "amount": 1}]}}"#
        );
    }

    #[test]
    fn test_serialize_and_hash_are_deterministic() {
        let block = sample_block();
        assert_eq!(block.serialize(), block.serialize());
        assert_eq!(block.hash(), block.hash());
        assert_eq!(block.hash(), 0xfa0b_aef5_df35);
        assert_eq!(
            block.hash_hex(),
            "207e79e3eaa3deb2285ab23d1f6b91203c447ddc9b18cce11669fa0baef5df35"
        );
    }

    #[test]
    fn test_nonce_changes_hash() {
        let block = sample_block();
        let mined = block.clone().with_nonce(3);
        assert_ne!(block.hash(), mined.hash());
        assert_eq!(mined.hash(), 0x2e05_6bc5_ee90);
        assert!(mined.meets_difficulty(4));
        assert!(!block.meets_difficulty(4));
    }

    #[test]
    fn test_transaction_order_matters() {
        let a = Transaction::new("A", "B", 1);
        let b = Transaction::new("B", "C", 1);
        let first = Block::new(1, 0, vec![a.clone(), b.clone()]);
        let second = Block::new(1, 0, vec![b, a]);
        assert_ne!(first.serialize(), second.serialize());
    }

    #[test]
    fn test_parse_block_description() {
        let raw = r#"{
            "header": {"block_number": 7, "parent_block": 6, "nonce": 12, "miner": "x"},
            "body": {"transactions": [{"from": "A", "to": "B", "amount": 5}]}
        }"#;
        let block: Block = serde_json::from_str(raw).unwrap();
        assert_eq!(block.header.block_number, 7);
        assert_eq!(block.header.parent_block, 6);
        assert_eq!(block.nonce(), 12);
        assert_eq!(block.tx_count(), 1);
        // unknown header fields never reach the preimage
        assert!(!block.to_json().contains("miner"));
    }

    #[test]
    fn test_small_decimal_amount_encoding() {
        let raw = r#"{"header": {"block_number": 1, "parent_block": 0, "nonce": 0},
            "body": {"transactions": [{"from": "A", "to": "B", "amount": 0.00001}]}}"#;
        let block: Block = serde_json::from_str(raw).unwrap();
        assert_eq!(
            block.to_json(),
            r#"{"header": {"block_number": 1, "parent_block": 0, "nonce": 0}, "body": {"transactions": [{"from": "A", "to": "B", "amount": 1e-05}]}}"#
        );
        assert_eq!(block.hash(), 0xa37a_5a11_0979);
    }

    #[test]
    fn test_oversized_integer_amount_is_rejected() {
        let raw = r#"{"header": {"block_number": 1, "parent_block": 0, "nonce": 0},
            "body": {"transactions": [{"from": "A", "to": "B", "amount": 18446744073709551616}]}}"#;
        assert!(serde_json::from_str::<Block>(raw).is_err());
    }

    #[test]
    fn test_empty_body() {
        let block = Block::new(0, -1, vec![]);
        assert_eq!(
            block.to_json(),
            r#"{"header": {"block_number": 0, "parent_block": -1, "nonce": 0}, "body": {"transactions": []}}"#
        );
    }

    #[test]
    fn test_increase_nonce() {
        let mut block = sample_block();
        assert_eq!(block.increase_nonce(), Some(1));
        assert_eq!(block.nonce(), 1);

        let mut last = sample_block().with_nonce(u64::MAX);
        assert_eq!(last.increase_nonce(), None);
        assert_eq!(last.nonce(), u64::MAX);
    }
}
