//! Transfers between ledger accounts
//!
//! A transaction moves `amount` from one account to another. There are no
//! signatures; affordability is checked against a balance ledger.

use crate::core::amount::Amount;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single transfer. Field order is part of the canonical encoding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Sending account
    pub from: String,
    /// Receiving account
    pub to: String,
    /// Quantity moved
    pub amount: Amount,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(from: &str, to: &str, amount: impl Into<Amount>) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            amount: amount.into(),
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}: {}", self.from, self.to, self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_json_shape() {
        let tx = Transaction::new("alice", "bob", 1);
        assert_eq!(
            serde_json::to_string(&tx).unwrap(),
            r#"{"from":"alice","to":"bob","amount":1}"#
        );
    }

    #[test]
    fn test_parse_decimal_amount() {
        let tx: Transaction =
            serde_json::from_str(r#"{"from": "A", "to": "B", "amount": 2.5}"#).unwrap();
        assert_eq!(tx.amount, Amount::Decimal(2.5));
        assert_eq!(tx.to_string(), "A -> B: 2.5");
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let parsed = serde_json::from_str::<Transaction>(r#"{"from": "A", "amount": 1}"#);
        assert!(parsed.is_err());
    }
}
