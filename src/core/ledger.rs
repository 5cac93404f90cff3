//! Account balances and transaction validation
//!
//! Validation never touches the caller's ledger: transactions are applied in
//! block order to a private copy, and that copy is handed back only if every
//! transaction was affordable.

use crate::core::amount::Amount;
use crate::core::transaction::Transaction;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Ledger validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Unknown account in transaction {index}: {account}")]
    UnknownAccount { index: usize, account: String },
    #[error("Insufficient funds in transaction {index}: {account} has {balance}, needs {amount}")]
    InsufficientFunds {
        index: usize,
        account: String,
        balance: Amount,
        amount: Amount,
    },
    #[error("Unknown recipient in transaction {index}: {account}")]
    UnknownRecipient { index: usize, account: String },
    #[error("Balance overflow crediting {account} in transaction {index}")]
    BalanceOverflow { index: usize, account: String },
}

/// What to do when a transaction credits an account the ledger does not know
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecipientPolicy {
    /// Open the account with the credited amount
    #[default]
    AutoCreate,
    /// Fail validation with `LedgerError::UnknownRecipient`
    RejectUnknown,
}

/// Mapping from account identifier to balance
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct BalanceLedger {
    balances: BTreeMap<String, Amount>,
}

impl BalanceLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an account's balance
    pub fn insert(&mut self, account: &str, balance: impl Into<Amount>) {
        self.balances.insert(account.to_string(), balance.into());
    }

    /// Builder-style variant of `insert`
    pub fn with_account(mut self, account: &str, balance: impl Into<Amount>) -> Self {
        self.insert(account, balance);
        self
    }

    pub fn balance(&self, account: &str) -> Option<Amount> {
        self.balances.get(account).copied()
    }

    pub fn contains(&self, account: &str) -> bool {
        self.balances.contains_key(account)
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Iterate accounts in identifier order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Amount)> {
        self.balances.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Check every transaction against a copy of this ledger.
    ///
    /// Transactions are applied in order; the first one that cannot be
    /// applied rejects the whole list. On success the updated copy is
    /// returned and `self` is unchanged either way.
    pub fn validate_and_apply(
        &self,
        transactions: &[Transaction],
        policy: RecipientPolicy,
    ) -> Result<BalanceLedger, LedgerError> {
        let mut working = self.clone();
        for (index, tx) in transactions.iter().enumerate() {
            working.apply(index, tx, policy)?;
            debug!("Applied transaction {}: {}", index, tx);
        }
        Ok(working)
    }

    fn apply(
        &mut self,
        index: usize,
        tx: &Transaction,
        policy: RecipientPolicy,
    ) -> Result<(), LedgerError> {
        let balance = self
            .balance(&tx.from)
            .ok_or_else(|| LedgerError::UnknownAccount {
                index,
                account: tx.from.clone(),
            })?;

        let insufficient = || LedgerError::InsufficientFunds {
            index,
            account: tx.from.clone(),
            balance,
            amount: tx.amount,
        };
        if balance < tx.amount {
            return Err(insufficient());
        }

        if policy == RecipientPolicy::RejectUnknown && !self.contains(&tx.to) {
            return Err(LedgerError::UnknownRecipient {
                index,
                account: tx.to.clone(),
            });
        }

        let debited = balance.checked_sub(tx.amount).ok_or_else(insufficient)?;
        self.balances.insert(tx.from.clone(), debited);

        let current = self.balance(&tx.to).unwrap_or(Amount::ZERO);
        let credited = current
            .checked_add(tx.amount)
            .ok_or_else(|| LedgerError::BalanceOverflow {
                index,
                account: tx.to.clone(),
            })?;
        self.balances.insert(tx.to.clone(), credited);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> BalanceLedger {
        BalanceLedger::new().with_account("A", 10).with_account("B", 0)
    }

    #[test]
    fn test_affordable_transfer() {
        let original = ledger();
        let txs = vec![Transaction::new("A", "B", 5)];

        let updated = original
            .validate_and_apply(&txs, RecipientPolicy::AutoCreate)
            .unwrap();

        assert_eq!(updated.balance("A"), Some(Amount::Units(5)));
        assert_eq!(updated.balance("B"), Some(Amount::Units(5)));
        // caller's ledger untouched
        assert_eq!(original, ledger());
    }

    #[test]
    fn test_insufficient_funds() {
        let original = ledger();
        let txs = vec![Transaction::new("A", "B", 15)];

        let err = original
            .validate_and_apply(&txs, RecipientPolicy::AutoCreate)
            .unwrap_err();

        assert_eq!(
            err,
            LedgerError::InsufficientFunds {
                index: 0,
                account: "A".to_string(),
                balance: Amount::Units(10),
                amount: Amount::Units(15),
            }
        );
        assert_eq!(original, ledger());
    }

    #[test]
    fn test_exact_balance_is_affordable() {
        let txs = vec![Transaction::new("A", "B", 10)];
        let updated = ledger()
            .validate_and_apply(&txs, RecipientPolicy::AutoCreate)
            .unwrap();
        assert_eq!(updated.balance("A"), Some(Amount::Units(0)));
    }

    #[test]
    fn test_unknown_sender() {
        let txs = vec![Transaction::new("Z", "B", 1)];
        let err = ledger()
            .validate_and_apply(&txs, RecipientPolicy::AutoCreate)
            .unwrap_err();
        assert!(matches!(err, LedgerError::UnknownAccount { index: 0, ref account } if account == "Z"));
    }

    #[test]
    fn test_transactions_apply_in_order() {
        // B can only pay C after receiving from A
        let txs = vec![Transaction::new("A", "B", 4), Transaction::new("B", "C", 3)];
        let updated = ledger()
            .validate_and_apply(&txs, RecipientPolicy::AutoCreate)
            .unwrap();
        assert_eq!(updated.balance("A"), Some(Amount::Units(6)));
        assert_eq!(updated.balance("B"), Some(Amount::Units(1)));
        assert_eq!(updated.balance("C"), Some(Amount::Units(3)));

        let reversed = vec![Transaction::new("B", "C", 3), Transaction::new("A", "B", 4)];
        let err = ledger()
            .validate_and_apply(&reversed, RecipientPolicy::AutoCreate)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { index: 0, .. }));
    }

    #[test]
    fn test_later_failure_rejects_whole_list() {
        let txs = vec![Transaction::new("A", "B", 8), Transaction::new("A", "B", 8)];
        let err = ledger()
            .validate_and_apply(&txs, RecipientPolicy::AutoCreate)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { index: 1, .. }));
    }

    #[test]
    fn test_recipient_policies() {
        let txs = vec![Transaction::new("A", "new", 2)];

        let created = ledger()
            .validate_and_apply(&txs, RecipientPolicy::AutoCreate)
            .unwrap();
        assert_eq!(created.balance("new"), Some(Amount::Units(2)));
        assert_eq!(created.len(), 3);

        let err = ledger()
            .validate_and_apply(&txs, RecipientPolicy::RejectUnknown)
            .unwrap_err();
        assert!(matches!(err, LedgerError::UnknownRecipient { index: 0, .. }));
    }

    #[test]
    fn test_self_transfer_keeps_balance() {
        let txs = vec![Transaction::new("A", "A", 7)];
        let updated = ledger()
            .validate_and_apply(&txs, RecipientPolicy::RejectUnknown)
            .unwrap();
        assert_eq!(updated.balance("A"), Some(Amount::Units(10)));
    }

    #[test]
    fn test_credit_overflow() {
        let ledger = BalanceLedger::new()
            .with_account("A", 1)
            .with_account("B", u64::MAX);
        let txs = vec![Transaction::new("A", "B", 1)];
        let err = ledger
            .validate_and_apply(&txs, RecipientPolicy::AutoCreate)
            .unwrap_err();
        assert!(matches!(err, LedgerError::BalanceOverflow { .. }));
    }

    #[test]
    fn test_decimal_balances() {
        let ledger: BalanceLedger =
            serde_json::from_str(r#"{"A": 2.5, "B": 1}"#).unwrap();
        let txs = vec![Transaction::new("A", "B", 2)];
        let updated = ledger
            .validate_and_apply(&txs, RecipientPolicy::AutoCreate)
            .unwrap();
        assert_eq!(updated.balance("A"), Some(Amount::Decimal(0.5)));
        assert_eq!(updated.balance("B"), Some(Amount::Units(3)));
    }

    #[test]
    fn test_empty_transaction_list() {
        let updated = ledger()
            .validate_and_apply(&[], RecipientPolicy::AutoCreate)
            .unwrap();
        assert_eq!(updated, ledger());
    }
}
