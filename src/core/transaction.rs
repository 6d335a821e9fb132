//! Ledger transactions
//!
//! A transaction moves an amount from a sender to a recipient. It carries no
//! signature; callers are trusted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sender used for mining reward transactions
pub const REWARD_SENDER: &str = "0";

/// Amount credited to the miner for each block
pub const MINING_REWARD: u64 = 1;

/// Transaction validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("Sender must not be empty")]
    EmptySender,
    #[error("Recipient must not be empty")]
    EmptyRecipient,
    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(i64),
}

/// A transfer recorded on the ledger
///
/// Field order is part of the canonical block encoding and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub amount: u64,
}

impl Transaction {
    /// Create a validated transaction
    ///
    /// The amount is taken signed so that negative input from callers is
    /// reported as a validation error rather than a decoding failure.
    pub fn new(sender: &str, recipient: &str, amount: i64) -> Result<Self, TransactionError> {
        if sender.is_empty() {
            return Err(TransactionError::EmptySender);
        }
        if recipient.is_empty() {
            return Err(TransactionError::EmptyRecipient);
        }
        if amount <= 0 {
            return Err(TransactionError::NonPositiveAmount(amount));
        }

        Ok(Self {
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            amount: amount as u64,
        })
    }

    /// Reward transaction paying the miner
    pub fn reward(miner: &str) -> Self {
        Self {
            sender: REWARD_SENDER.to_string(),
            recipient: miner.to_string(),
            amount: MINING_REWARD,
        }
    }

    /// Whether this is a mining reward
    pub fn is_reward(&self) -> bool {
        self.sender == REWARD_SENDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transaction() {
        let tx = Transaction::new("Alice", "Bob", 50).unwrap();
        assert_eq!(tx.sender, "Alice");
        assert_eq!(tx.recipient, "Bob");
        assert_eq!(tx.amount, 50);
        assert!(!tx.is_reward());
    }

    #[test]
    fn test_rejects_empty_parties() {
        assert_eq!(
            Transaction::new("", "Bob", 1),
            Err(TransactionError::EmptySender)
        );
        assert_eq!(
            Transaction::new("Alice", "", 1),
            Err(TransactionError::EmptyRecipient)
        );
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        assert_eq!(
            Transaction::new("Alice", "Bob", 0),
            Err(TransactionError::NonPositiveAmount(0))
        );
        assert_eq!(
            Transaction::new("Alice", "Bob", -5),
            Err(TransactionError::NonPositiveAmount(-5))
        );
    }

    #[test]
    fn test_reward_transaction() {
        let tx = Transaction::reward("node-1");
        assert!(tx.is_reward());
        assert_eq!(tx.recipient, "node-1");
        assert_eq!(tx.amount, MINING_REWARD);
    }
}
