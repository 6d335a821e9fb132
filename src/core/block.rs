//! Block implementation for the ledger
//!
//! A block records a snapshot of pending transactions together with the
//! proof that was solved for it and a link to an earlier block.

use crate::core::transaction::Transaction;
use crate::crypto::sha256_hex;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Proof stored in the genesis block
pub const GENESIS_PROOF: u64 = 100;

/// Previous-hash marker stored in the genesis block
pub const GENESIS_PREVIOUS_HASH: &str = "1";

/// A block in the chain
///
/// Field order defines the canonical encoding hashed by [`Block::hash`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Position in the chain (0 = genesis)
    pub index: u64,
    /// Block creation time
    pub timestamp: DateTime<Utc>,
    /// Transactions drained from the pool when the block was created
    pub transactions: Vec<Transaction>,
    /// Solved proof-of-work number
    pub proof: u64,
    /// Hash of the preceding block
    pub previous_hash: String,
}

impl Block {
    /// Create a new block stamped with the current time
    pub fn new(
        index: u64,
        transactions: Vec<Transaction>,
        proof: u64,
        previous_hash: String,
    ) -> Self {
        Self {
            index,
            timestamp: Utc::now(),
            transactions,
            proof,
            previous_hash,
        }
    }

    /// Create the genesis block
    pub fn genesis() -> Self {
        Self::new(
            0,
            Vec::new(),
            GENESIS_PROOF,
            GENESIS_PREVIOUS_HASH.to_string(),
        )
    }

    /// Canonical SHA-256 digest of the block, as lowercase hex
    ///
    /// The block is encoded as compact JSON with a fixed field order, so equal
    /// blocks hash identically on every node.
    pub fn hash(&self) -> String {
        // Serializing plain owned fields into a Vec cannot fail
        let encoded = serde_json::to_vec(self).unwrap_or_default();
        sha256_hex(&encoded)
    }

    /// Whether this is the genesis block
    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }

    /// Get number of transactions in this block
    pub fn tx_count(&self) -> usize {
        self.transactions.len()
    }
}
