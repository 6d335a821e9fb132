//! Mining engine for the ledger
//!
//! Wraps block production with timing and hash-rate reporting.

use crate::core::{Block, Blockchain};
use log::info;
use std::time::Instant;

/// Mining statistics
#[derive(Debug, Clone)]
pub struct MiningStats {
    /// Number of hash attempts
    pub hash_attempts: u64,
    /// Time taken in milliseconds
    pub time_ms: u128,
    /// Hash rate (hashes per second)
    pub hash_rate: f64,
}

/// Miner for creating new blocks
pub struct Miner {
    /// Node identity receiving mining rewards
    pub address: String,
}

impl Miner {
    /// Create a new miner
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
        }
    }

    /// Mine the next block from the chain's pending pool
    ///
    /// CPU-bound: the caller's thread is busy until a proof is found.
    pub fn mine_block(&self, blockchain: &mut Blockchain) -> (Block, MiningStats) {
        let start = Instant::now();

        info!(
            "Mining block {} with difficulty {} ({} pending transactions)...",
            blockchain.length(),
            blockchain.difficulty(),
            blockchain.pending_transactions().len()
        );

        let (block, attempts) = blockchain.mine_with_attempts(&self.address);

        let elapsed = start.elapsed().as_millis();
        let hash_rate = if elapsed > 0 {
            (attempts as f64) / (elapsed as f64 / 1000.0)
        } else {
            attempts as f64
        };

        let stats = MiningStats {
            hash_attempts: attempts,
            time_ms: elapsed,
            hash_rate,
        };

        let submitted = block.transactions.iter().filter(|tx| !tx.is_reward()).count();
        info!(
            "Block {} mined in {}ms ({} attempts, {:.2} H/s, {} transactions, {} submitted)",
            block.index,
            elapsed,
            attempts,
            hash_rate,
            block.tx_count(),
            submitted
        );

        (block, stats)
    }
}
